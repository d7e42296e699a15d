//! Wire framing for a braided message: the classical lane's already-encoded
//! `SignalMessage` bytes, plus an optional SPQR epoch-control frame riding
//! alongside it. Uses the same `u32`-length-prefixed field style as
//! `double-ratchet::wire` (no protobuf/prost crate is available in this
//! workspace; see the crate's module docs for the equivalent deliberate
//! simplification there).

use crate::error::{Result, TripleRatchetError};

fn write_field(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_be_bytes());
    out.extend_from_slice(field);
}

fn read_field<'a>(buf: &'a [u8], pos: &mut usize) -> Result<&'a [u8]> {
    if buf.len() < *pos + 4 {
        return Err(TripleRatchetError::InvalidFormat);
    }
    let len = u32::from_be_bytes(buf[*pos..*pos + 4].try_into().unwrap()) as usize;
    *pos += 4;
    if buf.len() < *pos + len {
        return Err(TripleRatchetError::InvalidFormat);
    }
    let field = &buf[*pos..*pos + len];
    *pos += len;
    Ok(field)
}

/// The control traffic for one SPQR epoch transition, carried as its own
/// variant so a receiver can tell which step of the transition table a
/// frame belongs to (spec §4.3.3's `sendHeader`/`sendEk`/`recvCt1`/`recvCt2`).
pub enum EpochControl {
    Header { epoch: u64, hdr: Vec<u8>, mac: [u8; 32] },
    Ek { encap_key: Vec<u8> },
    Ciphertext { ct1: Vec<u8>, ct2: Vec<u8>, mac: [u8; 32] },
}

const TAG_HEADER: u8 = 1;
const TAG_EK: u8 = 2;
const TAG_CIPHERTEXT: u8 = 3;

impl EpochControl {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            EpochControl::Header { epoch, hdr, mac } => {
                out.push(TAG_HEADER);
                out.extend_from_slice(&epoch.to_be_bytes());
                write_field(&mut out, hdr);
                write_field(&mut out, mac);
            }
            EpochControl::Ek { encap_key } => {
                out.push(TAG_EK);
                write_field(&mut out, encap_key);
            }
            EpochControl::Ciphertext { ct1, ct2, mac } => {
                out.push(TAG_CIPHERTEXT);
                write_field(&mut out, ct1);
                write_field(&mut out, ct2);
                write_field(&mut out, mac);
            }
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(TripleRatchetError::InvalidFormat);
        }
        let tag = bytes[0];
        let mut pos = 1;
        match tag {
            TAG_HEADER => {
                if bytes.len() < pos + 8 {
                    return Err(TripleRatchetError::InvalidFormat);
                }
                let epoch = u64::from_be_bytes(bytes[pos..pos + 8].try_into().unwrap());
                pos += 8;
                let hdr = read_field(bytes, &mut pos)?.to_vec();
                let mac_bytes = read_field(bytes, &mut pos)?;
                let mac: [u8; 32] = mac_bytes.try_into().map_err(|_| TripleRatchetError::InvalidFormat)?;
                Ok(EpochControl::Header { epoch, hdr, mac })
            }
            TAG_EK => {
                let encap_key = read_field(bytes, &mut pos)?.to_vec();
                Ok(EpochControl::Ek { encap_key })
            }
            TAG_CIPHERTEXT => {
                let ct1 = read_field(bytes, &mut pos)?.to_vec();
                let ct2 = read_field(bytes, &mut pos)?.to_vec();
                let mac_bytes = read_field(bytes, &mut pos)?;
                let mac: [u8; 32] = mac_bytes.try_into().map_err(|_| TripleRatchetError::InvalidFormat)?;
                Ok(EpochControl::Ciphertext { ct1, ct2, mac })
            }
            _ => Err(TripleRatchetError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_control_round_trips() {
        let header = EpochControl::Header { epoch: 7, hdr: vec![1, 2, 3], mac: [9u8; 32] };
        let decoded = EpochControl::decode(&header.encode()).unwrap();
        assert!(matches!(decoded, EpochControl::Header { epoch: 7, .. }));

        let ct = EpochControl::Ciphertext { ct1: vec![1; 960], ct2: vec![2; 128], mac: [3u8; 32] };
        let decoded = EpochControl::decode(&ct.encode()).unwrap();
        assert!(matches!(decoded, EpochControl::Ciphertext { .. }));
    }
}
