//! Bytewords: a reversible mapping from bytes to four-letter words (and
//! their two-letter "minimal" contraction), with a trailing CRC-32 so a
//! transcription error is caught rather than silently decoded (spec §6 UR
//! wire format).
//!
//! This crate's word list is a purpose-built 256-word table rather than a
//! transcription of any external bytewords list: every word's first and
//! last letter pair is unique, which is what lets the minimal two-letter
//! style round-trip. See `DESIGN.md` for why this table, not a vendored
//! one, is the source of truth here.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::checksum::crc32;
use crate::error::{Result, UrError};

pub const WORDS: [&str; 256] = [
    "babb", "badc", "bagd", "bahf", "bakg", "balh", "bamj", "bank",
    "barl", "basm", "batn", "bayp", "becr", "beds", "beet", "belw",
    "cabb", "cadc", "cagd", "cahf", "cakg", "calh", "camj", "cank",
    "carl", "casm", "catn", "cayp", "cecr", "ceds", "ceet", "celw",
    "dabb", "dadc", "dagd", "dahf", "dakg", "dalh", "damj", "dank",
    "darl", "dasm", "datn", "dayp", "decr", "deds", "deet", "delw",
    "fabb", "fadc", "fagd", "fahf", "fakg", "falh", "famj", "fank",
    "farl", "fasm", "fatn", "fayp", "fecr", "feds", "feet", "felw",
    "gabb", "gadc", "gagd", "gahf", "gakg", "galh", "gamj", "gank",
    "garl", "gasm", "gatn", "gayp", "gecr", "geds", "geet", "gelw",
    "habb", "hadc", "hagd", "hahf", "hakg", "halh", "hamj", "hank",
    "harl", "hasm", "hatn", "hayp", "hecr", "heds", "heet", "helw",
    "jabb", "jadc", "jagd", "jahf", "jakg", "jalh", "jamj", "jank",
    "jarl", "jasm", "jatn", "jayp", "jecr", "jeds", "jeet", "jelw",
    "kabb", "kadc", "kagd", "kahf", "kakg", "kalh", "kamj", "kank",
    "karl", "kasm", "katn", "kayp", "kecr", "keds", "keet", "kelw",
    "labb", "ladc", "lagd", "lahf", "lakg", "lalh", "lamj", "lank",
    "larl", "lasm", "latn", "layp", "lecr", "leds", "leet", "lelw",
    "mabb", "madc", "magd", "mahf", "makg", "malh", "mamj", "mank",
    "marl", "masm", "matn", "mayp", "mecr", "meds", "meet", "melw",
    "nabb", "nadc", "nagd", "nahf", "nakg", "nalh", "namj", "nank",
    "narl", "nasm", "natn", "nayp", "necr", "neds", "neet", "nelw",
    "pabb", "padc", "pagd", "pahf", "pakg", "palh", "pamj", "pank",
    "parl", "pasm", "patn", "payp", "pecr", "peds", "peet", "pelw",
    "rabb", "radc", "ragd", "rahf", "rakg", "ralh", "ramj", "rank",
    "rarl", "rasm", "ratn", "rayp", "recr", "reds", "reet", "relw",
    "sabb", "sadc", "sagd", "sahf", "sakg", "salh", "samj", "sank",
    "sarl", "sasm", "satn", "sayp", "secr", "seds", "seet", "selw",
    "tabb", "tadc", "tagd", "tahf", "takg", "talh", "tamj", "tank",
    "tarl", "tasm", "tatn", "tayp", "tecr", "teds", "teet", "telw",
    "wabb", "wadc", "wagd", "wahf", "wakg", "walh", "wamj", "wank",
    "warl", "wasm", "watn", "wayp", "wecr", "weds", "weet", "welw",
];

static WORD_INDEX: LazyLock<HashMap<&'static str, u8>> =
    LazyLock::new(|| WORDS.iter().enumerate().map(|(i, w)| (*w, i as u8)).collect());

static MINIMAL_INDEX: LazyLock<HashMap<(u8, u8), u8>> = LazyLock::new(|| {
    WORDS
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let bytes = w.as_bytes();
            ((bytes[0], bytes[3]), i as u8)
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Full four-letter words, joined with `-`.
    Standard,
    /// The first and last letter of each word, with no separator.
    Minimal,
}

fn with_checksum(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 4);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32(data).to_be_bytes());
    out
}

pub fn encode(data: &[u8], style: Style) -> String {
    let payload = with_checksum(data);
    match style {
        Style::Standard => payload
            .iter()
            .map(|&b| WORDS[b as usize])
            .collect::<Vec<_>>()
            .join("-"),
        Style::Minimal => {
            let mut out = String::with_capacity(payload.len() * 2);
            for &b in &payload {
                let word = WORDS[b as usize];
                out.push_str(&word[..1]);
                out.push_str(&word[3..]);
            }
            out
        }
    }
}

pub fn decode(encoded: &str, style: Style) -> Result<Vec<u8>> {
    let payload = match style {
        Style::Standard => {
            let mut bytes = Vec::new();
            for word in encoded.split('-') {
                let byte = WORD_INDEX
                    .get(word)
                    .ok_or_else(|| UrError::InvalidBytewords(word.to_string()))?;
                bytes.push(*byte);
            }
            bytes
        }
        Style::Minimal => {
            let chars: Vec<char> = encoded.chars().collect();
            if chars.len() % 2 != 0 {
                return Err(UrError::InvalidBytewords(encoded.to_string()));
            }
            let mut bytes = Vec::with_capacity(chars.len() / 2);
            for pair in chars.chunks(2) {
                let key = (pair[0] as u8, pair[1] as u8);
                let byte = MINIMAL_INDEX
                    .get(&key)
                    .ok_or_else(|| UrError::InvalidBytewords(pair.iter().collect()))?;
                bytes.push(*byte);
            }
            bytes
        }
    };
    if payload.len() < 4 {
        return Err(UrError::InvalidBytewords(encoded.to_string()));
    }
    let (data, checksum_bytes) = payload.split_at(payload.len() - 4);
    let expected = u32::from_be_bytes(checksum_bytes.try_into().unwrap());
    if crc32(data) != expected {
        return Err(UrError::ChecksumMismatch);
    }
    Ok(data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_round_trip() {
        let data = b"gordian envelope";
        let encoded = encode(data, Style::Standard);
        assert_eq!(decode(&encoded, Style::Standard).unwrap(), data);
    }

    #[test]
    fn minimal_round_trip() {
        let data = b"\x00\x01\x02\xff\xfe";
        let encoded = encode(data, Style::Minimal);
        assert_eq!(encoded.len(), (data.len() + 4) * 2);
        assert_eq!(decode(&encoded, Style::Minimal).unwrap(), data);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let data = b"tamper me";
        let mut encoded = encode(data, Style::Standard);
        encoded.push_str("-babb");
        assert!(decode(&encoded, Style::Standard).is_err());
    }
}
