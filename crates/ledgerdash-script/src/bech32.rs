//! Bech32 text encoding for Shelley addresses.
//!
//! Standard BIP-173 checksum, without the 90 character limit since base
//! addresses exceed it.

use crate::error::ScriptError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
const CHECKSUM_LEN: usize = 6;

fn polymod(values: impl Iterator<Item = u8>) -> u32 {
    let mut chk = 1u32;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|c| c >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|c| c & 0x1f))
}

fn rev_charset(c: u8) -> Option<u8> {
    CHARSET.iter().position(|&x| x == c).map(|p| p as u8)
}

// Regroup bits; padding only allowed (and required) when widening to 5 bits.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, ScriptError> {
    let mut acc = 0u32;
    let mut bits = 0u32;
    let max = (1u32 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || (acc << (to - bits)) & max != 0 {
        return Err(ScriptError::Bech32("invalid padding".to_string()));
    }
    Ok(out)
}

/// Encode `data` under the human-readable prefix `hrp`.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, ScriptError> {
    if hrp.is_empty() || !hrp.bytes().all(|c| (33..=126).contains(&c) && !c.is_ascii_uppercase()) {
        return Err(ScriptError::Bech32(format!("invalid prefix '{}'", hrp)));
    }
    let words = convert_bits(data, 8, 5, true)?;
    let pm = polymod(hrp_expand(hrp).chain(words.iter().copied()).chain([0u8; CHECKSUM_LEN])) ^ 1;

    let mut out = String::with_capacity(hrp.len() + 1 + words.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for w in &words {
        out.push(char::from(CHARSET[usize::from(*w)]));
    }
    for i in 0..CHECKSUM_LEN {
        let w = (pm >> (5 * (5 - i))) & 0x1f;
        out.push(char::from(CHARSET[w as usize]));
    }
    Ok(out)
}

/// Decode a bech32 string into its prefix and payload bytes.
pub fn decode(text: &str) -> Result<(String, Vec<u8>), ScriptError> {
    let has_lower = text.bytes().any(|c| c.is_ascii_lowercase());
    let has_upper = text.bytes().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(ScriptError::Bech32("mixed case".to_string()));
    }
    let text = text.to_ascii_lowercase();

    let sep = text
        .rfind('1')
        .ok_or_else(|| ScriptError::Bech32("missing separator".to_string()))?;
    let (hrp, rest) = text.split_at(sep);
    let rest = &rest[1..];
    if hrp.is_empty() || rest.len() < CHECKSUM_LEN {
        return Err(ScriptError::Bech32("too short".to_string()));
    }

    let words = rest
        .bytes()
        .map(|c| rev_charset(c).ok_or_else(|| ScriptError::Bech32(format!("invalid character '{}'", char::from(c)))))
        .collect::<Result<Vec<u8>, _>>()?;

    if polymod(hrp_expand(hrp).chain(words.iter().copied())) != 1 {
        return Err(ScriptError::Bech32("bad checksum".to_string()));
    }

    let payload = convert_bits(&words[..words.len() - CHECKSUM_LEN], 5, 8, false)?;
    Ok((hrp.to_string(), payload))
}
