// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId compression
//!
//! A GlobalId is a 128-bit UUID written as 22 characters of a base-64
//! alphabet: the first character carries the top 2 bits, each following
//! character 6 bits.

use uuid::Uuid;

const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed GlobalId
pub const GLOBAL_ID_LEN: usize = 22;

/// Compress a UUID into a 22-character IFC GlobalId
pub fn compress_guid(uuid: &Uuid) -> String {
    let value = uuid.as_u128();
    let mut out = String::with_capacity(GLOBAL_ID_LEN);
    out.push(ALPHABET[(value >> 126) as usize] as char);
    for i in (0..21).rev() {
        let digit = (value >> (i * 6)) & 0x3f;
        out.push(ALPHABET[digit as usize] as char);
    }
    out
}

/// Expand a 22-character IFC GlobalId back into a UUID
///
/// Returns `None` when the string has the wrong length, uses characters
/// outside the alphabet or overflows 128 bits.
pub fn expand_guid(global_id: &str) -> Option<Uuid> {
    let bytes = global_id.as_bytes();
    if bytes.len() != GLOBAL_ID_LEN {
        return None;
    }

    let first = digit_of(bytes[0])?;
    if first > 3 {
        return None;
    }

    let mut value = first as u128;
    for &b in &bytes[1..] {
        value = (value << 6) | digit_of(b)? as u128;
    }
    Some(Uuid::from_u128(value))
}

/// A fresh random GlobalId
pub fn new_global_id() -> String {
    compress_guid(&Uuid::new_v4())
}

fn digit_of(c: u8) -> Option<u8> {
    ALPHABET.iter().position(|&a| a == c).map(|p| p as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_known_values() {
        assert_eq!(compress_guid(&Uuid::nil()), "0000000000000000000000");
        assert_eq!(compress_guid(&Uuid::from_u128(u128::MAX)), "3$$$$$$$$$$$$$$$$$$$$$");
    }

    #[test]
    fn test_expand_inverts_compress() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let gid = compress_guid(&uuid);
        assert_eq!(gid.len(), GLOBAL_ID_LEN);
        assert_eq!(expand_guid(&gid), Some(uuid));
    }

    #[test]
    fn test_expand_rejects_malformed() {
        assert_eq!(expand_guid("short"), None);
        assert_eq!(expand_guid("4000000000000000000000"), None);
        assert_eq!(expand_guid("00000000000000000000-0"), None);
    }
}
