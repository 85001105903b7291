use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length")]
    InvalidLength,

    #[error("Invalid address prefix (account ids start with 'G')")]
    InvalidPrefix,

    #[error("Invalid base32 character")]
    InvalidBase32,

    #[error("Invalid version byte")]
    InvalidVersion,

    #[error("Invalid address checksum")]
    InvalidChecksum,
}

const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Strkey version byte for an ed25519 public key (`G...`).
const VERSION_ACCOUNT_ID: u8 = 6 << 3;

/// Encoded length of an account strkey: base32 of 1 version + 32 key + 2 crc bytes.
const ACCOUNT_ID_LEN: usize = 56;

/// Stellar account id in strkey form (`G...`).
///
/// Only checks the encoding: version byte, base32 alphabet and the CRC16
/// checksum. Whether the account exists on-chain is the balance source's
/// concern.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    encoded: String,
}

impl AccountId {
    /// Parse and validate a `G...` strkey.
    pub fn from_string(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        if s.len() != ACCOUNT_ID_LEN {
            return Err(AddressError::InvalidLength);
        }
        if !s.starts_with('G') {
            return Err(AddressError::InvalidPrefix);
        }

        let decoded = decode_base32(s)?;
        if decoded.len() != 35 {
            return Err(AddressError::InvalidLength);
        }
        if decoded[0] != VERSION_ACCOUNT_ID {
            return Err(AddressError::InvalidVersion);
        }

        let (payload, checksum) = decoded.split_at(33);
        let expected = crc16_xmodem(payload).to_le_bytes();
        if checksum != expected {
            return Err(AddressError::InvalidChecksum);
        }

        Ok(Self {
            encoded: s.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Shortened form for tight layouts, e.g. `GA7Q…VSGZ`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.encoded[..4], &self.encoded[ACCOUNT_ID_LEN - 4..])
    }
}

impl FromStr for AccountId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_string(&s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.encoded
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AccountId({})", self.encoded)
    }
}

/// RFC 4648 base32 without padding.
fn decode_base32(s: &str) -> Result<Vec<u8>, AddressError> {
    let mut out = Vec::with_capacity(s.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for ch in s.bytes() {
        let idx = BASE32_ALPHABET
            .iter()
            .position(|&c| c == ch)
            .ok_or(AddressError::InvalidBase32)? as u32;
        buffer = (buffer << 5) | idx;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    // Leftover bits must be zero padding
    if buffer != 0 {
        return Err(AddressError::InvalidBase32);
    }

    Ok(out)
}

/// CRC16-XModem as used by strkey checksums.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";

    #[test]
    fn test_valid_account_ids() {
        for s in [
            ALICE,
            "GA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQHES5",
            "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7",
        ] {
            let id = AccountId::from_string(s).unwrap();
            assert_eq!(id.as_str(), s);
        }
    }

    #[test]
    fn test_repeated_byte_keys_decode() {
        for s in [
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
            "GAAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQDZ7H",
            "GABAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEJXA",
        ] {
            assert!(AccountId::from_string(s).is_ok(), "{}", s);
        }
    }

    #[test]
    fn test_bad_checksum() {
        let mut s = ALICE.to_string();
        s.replace_range(55..56, "A");
        assert_eq!(
            AccountId::from_string(&s),
            Err(AddressError::InvalidChecksum)
        );
    }

    #[test]
    fn test_rejects_wrong_prefix_and_length() {
        assert_eq!(
            AccountId::from_string("-"),
            Err(AddressError::InvalidLength)
        );
        let contract = "CA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQHES5";
        assert_eq!(
            AccountId::from_string(contract),
            Err(AddressError::InvalidPrefix)
        );
        let lower = ALICE.to_lowercase().replacen('g', "G", 1);
        assert_eq!(
            AccountId::from_string(&lower),
            Err(AddressError::InvalidBase32)
        );
    }

    #[test]
    fn test_short_form() {
        let id = AccountId::from_string(ALICE).unwrap();
        assert_eq!(id.short(), "GA7Q…VSGZ");
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let id = AccountId::from_string(ALICE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", ALICE));
        assert!(serde_json::from_str::<AccountId>("\"GBAD\"").is_err());
    }
}
