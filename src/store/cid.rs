//! Self-describing content identifiers.
//!
//! `b` + base32-lower( 0x01 cidv1 ‖ 0x55 raw ‖ 0x1b keccak-256 ‖ 0x20 length ‖ digest )

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::codec::ContentDigest;

const CID_V1: u8 = 0x01;
const RAW_CODEC: u8 = 0x55;
const KECCAK_256: u8 = 0x1b;
const DIGEST_LEN: u8 = 0x20;

const PREFIX: [u8; 4] = [CID_V1, RAW_CODEC, KECCAK_256, DIGEST_LEN];
const CID_LEN: usize = PREFIX.len() + 32;

const BASE32_MULTIBASE: char = 'b';
const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidError {
    #[error("unsupported multibase prefix {0:?}")]
    Multibase(Option<char>),

    #[error("invalid base32 character {0:?}")]
    Base32(char),

    #[error("base32 text has non-zero or excess trailing bits")]
    NonCanonical,

    #[error("expected {CID_LEN} bytes, got {0}")]
    Length(usize),

    #[error("not a CIDv1 raw keccak-256 identifier")]
    Prefix,
}

/// CID of a raw block whose multihash is the keccak-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(ContentDigest);

impl ContentId {
    pub fn digest(&self) -> ContentDigest {
        self.0
    }

    /// Multihash tag pair followed by the digest.
    pub fn multihash(&self) -> [u8; 34] {
        let mut out = [0u8; 34];
        out[0] = KECCAK_256;
        out[1] = DIGEST_LEN;
        out[2..].copy_from_slice(self.0.as_bytes());
        out
    }

    pub fn to_bytes(&self) -> [u8; CID_LEN] {
        let mut out = [0u8; CID_LEN];
        out[..PREFIX.len()].copy_from_slice(&PREFIX);
        out[PREFIX.len()..].copy_from_slice(self.0.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CidError> {
        if bytes.len() != CID_LEN {
            return Err(CidError::Length(bytes.len()));
        }
        if bytes[..PREFIX.len()] != PREFIX {
            return Err(CidError::Prefix);
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes[PREFIX.len()..]);
        Ok(Self(ContentDigest(digest.into())))
    }
}

impl From<ContentDigest> for ContentId {
    fn from(digest: ContentDigest) -> Self {
        Self(digest)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", BASE32_MULTIBASE, base32_encode(&self.to_bytes()))
    }
}

impl FromStr for ContentId {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(BASE32_MULTIBASE) => Self::from_bytes(&base32_decode(chars.as_str())?),
            other => Err(CidError::Multibase(other)),
        }
    }
}

/// RFC 4648 base32, lowercase, unpadded.
fn base32_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u16 = 0;
    let mut bits = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

/// Inverse of [`base32_encode`]. Only the exact text it produces is accepted.
fn base32_decode(s: &str) -> Result<Vec<u8>, CidError> {
    let mut out = Vec::with_capacity(s.len() * 5 / 8);
    let mut buffer: u16 = 0;
    let mut bits = 0;

    for c in s.chars() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or(CidError::Base32(c))?;
        buffer = (buffer << 5) | value as u16;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }
    if bits >= 5 || buffer & ((1 << bits) - 1) != 0 {
        return Err(CidError::NonCanonical);
    }
    Ok(out)
}
