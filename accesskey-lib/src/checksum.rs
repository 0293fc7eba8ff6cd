//! Legacy (V0) packet checksum
//!
//! The checksum seeds an 8-bit sum with the access key's bytes, then folds in
//! the four byte lanes of a 32-bit little-endian word sum over the packet body.
//!
//! # Trailing bytes
//!
//! Bytes after the last whole word are counted twice: once inside a partial
//! word that joins the word sum, and once directly in the 8-bit sum. Titles
//! compute it this way, so it must not be "fixed".

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::MIN_V0_PACKET_SIZE;
use crate::error::KeyError;

/// 8-bit wrapping sum of the key's bytes
pub fn key_byte_sum(key: &str) -> u8 {
    key.bytes().fold(0u8, |acc, b| acc.wrapping_add(b))
}

/// Compute the V0 checksum of `data` for the given access key.
///
/// An empty `data` yields the key's byte sum.
pub fn calc_checksum_v0(key: &str, data: &[u8]) -> u8 {
    let mut number = key_byte_sum(key);

    let words = data.chunks_exact(4);
    let tail_start = data.len() - words.remainder().len();

    let mut sum = 0u32;
    for word in words {
        sum = sum.wrapping_add(LittleEndian::read_u32(word));
    }

    if tail_start < data.len() {
        // Lane is picked by the absolute index, not the offset within the tail
        let mut last_sum = 0u32;
        for (i, &b) in data.iter().enumerate().skip(tail_start) {
            last_sum |= u32::from(b) << ((i % 4) * 8);
        }
        sum = sum.wrapping_add(last_sum);
    }

    for &b in &data[tail_start..] {
        number = number.wrapping_add(b);
    }

    for lane in sum.to_le_bytes() {
        number = number.wrapping_add(lane);
    }

    number
}

/// A V0 packet split into its checksummed body and trailing checksum byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V0Packet<'a> {
    /// Every byte except the last
    pub body: &'a [u8],
    /// The checksum the sender appended
    pub checksum: u8,
}

impl<'a> V0Packet<'a> {
    pub fn parse(packet: &'a [u8]) -> Result<Self, KeyError> {
        let (&checksum, body) = packet.split_last().ok_or(KeyError::InsufficientData {
            expected: MIN_V0_PACKET_SIZE,
            actual: packet.len(),
        })?;
        Ok(Self { body, checksum })
    }

    /// Checksum this packet's body would carry if sent with `key`
    pub fn compute(&self, key: &str) -> u8 {
        calc_checksum_v0(key, self.body)
    }

    pub fn verify(&self, key: &str) -> bool {
        self.compute(key) == self.checksum
    }
}
