use crate::constants::{MAGIC_SIZE, MAGIC_V1};
use crate::error::KeyError;
use bytes::Bytes;
use serde::Serialize;
use strum_macros::Display;

/// Which checksum scheme a captured packet uses.
///
/// V0 has no marker of its own; anything not starting with [`MAGIC_V1`] is
/// treated as V0, so a V0 packet that happens to begin with those bytes is
/// classified as V1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum PacketVersion {
    #[strum(to_string = "V0 (checksum)")]
    V0,
    #[strum(to_string = "V1 (HMAC-MD5)")]
    V1,
}

impl PacketVersion {
    pub fn detect(packet: &[u8]) -> Self {
        if packet.len() >= MAGIC_SIZE && packet[..MAGIC_SIZE] == MAGIC_V1 {
            PacketVersion::V1
        } else {
            PacketVersion::V0
        }
    }
}

/// A test packet as captured off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    bytes: Bytes,
}

impl CapturedPacket {
    /// Decode a packet from its hex dump. Surrounding whitespace is ignored.
    pub fn from_hex(hex_data: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_data.trim())?;
        Ok(Self { bytes: Bytes::from(bytes) })
    }

    pub fn version(&self) -> PacketVersion {
        PacketVersion::detect(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

impl From<Bytes> for CapturedPacket {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for CapturedPacket {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Display for CapturedPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.bytes))
    }
}
