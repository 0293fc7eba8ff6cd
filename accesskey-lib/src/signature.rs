//! HMAC-MD5 packet signatures (V1)
//!
//! A V1 packet is laid out as:
//!
//! | offset | size | field                        |
//! |--------|------|------------------------------|
//! | 0      | 2    | magic `EA D0`                |
//! | 2      | 12   | header                       |
//! | 14     | 16   | signature                    |
//! | 30     | S    | options (S = header byte 1)  |
//!
//! The signature is HMAC-MD5 keyed with `MD5(access_key)` over, in order:
//! header bytes 4..12, session key, signature base, connection signature,
//! options, payload. The signature base is the 32-bit wrapping sum of the
//! access key's bytes, little-endian. SYN packets carry no session key,
//! connection signature or payload, so those segments are empty there.

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use modular_bitfield::prelude::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::Display;

use crate::constants::{
    MIN_V1_PACKET_SIZE, V1_HEADER_OFFSET, V1_HEADER_SECTION_START, V1_HEADER_SIZE, V1_OPTIONS_OFFSET,
    V1_SIGNATURE_OFFSET, V1_SIGNATURE_SIZE,
};
use crate::error::KeyError;

type HmacMd5 = Hmac<Md5>;

/// An HMAC-MD5 signature
pub type Signature = [u8; V1_SIGNATURE_SIZE];

#[bitfield(bytes = 12)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct V1Header {
    pub version: u8,
    pub options_size: u8,
    pub payload_size: u16,
    pub source: u8,
    pub destination: u8,
    pub packet_type: B4,
    pub flags: B12,
    pub session_id: u8,
    pub substream_id: u8,
    pub sequence_id: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive, Display)]
#[repr(u8)]
pub enum V1PacketType {
    Syn = 0,
    Connect = 1,
    Data = 2,
    Disconnect = 3,
    Ping = 4,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Variable parts of the signed message.
///
/// Only SYN packets are searched, and they leave every segment empty. The
/// other packet types fill these in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageSegments<'a> {
    pub session_key: &'a [u8],
    pub connection_signature: &'a [u8],
    pub payload: &'a [u8],
}

impl<'a> MessageSegments<'a> {
    /// Segments of a SYN packet: all empty
    pub fn syn() -> Self {
        Self::default()
    }

    pub fn with_session_key(mut self, session_key: &'a [u8]) -> Self {
        self.session_key = session_key;
        self
    }

    pub fn with_connection_signature(mut self, connection_signature: &'a [u8]) -> Self {
        self.connection_signature = connection_signature;
        self
    }

    pub fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = payload;
        self
    }
}

/// HMAC key for an access key: its MD5 digest
pub fn signature_key(key: &str) -> [u8; 16] {
    let digest = Md5::digest(key.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    bytes
}

/// 32-bit wrapping sum of the key's bytes, little-endian
pub fn signature_base(key: &str) -> [u8; 4] {
    key.bytes()
        .fold(0u32, |acc, b| acc.wrapping_add(u32::from(b)))
        .to_le_bytes()
}

/// A V1 packet borrowed from the capture buffer, with its layout validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct V1Packet<'a> {
    header: V1Header,
    header_section: &'a [u8],
    expected_signature: &'a [u8],
    options: &'a [u8],
}

impl<'a> V1Packet<'a> {
    /// Slice a V1 packet into its fields.
    ///
    /// Fails if the packet is shorter than 30 bytes or the options size in the
    /// header runs past the end of the buffer. The magic is not checked here.
    pub fn parse(packet: &'a [u8]) -> Result<Self, KeyError> {
        if packet.len() < MIN_V1_PACKET_SIZE {
            return Err(KeyError::InsufficientData {
                expected: MIN_V1_PACKET_SIZE,
                actual: packet.len(),
            });
        }

        let raw_header = &packet[V1_HEADER_OFFSET..V1_SIGNATURE_OFFSET];
        let mut header_bytes = [0u8; V1_HEADER_SIZE];
        header_bytes.copy_from_slice(raw_header);
        let header = V1Header::from_bytes(header_bytes);

        let options_size = usize::from(header.options_size());
        let available = packet.len() - V1_OPTIONS_OFFSET;
        if options_size > available {
            return Err(KeyError::OptionsOverrun { options_size, available });
        }

        Ok(Self {
            header,
            header_section: &raw_header[V1_HEADER_SECTION_START..],
            expected_signature: &packet[V1_SIGNATURE_OFFSET..V1_OPTIONS_OFFSET],
            options: &packet[V1_OPTIONS_OFFSET..V1_OPTIONS_OFFSET + options_size],
        })
    }

    pub fn header(&self) -> &V1Header {
        &self.header
    }

    pub fn packet_type(&self) -> V1PacketType {
        V1PacketType::from_primitive(self.header.packet_type())
    }

    /// Header bytes 4..12, the part covered by the signature
    pub fn header_section(&self) -> &'a [u8] {
        self.header_section
    }

    pub fn options(&self) -> &'a [u8] {
        self.options
    }

    /// The signature the sender put in the packet
    pub fn expected_signature(&self) -> Signature {
        let mut signature = [0u8; V1_SIGNATURE_SIZE];
        signature.copy_from_slice(self.expected_signature);
        signature
    }

    fn signer(&self, key: &str, segments: &MessageSegments<'_>) -> Result<HmacMd5, KeyError> {
        let mut mac = HmacMd5::new_from_slice(&signature_key(key))?;
        mac.update(self.header_section);
        mac.update(segments.session_key);
        mac.update(&signature_base(key));
        mac.update(segments.connection_signature);
        mac.update(self.options);
        mac.update(segments.payload);
        Ok(mac)
    }

    /// Signature this packet would carry if sent with `key`
    pub fn compute(&self, key: &str) -> Result<Signature, KeyError> {
        self.compute_with(key, &MessageSegments::syn())
    }

    pub fn compute_with(&self, key: &str, segments: &MessageSegments<'_>) -> Result<Signature, KeyError> {
        let tag = self.signer(key, segments)?.finalize().into_bytes();
        let mut signature = [0u8; V1_SIGNATURE_SIZE];
        signature.copy_from_slice(&tag);
        Ok(signature)
    }

    /// Constant-time check of `key` against the packet's signature
    pub fn verify(&self, key: &str) -> Result<bool, KeyError> {
        let mac = self.signer(key, &MessageSegments::syn())?;
        Ok(mac.verify_slice(self.expected_signature).is_ok())
    }
}

/// Compute the V1 signature of a raw packet for the given access key.
pub fn calc_signature_v1(key: &str, packet: &[u8]) -> Result<Signature, KeyError> {
    V1Packet::parse(packet)?.compute(key)
}

/// Read the signature stored in a raw V1 packet.
pub fn expected_signature(packet: &[u8]) -> Result<Signature, KeyError> {
    Ok(V1Packet::parse(packet)?.expected_signature())
}
