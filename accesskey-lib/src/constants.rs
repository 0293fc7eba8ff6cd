// Packet layout constants for the two checksum/signature versions

/// Leading bytes that mark a V1 packet
pub const MAGIC_V1: [u8; 2] = [0xEA, 0xD0];

/// Size of the magic prefix (2 bytes)
pub const MAGIC_SIZE: usize = MAGIC_V1.len();

/// Offset of the V1 header, right after the magic
pub const V1_HEADER_OFFSET: usize = MAGIC_SIZE;

/// Size of the V1 header (12 bytes)
pub const V1_HEADER_SIZE: usize = 12;

/// Offset of the signed header section inside the header
pub const V1_HEADER_SECTION_START: usize = 4;

/// Offset of the expected signature
pub const V1_SIGNATURE_OFFSET: usize = V1_HEADER_OFFSET + V1_HEADER_SIZE;

/// Size of an HMAC-MD5 signature (16 bytes)
pub const V1_SIGNATURE_SIZE: usize = 16;

/// Offset of the options region
pub const V1_OPTIONS_OFFSET: usize = V1_SIGNATURE_OFFSET + V1_SIGNATURE_SIZE;

/// Minimum size for a V1 packet (magic + header + signature)
pub const MIN_V1_PACKET_SIZE: usize = V1_OPTIONS_OFFSET;

/// Minimum size for a V0 packet (the checksum byte alone)
pub const MIN_V0_PACKET_SIZE: usize = 1;

/// Number of hex digits in an access key
pub const ACCESS_KEY_LEN: usize = 8;
