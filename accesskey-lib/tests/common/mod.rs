//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use accesskey_lib::checksum::{V0Packet, calc_checksum_v0};
#[allow(unused_imports)]
pub use accesskey_lib::error::KeyError;
#[allow(unused_imports)]
pub use accesskey_lib::extract::extract_candidates;
#[allow(unused_imports)]
pub use accesskey_lib::packet::{CapturedPacket, PacketVersion};
#[allow(unused_imports)]
pub use accesskey_lib::search::{SearchOutcome, search};
#[allow(unused_imports)]
pub use accesskey_lib::signature::{V1Packet, V1PacketType, calc_signature_v1, expected_signature};
#[allow(unused_imports)]
pub use hex;

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Vec<u8> {
    hex::decode(hex_data).expect("Failed to decode hex")
}

/// V1 SYN header: version 1, 9 option bytes, src 0xAF, dst 0xA1, NEED_ACK
#[allow(dead_code)]
pub const SYN_HEADER: &str = "01090000afa1400000000000";

/// Options of a SYN packet: supported functions + maximum substream id
#[allow(dead_code)]
pub const SYN_OPTIONS: &str = "00040400000004010a";

/// V1 CONNECT header: 9 option bytes, payload size 0, sequence id 1
#[allow(dead_code)]
pub const CONNECT_HEADER: &str = "01090000afa1c10000000100";

/// Access keys found in a typical title image, in extraction order
#[allow(dead_code)]
pub const CANDIDATES: &[&str] = &["76f26d2b", "0123abcd", "6f599f81", "ffffffff"];

/// Assemble magic + header + signature + options
#[allow(dead_code)]
pub fn build_v1_packet(header_hex: &str, signature: &[u8; 16], options_hex: &str) -> Vec<u8> {
    let mut packet = vec![0xEA, 0xD0];
    packet.extend(hex_to_bytes(header_hex));
    packet.extend_from_slice(signature);
    packet.extend(hex_to_bytes(options_hex));
    packet
}

/// Build a V1 packet carrying the signature `key` would produce
#[allow(dead_code)]
pub fn signed_v1_packet(key: &str, header_hex: &str, options_hex: &str) -> Vec<u8> {
    let unsigned = build_v1_packet(header_hex, &[0; 16], options_hex);
    let signature = calc_signature_v1(key, &unsigned).expect("Failed to sign packet");
    build_v1_packet(header_hex, &signature, options_hex)
}

/// Build a V0 packet by appending the checksum `key` would produce
#[allow(dead_code)]
pub fn checksummed_v0_packet(key: &str, body_hex: &str) -> Vec<u8> {
    let mut packet = hex_to_bytes(body_hex);
    packet.push(calc_checksum_v0(key, &packet));
    packet
}

/// Encode a key the way titles store it as UTF-16LE, with a leading NUL
#[allow(dead_code)]
pub fn utf16_key(key: &str) -> Vec<u8> {
    let mut bytes = vec![0x00];
    for b in key.bytes() {
        bytes.extend_from_slice(&[b, 0x00]);
    }
    bytes
}
