//! Tests for edge cases and error handling

mod common;

use common::*;

#[test]
fn test_v1_packet_too_short() {
    let test_cases = vec![
        (hex_to_bytes("ead0"), "Magic only"),
        (hex_to_bytes("ead001090000afa1400000000000"), "Header without signature"),
        (build_v1_packet(SYN_HEADER, &[0; 16], "")[..29].to_vec(), "One byte short"),
    ];

    for (packet, description) in test_cases {
        match search(CANDIDATES, &packet) {
            Err(KeyError::InsufficientData { expected, actual }) => {
                assert_eq!(expected, 30, "{}", description);
                assert_eq!(actual, packet.len(), "{}", description);
            }
            Ok(outcome) => panic!("{}: Expected error but got {:?}", description, outcome),
            Err(other) => panic!("{}: Expected InsufficientData, got: {:?}", description, other),
        }
    }
}

#[test]
fn test_v1_options_overrun() {
    // Header declares 9 option bytes, only 8 present
    let packet = build_v1_packet(SYN_HEADER, &[0; 16], "0004040000000401");
    match search(CANDIDATES, &packet) {
        Err(KeyError::OptionsOverrun { options_size, available }) => {
            assert_eq!(options_size, 9);
            assert_eq!(available, 8);
        }
        other => panic!("Expected OptionsOverrun, got: {:?}", other),
    }
}

#[test]
fn test_v1_max_options_size() {
    let mut header = hex_to_bytes(SYN_HEADER);
    header[1] = 0xFF;
    let options = hex::encode([0xAB; 255]);
    let packet = signed_v1_packet("6f599f81", &hex::encode(&header), &options);

    assert_eq!(packet.len(), 30 + 255);
    let outcome = search(CANDIDATES, &packet).unwrap();
    assert_eq!(outcome.key(), Some("6f599f81"));
}

#[test]
fn test_empty_packet_is_malformed() {
    let err = search(CANDIDATES, &[]).unwrap_err();
    assert!(err.is_malformed_packet());
    assert!(err.to_string().contains("expected at least 1 bytes"));
}

#[test]
fn test_checksum_only_v0_packet() {
    // Body is empty, so the checksum is just the key's byte sum
    let packet = [calc_checksum_v0("0123abcd", &[])];
    let outcome = search(&["0123abcd"], &packet).unwrap();
    assert!(outcome.is_match());
}

#[test]
fn test_single_byte_body_double_counted() {
    // "AB" = 0x83; 0x10 goes into lane 0 of the word sum and again into the key sum
    assert_eq!(calc_checksum_v0("AB", &[0x10]), 0x83 + 0x10 + 0x10);

    let single_count = [0x10, 0x83 + 0x10];
    let outcome = search(&["AB"], &single_count).unwrap();
    assert_eq!(outcome, SearchOutcome::NoMatch { attempts: 1 });

    let double_count = [0x10, 0x83 + 0x20];
    let outcome = search(&["AB"], &double_count).unwrap();
    assert_eq!(outcome.key(), Some("AB"));
}

#[test]
fn test_v0_packet_with_magic_is_misrouted() {
    // Checksum is right for V0, but the leading EA D0 sends it down the V1 path
    let packet = checksummed_v0_packet("6f599f81", "ead0aabbccddeeff");
    assert_eq!(PacketVersion::detect(&packet), PacketVersion::V1);
    assert!(matches!(
        search(&["6f599f81"], &packet),
        Err(KeyError::InsufficientData { expected: 30, .. })
    ));
}

#[test]
fn test_invalid_hex_packet() {
    let test_cases = vec![("ead", "Odd length"), ("ead0zz", "Invalid character")];

    for (hex_data, description) in test_cases {
        match CapturedPacket::from_hex(hex_data) {
            Err(KeyError::InvalidHex(_)) => {}
            other => panic!("{}: Expected InvalidHex, got: {:?}", description, other),
        }
    }
}

#[test]
fn test_empty_candidate_list() {
    let candidates: Vec<String> = Vec::new();
    let outcome = search(&candidates, &[0xEA, 0xD0]).unwrap();
    assert_eq!(outcome, SearchOutcome::NoMatch { attempts: 0 });
}
