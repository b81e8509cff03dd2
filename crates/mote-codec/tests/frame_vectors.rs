//! Fixed byte-layout vectors for the sender-name framing.

use mote_codec::{decode_frame, encode_frame, Payload};
use mote_core::{DeviceName, DEVICE_NAME_LEN};

#[test]
fn encoded_frame_matches_fixed_layout() {
    let sender = DeviceName::new("base").expect("name should fit");
    let payload = Payload::from_slice(&[0x10, 0x20, 0x30]).expect("payload should fit");

    let frame = encode_frame(&sender, &payload);

    let mut expected = vec![0_u8; DEVICE_NAME_LEN];
    expected[..4].copy_from_slice(b"base");
    expected.extend_from_slice(&[0x10, 0x20, 0x30]);
    assert_eq!(frame.as_slice(), expected.as_slice());
}

#[test]
fn fixed_wire_bytes_decode_to_expected_view() {
    let mut wire = vec![0_u8; DEVICE_NAME_LEN];
    wire[..9].copy_from_slice(b"gateway-2");
    wire.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    let view = decode_frame(&wire).expect("frame should decode");
    assert_eq!(view.sender.as_str(), "gateway-2");
    assert_eq!(view.payload, &[0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn name_padding_bytes_do_not_leak_into_payload() {
    let sender = DeviceName::new("ab").expect("name should fit");
    let payload = Payload::from_slice(b"xyz").expect("payload should fit");
    let frame = encode_frame(&sender, &payload);

    // Bytes between the name and the payload boundary are NUL padding.
    for &byte in &frame[2..DEVICE_NAME_LEN] {
        assert_eq!(byte, 0);
    }
    assert_eq!(&frame[DEVICE_NAME_LEN..], b"xyz");
}
