//! Integration tests for framesift.
//!
//! Exercises the full decode pipeline on synthetic frames, from raw bytes
//! to emitted JSON records.

use framesift::protocol::{
    default_registry, ethertype, ip_protocol, parse_packet, record_type, DecodedLayer, FieldValue,
    LINKTYPE_ETHERNET,
};
use framesift::record::FrameRecord;
use framesift::DecodeError;

fn ethernet(ethertype_value: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    frame.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    frame.extend_from_slice(&ethertype_value.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

fn ipv4(protocol: u8, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.push(0x45);
    packet.push(0x00);
    packet.extend_from_slice(&((20 + payload.len()) as u16).to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x01, 0x40, 0x00]);
    packet.push(64);
    packet.push(protocol);
    packet.extend_from_slice(&[0x00, 0x00]);
    packet.extend_from_slice(&[192, 168, 1, 10]);
    packet.extend_from_slice(&[192, 168, 1, 1]);
    packet.extend_from_slice(payload);
    packet
}

fn udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut datagram = Vec::new();
    datagram.extend_from_slice(&src_port.to_be_bytes());
    datagram.extend_from_slice(&dst_port.to_be_bytes());
    datagram.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
    datagram.extend_from_slice(&[0x00, 0x00]);
    datagram.extend_from_slice(payload);
    datagram
}

fn tcp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut segment = Vec::new();
    segment.extend_from_slice(&src_port.to_be_bytes());
    segment.extend_from_slice(&dst_port.to_be_bytes());
    segment.extend_from_slice(&1u32.to_be_bytes());
    segment.extend_from_slice(&0u32.to_be_bytes());
    segment.extend_from_slice(&[0x50, 0x18]); // offset 5, PSH+ACK
    segment.extend_from_slice(&[0xff, 0xff, 0x00, 0x00, 0x00, 0x00]);
    segment.extend_from_slice(payload);
    segment
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut encoded = Vec::new();
    for label in name.split('.') {
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    encoded
}

fn dns_response(name: &str, address: [u8; 4]) -> Vec<u8> {
    let mut message = Vec::new();
    message.extend_from_slice(&0xBEEFu16.to_be_bytes());
    message.extend_from_slice(&0x8180u16.to_be_bytes());
    message.extend_from_slice(&[0, 1, 0, 1, 0, 0, 0, 0]);
    message.extend_from_slice(&encode_name(name));
    message.extend_from_slice(&record_type::A.to_be_bytes());
    message.extend_from_slice(&1u16.to_be_bytes());
    message.extend_from_slice(&[0xC0, 0x0C]); // answer name: pointer to question
    message.extend_from_slice(&record_type::A.to_be_bytes());
    message.extend_from_slice(&1u16.to_be_bytes());
    message.extend_from_slice(&600u32.to_be_bytes());
    message.extend_from_slice(&4u16.to_be_bytes());
    message.extend_from_slice(&address);
    message
}

fn names(layers: &[DecodedLayer<'_>]) -> Vec<&'static str> {
    layers.iter().map(|l| l.name).collect()
}

#[test]
fn dns_response_decodes_through_all_layers() {
    let frame = ethernet(
        ethertype::IPV4,
        &ipv4(
            ip_protocol::UDP,
            &udp(53, 5353, &dns_response("www.example.com", [93, 184, 216, 34])),
        ),
    );

    let registry = default_registry();
    let layers = parse_packet(&registry, LINKTYPE_ETHERNET, &frame);

    assert_eq!(names(&layers), vec!["ethernet", "IPv4", "UDP", "DNS"]);
    assert!(layers.iter().all(|l| l.result.is_ok()));

    let dns = &layers[3].result;
    assert_eq!(dns.get("is_response"), Some(&FieldValue::Bool(true)));
    assert_eq!(
        dns.get("query_name"),
        Some(&FieldValue::Str("www.example.com"))
    );
    let answers = dns.get("answers").and_then(|v| v.as_list()).unwrap();
    assert_eq!(
        answers[0].as_str(),
        Some("www.example.com A ttl=600 93.184.216.34")
    );
}

#[test]
fn dns_pointer_cycle_fails_only_the_dns_layer() {
    let mut message = Vec::new();
    message.extend_from_slice(&0x1111u16.to_be_bytes());
    message.extend_from_slice(&0x0100u16.to_be_bytes());
    message.extend_from_slice(&[0, 1, 0, 0, 0, 0, 0, 0]);
    message.extend_from_slice(&[0xC0, 0x0C]); // name points at itself
    message.extend_from_slice(&[0, 1, 0, 1]);

    let frame = ethernet(
        ethertype::IPV4,
        &ipv4(ip_protocol::UDP, &udp(5353, 53, &message)),
    );

    let registry = default_registry();
    let layers = parse_packet(&registry, LINKTYPE_ETHERNET, &frame);

    assert_eq!(names(&layers), vec!["ethernet", "IPv4", "UDP", "DNS"]);
    assert!(layers[2].result.is_ok());
    assert!(matches!(
        layers[3].result.error,
        Some(DecodeError::PointerLoop { .. })
    ));
}

#[test]
fn http_get_request_fields() {
    let frame = ethernet(
        ethertype::IPV4,
        &ipv4(
            ip_protocol::TCP,
            &tcp(49152, 80, b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"),
        ),
    );

    let registry = default_registry();
    let layers = parse_packet(&registry, LINKTYPE_ETHERNET, &frame);

    assert_eq!(names(&layers), vec!["ethernet", "IPv4", "TCP", "HTTP"]);

    let http = &layers[3].result;
    assert_eq!(http.get("method"), Some(&FieldValue::Str("GET")));
    assert_eq!(http.get("path"), Some(&FieldValue::Str("/")));
    assert_eq!(http.get("version"), Some(&FieldValue::Str("HTTP/1.1")));
    assert_eq!(http.get("host"), Some(&FieldValue::Str("x")));
}

#[test]
fn truncated_ipv4_fails_softly() {
    // 10 bytes of IPv4 header behind a valid Ethernet layer
    let frame = ethernet(ethertype::IPV4, &[0x45, 0, 0, 28, 0, 0, 0x40, 0, 64, 6]);

    let registry = default_registry();
    let layers = parse_packet(&registry, LINKTYPE_ETHERNET, &frame);

    assert_eq!(names(&layers), vec!["ethernet", "IPv4"]);
    assert!(layers[0].result.is_ok());
    assert_eq!(
        layers[1].result.error,
        Some(DecodeError::Truncated {
            protocol: "ipv4",
            needed: 20,
            have: 10,
        })
    );
}

#[test]
fn json_record_keeps_layer_order_and_error() {
    let frame = ethernet(
        ethertype::IPV4,
        &ipv4(
            ip_protocol::UDP,
            &udp(53, 5353, &dns_response("a.example", [1, 2, 3, 4])),
        ),
    );

    let registry = default_registry();
    let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &frame);
    let value = record.to_json();

    let keys: Vec<_> = value["layers"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["ethernet", "IPv4", "UDP", "DNS"]);
    assert_eq!(value["layers"]["UDP"]["source_port"], 53);
    assert_eq!(value["layers"]["DNS"]["query_name"], "a.example");
    assert_eq!(value["length"], frame.len());
}

#[test]
fn mac_addresses_render_as_colon_hex() {
    let frame = ethernet(ethertype::ARP, &[0u8; 28]);

    let registry = default_registry();
    let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &frame);
    let value = record.to_json();

    let mac = value["layers"]["ethernet"]["source_mac"].as_str().unwrap();
    let groups: Vec<&str> = mac.split(':').collect();
    assert_eq!(groups.len(), 6);
    assert!(groups
        .iter()
        .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit())));
}

#[test]
fn unknown_ethertype_terminates_without_error() {
    let frame = ethernet(0x88CC, &[0xde, 0xad, 0xbe, 0xef]);

    let registry = default_registry();
    let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &frame);

    assert!(!record.has_error());
    let value = record.to_json();
    assert_eq!(value["layers"]["unknown"]["ethertype"], 0x88CC);
}

#[test]
fn dhcp_discover_over_udp() {
    let mut bootp = vec![1u8, 1, 6, 0];
    bootp.extend_from_slice(&0xABCDu32.to_be_bytes()); // xid
    bootp.extend_from_slice(&[0u8; 228]); // rest of the fixed header
    bootp.extend_from_slice(&[0x63, 0x82, 0x53, 0x63]); // magic cookie
    bootp.extend_from_slice(&[53, 1, 1, 255]); // message type: discover

    let frame = ethernet(
        ethertype::IPV4,
        &ipv4(ip_protocol::UDP, &udp(68, 67, &bootp)),
    );

    let registry = default_registry();
    let layers = parse_packet(&registry, LINKTYPE_ETHERNET, &frame);

    assert_eq!(names(&layers), vec!["ethernet", "IPv4", "UDP", "DHCP"]);
    let dhcp = &layers[3].result;
    assert!(dhcp.is_ok());
    assert_eq!(
        dhcp.get("message_type_name"),
        Some(&FieldValue::Str("discover"))
    );
    assert_eq!(dhcp.get("transaction_id"), Some(&FieldValue::UInt32(0xABCD)));
}
