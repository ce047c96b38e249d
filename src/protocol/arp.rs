//! ARP packet decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;

use super::ethernet::ethertype;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// ARP operation codes.
pub mod operation {
    pub const REQUEST: u16 = 1;
    pub const REPLY: u16 = 2;
}

/// ARP packet decoder.
///
/// A short buffer yields an error record rather than failing the frame;
/// the Ethernet layer already decoded stays in the record.
#[derive(Debug, Clone, Copy)]
pub struct ArpProtocol;

impl Protocol for ArpProtocol {
    fn name(&self) -> &'static str {
        "arp"
    }

    fn display_name(&self) -> &'static str {
        "ARP"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        match context.hint("ethertype") {
            Some(et) if et == ethertype::ARP as u64 => Some(PRIORITY_PROTOCOL),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "arp");

        // ARP for Ethernet/IPv4 is 28 bytes
        let header = match cursor.take(28) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };

        let hardware_type = u16::from_be_bytes([header[0], header[1]]);
        let protocol_type = u16::from_be_bytes([header[2], header[3]]);
        let hardware_size = header[4];
        let protocol_size = header[5];
        let opcode = u16::from_be_bytes([header[6], header[7]]);

        let mut fields = SmallVec::new();
        fields.push(("hardware_type", FieldValue::UInt16(hardware_type)));
        fields.push(("protocol_type", FieldValue::UInt16(protocol_type)));
        fields.push(("hardware_size", FieldValue::UInt8(hardware_size)));
        fields.push(("protocol_size", FieldValue::UInt8(protocol_size)));
        fields.push(("operation", FieldValue::UInt16(opcode)));

        // Unrecognized opcodes are reported, not fatal
        let operation_name = match opcode {
            operation::REQUEST => "request",
            operation::REPLY => "reply",
            _ => "unrecognized",
        };
        fields.push(("operation_name", FieldValue::Str(operation_name)));

        fields.push(("sender_mac", FieldValue::mac(&header[8..14])));
        fields.push(("sender_ip", FieldValue::ipv4(&header[14..18])));
        fields.push(("target_mac", FieldValue::mac(&header[18..24])));
        fields.push(("target_ip", FieldValue::ipv4(&header[24..28])));

        // ARP doesn't have payload protocols
        ParseResult::success(fields, &[], SmallVec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use std::net::IpAddr;

    fn create_arp(opcode: u16) -> Vec<u8> {
        let mut packet = Vec::new();
        packet.extend_from_slice(&1u16.to_be_bytes()); // Hardware type: Ethernet
        packet.extend_from_slice(&ethertype::IPV4.to_be_bytes()); // Protocol type: IPv4
        packet.push(6); // Hardware size
        packet.push(4); // Protocol size
        packet.extend_from_slice(&opcode.to_be_bytes());
        packet.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]); // Sender MAC
        packet.extend_from_slice(&[192, 168, 1, 1]); // Sender IP
        packet.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]); // Target MAC
        packet.extend_from_slice(&[192, 168, 1, 2]); // Target IP
        packet
    }

    fn arp_context() -> ParseContext {
        let mut context = ParseContext::new(1);
        context.parent_protocol = Some("ethernet");
        context.insert_hint("ethertype", ethertype::ARP as u64);
        context
    }

    #[test]
    fn test_parse_arp_request() {
        let packet = create_arp(operation::REQUEST);

        let result = ArpProtocol.parse(&packet, &arp_context());

        assert!(result.is_ok());
        assert_eq!(result.get("operation"), Some(&FieldValue::UInt16(1)));
        assert_eq!(
            result.get("operation_name"),
            Some(&FieldValue::Str("request"))
        );
        assert_eq!(
            result.get("sender_ip"),
            Some(&FieldValue::IpAddr(IpAddr::V4(
                "192.168.1.1".parse().unwrap()
            )))
        );
        assert_eq!(
            result.get("target_ip"),
            Some(&FieldValue::IpAddr(IpAddr::V4(
                "192.168.1.2".parse().unwrap()
            )))
        );
    }

    #[test]
    fn test_parse_arp_reply() {
        let packet = create_arp(operation::REPLY);

        let result = ArpProtocol.parse(&packet, &arp_context());

        assert!(result.is_ok());
        assert_eq!(result.get("operation_name"), Some(&FieldValue::Str("reply")));
    }

    #[test]
    fn test_parse_arp_unrecognized_opcode() {
        // Opcode 99 is reported but does not fail the frame
        let packet = create_arp(99);

        let result = ArpProtocol.parse(&packet, &arp_context());

        assert!(result.is_ok());
        assert_eq!(result.get("operation"), Some(&FieldValue::UInt16(99)));
        assert_eq!(
            result.get("operation_name"),
            Some(&FieldValue::Str("unrecognized"))
        );
    }

    #[test]
    fn test_can_parse_arp() {
        let parser = ArpProtocol;

        // Without hint
        let ctx1 = ParseContext::new(1);
        assert!(parser.can_parse(&ctx1).is_none());

        // With IPv4 ethertype
        let mut ctx2 = ParseContext::new(1);
        ctx2.insert_hint("ethertype", ethertype::IPV4 as u64);
        assert!(parser.can_parse(&ctx2).is_none());

        // With ARP ethertype
        assert!(parser.can_parse(&arp_context()).is_some());
    }

    #[test]
    fn test_parse_arp_too_short() {
        let short_packet = [0x00, 0x01, 0x08, 0x00]; // Only 4 bytes

        let result = ArpProtocol.parse(&short_packet, &arp_context());

        assert!(!result.is_ok());
        assert_eq!(
            result.error,
            Some(DecodeError::Truncated {
                protocol: "arp",
                needed: 28,
                have: 4,
            })
        );
    }

    #[test]
    fn test_arp_no_payload() {
        let packet = create_arp(operation::REQUEST);

        let result = ArpProtocol.parse(&packet, &arp_context());

        assert!(result.is_ok());
        // ARP doesn't have child protocols
        assert!(result.child_hints.is_empty());
        assert!(result.remaining.is_empty());
    }
}
