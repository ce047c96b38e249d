//! IPv4 header decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::error::DecodeError;

use super::ethernet::ethertype;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// IP protocol numbers carried in the IPv4 protocol field and the IPv6
/// next-header field.
#[allow(dead_code)]
pub mod ip_protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const ICMPV6: u8 = 58;
}

/// Minimum IPv4 header length (no options).
const IPV4_MIN_HEADER: usize = 20;

/// IPv4 header decoder.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Protocol;

impl Protocol for Ipv4Protocol {
    fn name(&self) -> &'static str {
        "ipv4"
    }

    fn display_name(&self) -> &'static str {
        "IPv4"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        match context.hint("ethertype") {
            Some(et) if et == ethertype::IPV4 as u64 => Some(PRIORITY_PROTOCOL),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "ipv4");

        let version_ihl = match cursor.read_u8() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let version = version_ihl >> 4;
        // Header length is the low nibble in 32-bit words
        let header_length = ((version_ihl & 0x0F) as usize) * 4;

        if header_length < IPV4_MIN_HEADER {
            return ParseResult::error(
                DecodeError::Malformed {
                    protocol: "ipv4",
                    field: "header_length",
                    reason: format!("{header_length} bytes, minimum is {IPV4_MIN_HEADER}"),
                },
                data,
            );
        }

        // The whole declared header must be present before any field is used
        if data.len() < header_length {
            return ParseResult::error(
                DecodeError::Truncated {
                    protocol: "ipv4",
                    needed: header_length,
                    have: data.len(),
                },
                data,
            );
        }

        if let Err(e) = cursor.skip(1) {
            // DSCP/ECN byte
            return ParseResult::error(e, data);
        }
        let total_length = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        // Identification, flags, fragment offset (fragment reassembly is out of scope)
        if let Err(e) = cursor.skip(4) {
            return ParseResult::error(e, data);
        }
        let ttl = match cursor.read_u8() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let protocol = match cursor.read_u8() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        if let Err(e) = cursor.skip(2) {
            // Header checksum (not verified)
            return ParseResult::error(e, data);
        }
        let source = match cursor.take(4) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };
        let destination = match cursor.take(4) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };

        let mut fields = SmallVec::new();
        fields.push(("version", FieldValue::UInt8(version)));
        fields.push(("header_length", FieldValue::UInt8(header_length as u8)));
        fields.push(("total_length", FieldValue::UInt16(total_length)));
        fields.push(("ttl", FieldValue::UInt8(ttl)));
        fields.push(("protocol", FieldValue::UInt8(protocol)));
        fields.push(("source_ip", FieldValue::ipv4(source)));
        fields.push(("destination_ip", FieldValue::ipv4(destination)));

        let mut child_hints = SmallVec::new();
        child_hints.push(("ip_protocol", protocol as u64));
        child_hints.push(("ip_version", 4));

        // Payload begins after the declared header (options skipped)
        ParseResult::success(fields, &data[header_length..], child_hints)
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["tcp", "udp", "icmp"]
    }
}
