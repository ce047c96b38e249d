//! IPv6 header decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;

use super::ethernet::ethertype;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Fixed IPv6 header size.
const IPV6_HEADER_SIZE: usize = 40;

/// IPv6 header decoder.
///
/// A buffer shorter than the fixed 40-byte header yields an error record
/// rather than failing the frame.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Protocol;

impl Protocol for Ipv6Protocol {
    fn name(&self) -> &'static str {
        "ipv6"
    }

    fn display_name(&self) -> &'static str {
        "IPv6"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        match context.hint("ethertype") {
            Some(et) if et == ethertype::IPV6 as u64 => Some(PRIORITY_PROTOCOL),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "ipv6");

        let header = match cursor.take(IPV6_HEADER_SIZE) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };

        // First 4 bytes: version(4) / traffic class(8) / flow label(20)
        let vtf = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let version = (vtf >> 28) as u8;
        let traffic_class = ((vtf >> 20) & 0xFF) as u8;
        let flow_label = vtf & 0x000F_FFFF;

        let payload_length = u16::from_be_bytes([header[4], header[5]]);
        let next_header = header[6];
        let hop_limit = header[7];

        let mut fields = SmallVec::new();
        fields.push(("version", FieldValue::UInt8(version)));
        fields.push(("traffic_class", FieldValue::UInt8(traffic_class)));
        fields.push(("flow_label", FieldValue::UInt32(flow_label)));
        fields.push(("payload_length", FieldValue::UInt16(payload_length)));
        fields.push(("next_header", FieldValue::UInt8(next_header)));
        fields.push(("hop_limit", FieldValue::UInt8(hop_limit)));
        fields.push(("source_ip", FieldValue::ipv6(&header[8..24])));
        fields.push(("destination_ip", FieldValue::ipv6(&header[24..40])));

        let mut child_hints = SmallVec::new();
        child_hints.push(("ip_protocol", next_header as u64));
        child_hints.push(("ip_version", 6));

        // Payload begins at the fixed 40-byte offset; extension headers are
        // not walked, so their next-header chain is not followed
        ParseResult::success(fields, cursor.rest(), child_hints)
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["tcp", "udp", "icmpv6"]
    }
}
