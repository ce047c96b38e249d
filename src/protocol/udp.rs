//! UDP datagram decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// UDP header size.
const UDP_HEADER_SIZE: usize = 8;

/// UDP datagram decoder.
///
/// The length field is recorded as seen on the wire; the payload is
/// whatever follows the 8-byte header, so a lying length never truncates
/// or extends the buffer.
#[derive(Debug, Clone, Copy)]
pub struct UdpProtocol;

impl Protocol for UdpProtocol {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn display_name(&self) -> &'static str {
        "UDP"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        match context.hint("ip_protocol") {
            Some(proto) if proto == ip_protocol::UDP as u64 => Some(PRIORITY_PROTOCOL),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "udp");

        let src_port = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let dst_port = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let length = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        if let Err(e) = cursor.skip(2) {
            // Checksum (not verified)
            return ParseResult::error(e, data);
        }

        let mut fields = SmallVec::new();
        fields.push(("source_port", FieldValue::UInt16(src_port)));
        fields.push(("destination_port", FieldValue::UInt16(dst_port)));
        fields.push(("length", FieldValue::UInt16(length)));

        let mut child_hints = SmallVec::new();
        child_hints.push(("src_port", src_port as u64));
        child_hints.push(("dst_port", dst_port as u64));
        child_hints.push(("transport", ip_protocol::UDP as u64));

        ParseResult::success(fields, cursor.rest(), child_hints)
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["dns", "dhcp"]
    }
}
