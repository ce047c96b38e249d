//! ICMP (v4) message decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Well-known ICMP message types.
#[allow(dead_code)]
pub mod message_type {
    pub const ECHO_REPLY: u8 = 0;
    pub const DEST_UNREACHABLE: u8 = 3;
    pub const ECHO_REQUEST: u8 = 8;
    pub const TIME_EXCEEDED: u8 = 11;
}

/// Offset of the echo payload within the message.
const ICMP_PAYLOAD_OFFSET: usize = 12;

/// ICMP message decoder.
///
/// The rest-of-header word is read as identifier/sequence for every type,
/// matching the echo layout; for non-echo types the two fields carry the
/// raw word halves.
#[derive(Debug, Clone, Copy)]
pub struct IcmpProtocol;

impl Protocol for IcmpProtocol {
    fn name(&self) -> &'static str {
        "icmp"
    }

    fn display_name(&self) -> &'static str {
        "ICMP"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        // Protocol 1 is only ICMP inside IPv4
        if context.hint("ip_protocol") == Some(ip_protocol::ICMP as u64)
            && context.hint("ip_version") == Some(4)
        {
            return Some(PRIORITY_PROTOCOL);
        }
        None
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "icmp");

        let msg_type = match cursor.read_u8() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let code = match cursor.read_u8() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        if let Err(e) = cursor.skip(2) {
            // Checksum (not verified)
            return ParseResult::error(e, data);
        }
        let identifier = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let sequence = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };

        let mut fields = SmallVec::new();
        fields.push(("type", FieldValue::UInt8(msg_type)));
        fields.push(("code", FieldValue::UInt8(code)));
        fields.push(("identifier", FieldValue::UInt16(identifier)));
        fields.push(("sequence", FieldValue::UInt16(sequence)));

        // Echo payload sits past the timestamp bytes; a shorter message
        // simply has none
        let remaining = if data.len() > ICMP_PAYLOAD_OFFSET {
            &data[ICMP_PAYLOAD_OFFSET..]
        } else {
            &[][..]
        };

        ParseResult::success(fields, remaining, SmallVec::new())
    }
}
