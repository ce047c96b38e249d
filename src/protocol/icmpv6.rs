//! ICMPv6 message decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Neighbor discovery message types (RFC 4861).
#[allow(dead_code)]
pub mod message_type {
    pub const ECHO_REQUEST: u8 = 128;
    pub const ECHO_REPLY: u8 = 129;
    pub const ROUTER_SOLICITATION: u8 = 133;
    pub const ROUTER_ADVERTISEMENT: u8 = 134;
    pub const NEIGHBOR_SOLICITATION: u8 = 135;
    pub const NEIGHBOR_ADVERTISEMENT: u8 = 136;
}

/// ICMPv6 message decoder.
///
/// Neighbor solicitation and advertisement get a named type and their
/// target address; everything else is reported with its raw type only.
#[derive(Debug, Clone, Copy)]
pub struct Icmpv6Protocol;

impl Protocol for Icmpv6Protocol {
    fn name(&self) -> &'static str {
        "icmpv6"
    }

    fn display_name(&self) -> &'static str {
        "ICMPv6"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        // Next-header 58 is only ICMPv6 inside IPv6
        if context.hint("ip_protocol") == Some(ip_protocol::ICMPV6 as u64)
            && context.hint("ip_version") == Some(6)
        {
            return Some(PRIORITY_PROTOCOL);
        }
        None
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "icmpv6");

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
        if let Err(e) = cursor.skip(4) {
            // Reserved / message-specific word
            return ParseResult::error(e, data);
        }

        let type_name = match msg_type {
            message_type::NEIGHBOR_SOLICITATION => "neighbor_solicitation",
            message_type::NEIGHBOR_ADVERTISEMENT => "neighbor_advertisement",
            _ => "unknown",
        };

        let mut fields = SmallVec::new();
        fields.push(("type", FieldValue::UInt8(msg_type)));
        fields.push(("code", FieldValue::UInt8(code)));
        fields.push(("type_name", FieldValue::Str(type_name)));

        // Neighbor discovery carries a target address right after the header
        if matches!(
            msg_type,
            message_type::NEIGHBOR_SOLICITATION | message_type::NEIGHBOR_ADVERTISEMENT
        ) {
            if let Ok(target) = cursor.take(16) {
                fields.push(("target_address", FieldValue::ipv6(target)));
            }
        }

        ParseResult::success(fields, cursor.rest(), SmallVec::new())
    }
}
