//! TCP segment decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::error::DecodeError;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// TCP flag bits (low byte of the offset/flags word).
#[allow(dead_code)]
pub mod flags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;
}

/// TCP segment decoder.
///
/// Only the header is interpreted; stream reassembly is out of scope, so
/// application decoders see single-segment payloads.
#[derive(Debug, Clone, Copy)]
pub struct TcpProtocol;

impl Protocol for TcpProtocol {
    fn name(&self) -> &'static str {
        "tcp"
    }

    fn display_name(&self) -> &'static str {
        "TCP"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        match context.hint("ip_protocol") {
            Some(proto) if proto == ip_protocol::TCP as u64 => Some(PRIORITY_PROTOCOL),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "tcp");

        // Ports, sequence, ack, and the offset/flags word: 14 bytes
        let src_port = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let dst_port = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let sequence = match cursor.read_u32() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let acknowledgement = match cursor.read_u32() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let offset_flags = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };

        // Data offset is the high nibble, in 32-bit words
        let data_offset = (offset_flags >> 12) as usize;
        let flag_bits = (offset_flags & 0x003F) as u8;

        let mut fields = SmallVec::new();
        fields.push(("source_port", FieldValue::UInt16(src_port)));
        fields.push(("destination_port", FieldValue::UInt16(dst_port)));
        fields.push(("sequence", FieldValue::UInt32(sequence)));
        fields.push(("acknowledgement", FieldValue::UInt32(acknowledgement)));
        fields.push(("data_offset", FieldValue::UInt8(data_offset as u8)));
        fields.push(("flags", FieldValue::UInt8(flag_bits)));

        // A header cannot claim to be smaller than its own fixed part
        if data_offset < 5 {
            return ParseResult::partial(
                fields,
                &[],
                DecodeError::Malformed {
                    protocol: "tcp",
                    field: "data_offset",
                    reason: format!("{data_offset} words, minimum is 5"),
                },
            );
        }

        // Payload begins at offset*4; a claimed offset past the buffer end
        // leaves an empty payload
        let payload_start = (data_offset * 4).min(data.len());

        let mut child_hints = SmallVec::new();
        child_hints.push(("src_port", src_port as u64));
        child_hints.push(("dst_port", dst_port as u64));
        child_hints.push(("transport", ip_protocol::TCP as u64));

        ParseResult::success(fields, &data[payload_start..], child_hints)
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["http"]
    }
}
