//! Fallback decoders for unrecognized protocols.
//!
//! Running into a protocol nobody decodes is not an error; the frame gets
//! a terminal `unknown` layer recording the raw selector value and the
//! undecoded length, and decoding stops there.

use smallvec::SmallVec;

use super::registry::PRIORITY_FALLBACK;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Fallback for ethertypes without a decoder.
#[derive(Debug, Clone, Copy)]
pub struct UnknownLinkProtocol;

impl Protocol for UnknownLinkProtocol {
    fn name(&self) -> &'static str {
        "unknown_link"
    }

    fn display_name(&self) -> &'static str {
        "unknown"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        // Any frame with an ethertype is a candidate; a concrete decoder
        // always outranks this
        context.hint("ethertype").map(|_| PRIORITY_FALLBACK)
    }

    fn parse<'a>(&self, data: &'a [u8], context: &ParseContext) -> ParseResult<'a> {
        let mut fields = SmallVec::new();
        if let Some(ethertype) = context.hint("ethertype") {
            fields.push(("ethertype", FieldValue::UInt16(ethertype as u16)));
        }
        fields.push(("length", FieldValue::UInt16(data.len() as u16)));
        ParseResult::success(fields, &[], SmallVec::new())
    }
}

/// Fallback for IP protocol numbers without a decoder.
#[derive(Debug, Clone, Copy)]
pub struct UnknownTransportProtocol;

impl Protocol for UnknownTransportProtocol {
    fn name(&self) -> &'static str {
        "unknown_transport"
    }

    fn display_name(&self) -> &'static str {
        "unknown"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        context.hint("ip_protocol").map(|_| PRIORITY_FALLBACK)
    }

    fn parse<'a>(&self, data: &'a [u8], context: &ParseContext) -> ParseResult<'a> {
        let mut fields = SmallVec::new();
        if let Some(proto) = context.hint("ip_protocol") {
            fields.push(("protocol", FieldValue::UInt8(proto as u8)));
        }
        fields.push(("length", FieldValue::UInt16(data.len() as u16)));
        ParseResult::success(fields, &[], SmallVec::new())
    }
}
