//! DNS message decoder.
//!
//! Names are read with full RFC 1035 compression support. A compression
//! pointer moves the read position backwards into the message, so the
//! reader walks the whole message through a seeking [`Cursor`] and caps
//! the number of pointer hops; a crafted pointer cycle fails the layer
//! with [`DecodeError::PointerLoop`] instead of spinning.

use compact_str::{format_compact, CompactString};
use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::error::DecodeError;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Standard DNS port.
pub const DNS_PORT: u64 = 53;

/// Maximum compression pointer hops per name.
///
/// Legitimate messages chain at most a handful of pointers; past this the
/// name is treated as a loop.
const MAX_POINTER_HOPS: usize = 10;

/// Labels are at most 63 bytes; the two high bits of the length byte are
/// the pointer tag.
const MAX_LABEL_LEN: u8 = 63;

/// DNS resource record types.
#[allow(dead_code)]
pub mod record_type {
    pub const A: u16 = 1;
    pub const NS: u16 = 2;
    pub const CNAME: u16 = 5;
    pub const SOA: u16 = 6;
    pub const PTR: u16 = 12;
    pub const MX: u16 = 15;
    pub const TXT: u16 = 16;
    pub const AAAA: u16 = 28;
}

/// DNS response codes.
#[allow(dead_code)]
pub mod rcode {
    pub const NO_ERROR: u16 = 0;
    pub const FORMAT_ERROR: u16 = 1;
    pub const SERVER_FAILURE: u16 = 2;
    pub const NAME_ERROR: u16 = 3;
    pub const REFUSED: u16 = 5;
}

/// DNS message decoder.
#[derive(Debug, Clone, Copy)]
pub struct DnsProtocol;

impl Protocol for DnsProtocol {
    fn name(&self) -> &'static str {
        "dns"
    }

    fn display_name(&self) -> &'static str {
        "DNS"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        if context.hint("transport") != Some(ip_protocol::UDP as u64) {
            return None;
        }
        let src = context.hint("src_port");
        let dst = context.hint("dst_port");
        if src == Some(DNS_PORT) || dst == Some(DNS_PORT) {
            return Some(PRIORITY_PROTOCOL);
        }
        None
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "dns");

        let id = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let flags = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let qdcount = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let ancount = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let nscount = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };
        let arcount = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };

        let mut fields = SmallVec::new();
        fields.push(("transaction_id", FieldValue::UInt16(id)));
        fields.push(("is_response", FieldValue::Bool(flags & 0x8000 != 0)));
        fields.push(("opcode", FieldValue::UInt8(((flags >> 11) & 0xF) as u8)));
        fields.push(("authoritative", FieldValue::Bool(flags & 0x0400 != 0)));
        fields.push(("truncated", FieldValue::Bool(flags & 0x0200 != 0)));
        fields.push(("recursion_desired", FieldValue::Bool(flags & 0x0100 != 0)));
        fields.push(("recursion_available", FieldValue::Bool(flags & 0x0080 != 0)));
        fields.push(("response_code", FieldValue::UInt8((flags & 0xF) as u8)));
        fields.push(("question_count", FieldValue::UInt16(qdcount)));
        fields.push(("answer_count", FieldValue::UInt16(ancount)));
        fields.push(("authority_count", FieldValue::UInt16(nscount)));
        fields.push(("additional_count", FieldValue::UInt16(arcount)));

        // Question section. Counts come off the wire, so no pre-allocation
        // from them; a lying count runs out of buffer instead
        let mut questions = Vec::new();
        for i in 0..qdcount {
            let name = match read_name(&mut cursor) {
                Ok(name) => name,
                Err(e) => return ParseResult::partial(fields, &[], e),
            };
            let qtype = match cursor.read_u16() {
                Ok(v) => v,
                Err(e) => return ParseResult::partial(fields, &[], e),
            };
            if let Err(e) = cursor.skip(2) {
                // Question class
                return ParseResult::partial(fields, &[], e);
            }
            if i == 0 {
                fields.push(("query_name", FieldValue::OwnedString(name.clone())));
                fields.push(("query_type", FieldValue::UInt16(qtype)));
            }
            questions.push(FieldValue::OwnedString(name));
        }
        fields.push(("questions", FieldValue::List(questions)));

        // Answer section
        let mut answers = Vec::new();
        for _ in 0..ancount {
            match read_answer(&mut cursor) {
                Ok(answer) => answers.push(FieldValue::OwnedString(answer)),
                Err(e) => {
                    fields.push(("answers", FieldValue::List(answers)));
                    return ParseResult::partial(fields, &[], e);
                }
            }
        }
        fields.push(("answers", FieldValue::List(answers)));

        // Authority and additional records are counted but not walked
        ParseResult::success(fields, &[], SmallVec::new())
    }
}

/// Read a possibly-compressed domain name at the cursor position.
///
/// On return the cursor sits just past the name as it appears inline: for
/// an uncompressed name that is past its root byte, and for a name that
/// uses a pointer it is exactly two bytes past the first pointer.
fn read_name(cursor: &mut Cursor<'_>) -> Result<CompactString, DecodeError> {
    let mut name = CompactString::default();
    let mut hops = 0usize;
    let mut resume: Option<usize> = None;

    loop {
        let len = cursor.read_u8()?;

        if len == 0 {
            break;
        }

        if len & 0xC0 == 0xC0 {
            // Compression pointer: 14-bit offset into the message
            let low = cursor.read_u8()?;
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(DecodeError::PointerLoop { hops });
            }
            if resume.is_none() {
                resume = Some(cursor.position());
            }
            let target = (((len & 0x3F) as usize) << 8) | low as usize;
            cursor.seek(target)?;
            continue;
        }

        if len > MAX_LABEL_LEN {
            return Err(DecodeError::Malformed {
                protocol: "dns",
                field: "label",
                reason: format!("length byte {len:#04x} is neither a label nor a pointer"),
            });
        }

        let label = cursor.take(len as usize)?;
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(&String::from_utf8_lossy(label));
    }

    if let Some(pos) = resume {
        cursor.seek(pos)?;
    }

    Ok(name)
}

/// Read one resource record, rendering it as "name TYPE data".
fn read_answer(cursor: &mut Cursor<'_>) -> Result<CompactString, DecodeError> {
    let name = read_name(cursor)?;
    let rtype = cursor.read_u16()?;
    cursor.skip(2)?; // Class
    let ttl = cursor.read_u32()?;
    let rdlength = cursor.read_u16()?;

    let rdata_start = cursor.position();
    let rdata = cursor.take(rdlength as usize)?;

    let data: CompactString = match (rtype, rdlength) {
        (record_type::A, 4) => {
            format_compact!("{}.{}.{}.{}", rdata[0], rdata[1], rdata[2], rdata[3])
        }
        (record_type::AAAA, 16) => {
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(rdata);
            format_compact!("{}", std::net::Ipv6Addr::from(bytes))
        }
        (record_type::CNAME | record_type::NS | record_type::PTR, _) => {
            // rdata holds another possibly-compressed name
            let mut rdata_cursor = cursor.clone();
            rdata_cursor.seek(rdata_start)?;
            read_name(&mut rdata_cursor)?
        }
        _ => format_compact!("{} bytes", rdlength),
    };

    Ok(format_compact!(
        "{name} {} ttl={ttl} {data}",
        type_name(rtype)
    ))
}

fn type_name(rtype: u16) -> &'static str {
    match rtype {
        record_type::A => "A",
        record_type::NS => "NS",
        record_type::CNAME => "CNAME",
        record_type::SOA => "SOA",
        record_type::PTR => "PTR",
        record_type::MX => "MX",
        record_type::TXT => "TXT",
        record_type::AAAA => "AAAA",
        _ => "TYPE?",
    }
}
