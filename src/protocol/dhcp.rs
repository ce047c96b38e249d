//! DHCP (BOOTP) message decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::error::DecodeError;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// DHCP server and client ports.
pub const DHCP_SERVER_PORT: u64 = 67;
pub const DHCP_CLIENT_PORT: u64 = 68;

/// Fixed BOOTP header size before the options area.
const BOOTP_HEADER_SIZE: usize = 236;

/// Magic cookie marking the start of DHCP options.
const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// DHCP message types (option 53).
#[allow(dead_code)]
pub mod message_type {
    pub const DISCOVER: u8 = 1;
    pub const OFFER: u8 = 2;
    pub const REQUEST: u8 = 3;
    pub const DECLINE: u8 = 4;
    pub const ACK: u8 = 5;
    pub const NAK: u8 = 6;
    pub const RELEASE: u8 = 7;
    pub const INFORM: u8 = 8;
}

/// DHCP option codes lifted into named fields.
#[allow(dead_code)]
pub mod option {
    pub const PAD: u8 = 0;
    pub const SUBNET_MASK: u8 = 1;
    pub const ROUTER: u8 = 3;
    pub const DNS_SERVERS: u8 = 6;
    pub const LEASE_TIME: u8 = 51;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const SERVER_ID: u8 = 54;
    pub const END: u8 = 255;
}

/// DHCP message decoder.
///
/// The fixed BOOTP header is decoded first; options follow the magic
/// cookie at offset 240 and are walked until the end option or the end
/// of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct DhcpProtocol;

impl Protocol for DhcpProtocol {
    fn name(&self) -> &'static str {
        "dhcp"
    }

    fn display_name(&self) -> &'static str {
        "DHCP"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        if context.hint("transport") != Some(ip_protocol::UDP as u64) {
            return None;
        }
        let ports = [context.hint("src_port"), context.hint("dst_port")];
        if ports
            .iter()
            .any(|p| *p == Some(DHCP_SERVER_PORT) || *p == Some(DHCP_CLIENT_PORT))
        {
            return Some(PRIORITY_PROTOCOL);
        }
        None
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "dhcp");

        let header = match cursor.take(BOOTP_HEADER_SIZE) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };

        let hlen = header[2];

        let mut fields = SmallVec::new();
        fields.push(("op", FieldValue::UInt8(header[0])));
        fields.push(("hardware_type", FieldValue::UInt8(header[1])));
        fields.push(("hardware_length", FieldValue::UInt8(hlen)));
        fields.push(("hops", FieldValue::UInt8(header[3])));
        fields.push((
            "transaction_id",
            FieldValue::UInt32(u32::from_be_bytes([
                header[4], header[5], header[6], header[7],
            ])),
        ));
        fields.push((
            "seconds",
            FieldValue::UInt16(u16::from_be_bytes([header[8], header[9]])),
        ));
        fields.push((
            "flags",
            FieldValue::UInt16(u16::from_be_bytes([header[10], header[11]])),
        ));
        fields.push(("client_ip", FieldValue::ipv4(&header[12..16])));
        fields.push(("your_ip", FieldValue::ipv4(&header[16..20])));
        fields.push(("server_ip", FieldValue::ipv4(&header[20..24])));
        fields.push(("gateway_ip", FieldValue::ipv4(&header[24..28])));
        // chaddr is 16 bytes; Ethernet uses the first 6
        fields.push(("client_mac", FieldValue::mac(&header[28..34])));

        // Options require the magic cookie; plain BOOTP without one ends here
        if cursor.is_empty() {
            return ParseResult::success(fields, &[], SmallVec::new());
        }
        match cursor.take(4) {
            Ok(cookie) if cookie == DHCP_MAGIC_COOKIE => {}
            Ok(cookie) => {
                return ParseResult::partial(
                    fields,
                    &[],
                    DecodeError::Malformed {
                        protocol: "dhcp",
                        field: "magic_cookie",
                        reason: format!("{cookie:02x?}"),
                    },
                );
            }
            Err(e) => return ParseResult::partial(fields, &[], e),
        }

        walk_options(&mut cursor, &mut fields);

        ParseResult::success(fields, &[], SmallVec::new())
    }
}

/// Walk the options area, collecting codes and lifting well-known options
/// into named fields. Stops at the end option; an option running past the
/// buffer ends the walk without failing the layer, keeping what was
/// collected.
fn walk_options<'data>(
    cursor: &mut Cursor<'data>,
    fields: &mut SmallVec<[(&'static str, FieldValue<'data>); 16]>,
) {
    let mut codes = Vec::new();

    while !cursor.is_empty() {
        let Ok(code) = cursor.read_u8() else {
            break;
        };
        match code {
            option::PAD => continue,
            option::END => break,
            _ => {}
        }
        codes.push(FieldValue::UInt8(code));

        let Ok(len) = cursor.read_u8() else {
            break;
        };
        let Ok(value) = cursor.take(len as usize) else {
            break;
        };
        let len = len as usize;

        match code {
            option::MESSAGE_TYPE if len == 1 => {
                fields.push(("message_type", FieldValue::UInt8(value[0])));
                fields.push((
                    "message_type_name",
                    FieldValue::Str(message_type_name(value[0])),
                ));
            }
            option::SUBNET_MASK if len == 4 => {
                fields.push(("subnet_mask", FieldValue::ipv4(value)));
            }
            option::ROUTER if len >= 4 => {
                fields.push(("router", FieldValue::ipv4(value)));
            }
            option::DNS_SERVERS if len >= 4 && len % 4 == 0 => {
                let servers = value.chunks(4).map(FieldValue::ipv4).collect();
                fields.push(("dns_servers", FieldValue::List(servers)));
            }
            option::LEASE_TIME if len == 4 => {
                fields.push((
                    "lease_time",
                    FieldValue::UInt32(u32::from_be_bytes([
                        value[0], value[1], value[2], value[3],
                    ])),
                ));
            }
            option::SERVER_ID if len == 4 => {
                fields.push(("server_id", FieldValue::ipv4(value)));
            }
            // Unknown options are recorded by code only
            _ => {}
        }
    }

    fields.push(("option_codes", FieldValue::List(codes)));
}

fn message_type_name(value: u8) -> &'static str {
    match value {
        message_type::DISCOVER => "discover",
        message_type::OFFER => "offer",
        message_type::REQUEST => "request",
        message_type::DECLINE => "decline",
        message_type::ACK => "ack",
        message_type::NAK => "nak",
        message_type::RELEASE => "release",
        message_type::INFORM => "inform",
        _ => "unknown",
    }
}
