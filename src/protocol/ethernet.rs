//! Ethernet II frame decoder.

use smallvec::SmallVec;

use crate::cursor::Cursor;

use super::registry::PRIORITY_PROTOCOL;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Link type constant for Ethernet.
pub const LINKTYPE_ETHERNET: u16 = 1;

/// Ethernet header size (two MACs + ethertype).
const ETHERNET_HEADER_SIZE: usize = 14;

/// Well-known EtherType values (IEEE 802).
#[allow(dead_code)]
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const LLDP: u16 = 0x88CC;
}

/// Ethernet II frame decoder.
#[derive(Debug, Clone, Copy)]
pub struct EthernetProtocol;

impl Protocol for EthernetProtocol {
    fn name(&self) -> &'static str {
        "ethernet"
    }

    fn display_name(&self) -> &'static str {
        "ethernet"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        // Ethernet is only ever the root layer of a captured frame
        if context.is_root() && context.link_type == LINKTYPE_ETHERNET {
            return Some(PRIORITY_PROTOCOL);
        }
        None
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let mut cursor = Cursor::new(data, "ethernet");

        let destination = match cursor.take(6) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };
        let source = match cursor.take(6) {
            Ok(bytes) => bytes,
            Err(e) => return ParseResult::error(e, data),
        };
        let ethertype = match cursor.read_u16() {
            Ok(v) => v,
            Err(e) => return ParseResult::error(e, data),
        };

        let mut fields = SmallVec::new();
        fields.push(("destination_mac", FieldValue::mac(destination)));
        fields.push(("source_mac", FieldValue::mac(source)));
        fields.push(("ethertype", FieldValue::UInt16(ethertype)));

        let mut child_hints = SmallVec::new();
        child_hints.push(("ethertype", ethertype as u64));

        ParseResult::success(fields, cursor.rest(), child_hints)
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["ipv4", "ipv6", "arp"]
    }
}
