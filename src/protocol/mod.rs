//! Layered protocol decoding.
//!
//! Each decoder implements [`Protocol`] and is selected from the
//! [`ProtocolRegistry`] by the hints its parent layer produced. Decoding a
//! frame walks the chain until a layer fails, a terminal layer leaves no
//! payload, or no decoder claims the remaining bytes.

mod arp;
mod context;
mod dhcp;
mod dns;
mod ethernet;
mod field;
mod http;
mod icmp;
mod icmpv6;
mod ipv4;
mod ipv6;
pub mod registry;
mod tcp;
mod udp;
mod unknown;

pub use arp::{operation, ArpProtocol};
pub use context::{FieldEntry, HintEntry, ParseContext, ParseResult};
pub use dhcp::DhcpProtocol;
pub use dns::{record_type, DnsProtocol};
pub use ethernet::{ethertype, EthernetProtocol, LINKTYPE_ETHERNET};
pub use field::FieldValue;
pub use http::HttpProtocol;
pub use icmp::IcmpProtocol;
pub use icmpv6::Icmpv6Protocol;
pub use ipv4::{ip_protocol, Ipv4Protocol};
pub use ipv6::Ipv6Protocol;
pub use registry::{BuiltinProtocol, Protocol, ProtocolRegistry};
pub use tcp::TcpProtocol;
pub use udp::UdpProtocol;
pub use unknown::{UnknownLinkProtocol, UnknownTransportProtocol};

/// Build a registry with every built-in decoder registered.
pub fn default_registry() -> ProtocolRegistry {
    let mut registry = ProtocolRegistry::new();
    registry.register(EthernetProtocol);
    registry.register(ArpProtocol);
    registry.register(Ipv4Protocol);
    registry.register(Ipv6Protocol);
    registry.register(TcpProtocol);
    registry.register(UdpProtocol);
    registry.register(IcmpProtocol);
    registry.register(Icmpv6Protocol);
    registry.register(HttpProtocol);
    registry.register(DnsProtocol);
    registry.register(DhcpProtocol);
    registry.register(UnknownLinkProtocol);
    registry.register(UnknownTransportProtocol);
    registry
}

/// One decoded layer of a frame.
#[derive(Debug, Clone)]
pub struct DecodedLayer<'data> {
    /// Decoder identifier (e.g., "ipv4").
    pub protocol: &'static str,

    /// Layer name as emitted in frame records (e.g., "IPv4").
    pub name: &'static str,

    /// Fields, payload, and error state from the decoder.
    pub result: ParseResult<'data>,
}

/// Decode a frame layer by layer.
///
/// Layers appear in decode order. A layer error ends the chain but the
/// layers decoded before it, and the failing layer's partial fields, are
/// all returned.
pub fn parse_packet<'data>(
    registry: &ProtocolRegistry,
    link_type: u16,
    frame: &'data [u8],
) -> Vec<DecodedLayer<'data>> {
    let mut layers = Vec::new();
    let mut context = ParseContext::new(link_type);
    let mut data = frame;

    while !data.is_empty() {
        let Some(parser) = registry.find_parser(&context) else {
            break;
        };

        let result = parser.parse(data, &context);
        let failed = result.error.is_some();
        let consumed = data.len() - result.remaining.len();
        let remaining = result.remaining;

        let mut next = ParseContext::new(link_type);
        next.parent_protocol = Some(parser.name());
        next.hints = result.child_hints.clone();
        next.offset = context.offset + consumed;

        layers.push(DecodedLayer {
            protocol: parser.name(),
            name: parser.display_name(),
            result,
        });

        // A decoder that consumed nothing would be picked again forever
        if failed || consumed == 0 {
            break;
        }

        context = next;
        data = remaining;
    }

    layers
}
