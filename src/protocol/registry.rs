//! Protocol registry for managing decoders.

use super::{
    ArpProtocol, DhcpProtocol, DnsProtocol, EthernetProtocol, HttpProtocol, IcmpProtocol,
    Icmpv6Protocol, Ipv4Protocol, Ipv6Protocol, ParseContext, ParseResult, TcpProtocol,
    UdpProtocol, UnknownLinkProtocol, UnknownTransportProtocol,
};

/// Priority returned by concrete protocol matches.
pub const PRIORITY_PROTOCOL: u32 = 100;

/// Priority for heuristic matches (e.g., HTTP on any TCP payload).
pub const PRIORITY_HEURISTIC: u32 = 50;

/// Priority for unknown-protocol fallbacks; chosen only when nothing else
/// matches the dispatch key.
pub const PRIORITY_FALLBACK: u32 = 1;

/// Core trait all protocol decoders must implement.
pub trait Protocol: Send + Sync {
    /// Unique identifier for this protocol (e.g., "tcp", "dns").
    fn name(&self) -> &'static str;

    /// Layer name used in emitted frame records (e.g., "TCP", "DNS").
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Check if this decoder can handle the given context.
    /// Returns a priority score (higher = more specific match).
    /// Returns `None` if this decoder cannot handle the context.
    fn can_parse(&self, context: &ParseContext) -> Option<u32>;

    /// Decode bytes into structured fields.
    fn parse<'a>(&self, data: &'a [u8], context: &ParseContext) -> ParseResult<'a>;

    /// Protocols that might follow this one.
    fn child_protocols(&self) -> &[&'static str] {
        &[]
    }
}

/// Enum of all built-in protocol decoders.
///
/// This enables static dispatch (no vtable overhead) for all built-in
/// protocols. The compiler can inline match arms and optimize branch
/// prediction.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinProtocol {
    Ethernet(EthernetProtocol),
    Arp(ArpProtocol),
    Ipv4(Ipv4Protocol),
    Ipv6(Ipv6Protocol),
    Tcp(TcpProtocol),
    Udp(UdpProtocol),
    Icmp(IcmpProtocol),
    Icmpv6(Icmpv6Protocol),
    Http(HttpProtocol),
    Dns(DnsProtocol),
    Dhcp(DhcpProtocol),
    UnknownLink(UnknownLinkProtocol),
    UnknownTransport(UnknownTransportProtocol),
}

/// Macro to delegate Protocol trait methods to inner types.
macro_rules! delegate_protocol {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            BuiltinProtocol::Ethernet(p) => p.$method($($arg),*),
            BuiltinProtocol::Arp(p) => p.$method($($arg),*),
            BuiltinProtocol::Ipv4(p) => p.$method($($arg),*),
            BuiltinProtocol::Ipv6(p) => p.$method($($arg),*),
            BuiltinProtocol::Tcp(p) => p.$method($($arg),*),
            BuiltinProtocol::Udp(p) => p.$method($($arg),*),
            BuiltinProtocol::Icmp(p) => p.$method($($arg),*),
            BuiltinProtocol::Icmpv6(p) => p.$method($($arg),*),
            BuiltinProtocol::Http(p) => p.$method($($arg),*),
            BuiltinProtocol::Dns(p) => p.$method($($arg),*),
            BuiltinProtocol::Dhcp(p) => p.$method($($arg),*),
            BuiltinProtocol::UnknownLink(p) => p.$method($($arg),*),
            BuiltinProtocol::UnknownTransport(p) => p.$method($($arg),*),
        }
    };
}

impl Protocol for BuiltinProtocol {
    #[inline]
    fn name(&self) -> &'static str {
        delegate_protocol!(self, name)
    }

    #[inline]
    fn display_name(&self) -> &'static str {
        delegate_protocol!(self, display_name)
    }

    #[inline]
    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        delegate_protocol!(self, can_parse, context)
    }

    #[inline]
    fn parse<'a>(&self, data: &'a [u8], context: &ParseContext) -> ParseResult<'a> {
        delegate_protocol!(self, parse, data, context)
    }

    #[inline]
    fn child_protocols(&self) -> &[&'static str] {
        delegate_protocol!(self, child_protocols)
    }
}

/// Conversion traits for ergonomic registration.
impl From<EthernetProtocol> for BuiltinProtocol {
    fn from(p: EthernetProtocol) -> Self {
        BuiltinProtocol::Ethernet(p)
    }
}

impl From<ArpProtocol> for BuiltinProtocol {
    fn from(p: ArpProtocol) -> Self {
        BuiltinProtocol::Arp(p)
    }
}

impl From<Ipv4Protocol> for BuiltinProtocol {
    fn from(p: Ipv4Protocol) -> Self {
        BuiltinProtocol::Ipv4(p)
    }
}

impl From<Ipv6Protocol> for BuiltinProtocol {
    fn from(p: Ipv6Protocol) -> Self {
        BuiltinProtocol::Ipv6(p)
    }
}

impl From<TcpProtocol> for BuiltinProtocol {
    fn from(p: TcpProtocol) -> Self {
        BuiltinProtocol::Tcp(p)
    }
}

impl From<UdpProtocol> for BuiltinProtocol {
    fn from(p: UdpProtocol) -> Self {
        BuiltinProtocol::Udp(p)
    }
}

impl From<IcmpProtocol> for BuiltinProtocol {
    fn from(p: IcmpProtocol) -> Self {
        BuiltinProtocol::Icmp(p)
    }
}

impl From<Icmpv6Protocol> for BuiltinProtocol {
    fn from(p: Icmpv6Protocol) -> Self {
        BuiltinProtocol::Icmpv6(p)
    }
}

impl From<HttpProtocol> for BuiltinProtocol {
    fn from(p: HttpProtocol) -> Self {
        BuiltinProtocol::Http(p)
    }
}

impl From<DnsProtocol> for BuiltinProtocol {
    fn from(p: DnsProtocol) -> Self {
        BuiltinProtocol::Dns(p)
    }
}

impl From<DhcpProtocol> for BuiltinProtocol {
    fn from(p: DhcpProtocol) -> Self {
        BuiltinProtocol::Dhcp(p)
    }
}

impl From<UnknownLinkProtocol> for BuiltinProtocol {
    fn from(p: UnknownLinkProtocol) -> Self {
        BuiltinProtocol::UnknownLink(p)
    }
}

impl From<UnknownTransportProtocol> for BuiltinProtocol {
    fn from(p: UnknownTransportProtocol) -> Self {
        BuiltinProtocol::UnknownTransport(p)
    }
}

/// Registry for protocol decoders with priority-based selection.
///
/// Built once at startup and read-only thereafter. Unknown dispatch keys
/// are not errors: the fallback decoders match at the lowest priority and
/// record the raw value.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    parsers: Vec<BuiltinProtocol>,
}

impl ProtocolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a protocol decoder.
    pub fn register<P: Into<BuiltinProtocol>>(&mut self, parser: P) {
        self.parsers.push(parser.into());
    }

    /// Find the best decoder for the given context.
    #[inline]
    pub fn find_parser(&self, context: &ParseContext) -> Option<&BuiltinProtocol> {
        self.parsers
            .iter()
            .filter_map(|p| p.can_parse(context).map(|priority| (p, priority)))
            .max_by_key(|(_, priority)| *priority)
            .map(|(parser, _)| parser)
    }

    /// Get all registered decoders.
    pub fn all_parsers(&self) -> impl Iterator<Item = &BuiltinProtocol> {
        self.parsers.iter()
    }

    /// Get a decoder by name.
    pub fn get_parser(&self, name: &str) -> Option<&BuiltinProtocol> {
        self.parsers.iter().find(|p| p.name() == name)
    }

    /// Get the number of registered decoders.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
