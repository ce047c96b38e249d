//! framesift: live link-layer capture with layered protocol decoding.
//!
//! Frames read from a datalink channel are decoded layer by layer
//! (Ethernet, ARP, IPv4/IPv6, TCP/UDP/ICMP/ICMPv6, HTTP/DNS/DHCP) into
//! structured records. Decoding never panics on hostile input: truncated
//! or malformed layers fail softly with a typed error attached to the
//! frame's record, and unrecognized protocols terminate the chain with an
//! `unknown` layer carrying the raw selector value.
//!
//! # Example
//!
//! ```
//! use framesift::protocol::{default_registry, parse_packet, LINKTYPE_ETHERNET};
//!
//! let registry = default_registry();
//! let frame = [
//!     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // destination
//!     0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // source
//!     0x08, 0x06, // ARP
//!     // ... ARP payload
//! ];
//! let layers = parse_packet(&registry, LINKTYPE_ETHERNET, &frame);
//! assert_eq!(layers[0].name, "ethernet");
//! ```

pub mod capture;
pub mod cursor;
pub mod error;
pub mod protocol;
pub mod record;

pub use error::{CaptureError, DecodeError, Error, Result};
pub use record::{FrameRecord, LayerRecord};
