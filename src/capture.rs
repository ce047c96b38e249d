//! Live capture over a network interface.
//!
//! Capture runs through `pnet`'s datalink channel, which needs raw socket
//! privileges. Opening the channel without them is reported as
//! [`CaptureError::PermissionDenied`] so the caller can fail fast instead
//! of retrying per frame.

use std::io;

use pnet::datalink::{self, Channel, DataLinkReceiver, NetworkInterface};
use tracing::debug;

use crate::error::CaptureError;
use crate::protocol::LINKTYPE_ETHERNET;

/// An open capture channel on one interface.
pub struct Capture {
    interface: NetworkInterface,
    rx: Box<dyn DataLinkReceiver>,
}

/// Pick the capture interface.
///
/// A named interface must exist; without a name, the first interface that
/// is up, not loopback, and has a MAC address is used.
pub fn lookup_interface(name: Option<&str>) -> Result<NetworkInterface, CaptureError> {
    let interfaces = datalink::interfaces();

    match name {
        Some(name) => interfaces
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| CaptureError::NoSuchInterface {
                name: name.to_string(),
            }),
        None => interfaces
            .into_iter()
            .find(|iface| iface.is_up() && !iface.is_loopback() && iface.mac.is_some())
            .ok_or(CaptureError::NoUsableInterface),
    }
}

/// List all interfaces on the host.
pub fn list_interfaces() -> Vec<NetworkInterface> {
    datalink::interfaces()
}

impl Capture {
    /// Open a capture channel on `interface`.
    pub fn open(interface: NetworkInterface) -> Result<Self, CaptureError> {
        match datalink::channel(&interface, Default::default()) {
            Ok(Channel::Ethernet(_tx, rx)) => {
                debug!(interface = %interface.name, "capture channel open");
                Ok(Self { interface, rx })
            }
            Ok(_) => Err(CaptureError::UnsupportedChannel {
                interface: interface.name,
            }),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(CaptureError::PermissionDenied {
                    interface: interface.name,
                })
            }
            Err(e) => Err(CaptureError::Io(e)),
        }
    }

    /// Name of the interface being captured.
    pub fn interface_name(&self) -> &str {
        &self.interface.name
    }

    /// Link type of captured frames.
    pub fn link_type(&self) -> u16 {
        LINKTYPE_ETHERNET
    }

    /// Block until the next frame arrives.
    ///
    /// Errors here are per-frame; the channel stays usable and the caller
    /// decides whether to continue.
    pub fn next_frame(&mut self) -> Result<&[u8], CaptureError> {
        self.rx.next().map_err(CaptureError::Io)
    }
}
