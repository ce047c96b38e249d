//! Error types for framesift.
//!
//! This module provides structured error types for all framesift operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`CaptureError`] - Errors from opening or reading the capture channel
//! - [`DecodeError`] - Errors from protocol decoding
//!
//! All errors implement `std::error::Error` and can be converted to `anyhow::Error`.

use thiserror::Error;

/// Main error type for framesift operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error opening or reading the capture channel
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Error during protocol decoding
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the capture channel.
///
/// `PermissionDenied` is the only error the capture loop treats as fatal;
/// per-frame read errors are logged and the loop continues.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Raw capture privilege missing (needs root or CAP_NET_RAW)
    #[error("Permission denied opening {interface} (raw capture requires root or CAP_NET_RAW)")]
    PermissionDenied { interface: String },

    /// Named interface does not exist
    #[error("No such interface: {name}")]
    NoSuchInterface { name: String },

    /// No usable interface found for auto-selection
    #[error("No capturable interface found (up, non-loopback, with a MAC address)")]
    NoUsableInterface,

    /// Channel type other than Ethernet
    #[error("Unsupported channel type for {interface}")]
    UnsupportedChannel { interface: String },

    /// OS-level transport error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to protocol decoding.
///
/// These are per-frame and non-fatal: a failing layer returns its error in
/// the parse result and the frame's partial record is still emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer shorter than a layer's header
    #[error("{protocol}: truncated (need {needed} bytes, have {have})")]
    Truncated {
        protocol: &'static str,
        needed: usize,
        have: usize,
    },

    /// Header field inconsistent with the format
    #[error("{protocol}: malformed {field}: {reason}")]
    Malformed {
        protocol: &'static str,
        field: &'static str,
        reason: String,
    },

    /// DNS name compression pointers formed a cycle (hop cap exceeded)
    #[error("dns: compression pointer loop (exceeded {hops} hops)")]
    PointerLoop { hops: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
