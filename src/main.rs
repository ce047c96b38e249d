//! framesift command-line entry point.
//!
//! Captures frames on one interface and writes one JSON object per frame
//! to stdout.

use std::io::Write;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use framesift::capture::{self, Capture};
use framesift::protocol::{default_registry, Protocol};
use framesift::record::FrameRecord;
use framesift::CaptureError;

#[derive(Parser, Debug)]
#[command(name = "framesift")]
#[command(about = "Live packet capture with layered protocol decoding", long_about = None)]
struct Args {
    /// Interface to capture on (default: first usable interface)
    #[arg(short, long)]
    interface: Option<String>,

    /// List capturable interfaces and exit
    #[arg(long)]
    list_interfaces: bool,

    /// List protocol decoders and exit
    #[arg(long)]
    list_protocols: bool,

    /// Stop after this many frames
    #[arg(short, long)]
    count: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    if args.list_interfaces {
        for iface in capture::list_interfaces() {
            let mac = iface
                .mac
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string());
            let state = if iface.is_up() { "up" } else { "down" };
            println!("{:<12} {:<18} {}", iface.name, mac, state);
        }
        return Ok(());
    }

    let registry = default_registry();

    if args.list_protocols {
        for parser in registry.all_parsers() {
            println!("{:<20} {}", parser.name(), parser.display_name());
        }
        return Ok(());
    }

    let interface = capture::lookup_interface(args.interface.as_deref())?;
    info!(interface = %interface.name, "starting capture");

    let mut capture = Capture::open(interface).context("opening capture channel")?;
    let interface_name = capture.interface_name().to_string();
    let link_type = capture.link_type();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut captured = 0u64;

    loop {
        if let Some(limit) = args.count {
            if captured >= limit {
                info!(frames = captured, "frame limit reached");
                break;
            }
        }

        let frame = match capture.next_frame() {
            Ok(frame) => frame,
            Err(e @ CaptureError::PermissionDenied { .. }) => return Err(e.into()),
            Err(e) => {
                // Transient read failures are per-frame
                debug!(error = %e, "frame read failed");
                continue;
            }
        };

        let record = FrameRecord::decode(&registry, link_type, &interface_name, frame);
        if record.has_error() {
            debug!(length = record.length, "frame decoded with layer error");
        }

        if let Err(e) = writeln!(out, "{}", record.to_json()) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                break;
            }
            warn!(error = %e, "write failed");
            return Err(e.into());
        }

        captured += 1;
    }

    Ok(())
}
