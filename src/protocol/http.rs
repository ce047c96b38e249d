//! HTTP/1.x message decoder.
//!
//! There is no reserved port, so this decoder runs as a heuristic over any
//! TCP payload and backs off with a soft error when the bytes do not look
//! like an HTTP message.

use smallvec::SmallVec;

use crate::error::DecodeError;

use super::ipv4::ip_protocol;
use super::registry::PRIORITY_HEURISTIC;
use super::{FieldValue, ParseContext, ParseResult, Protocol};

/// Headers worth lifting into fields.
const EXTRACTED_HEADERS: [(&str, &'static str); 5] = [
    ("host", "host"),
    ("content-type", "content_type"),
    ("content-length", "content_length"),
    ("user-agent", "user_agent"),
    ("server", "server"),
];

/// HTTP/1.x message decoder.
#[derive(Debug, Clone, Copy)]
pub struct HttpProtocol;

impl Protocol for HttpProtocol {
    fn name(&self) -> &'static str {
        "http"
    }

    fn display_name(&self) -> &'static str {
        "HTTP"
    }

    fn can_parse(&self, context: &ParseContext) -> Option<u32> {
        match context.hint("transport") {
            Some(proto) if proto == ip_protocol::TCP as u64 => Some(PRIORITY_HEURISTIC),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &ParseContext) -> ParseResult<'a> {
        let text = match std::str::from_utf8(data) {
            Ok(text) => text,
            Err(_) => {
                return ParseResult::error(
                    DecodeError::Malformed {
                        protocol: "http",
                        field: "message",
                        reason: "not valid UTF-8".to_string(),
                    },
                    data,
                )
            }
        };

        let mut lines = text.split("\r\n");
        let first_line = lines.next().unwrap_or("");

        // A reply starts with its protocol version; anything else is read
        // as a request line
        let is_reply = first_line.starts_with("HTTP/");

        let mut parts = first_line.splitn(3, ' ');
        let (Some(first), Some(second), Some(third)) = (parts.next(), parts.next(), parts.next())
        else {
            return ParseResult::error(
                DecodeError::Malformed {
                    protocol: "http",
                    field: "start_line",
                    reason: format!("expected three tokens in {first_line:?}"),
                },
                data,
            );
        };

        let mut fields = SmallVec::new();
        if is_reply {
            fields.push(("kind", FieldValue::Str("reply")));
            fields.push(("version", FieldValue::Str(first)));
            fields.push(("status_code", FieldValue::Str(second)));
            fields.push(("reason", FieldValue::Str(third)));
        } else {
            fields.push(("kind", FieldValue::Str("request")));
            fields.push(("method", FieldValue::Str(first)));
            fields.push(("path", FieldValue::Str(second)));
            fields.push(("version", FieldValue::Str(third)));
        }

        // Headers run to the first blank line
        for line in lines {
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            for (header, field_name) in EXTRACTED_HEADERS {
                if name == header {
                    fields.push((field_name, FieldValue::Str(value.trim())));
                }
            }
        }

        // The body is not decoded further
        ParseResult::success(fields, &[], SmallVec::new())
    }
}
