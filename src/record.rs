//! Frame records emitted for decoded traffic.
//!
//! A [`FrameRecord`] is the owned, display-ready form of one decoded
//! frame: one entry per layer in decode order, rendered as JSON with the
//! layer order preserved.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::protocol::{parse_packet, FieldValue, ProtocolRegistry};

/// One decoded layer of a frame record.
#[derive(Debug, Clone)]
pub struct LayerRecord {
    /// Layer name as emitted (e.g., "IPv4", "DNS", "unknown").
    pub name: &'static str,

    /// Field values in decode order.
    pub fields: Vec<(&'static str, Value)>,

    /// Error text when this layer failed or only partially decoded.
    pub error: Option<String>,
}

/// An owned record of one captured frame.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    /// Capture timestamp.
    pub timestamp: DateTime<Utc>,

    /// Interface the frame was captured on.
    pub interface: String,

    /// Frame length on the wire.
    pub length: usize,

    /// Decoded layers, outermost first.
    pub layers: Vec<LayerRecord>,
}

impl FrameRecord {
    /// Decode `frame` and build its record.
    pub fn decode(
        registry: &ProtocolRegistry,
        link_type: u16,
        interface: &str,
        frame: &[u8],
    ) -> Self {
        let layers = parse_packet(registry, link_type, frame)
            .into_iter()
            .map(|layer| LayerRecord {
                name: layer.name,
                fields: layer
                    .result
                    .fields
                    .iter()
                    .map(|(name, value)| (*name, render(value)))
                    .collect(),
                error: layer.result.error.as_ref().map(|e| e.to_string()),
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            interface: interface.to_string(),
            layers,
            length: frame.len(),
        }
    }

    /// Whether any layer failed to decode.
    pub fn has_error(&self) -> bool {
        self.layers.iter().any(|l| l.error.is_some())
    }

    /// Render as a single JSON object, layers keyed by name in decode
    /// order.
    pub fn to_json(&self) -> Value {
        let mut layers = Map::new();
        for layer in &self.layers {
            let mut fields = Map::new();
            for (name, value) in &layer.fields {
                fields.insert((*name).to_string(), value.clone());
            }
            if let Some(error) = &layer.error {
                fields.insert("error".to_string(), json!(error));
            }
            layers.insert(layer.name.to_string(), Value::Object(fields));
        }

        json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "interface": self.interface,
            "length": self.length,
            "layers": Value::Object(layers),
        })
    }
}

/// Render a field value as JSON, keeping numbers and booleans typed.
fn render(value: &FieldValue<'_>) -> Value {
    match value {
        FieldValue::UInt8(v) => json!(v),
        FieldValue::UInt16(v) => json!(v),
        FieldValue::UInt32(v) => json!(v),
        FieldValue::Bool(v) => json!(v),
        FieldValue::List(items) => Value::Array(items.iter().map(render).collect()),
        FieldValue::Null => Value::Null,
        other => json!(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{default_registry, ethertype, ip_protocol, LINKTYPE_ETHERNET};

    fn dns_query_frame() -> Vec<u8> {
        let mut dns = Vec::new();
        dns.extend_from_slice(&0x1234u16.to_be_bytes());
        dns.extend_from_slice(&0x0100u16.to_be_bytes());
        dns.extend_from_slice(&[0, 1, 0, 0, 0, 0, 0, 0]);
        dns.extend_from_slice(&[1, b'x', 0]); // "x"
        dns.extend_from_slice(&[0, 1, 0, 1]);

        let mut udp = Vec::new();
        udp.extend_from_slice(&5353u16.to_be_bytes());
        udp.extend_from_slice(&53u16.to_be_bytes());
        udp.extend_from_slice(&((8 + dns.len()) as u16).to_be_bytes());
        udp.extend_from_slice(&[0, 0]);
        udp.extend_from_slice(&dns);

        let mut ip = Vec::new();
        ip.push(0x45);
        ip.push(0x00);
        ip.extend_from_slice(&((20 + udp.len()) as u16).to_be_bytes());
        ip.extend_from_slice(&[0, 0, 0x40, 0]);
        ip.push(64);
        ip.push(ip_protocol::UDP);
        ip.extend_from_slice(&[0, 0]);
        ip.extend_from_slice(&[10, 0, 0, 1]);
        ip.extend_from_slice(&[10, 0, 0, 2]);
        ip.extend_from_slice(&udp);

        let mut frame = Vec::new();
        frame.extend_from_slice(&[0xff; 6]);
        frame.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        frame.extend_from_slice(&ethertype::IPV4.to_be_bytes());
        frame.extend_from_slice(&ip);
        frame
    }

    #[test]
    fn test_record_layers_in_decode_order() {
        let frame = dns_query_frame();
        let registry = default_registry();

        let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &frame);

        let names: Vec<_> = record.layers.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["ethernet", "IPv4", "UDP", "DNS"]);
        assert!(!record.has_error());
        assert_eq!(record.length, frame.len());
        assert_eq!(record.interface, "eth0");
    }

    #[test]
    fn test_record_json_shape() {
        let frame = dns_query_frame();
        let registry = default_registry();

        let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &frame);
        let value = record.to_json();

        assert_eq!(value["interface"], "eth0");
        assert_eq!(value["length"], frame.len());
        // preserve_order keeps layers in decode order
        let layers = value["layers"].as_object().unwrap();
        let keys: Vec<_> = layers.keys().collect();
        assert_eq!(keys, vec!["ethernet", "IPv4", "UDP", "DNS"]);

        assert_eq!(value["layers"]["UDP"]["destination_port"], 53);
        assert_eq!(value["layers"]["DNS"]["query_name"], "x");
        assert_eq!(
            value["layers"]["ethernet"]["source_mac"],
            "00:11:22:33:44:55"
        );
    }

    #[test]
    fn test_record_json_error_entry() {
        // Ethernet carrying 10 bytes of IPv4
        let mut frame = Vec::new();
        frame.extend_from_slice(&[0xff; 6]);
        frame.extend_from_slice(&[0x00; 6]);
        frame.extend_from_slice(&ethertype::IPV4.to_be_bytes());
        frame.extend_from_slice(&[0x45, 0, 0, 28, 0, 0, 0x40, 0, 64, 6]);

        let registry = default_registry();
        let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &frame);

        assert!(record.has_error());
        let value = record.to_json();
        let ipv4 = value["layers"]["IPv4"].as_object().unwrap();
        assert!(ipv4.contains_key("error"));
        // The Ethernet layer decoded cleanly
        let eth = value["layers"]["ethernet"].as_object().unwrap();
        assert!(!eth.contains_key("error"));
    }

    #[test]
    fn test_record_timestamp_is_rfc3339() {
        let registry = default_registry();
        let record = FrameRecord::decode(&registry, LINKTYPE_ETHERNET, "eth0", &[]);

        let value = record.to_json();
        let ts = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
