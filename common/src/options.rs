use serde::{Deserialize, Serialize};

/// A measurement request as it arrives over the control channel. The
/// `measurement` field is kept as raw JSON plus a `type` discriminant so
/// validation failures can name the offending field instead of surfacing
/// an opaque serde error at the edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRequest {
    pub measurement_id: String,
    pub test_id: String,
    pub measurement: MeasurementOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    #[serde(default)]
    pub in_progress_updates: bool,
    /// Per-kind fields, kept untyped until `core::validate` normalizes them.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DnsOptions {
    #[serde(default = "default_query_type")]
    pub query_type: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_dns_port")]
    pub port: u16,
    pub resolver: Option<String>,
    #[serde(default)]
    pub trace: bool,
}

fn default_query_type() -> String {
    "A".to_string()
}

fn default_protocol() -> String {
    "udp".to_string()
}

fn default_dns_port() -> u16 {
    53
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PingOptions {
    #[serde(default = "default_packets")]
    pub packets: u32,
    #[serde(default)]
    pub ip_version: Option<u8>,
}

fn default_packets() -> u32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TracerouteOptions {
    #[serde(default = "default_traceroute_protocol")]
    pub protocol: String,
    pub port: Option<u16>,
    #[serde(default)]
    pub ip_version: Option<u8>,
}

fn default_traceroute_protocol() -> String {
    "icmp".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MtrOptions {
    #[serde(default = "default_traceroute_protocol")]
    pub protocol: String,
    pub port: Option<u16>,
    #[serde(default = "default_packets")]
    pub packets: u32,
    #[serde(default)]
    pub ip_version: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HttpOptions {
    #[serde(default = "default_http_method")]
    pub method: String,
    #[serde(default = "default_http_protocol")]
    pub protocol: String,
    pub port: Option<u16>,
    #[serde(default = "default_http_path")]
    pub path: String,
    pub query: Option<String>,
    pub host: Option<String>,
    #[serde(default)]
    pub headers: std::collections::BTreeMap<String, String>,
    pub resolver: Option<String>,
    #[serde(default)]
    pub ip_version: Option<u8>,
}

fn default_http_method() -> String {
    "GET".to_string()
}

fn default_http_protocol() -> String {
    "https".to_string()
}

fn default_http_path() -> String {
    "/".to_string()
}
