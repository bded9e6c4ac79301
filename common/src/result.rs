use serde::{Deserialize, Serialize};

/// A single traceroute/MTR hop. `resolved_address` is `""` rather than a
/// sentinel string when the final hop never answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hop {
    pub resolved_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asn: Vec<u32>,
    pub rtt: Vec<f64>,
    pub stats: HopStats,
    pub duplicate: bool,
}

/// Per-hop RTT summary. `loss` is a percentage in `[0, 100]`; `count` is the
/// number of probes that actually came back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HopStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub st_dev: Option<f64>,
    pub j_avg: Option<f64>,
    pub loss: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsCertificateView {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_error: Option<String>,
    pub subject: String,
    pub issuer: String,
    pub created_at: String,
    pub expires_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_alt_name: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_byte_ms: Option<f64>,
    pub total_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsResult {
    pub status: String,
    pub raw_output: String,
    pub resolver: String,
    pub answers: Vec<DnsAnswer>,
    pub stats_time_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsAnswer {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub class: String,
    pub value: DnsValue,
}

/// Most record types carry a flat text value; a few (currently `MX`) carry
/// a structured shape instead. Untagged so both serialize as whatever the
/// record type dictates rather than a wrapper object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DnsValue {
    Text(String),
    Mx { priority: u32, server: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    pub status: String,
    pub raw_output: String,
    pub resolved_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_hostname: Option<String>,
    pub stats: PingStats,
    pub timings: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub total: u32,
    pub loss: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerouteResult {
    pub status: String,
    pub raw_output: String,
    pub resolved_address: String,
    pub hops: Vec<Hop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResult {
    pub status: String,
    pub raw_output: String,
    pub raw_headers: String,
    pub raw_body: Option<String>,
    pub resolved_address: String,
    pub status_code: Option<u16>,
    pub headers: std::collections::BTreeMap<String, String>,
    pub timings: Timings,
    pub tls: Option<TlsCertificateView>,
    pub truncated: bool,
}

/// The terminal or progress payload sent back over the control channel.
/// `overwrite` distinguishes a replace-in-place update (e.g. the MTR hop
/// table) from an append (e.g. streamed HTTP body bytes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultEnvelope {
    Dns(DnsResult),
    Ping(PingResult),
    Traceroute(TracerouteResult),
    Mtr(TracerouteResult),
    Http(HttpResult),
}
