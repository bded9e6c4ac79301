//! Per-kind option validation. Each function takes the raw options bundle
//! and returns either the normalized struct or a `ProbeError::InvalidOptions`
//! naming the offending field.

use crate::error::{ProbeError, Result};
use common::{DnsOptions, HttpOptions, MeasurementOptions, MtrOptions, PingOptions, TracerouteOptions};

fn invalid(field: &str, reason: &str) -> ProbeError {
    ProbeError::InvalidOptions {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(opts: &MeasurementOptions, kind: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(opts.fields.clone()))
        .map_err(|e| invalid(kind, &e.to_string()))
}

const VALID_DNS_TYPES: &[&str] = &[
    "A", "AAAA", "ANY", "CNAME", "DNSKEY", "DS", "MX", "NS", "NSEC", "NSEC3", "PTR", "RRSIG",
    "SOA", "TXT", "SRV",
];

pub fn validate_dns(opts: &MeasurementOptions) -> Result<DnsOptions> {
    let mut dns: DnsOptions = decode(opts, "dns")?;
    dns.protocol = dns.protocol.to_ascii_lowercase();
    if !VALID_DNS_TYPES.contains(&dns.query_type.as_str()) {
        return Err(invalid("queryType", &format!("unsupported record type {}", dns.query_type)));
    }
    if !matches!(dns.protocol.as_str(), "udp" | "tcp") {
        return Err(invalid("protocol", "must be udp or tcp"));
    }
    if dns.port == 0 {
        return Err(invalid("port", "must be nonzero"));
    }
    Ok(dns)
}

pub fn validate_ping(opts: &MeasurementOptions) -> Result<PingOptions> {
    let ping: PingOptions = decode(opts, "ping")?;
    if ping.packets == 0 || ping.packets > 16 {
        return Err(invalid("packets", "must be between 1 and 16"));
    }
    Ok(ping)
}

pub fn validate_traceroute(opts: &MeasurementOptions) -> Result<TracerouteOptions> {
    let mut tr: TracerouteOptions = decode(opts, "traceroute")?;
    tr.protocol = tr.protocol.to_ascii_lowercase();
    if !matches!(tr.protocol.as_str(), "icmp" | "tcp" | "udp") {
        return Err(invalid("protocol", "must be icmp, tcp, or udp"));
    }
    Ok(tr)
}

pub fn validate_mtr(opts: &MeasurementOptions) -> Result<MtrOptions> {
    let mut mtr: MtrOptions = decode(opts, "mtr")?;
    mtr.protocol = mtr.protocol.to_ascii_lowercase();
    if !matches!(mtr.protocol.as_str(), "icmp" | "tcp" | "udp") {
        return Err(invalid("protocol", "must be icmp, tcp, or udp"));
    }
    if mtr.packets == 0 || mtr.packets > 16 {
        return Err(invalid("packets", "must be between 1 and 16"));
    }
    Ok(mtr)
}

const ALLOWED_METHODS: &[&str] = &["GET", "HEAD", "OPTIONS"];

pub fn validate_http(opts: &MeasurementOptions) -> Result<HttpOptions> {
    let mut http: HttpOptions = decode(opts, "http")?;
    http.method = http.method.to_ascii_uppercase();
    http.protocol = http.protocol.to_ascii_lowercase();
    if !ALLOWED_METHODS.contains(&http.method.as_str()) {
        return Err(invalid("method", "must be GET, HEAD, or OPTIONS"));
    }
    if !matches!(http.protocol.as_str(), "http" | "https" | "http2") {
        return Err(invalid("protocol", "must be http, https, or http2"));
    }
    if !http.path.starts_with('/') {
        return Err(invalid("path", "must start with /"));
    }
    Ok(http)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts(kind: &str, target: &str, fields: serde_json::Value) -> MeasurementOptions {
        MeasurementOptions {
            kind: kind.to_string(),
            target: target.to_string(),
            in_progress_updates: false,
            fields: fields.as_object().unwrap().clone(),
        }
    }

    #[test]
    fn http_rejects_post() {
        let o = opts("http", "example.com", json!({"method": "POST"}));
        let err = validate_http(&o).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidOptions { field, .. } if field == "method"));
    }

    #[test]
    fn http_head_is_allowed() {
        let o = opts("http", "example.com", json!({"method": "HEAD"}));
        assert_eq!(validate_http(&o).unwrap().method, "HEAD");
    }

    #[test]
    fn http_lowercase_methods_are_normalized_and_accepted() {
        let o = opts("http", "example.com", json!({"method": "get"}));
        assert_eq!(validate_http(&o).unwrap().method, "GET");
        let o = opts("http", "example.com", json!({"method": "head"}));
        assert_eq!(validate_http(&o).unwrap().method, "HEAD");
    }

    #[test]
    fn traceroute_uppercase_protocol_is_normalized_and_accepted() {
        let o = opts("traceroute", "example.com", json!({"protocol": "TCP"}));
        assert_eq!(validate_traceroute(&o).unwrap().protocol, "tcp");
    }

    #[test]
    fn mtr_uppercase_protocol_is_normalized_and_accepted() {
        let o = opts("mtr", "example.com", json!({"protocol": "ICMP"}));
        assert_eq!(validate_mtr(&o).unwrap().protocol, "icmp");
    }

    #[test]
    fn dns_rejects_unknown_query_type() {
        let o = opts("dns", "example.com", json!({"queryType": "BOGUS"}));
        let err = validate_dns(&o).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidOptions { field, .. } if field == "queryType"));
    }

    #[test]
    fn mtr_rejects_zero_packets() {
        let o = opts("mtr", "example.com", json!({"packets": 0}));
        let err = validate_mtr(&o).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidOptions { field, .. } if field == "packets"));
    }
}
