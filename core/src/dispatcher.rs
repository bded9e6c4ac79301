//! Maps a measurement kind to its handler and guarantees exactly one
//! terminal result per request, even when the handler itself fails or the
//! kind is unrecognized.

use crate::error::ProbeError;
use crate::handlers::{
    context::HandlerContext, DnsHandler, HttpHandler, MeasurementHandler, MtrHandler, PingHandler,
    TracerouteHandler,
};
use common::{MeasurementOptions, ResultEnvelope};
use std::collections::HashMap;

pub struct Dispatcher {
    handlers: HashMap<&'static str, Box<dyn MeasurementHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn MeasurementHandler>> = HashMap::new();
        handlers.insert("dns", Box::new(DnsHandler));
        handlers.insert("ping", Box::new(PingHandler));
        handlers.insert("traceroute", Box::new(TracerouteHandler));
        handlers.insert("mtr", Box::new(MtrHandler));
        handlers.insert("http", Box::new(HttpHandler));
        Self { handlers }
    }

    /// Runs one measurement to completion. Never returns `Err` — any
    /// failure, including an unknown kind, is converted into a terminal
    /// error result so the caller always has exactly one thing to report.
    pub async fn dispatch(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> ResultEnvelope {
        let Some(handler) = self.handlers.get(opts.kind.as_str()) else {
            tracing::warn!(kind = %opts.kind, "no handler registered for measurement kind");
            return terminal_error_result(
                &opts.kind,
                &ProbeError::InvalidOptions {
                    field: "type".to_string(),
                    reason: format!("unknown measurement kind `{}`", opts.kind),
                },
            );
        };

        if let Err(e) = handler.validate(opts).await {
            tracing::info!(kind = %opts.kind, error = %e, "validation failed, no network activity performed");
            return terminal_error_result(&opts.kind, &e);
        }

        match handler.run(ctx, opts).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(kind = %opts.kind, error = %e, "measurement failed");
                terminal_error_result(&opts.kind, &e)
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn terminal_error_result(kind: &str, err: &ProbeError) -> ResultEnvelope {
    let status = "failed".to_string();
    let raw_output = match err {
        ProbeError::NetworkFailure { message, code } => format!("{message} - {code}"),
        other => other.to_string(),
    };

    match kind {
        "dns" => ResultEnvelope::Dns(common::DnsResult {
            status,
            raw_output,
            resolver: String::new(),
            answers: Vec::new(),
            stats_time_ms: None,
        }),
        "ping" => ResultEnvelope::Ping(common::PingResult {
            status,
            raw_output,
            resolved_address: String::new(),
            resolved_hostname: None,
            stats: common::PingStats::default(),
            timings: Vec::new(),
        }),
        "mtr" => ResultEnvelope::Mtr(common::TracerouteResult {
            status,
            raw_output,
            resolved_address: String::new(),
            hops: Vec::new(),
        }),
        "http" => ResultEnvelope::Http(common::HttpResult {
            status,
            raw_output,
            raw_headers: String::new(),
            raw_body: None,
            resolved_address: String::new(),
            status_code: None,
            headers: Default::default(),
            timings: common::Timings {
                dns_ms: None,
                connect_ms: None,
                tls_ms: None,
                first_byte_ms: None,
                total_ms: 0.0,
            },
            tls: None,
            truncated: false,
        }),
        _ => ResultEnvelope::Traceroute(common::TracerouteResult {
            status,
            raw_output,
            resolved_address: String::new(),
            hops: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn ctx() -> (HandlerContext, mpsc::UnboundedReceiver<crate::handlers::ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (HandlerContext::new(tx, std::time::Duration::from_secs(5)), rx)
    }

    fn opts(kind: &str, target: &str, fields: serde_json::Value) -> MeasurementOptions {
        MeasurementOptions {
            kind: kind.to_string(),
            target: target.to_string(),
            in_progress_updates: false,
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn unknown_kind_produces_a_terminal_invalid_options_result() {
        let dispatcher = Dispatcher::new();
        let (ctx, _rx) = ctx();
        let result = dispatcher
            .dispatch(&ctx, &opts("carrier-pigeon", "example.com", serde_json::json!({})))
            .await;
        match result {
            ResultEnvelope::Traceroute(r) => assert_eq!(r.status, "failed"),
            other => panic!("expected fallback traceroute-shaped result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_http_method_never_touches_the_network() {
        let dispatcher = Dispatcher::new();
        let (ctx, _rx) = ctx();
        let result = dispatcher
            .dispatch(&ctx, &opts("http", "example.com", serde_json::json!({"method": "POST"})))
            .await;
        match result {
            ResultEnvelope::Http(r) => {
                assert_eq!(r.status, "failed");
                assert!(r.raw_output.contains("method"));
            }
            other => panic!("expected http-shaped failure result, got {other:?}"),
        }
    }

    #[test]
    fn network_failure_raw_output_has_no_prefix() {
        let err = ProbeError::network("ENODATA google.com", "abc");
        let result = terminal_error_result("http", &err);
        match result {
            ResultEnvelope::Http(r) => assert_eq!(r.raw_output, "ENODATA google.com - abc"),
            other => panic!("expected http-shaped result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn private_destination_is_rejected_before_mtr_runs() {
        let dispatcher = Dispatcher::new();
        let (ctx, _rx) = ctx();
        let result = dispatcher
            .dispatch(&ctx, &opts("mtr", "192.168.1.1", serde_json::json!({})))
            .await;
        match result {
            ResultEnvelope::Mtr(r) => {
                assert_eq!(r.status, "failed");
                assert_eq!(r.raw_output, "Private IP ranges are not allowed");
            }
            other => panic!("expected mtr-shaped failure result, got {other:?}"),
        }
    }
}
