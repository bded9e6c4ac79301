use crate::enrichment::tls as tls_enrichment;
use crate::error::{ProbeError, Result};
use crate::handlers::context::HandlerContext;
use crate::parsers::http as http_parser;
use common::{HttpOptions, HttpResult, ResultEnvelope, Timings};
use std::net::IpAddr;
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Response bodies beyond this are dropped, not buffered; the connection is
/// still drained to completion rather than aborted.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub async fn run(
    ctx: &HandlerContext,
    target: &str,
    resolved: IpAddr,
    opts: &HttpOptions,
) -> Result<HttpResult> {
    let port = opts.port.unwrap_or(if opts.protocol == "http" { 80 } else { 443 });
    let host = opts.host.clone().unwrap_or_else(|| target.to_string());

    let started = Instant::now();
    let connect_start = Instant::now();
    let raw_stream = tokio::time::timeout(
        ctx.tool_timeout,
        TcpStream::connect((resolved, port)),
    )
    .await
    .map_err(|_| ProbeError::network("connect timed out", "ETIMEDOUT"))?
    .map_err(ProbeError::network_io)?;
    let connect_ms = connect_start.elapsed().as_secs_f64() * 1000.0;

    let tls = if opts.protocol != "http" {
        tls_enrichment::probe(&host, port).await
    } else {
        None
    };

    let tls_start = Instant::now();
    let (mut stream, tls_ms): (Box<dyn AsyncReadWriteUnpin>, Option<f64>) = if opts.protocol != "http" {
        let connector = tokio_native_tls::TlsConnector::from(native_tls::TlsConnector::builder().build()
            .map_err(|e| ProbeError::network(e.to_string(), "ETLS"))?);
        let tls_stream = connector
            .connect(&host, raw_stream)
            .await
            .map_err(|e| ProbeError::network(e.to_string(), "ETLS"))?;
        (Box::new(tls_stream), Some(tls_start.elapsed().as_secs_f64() * 1000.0))
    } else {
        (Box::new(raw_stream), None)
    };

    let path = match &opts.query {
        Some(q) => format!("{}?{}", opts.path, q),
        None => opts.path.clone(),
    };
    let mut request = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n",
        opts.method, path, host
    );
    for (name, value) in &opts.headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");

    stream
        .write_all(request.as_bytes())
        .await
        .map_err(ProbeError::network_io)?;

    let first_byte_start = Instant::now();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut first_byte_ms = None;
    loop {
        let n = tokio::time::timeout(ctx.tool_timeout, stream.read(&mut chunk))
            .await
            .map_err(|_| ProbeError::network("read timed out", "ETIMEDOUT"))?
            .map_err(ProbeError::network_io)?;
        if n == 0 {
            break;
        }
        if first_byte_ms.is_none() {
            first_byte_ms = Some(first_byte_start.elapsed().as_secs_f64() * 1000.0);
        }
        buf.extend_from_slice(&chunk[..n]);

        if opts.method != "HEAD" {
            let body_so_far = split_body(&buf).map(|(_, body)| body.len()).unwrap_or(0);
            if body_so_far <= MAX_BODY_BYTES {
                ctx.emit_progress(
                    false,
                    ResultEnvelope::Http(partial_result(&buf, resolved, started, connect_ms, tls_ms, first_byte_ms, opts, None)),
                );
            }
        }
    }

    let parsed = split_response(&buf).ok_or_else(|| ProbeError::ParseError {
        tool: "http",
        reason: "malformed response status line".to_string(),
    })?;

    let (raw_headers, headers) = http_parser::build_headers(&parsed.headers);

    let truncated = parsed.body.len() > MAX_BODY_BYTES;
    let capped = &parsed.body[..parsed.body.len().min(MAX_BODY_BYTES)];
    let body_text = String::from_utf8_lossy(capped).to_string();

    let is_bodyless = matches!(opts.method.as_str(), "HEAD" | "OPTIONS");
    let raw_output = if is_bodyless {
        format!("{} {}\n{raw_headers}", parsed.version, parsed.status_code)
    } else {
        body_text.clone()
    };

    Ok(HttpResult {
        status: "finished".to_string(),
        raw_output,
        raw_headers,
        raw_body: if is_bodyless { Some(String::new()) } else { Some(body_text) },
        resolved_address: resolved.to_string(),
        status_code: Some(parsed.status_code),
        headers,
        timings: Timings {
            dns_ms: None,
            connect_ms: Some(connect_ms),
            tls_ms,
            first_byte_ms,
            total_ms: started.elapsed().as_secs_f64() * 1000.0,
        },
        tls,
        truncated,
    })
}

fn partial_result(
    buf: &[u8],
    resolved: IpAddr,
    started: Instant,
    connect_ms: f64,
    tls_ms: Option<f64>,
    first_byte_ms: Option<f64>,
    opts: &HttpOptions,
    tls: Option<common::TlsCertificateView>,
) -> HttpResult {
    let parsed = split_response(buf).unwrap_or_default();
    let (raw_headers, headers) = http_parser::build_headers(&parsed.headers);
    let capped = &parsed.body[..parsed.body.len().min(MAX_BODY_BYTES)];
    let body_text = String::from_utf8_lossy(capped).to_string();
    let is_bodyless = matches!(opts.method.as_str(), "HEAD" | "OPTIONS");
    let raw_output = if is_bodyless {
        format!("{} {}\n{raw_headers}", parsed.version, parsed.status_code)
    } else {
        body_text.clone()
    };

    HttpResult {
        status: "in-progress".to_string(),
        raw_output,
        raw_headers,
        raw_body: if is_bodyless { Some(String::new()) } else { Some(body_text) },
        resolved_address: resolved.to_string(),
        status_code: if parsed.status_code == 0 { None } else { Some(parsed.status_code) },
        headers,
        timings: Timings {
            dns_ms: None,
            connect_ms: Some(connect_ms),
            tls_ms,
            first_byte_ms,
            total_ms: started.elapsed().as_secs_f64() * 1000.0,
        },
        tls,
        truncated: parsed.body.len() > MAX_BODY_BYTES,
    }
}

fn split_body(buf: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
    let idx = find_header_end(buf)?;
    Some((buf[..idx].to_vec(), buf[idx..].to_vec()))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

#[derive(Default)]
struct ParsedResponse {
    version: String,
    status_code: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

fn split_response(buf: &[u8]) -> Option<ParsedResponse> {
    let header_end = find_header_end(buf)?;
    let header_text = String::from_utf8_lossy(&buf[..header_end]);
    let mut lines = header_text.split("\r\n");
    let status_line = lines.next()?;
    let mut status_parts = status_line.split_whitespace();
    let version = status_parts.next()?.to_string();
    let status_code: u16 = status_parts.next()?.parse().ok()?;

    let headers = lines
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':').map(|(n, v)| (n.trim().to_string(), v.trim().to_string())))
        .collect();

    Some(ParsedResponse {
        version,
        status_code,
        headers,
        body: buf[header_end..].to_vec(),
    })
}

trait AsyncReadWriteUnpin: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send {}
impl<T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send> AsyncReadWriteUnpin for T {}
