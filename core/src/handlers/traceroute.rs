use crate::enrichment::{asn, hops as hop_enrichment};
use crate::error::{ProbeError, Result};
use crate::handlers::child_guard::ChildGuard;
use crate::handlers::context::HandlerContext;
use crate::parsers::traceroute as traceroute_parser;
use common::{Hop, TracerouteOptions, TracerouteResult};
use std::net::IpAddr;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

pub async fn run(
    ctx: &HandlerContext,
    target: &str,
    resolved: IpAddr,
    opts: &TracerouteOptions,
) -> Result<TracerouteResult> {
    let mut cmd = Command::new("traceroute");
    match opts.protocol.as_str() {
        "tcp" => {
            cmd.arg("-T");
        }
        "udp" => {} // default traceroute behavior
        _ => {
            cmd.arg("-I");
        }
    }
    if let Some(port) = opts.port {
        cmd.arg("-p").arg(port.to_string());
    }
    cmd.arg(if resolved.is_ipv6() { "-6" } else { "-4" });
    cmd.arg(target);
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    tracing::debug!(target, protocol = %opts.protocol, "running traceroute");

    let mut child = ChildGuard(cmd.spawn()?);
    let mut stdout = child.0.stdout.take().expect("piped stdout");
    let mut raw = String::new();
    stdout.read_to_string(&mut raw).await?;

    let status = tokio::time::timeout(ctx.tool_timeout, child.0.wait())
        .await
        .map_err(|_| ProbeError::ToolProcessFailure {
            tool: "traceroute",
            status: -1,
            stderr: "timed out".to_string(),
        })??;

    if !status.success() && raw.trim().is_empty() {
        let mut stderr = String::new();
        if let Some(mut err) = child.0.stderr.take() {
            let _ = err.read_to_string(&mut stderr).await;
        }
        return Err(ProbeError::ToolProcessFailure {
            tool: "traceroute",
            status: status.code().unwrap_or(-1),
            stderr,
        });
    }

    let mut hops: Vec<Hop> = traceroute_parser::parse(&raw);
    let resolver = asn::default_resolver();
    hop_enrichment::enrich(&mut hops, &resolver).await;

    Ok(TracerouteResult {
        status: "finished".to_string(),
        raw_output: raw,
        resolved_address: resolved.to_string(),
        hops,
    })
}
