use crate::enrichment::{asn, rdns};
use crate::error::{ProbeError, Result};
use crate::handlers::child_guard::ChildGuard;
use crate::handlers::context::HandlerContext;
use crate::net::is_private;
use crate::parsers::ping as ping_parser;
use common::{PingOptions, PingResult};
use std::net::IpAddr;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

pub async fn run(
    ctx: &HandlerContext,
    target: &str,
    resolved: IpAddr,
    opts: &PingOptions,
) -> Result<PingResult> {
    let mut cmd = Command::new("ping");
    cmd.arg("-c").arg(opts.packets.to_string());
    if resolved.is_ipv6() {
        cmd.arg("-6");
    } else {
        cmd.arg("-4");
    }
    cmd.arg(target);
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    tracing::debug!(target, packets = opts.packets, "running ping");

    let mut child = ChildGuard(cmd.spawn()?);
    let mut stdout = child.0.stdout.take().expect("piped stdout");
    let mut raw = String::new();
    stdout.read_to_string(&mut raw).await?;

    let status = tokio::time::timeout(ctx.tool_timeout, child.0.wait())
        .await
        .map_err(|_| ProbeError::ToolProcessFailure {
            tool: "ping",
            status: -1,
            stderr: "timed out".to_string(),
        })??;

    if !status.success() && raw.trim().is_empty() {
        let mut stderr = String::new();
        if let Some(mut err) = child.0.stderr.take() {
            let _ = err.read_to_string(&mut stderr).await;
        }
        return Err(ProbeError::ToolProcessFailure {
            tool: "ping",
            status: status.code().unwrap_or(-1),
            stderr,
        });
    }

    let parsed = ping_parser::parse(&raw);
    let resolved_hostname = if is_private(&resolved) {
        None
    } else {
        rdns::reverse_lookup(&asn::default_resolver(), resolved).await
    };

    Ok(PingResult {
        status: "finished".to_string(),
        raw_output: raw,
        resolved_address: resolved.to_string(),
        resolved_hostname,
        stats: parsed.stats,
        timings: parsed.timings,
    })
}
