use crate::enrichment::{asn, hops as hop_enrichment};
use crate::error::{ProbeError, Result};
use crate::handlers::child_guard::ChildGuard;
use crate::handlers::context::HandlerContext;
use crate::parsers::mtr::MtrAccumulator;
use common::{MtrOptions, ResultEnvelope, TracerouteResult};
use std::net::IpAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

pub async fn run(
    ctx: &HandlerContext,
    target: &str,
    resolved: IpAddr,
    opts: &MtrOptions,
) -> Result<TracerouteResult> {
    let mut cmd = Command::new("mtr");
    cmd.arg("--raw");
    cmd.arg(if resolved.is_ipv6() { "-6" } else { "-4" });
    cmd.arg("-c").arg(opts.packets.to_string());
    match opts.protocol.as_str() {
        "tcp" => {
            cmd.arg("-T");
        }
        "udp" => {
            cmd.arg("-u");
        }
        _ => {}
    }
    if let Some(port) = opts.port {
        cmd.arg("-P").arg(port.to_string());
    }
    cmd.arg(target);
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    tracing::debug!(target, protocol = %opts.protocol, packets = opts.packets, "running mtr");

    let mut child = ChildGuard(cmd.spawn()?);
    let stdout = child.0.stdout.take().expect("piped stdout");
    let mut lines = BufReader::new(stdout).lines();

    let mut acc = MtrAccumulator::new(opts.packets);
    let mut raw = String::new();

    let read_loop = async {
        while let Some(line) = lines.next_line().await.map_err(ProbeError::Io)? {
            raw.push_str(&line);
            raw.push('\n');
            acc.feed_line(&line);
            ctx.emit_progress(
                true,
                ResultEnvelope::Mtr(TracerouteResult {
                    status: "in-progress".to_string(),
                    raw_output: raw.clone(),
                    resolved_address: resolved.to_string(),
                    hops: acc.hops(),
                }),
            );
        }
        Ok::<(), ProbeError>(())
    };

    tokio::time::timeout(ctx.tool_timeout, read_loop)
        .await
        .map_err(|_| ProbeError::ToolProcessFailure {
            tool: "mtr",
            status: -1,
            stderr: "timed out".to_string(),
        })??;

    let status = child.0.wait().await?;
    let mut hops = acc.hops();
    if !status.success() && hops.is_empty() {
        return Err(ProbeError::ToolProcessFailure {
            tool: "mtr",
            status: status.code().unwrap_or(-1),
            stderr: String::new(),
        });
    }

    let resolver = asn::default_resolver();
    hop_enrichment::enrich(&mut hops, &resolver).await;

    Ok(TracerouteResult {
        status: "finished".to_string(),
        raw_output: raw,
        resolved_address: resolved.to_string(),
        hops,
    })
}
