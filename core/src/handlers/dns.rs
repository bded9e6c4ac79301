use crate::error::{ProbeError, Result};
use crate::handlers::child_guard::ChildGuard;
use crate::handlers::context::HandlerContext;
use crate::parsers::dns as dns_parser;
use common::{DnsOptions, DnsResult};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

pub async fn run(ctx: &HandlerContext, target: &str, opts: &DnsOptions) -> Result<DnsResult> {
    let mut cmd = Command::new("dig");
    cmd.arg("+tries=2").arg("+time=3");
    cmd.arg("-t").arg(&opts.query_type);
    if let Some(resolver) = &opts.resolver {
        cmd.arg(format!("@{resolver}"));
    }
    cmd.arg("-p").arg(opts.port.to_string());
    if opts.trace {
        cmd.arg("+trace");
    }
    if opts.protocol == "tcp" {
        cmd.arg("+tcp");
    }
    cmd.arg(target);
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    tracing::debug!(target, query_type = %opts.query_type, "running dig");

    let mut child = ChildGuard(cmd.spawn()?);
    let mut stdout = child.0.stdout.take().expect("piped stdout");
    let mut raw = String::new();
    stdout.read_to_string(&mut raw).await?;

    let status = tokio::time::timeout(ctx.tool_timeout, child.0.wait())
        .await
        .map_err(|_| ProbeError::ToolProcessFailure {
            tool: "dig",
            status: -1,
            stderr: "timed out".to_string(),
        })??;

    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut err) = child.0.stderr.take() {
            let _ = err.read_to_string(&mut stderr).await;
        }
        return Err(ProbeError::ToolProcessFailure {
            tool: "dig",
            status: status.code().unwrap_or(-1),
            stderr,
        });
    }

    let parsed = dns_parser::parse(&raw);
    Ok(DnsResult {
        status: "finished".to_string(),
        raw_output: raw,
        resolver: parsed.resolver.unwrap_or_default(),
        answers: parsed.answers,
        stats_time_ms: parsed.query_time_ms,
    })
}
