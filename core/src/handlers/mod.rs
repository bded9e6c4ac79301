pub mod child_guard;
pub mod context;
pub mod dns;
pub mod http;
pub mod mtr;
pub mod ping;
pub mod traceroute;

pub use context::{HandlerContext, ProgressEvent};

use crate::error::Result;
use crate::net::reject_private_destination;
use crate::validate;
use async_trait::async_trait;
use common::{MeasurementOptions, ResultEnvelope};

/// Uniform validate/run contract every measurement kind implements.
#[async_trait]
pub trait MeasurementHandler: Send + Sync {
    async fn validate(&self, opts: &MeasurementOptions) -> Result<()>;
    async fn run(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> Result<ResultEnvelope>;
}

pub struct DnsHandler;
pub struct PingHandler;
pub struct TracerouteHandler;
pub struct MtrHandler;
pub struct HttpHandler;

#[async_trait]
impl MeasurementHandler for DnsHandler {
    async fn validate(&self, opts: &MeasurementOptions) -> Result<()> {
        validate::validate_dns(opts).map(|_| ())
    }

    async fn run(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> Result<ResultEnvelope> {
        let parsed = validate::validate_dns(opts)?;
        // DNS lookups are not subject to the private-destination gate: the
        // target is the resolver's query name, not a connection endpoint.
        let result = dns::run(ctx, &opts.target, &parsed).await?;
        Ok(ResultEnvelope::Dns(result))
    }
}

#[async_trait]
impl MeasurementHandler for PingHandler {
    async fn validate(&self, opts: &MeasurementOptions) -> Result<()> {
        validate::validate_ping(opts).map(|_| ())
    }

    async fn run(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> Result<ResultEnvelope> {
        let parsed = validate::validate_ping(opts)?;
        let resolved = reject_private_destination(&opts.target).await?;
        let result = ping::run(ctx, &opts.target, resolved, &parsed).await?;
        Ok(ResultEnvelope::Ping(result))
    }
}

#[async_trait]
impl MeasurementHandler for TracerouteHandler {
    async fn validate(&self, opts: &MeasurementOptions) -> Result<()> {
        validate::validate_traceroute(opts).map(|_| ())
    }

    async fn run(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> Result<ResultEnvelope> {
        let parsed = validate::validate_traceroute(opts)?;
        let resolved = reject_private_destination(&opts.target).await?;
        let result = traceroute::run(ctx, &opts.target, resolved, &parsed).await?;
        Ok(ResultEnvelope::Traceroute(result))
    }
}

#[async_trait]
impl MeasurementHandler for MtrHandler {
    async fn validate(&self, opts: &MeasurementOptions) -> Result<()> {
        validate::validate_mtr(opts).map(|_| ())
    }

    async fn run(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> Result<ResultEnvelope> {
        let parsed = validate::validate_mtr(opts)?;
        let resolved = reject_private_destination(&opts.target).await?;
        let result = mtr::run(ctx, &opts.target, resolved, &parsed).await?;
        Ok(ResultEnvelope::Mtr(result))
    }
}

#[async_trait]
impl MeasurementHandler for HttpHandler {
    async fn validate(&self, opts: &MeasurementOptions) -> Result<()> {
        validate::validate_http(opts).map(|_| ())
    }

    async fn run(&self, ctx: &HandlerContext, opts: &MeasurementOptions) -> Result<ResultEnvelope> {
        let parsed = validate::validate_http(opts)?;
        let resolved = reject_private_destination(&opts.target).await?;
        let result = http::run(ctx, &opts.target, resolved, &parsed).await?;
        Ok(ResultEnvelope::Http(result))
    }
}
