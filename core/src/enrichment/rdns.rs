//! Reverse-DNS enrichment for hop/result addresses.

use std::net::IpAddr;
use trust_dns_resolver::TokioAsyncResolver;

pub async fn reverse_lookup(resolver: &TokioAsyncResolver, addr: IpAddr) -> Option<String> {
    let response = resolver.reverse_lookup(addr).await.ok()?;
    response
        .iter()
        .next()
        .map(|name| name.to_string().trim_end_matches('.').to_string())
}
