//! Wires ASN lookup and reverse-DNS fallback into a finished hop table.
//! Called once per measurement, after the tool stream has closed, so the
//! terminal result carries enrichment rather than every progress event.

use crate::enrichment::{asn, rdns};
use crate::net::is_private;
use common::Hop;
use std::collections::HashSet;
use std::net::IpAddr;
use trust_dns_resolver::TokioAsyncResolver;

/// For every unique, non-private, non-duplicate hop address: looks up its
/// ASN and, if the tool didn't already supply one, its reverse-DNS name.
/// Both lookups are best-effort — failures leave the field empty rather
/// than failing the measurement.
pub async fn enrich(hops: &mut [Hop], resolver: &TokioAsyncResolver) {
    let mut seen = HashSet::new();
    let addrs: Vec<IpAddr> = hops
        .iter()
        .filter(|hop| !hop.duplicate && !hop.resolved_address.is_empty())
        .filter_map(|hop| hop.resolved_address.parse::<IpAddr>().ok())
        .filter(|addr| !is_private(addr))
        .filter(|addr| seen.insert(*addr))
        .collect();

    let lookups = addrs.into_iter().map(|addr| async move {
        let asns = asn::lookup_asn(resolver, addr)
            .await
            .ok()
            .flatten()
            .map(|n| vec![n])
            .unwrap_or_default();
        let hostname = rdns::reverse_lookup(resolver, addr).await;
        (addr, asns, hostname)
    });

    for (addr, asns, hostname) in futures::future::join_all(lookups).await {
        for hop in hops.iter_mut().filter(|h| h.resolved_address == addr.to_string()) {
            hop.asn = asns.clone();
            if hop.resolved_hostname.is_none() {
                hop.resolved_hostname = hostname.clone();
            }
        }
    }
}
