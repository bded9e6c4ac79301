//! Safety gate: no measurement ever touches private address space.

use crate::error::{ProbeError, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Resolves `target` to a concrete address (if it isn't one already) and
/// rejects it if that address falls in private/reserved space. Only the
/// first resolved address is checked, matching the documented gap: a
/// target with mixed public/private A records is not fully covered.
pub async fn reject_private_destination(target: &str) -> Result<IpAddr> {
    if let Ok(addr) = target.parse::<IpAddr>() {
        return if is_private(&addr) {
            Err(ProbeError::PrivateDestination)
        } else {
            Ok(addr)
        };
    }

    let resolver =
        TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
    let response = resolver
        .lookup_ip(target)
        .await
        .map_err(|e| ProbeError::network(e.to_string(), "ENOTFOUND"))?;
    let addr = response
        .iter()
        .next()
        .ok_or_else(|| ProbeError::network(format!("no address found for {target}"), "ENODATA"))?;

    if is_private(&addr) {
        Err(ProbeError::PrivateDestination)
    } else {
        Ok(addr)
    }
}

pub fn is_private(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_private_v4(*v4),
        IpAddr::V6(v6) => is_private_v6(*v6),
    }
}

fn is_private_v4(addr: Ipv4Addr) -> bool {
    addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_multicast()
        || addr.is_broadcast()
        || addr.is_unspecified()
        || addr.is_documentation()
        // 100.64.0.0/10 carrier-grade NAT
        || (addr.octets()[0] == 100 && (64..=127).contains(&addr.octets()[1]))
}

fn is_private_v6(addr: Ipv6Addr) -> bool {
    addr.is_loopback()
        || addr.is_unspecified()
        || addr.is_multicast()
        // fc00::/7 unique local
        || (addr.segments()[0] & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (addr.segments()[0] & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_rfc1918_ranges() {
        assert!(is_private(&"10.0.0.1".parse().unwrap()));
        assert!(is_private(&"172.16.0.1".parse().unwrap()));
        assert!(is_private(&"192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn rejects_loopback_and_link_local() {
        assert!(is_private(&"127.0.0.1".parse().unwrap()));
        assert!(is_private(&"169.254.1.1".parse().unwrap()));
        assert!(is_private(&"::1".parse().unwrap()));
        assert!(is_private(&"fe80::1".parse().unwrap()));
    }

    #[test]
    fn rejects_carrier_grade_nat() {
        assert!(is_private(&"100.64.0.1".parse().unwrap()));
        assert!(!is_private(&"100.63.255.255".parse().unwrap()));
    }

    #[test]
    fn allows_public_addresses() {
        assert!(!is_private(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private(&"2001:4860:4860::8888".parse().unwrap()));
    }

    #[tokio::test]
    async fn literal_private_ip_is_rejected_before_any_resolution() {
        let err = reject_private_destination("192.168.0.1").await.unwrap_err();
        assert!(matches!(err, ProbeError::PrivateDestination));
    }
}
