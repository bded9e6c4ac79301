//! ASN lookup via Team Cymru's DNS-based whois
//! (`<reversed-octets>.origin.asn.cymru.com` TXT).

use crate::error::{ProbeError, Result};
use std::net::IpAddr;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

pub async fn lookup_asn(resolver: &TokioAsyncResolver, addr: IpAddr) -> Result<Option<u32>> {
    let IpAddr::V4(v4) = addr else {
        return Ok(None);
    };
    let octets = v4.octets();
    let query = format!(
        "{}.{}.{}.{}.origin.asn.cymru.com.",
        octets[3], octets[2], octets[1], octets[0]
    );

    let response = resolver
        .txt_lookup(query)
        .await
        .map_err(|e| ProbeError::EnrichmentFailure(e.to_string()))?;

    let record = response
        .iter()
        .next()
        .ok_or_else(|| ProbeError::EnrichmentFailure("empty TXT response".to_string()))?;
    let text = record
        .iter()
        .map(|bytes| String::from_utf8_lossy(bytes))
        .collect::<String>();

    // "15169 | 8.8.8.0/24 | US | arin | 2000-03-30"
    let asn = text
        .split('|')
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok());
    Ok(asn)
}

pub fn default_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_pipe_delimited_cymru_record() {
        let text = "15169 | 8.8.8.0/24 | US | arin | 2000-03-30";
        let asn = text.split('|').next().and_then(|s| s.trim().parse::<u32>().ok());
        assert_eq!(asn, Some(15169));
    }
}
