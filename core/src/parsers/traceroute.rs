//! Parses system `traceroute` text output into a dense, 1-indexed hop list.

use crate::parsers::stats;
use common::Hop;
use std::collections::HashSet;

/// Default probes sent per hop by system `traceroute` with no `-q` override.
const PROBES_PER_HOP: u32 = 3;

pub fn parse(raw: &str) -> Vec<Hop> {
    let mut seen = HashSet::new();
    raw.lines()
        .filter_map(parse_hop_line)
        .map(|(_, mut hop)| {
            if !hop.resolved_address.is_empty() && !seen.insert(hop.resolved_address.clone()) {
                hop.duplicate = true;
            }
            hop
        })
        .collect()
}

/// Parses one traceroute line, e.g.:
/// `" 2  10.0.0.1 (10.0.0.1)  1.123 ms  1.045 ms  0.987 ms"`
/// or a timed-out hop: `" 3  * * *"`.
fn parse_hop_line(line: &str) -> Option<(u32, Hop)> {
    let trimmed = line.trim_start();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let idx: u32 = parts.next()?.parse().ok()?;
    let rest = parts.next()?.trim();

    if rest.starts_with('*') {
        return Some((
            idx,
            Hop {
                stats: stats::summarize(&[], PROBES_PER_HOP),
                ..Hop::default()
            },
        ));
    }

    let (hostname, addr) = match rest.split_once(" (") {
        Some((host, tail)) => {
            let addr = tail.trim_end_matches(')').split_whitespace().next()?.to_string();
            (Some(host.to_string()), addr)
        }
        None => {
            let addr = rest.split_whitespace().next()?.to_string();
            (None, addr)
        }
    };

    let rtts: Vec<f64> = rest
        .split("ms")
        .filter_map(|chunk| chunk.split_whitespace().last())
        .filter_map(|n| n.parse::<f64>().ok())
        .collect();

    Some((
        idx,
        Hop {
            resolved_address: addr,
            resolved_hostname: hostname,
            asn: Vec::new(),
            stats: stats::summarize(&rtts, PROBES_PER_HOP),
            rtt: rtts,
            duplicate: false,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_resolved_hop() {
        let line = " 2  10.0.0.1 (10.0.0.1)  1.123 ms  1.045 ms  0.987 ms";
        let (idx, hop) = parse_hop_line(line).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(hop.resolved_address, "10.0.0.1");
        assert_eq!(hop.rtt, vec![1.123, 1.045, 0.987]);
    }

    #[test]
    fn parses_a_timed_out_hop_as_empty() {
        let (idx, hop) = parse_hop_line(" 3  * * *").unwrap();
        assert_eq!(idx, 3);
        assert_eq!(hop.resolved_address, "");
        assert!(hop.rtt.is_empty());
    }

    #[test]
    fn hop_indices_stay_dense_across_a_full_transcript() {
        let raw = "\
 1  gw.local (192.168.1.1)  0.5 ms  0.4 ms  0.4 ms
 2  * * *
 3  1.1.1.1 (1.1.1.1)  9.1 ms  8.9 ms  9.0 ms
";
        let hops = parse(raw);
        assert_eq!(hops.len(), 3);
        assert_eq!(hops[1].resolved_address, "");
    }

    #[test]
    fn marks_the_second_sighting_of_a_repeated_address_as_duplicate() {
        let raw = "\
 1  10.0.0.1 (10.0.0.1)  0.5 ms  0.4 ms  0.4 ms
 2  10.0.0.1 (10.0.0.1)  0.6 ms  0.5 ms  0.5 ms
";
        let hops = parse(raw);
        assert!(!hops[0].duplicate);
        assert!(hops[1].duplicate);
    }
}
