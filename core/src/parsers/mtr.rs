//! Parses `mtr --raw` event lines into a dense hop table.
//!
//! Raw event lines: `h <idx> <addr>`, `p <idx> <rtt_us>`, `d <idx> <hostname>`.
//! The accumulator is keyed by hop index so repeated `h`/`d` events for the
//! same hop (mtr re-announces a hop's address on every round) collapse into
//! one entry rather than duplicating it.

use crate::parsers::stats;
use common::Hop;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug)]
pub struct MtrAccumulator {
    hops: BTreeMap<u32, Hop>,
    packets: u32,
}

impl Default for MtrAccumulator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl MtrAccumulator {
    pub fn new(packets: u32) -> Self {
        Self {
            hops: BTreeMap::new(),
            packets,
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("h") => {
                if let (Some(idx), Some(addr)) = (parts.next().and_then(parse_idx), parts.next()) {
                    self.hops.entry(idx).or_default().resolved_address = addr.to_string();
                }
            }
            Some("p") => {
                if let (Some(idx), Some(rtt_us)) =
                    (parts.next().and_then(parse_idx), parts.next().and_then(|s| s.parse::<f64>().ok()))
                {
                    self.hops.entry(idx).or_default().rtt.push(rtt_us / 1000.0);
                }
            }
            Some("d") => {
                if let Some(idx) = parts.next().and_then(parse_idx) {
                    let hostname = parts.collect::<Vec<_>>().join(" ");
                    if !hostname.is_empty() {
                        self.hops.entry(idx).or_default().resolved_hostname = Some(hostname);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn feed(&mut self, raw: &str) {
        for line in raw.lines() {
            self.feed_line(line);
        }
    }

    /// Returns the dense, 1-indexed hop list built so far. Missing indices
    /// (a hop that never answered) are filled with an empty `Hop`. Hops
    /// whose address repeats an earlier hop's (ECMP) are marked `duplicate`;
    /// RTT stats are computed against the configured packet count.
    pub fn hops(&self) -> Vec<Hop> {
        let max_idx = self.hops.keys().copied().max().unwrap_or(0);
        let mut seen = HashSet::new();
        (1..=max_idx)
            .map(|i| {
                let mut hop = self.hops.get(&i).cloned().unwrap_or_default();
                hop.stats = stats::summarize(&hop.rtt, self.packets);
                if !hop.resolved_address.is_empty() && !seen.insert(hop.resolved_address.clone()) {
                    hop.duplicate = true;
                }
                hop
            })
            .collect()
    }
}

fn parse_idx(s: &str) -> Option<u32> {
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_hop_fields_from_raw_events() {
        let mut acc = MtrAccumulator::new(2);
        acc.feed("h 1 192.168.1.1\np 1 543\nh 1 192.168.1.1\np 1 611\n");
        let hops = acc.hops();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].resolved_address, "192.168.1.1");
        assert_eq!(hops[0].rtt, vec![0.543, 0.611]);
    }

    #[test]
    fn fills_gaps_for_hops_that_never_answered() {
        let mut acc = MtrAccumulator::new(1);
        acc.feed("h 1 10.0.0.1\nh 3 1.1.1.1\n");
        let hops = acc.hops();
        assert_eq!(hops.len(), 3);
        assert_eq!(hops[1].resolved_address, "");
    }

    #[test]
    fn is_stable_across_repeated_final_feeds() {
        let mut acc = MtrAccumulator::new(1);
        acc.feed("h 1 10.0.0.1\np 1 500\n");
        let first = acc.hops();
        acc.feed("");
        assert_eq!(acc.hops(), first);
    }

    #[test]
    fn marks_ecmp_hops_with_a_repeated_address_as_duplicate() {
        let mut acc = MtrAccumulator::new(1);
        acc.feed("h 1 10.0.0.1\nh 2 10.0.0.1\n");
        let hops = acc.hops();
        assert!(!hops[0].duplicate);
        assert!(hops[1].duplicate);
    }
}
