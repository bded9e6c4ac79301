//! Parses `ping` text output: per-packet RTTs plus the summary line.

use common::PingStats;

#[derive(Debug, Default)]
pub struct PingParseResult {
    pub timings: Vec<f64>,
    pub stats: PingStats,
}

pub fn parse(raw: &str) -> PingParseResult {
    let mut result = PingParseResult::default();

    for line in raw.lines() {
        if let Some(rtt) = parse_rtt_line(line) {
            result.timings.push(rtt);
        }
        if let Some(loss) = parse_loss_line(line) {
            result.stats.loss = loss;
        }
        if let Some((min, avg, max)) = parse_summary_line(line) {
            result.stats.min = Some(min);
            result.stats.avg = Some(avg);
            result.stats.max = Some(max);
        }
    }
    result.stats.total = result.timings.len() as u32;

    result
}

/// Finds `time=NN.N` the same way a direct substring search would, rather
/// than a full regex, since the format never varies across ping builds.
fn parse_rtt_line(line: &str) -> Option<f64> {
    let idx = line.find("time=")?;
    let rest = &line[idx + "time=".len()..];
    let end = rest.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(rest.len());
    rest[..end].parse().ok()
}

fn parse_loss_line(line: &str) -> Option<f64> {
    let idx = line.find("% packet loss")?;
    let start = line[..idx].rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
    line[start..idx].parse().ok()
}

fn parse_summary_line(line: &str) -> Option<(f64, f64, f64)> {
    let rest = line.trim().strip_prefix("rtt min/avg/max/mdev = ")?;
    let values = rest.split_whitespace().next()?;
    let mut parts = values.split('/');
    let min: f64 = parts.next()?.parse().ok()?;
    let avg: f64 = parts.next()?.parse().ok()?;
    let max: f64 = parts.next()?.parse().ok()?;
    Some((min, avg, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rtt_from_reply_lines() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=59 time=11.3 ms";
        assert_eq!(parse_rtt_line(line), Some(11.3));
    }

    #[test]
    fn parses_a_full_transcript() {
        let raw = "\
PING 1.1.1.1 (1.1.1.1): 56 data bytes
64 bytes from 1.1.1.1: icmp_seq=0 ttl=59 time=11.3 ms
64 bytes from 1.1.1.1: icmp_seq=1 ttl=59 time=10.8 ms
64 bytes from 1.1.1.1: icmp_seq=2 ttl=59 time=12.1 ms

--- 1.1.1.1 ping statistics ---
3 packets transmitted, 3 packets received, 0% packet loss
round-trip min/avg/max/stddev = 10.800/11.400/12.100/0.532 ms
";
        let parsed = parse(raw);
        assert_eq!(parsed.timings, vec![11.3, 10.8, 12.1]);
        assert_eq!(parsed.stats.loss, 0.0);
        assert_eq!(parsed.stats.total, 3);
    }

    #[test]
    fn parses_linux_style_summary_line() {
        let raw = "rtt min/avg/max/mdev = 10.800/11.400/12.100/0.532 ms";
        assert_eq!(parse_summary_line(raw), Some((10.8, 11.4, 12.1)));
    }
}
