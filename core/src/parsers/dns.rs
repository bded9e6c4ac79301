//! Parses `dig` text output into structured answers.

use common::{DnsAnswer, DnsValue};

#[derive(Debug, Default)]
pub struct DnsParseResult {
    pub answers: Vec<DnsAnswer>,
    pub resolver: Option<String>,
    pub query_time_ms: Option<f64>,
}

/// Parses a complete `dig` transcript. Trace mode (`dig +trace`) produces
/// multiple `;; ANSWER SECTION:` blocks across several queries; answers are
/// emitted in the order their sections appear, a single forward scan with
/// no reordering by query round.
pub fn parse(raw: &str) -> DnsParseResult {
    let mut result = DnsParseResult::default();
    let mut in_answer_section = false;

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(";; ANSWER SECTION:") {
            in_answer_section = true;
            continue;
        }
        if trimmed.starts_with(";;") || trimmed.is_empty() {
            in_answer_section = false;
        }

        if let Some(rest) = trimmed.strip_prefix(";; SERVER:") {
            result.resolver = Some(rest.trim().to_string());
        }
        if let Some(rest) = trimmed.strip_prefix(";; Query time:") {
            // "23 msec"
            if let Some(num) = rest.trim().split_whitespace().next() {
                result.query_time_ms = num.parse::<f64>().ok();
            }
        }

        if in_answer_section && !trimmed.starts_with(';') {
            if let Some(answer) = parse_answer_line(trimmed) {
                result.answers.push(answer);
            }
        }
    }

    result
}

/// Parses one resource-record line: `name ttl class type value...`.
/// `value`'s shape depends on `type`: `MX` yields a structured
/// `{priority, server}`; everything else is the remaining columns joined
/// with single spaces.
fn parse_answer_line(line: &str) -> Option<DnsAnswer> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?.to_string();
    let ttl: u32 = parts.next()?.parse().ok()?;
    let class = parts.next()?.to_string();
    let record_type = parts.next()?.to_string();
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return None;
    }

    let value = match record_type.as_str() {
        "MX" => {
            let priority: u32 = rest.first()?.parse().ok()?;
            let server = rest.get(1..)?.join(" ");
            DnsValue::Mx { priority, server }
        }
        _ => DnsValue::Text(rest.join(" ")),
    };

    Some(DnsAnswer {
        name,
        record_type,
        ttl,
        class,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_mx_answer() {
        let raw = "\
;; ANSWER SECTION:
example.com.\t3600\tIN\tMX\t10 mail.example.com.

;; Query time: 23 msec
;; SERVER: 127.0.0.53#53(127.0.0.53)
";
        let parsed = parse(raw);
        assert_eq!(parsed.answers.len(), 1);
        assert_eq!(parsed.answers[0].record_type, "MX");
        assert_eq!(
            parsed.answers[0].value,
            DnsValue::Mx { priority: 10, server: "mail.example.com.".to_string() }
        );
        assert_eq!(parsed.query_time_ms, Some(23.0));
        assert_eq!(parsed.resolver.as_deref(), Some("127.0.0.53#53(127.0.0.53)"));
    }

    #[test]
    fn parses_a_txt_answer_as_flat_text() {
        let raw = "\
;; ANSWER SECTION:
example.com.\t3600\tIN\tTXT\t\"v=spf1 include:_spf.example.com ~all\"

;; Query time: 5 msec
";
        let parsed = parse(raw);
        assert_eq!(
            parsed.answers[0].value,
            DnsValue::Text("\"v=spf1 include:_spf.example.com ~all\"".to_string())
        );
    }

    #[test]
    fn ignores_comment_lines_outside_answer_section() {
        let raw = ";; Got answer:\n;; ->>HEADER<<- opcode: QUERY, status: NXDOMAIN\n";
        let parsed = parse(raw);
        assert!(parsed.answers.is_empty());
    }
}
