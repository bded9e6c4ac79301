//! Builds the `rawHeaders` / `headers` view of an HTTP response, filtering
//! HTTP/2 pseudo-headers (`:status`, `:path`, ...) out of the surfaced map
//! since they aren't real header fields. `rawHeaders` is the header lines
//! only — no status line, no trailing blank line — joined by `\n`.

use std::collections::BTreeMap;

pub fn build_headers(headers: &[(String, String)]) -> (String, BTreeMap<String, String>) {
    let mut visible = BTreeMap::new();
    let mut lines = Vec::with_capacity(headers.len());

    for (name, value) in headers {
        lines.push(format!("{name}: {value}"));
        if !name.starts_with(':') {
            visible.insert(name.to_ascii_lowercase(), value.clone());
        }
    }

    (lines.join("\n"), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_headers_are_excluded_from_the_visible_map() {
        let headers = vec![
            (":status".to_string(), "200".to_string()),
            (":path".to_string(), "/".to_string()),
            ("Content-Type".to_string(), "text/html".to_string()),
        ];
        let (raw, visible) = build_headers(&headers);
        assert!(raw.contains(":status: 200"));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.get("content-type"), Some(&"text/html".to_string()));
    }

    #[test]
    fn raw_headers_is_just_the_header_lines() {
        let headers = vec![("test".to_string(), "abc".to_string())];
        let (raw, _) = build_headers(&headers);
        assert_eq!(raw, "test: abc");
    }
}
