//! Shared line-accumulation utility. Every per-tool parser is built on top
//! of this so chunk boundaries never split a line in a way the parser sees.

#[derive(Debug, Default)]
pub struct LineBuffer {
    tail: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a new chunk, returning any complete lines it produced. On
    /// `is_final`, the remainder (if non-empty) is flushed as a last,
    /// possibly unterminated, line. Calling this again after a final flush
    /// with an empty chunk is a no-op, which is what makes repeated final
    /// calls idempotent.
    pub fn feed(&mut self, chunk: &str, is_final: bool) -> Vec<String> {
        self.tail.push_str(chunk);
        let mut lines = Vec::new();
        while let Some(idx) = self.tail.find('\n') {
            let line = self.tail[..idx].trim_end_matches('\r').to_string();
            self.tail.drain(..=idx);
            lines.push(line);
        }
        if is_final && !self.tail.is_empty() {
            lines.push(std::mem::take(&mut self.tail));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_across_chunk_boundaries() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.feed("hello wo", false), Vec::<String>::new());
        assert_eq!(buf.feed("rld\nfoo\nbar", false), vec!["hello world", "foo"]);
        assert_eq!(buf.feed("", true), vec!["bar"]);
    }

    #[test]
    fn final_flush_twice_is_idempotent() {
        let mut buf = LineBuffer::new();
        buf.feed("one\ntwo", false);
        assert_eq!(buf.feed("", true), vec!["two"]);
        assert_eq!(buf.feed("", true), Vec::<String>::new());
    }

    #[test]
    fn strips_carriage_returns() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.feed("a\r\nb\r\n", false), vec!["a", "b"]);
    }
}
