//! Parsed view over one protocol line.
//!
//! A request borrows from the framed line; handlers pull arguments out as
//! `&str` slices without further allocation. The verb is the first
//! whitespace-delimited token and is matched case-sensitively by the
//! dispatcher.

/// A single parsed command line.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    verb: &'a str,
    rest: &'a str,
}

impl<'a> Request<'a> {
    /// Parse one framed line. Returns `None` for blank lines.
    pub fn parse(line: &'a str) -> Option<Request<'a>> {
        let start = line.find(|c: char| !c.is_ascii_whitespace())?;
        let after = &line[start..];
        let end = after
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(after.len());
        Some(Self {
            verb: &after[..end],
            rest: &after[end..],
        })
    }

    /// The command verb.
    pub fn verb(&self) -> &'a str {
        self.verb
    }

    /// The nth whitespace-delimited argument after the verb.
    pub fn arg(&self, n: usize) -> Option<&'a str> {
        self.rest.split_ascii_whitespace().nth(n)
    }

    /// The raw remainder of the line after the nth argument, with exactly
    /// one leading space stripped. Unlike [`arg`](Self::arg) this preserves
    /// interior whitespace, which is what free-text fields (message bodies,
    /// topics, real names) need. Returns `None` when nothing follows.
    pub fn trailing(&self, n: usize) -> Option<&'a str> {
        let mut s = self.rest;
        for _ in 0..n {
            let start = s.find(|c: char| !c.is_ascii_whitespace())?;
            s = &s[start..];
            let end = s
                .find(|c: char| c.is_ascii_whitespace())
                .unwrap_or(s.len());
            s = &s[end..];
        }
        let s = s.strip_prefix(' ').unwrap_or(s);
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_verb_and_args() {
        let req = Request::parse("JOIN #lobby hunter2").unwrap();
        assert_eq!(req.verb(), "JOIN");
        assert_eq!(req.arg(0), Some("#lobby"));
        assert_eq!(req.arg(1), Some("hunter2"));
        assert_eq!(req.arg(2), None);
    }

    #[test]
    fn parse_blank_line() {
        assert!(Request::parse("").is_none());
        assert!(Request::parse("   ").is_none());
        assert!(Request::parse("\t").is_none());
    }

    #[test]
    fn parse_verb_only() {
        let req = Request::parse("QUIT").unwrap();
        assert_eq!(req.verb(), "QUIT");
        assert_eq!(req.arg(0), None);
        assert_eq!(req.trailing(0), None);
    }

    #[test]
    fn verb_case_is_preserved() {
        let req = Request::parse("pass secret").unwrap();
        assert_eq!(req.verb(), "pass");
    }

    #[test]
    fn leading_whitespace_skipped() {
        let req = Request::parse("  NICK alice").unwrap();
        assert_eq!(req.verb(), "NICK");
        assert_eq!(req.arg(0), Some("alice"));
    }

    #[test]
    fn trailing_preserves_interior_spaces() {
        let req = Request::parse("PRIVMSG alice hello there,  friend").unwrap();
        assert_eq!(req.arg(0), Some("alice"));
        assert_eq!(req.trailing(1), Some("hello there,  friend"));
    }

    #[test]
    fn trailing_strips_one_leading_space() {
        let req = Request::parse("TOPIC #lobby  indented topic").unwrap();
        assert_eq!(req.trailing(1), Some(" indented topic"));
    }

    #[test]
    fn trailing_after_several_args() {
        let req = Request::parse("USER alice host server Alice A. Margatroid").unwrap();
        assert_eq!(req.arg(0), Some("alice"));
        assert_eq!(req.arg(2), Some("server"));
        assert_eq!(req.trailing(3), Some("Alice A. Margatroid"));
    }

    #[test]
    fn trailing_absent() {
        let req = Request::parse("PRIVMSG alice").unwrap();
        assert_eq!(req.trailing(1), None);
    }
}
