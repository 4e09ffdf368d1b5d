use regex::{Captures, Regex};
use std::sync::OnceLock;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches `${aaa.bbb.ccc}` with the key path as group 1 and an optional
/// `.transform` suffix name as group 3.
pub fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([^\}]*)\}(\.([a-z]+))?").expect("token pattern is a valid regex")
    })
}

/// One `${path}[.transform]` occurrence found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    /// The full matched text, suffix included. This is what gets written back
    /// when the token cannot be resolved.
    pub text: &'t str,
    /// Key path with surrounding whitespace trimmed off as a whole.
    pub path: &'t str,
    /// Name following the closing brace, if any. Not yet validated.
    pub suffix: Option<&'t str>,
}

impl<'t> Token<'t> {
    pub fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        Some(Self {
            text: caps.get(0)?.as_str(),
            path: caps.get(1)?.as_str().trim(),
            suffix: caps.get(3).map(|m| m.as_str()),
        })
    }

    /// Parses `input` as exactly one token, nothing before or after it.
    pub fn parse(input: &'t str) -> Option<Self> {
        let caps = token_regex().captures(input)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != input.len() {
            return None;
        }
        Self::from_captures(&caps)
    }

    /// Dot separated key path segments. Segments themselves are not trimmed.
    pub fn segments(&self) -> std::str::Split<'t, char> {
        self.path.split('.')
    }

    pub fn has_empty_path(&self) -> bool {
        self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_token() {
        let t = Token::parse("${server.host}").unwrap();
        assert_eq!(t.text, "${server.host}");
        assert_eq!(t.path, "server.host");
        assert_eq!(t.suffix, None);
        assert_eq!(t.segments().collect::<Vec<_>>(), vec!["server", "host"]);
    }

    #[test]
    fn test_parse_trims_whole_path_only() {
        let t = Token::parse("${ a . b }").unwrap();
        assert_eq!(t.path, "a . b");
        assert_eq!(t.segments().collect::<Vec<_>>(), vec!["a ", " b"]);
    }

    #[test]
    fn test_parse_suffix() {
        let t = Token::parse("${greeting}.upper").unwrap();
        assert_eq!(t.path, "greeting");
        assert_eq!(t.suffix, Some("upper"));

        // Uppercase letters are not part of the suffix grammar.
        assert!(Token::parse("${greeting}.Upper").is_none());
    }

    #[test]
    fn test_empty_path() {
        assert!(Token::parse("${}").unwrap().has_empty_path());
        assert!(Token::parse("${   }").unwrap().has_empty_path());
    }

    #[test]
    fn test_scan_is_leftmost_non_overlapping() {
        let found: Vec<&str> = token_regex()
            .find_iter("x ${a} ${b}.lower ${c ${d}")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["${a}", "${b}.lower", "${c ${d}"]);
    }
}
