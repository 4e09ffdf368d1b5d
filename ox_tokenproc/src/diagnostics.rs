use crate::error::ResolutionError;
use std::collections::BTreeSet;
use std::fmt;

/// One failed token, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based input line the token appeared on.
    pub line: usize,
    pub error: ResolutionError,
}

impl Diagnostic {
    pub fn token(&self) -> &str {
        self.error.token()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: line {}: {}", self.line, self.error)
    }
}

/// Counters and failure records accumulated by one replacer.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    token_count: usize,
    failures: Vec<Diagnostic>,
    failed_tokens: BTreeSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count_token(&mut self) {
        self.token_count += 1;
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        self.failed_tokens.insert(diagnostic.token().to_string());
        self.failures.push(diagnostic);
    }

    /// Tokens seen, successful or not, including ones embedded in config values.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Number of failing token occurrences.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Distinct failing token texts, sorted.
    pub fn failed_tokens(&self) -> &BTreeSet<String> {
        &self.failed_tokens
    }

    /// Every failure in the order it was encountered.
    pub fn failures(&self) -> &[Diagnostic] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn clear_failures(&mut self) {
        self.failures.clear();
        self.failed_tokens.clear();
    }

    pub(crate) fn clear_token_count(&mut self) {
        self.token_count = 0;
    }

    /// One line summary, e.g. `2 token errors`.
    pub fn summary(&self) -> String {
        let n = self.failure_count();
        format!("{} token error{}", n, if n == 1 { "" } else { "s" })
    }
}
