use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InputError, ProcessError, ResolutionError};
use crate::input::InputLines;
use crate::resolver::{Expand, TokenResolver};
use crate::token::{Token, token_regex};
use log::{debug, warn};
use serde_json::Value;
use std::io::{self, Stderr, Write};

/// Default number of embedded tokens one input token may pull in.
pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;

/// Replaces `${...}` tokens in text with values from a configuration tree.
///
/// Failed tokens are left in the output as written and reported on the
/// diagnostic sink, one line each. State accumulates across calls to
/// [`process_line`](Self::process_line) until [`reset`](Self::reset).
pub struct TokenReplacer<'a, W: Write = Stderr> {
    resolver: TokenResolver<'a>,
    diagnostics: Diagnostics,
    line_number: usize,
    diagnostic_sink: W,
    max_expansions: usize,
    // Work done for the current top-level token.
    expansions: usize,
    // Failures inside nested values, held until the top-level token settles.
    nested_failures: Vec<ResolutionError>,
}

impl<'a> TokenReplacer<'a, Stderr> {
    /// Creates a replacer that reports failures on standard error.
    pub fn new(config: &'a Value) -> Self {
        Self::with_diagnostic_sink(config, io::stderr())
    }
}

impl<'a, W: Write> TokenReplacer<'a, W> {
    pub fn with_diagnostic_sink(config: &'a Value, diagnostic_sink: W) -> Self {
        Self {
            resolver: TokenResolver::new(config),
            diagnostics: Diagnostics::new(),
            line_number: 0,
            diagnostic_sink,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            expansions: 0,
            nested_failures: Vec::new(),
        }
    }

    /// Sets how many levels of config-to-config references are followed
    /// before a token is reported as a cyclic reference.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.resolver = self.resolver.with_max_depth(depth);
        self
    }

    /// Sets how many embedded tokens one token written in the input may pull
    /// in, across all nesting levels.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = limit;
        self
    }

    /// Substitutes every token in `text`, which counts as one input line.
    pub fn process_line(&mut self, text: &str) -> String {
        self.line_number += 1;

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let resolver = self.resolver;

        for caps in token_regex().captures_iter(text) {
            let (Some(token), Some(whole)) = (Token::from_captures(&caps), caps.get(0)) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            last = whole.end();
            self.diagnostics.count_token();
            self.expansions = 0;

            let result = resolver.resolve(&token, self, 0);
            let nested = std::mem::take(&mut self.nested_failures);
            match result {
                Ok(value) => {
                    debug!("Line {}: {} -> {:?}", self.line_number, token.text, value);
                    nested.into_iter().for_each(|e| self.report(e));
                    out.push_str(&value);
                }
                // The whole nested expansion was abandoned, so whatever failed
                // inside it is not reported; the token written here is.
                Err(e) if e.aborts_expansion() => {
                    self.report(e.charged_to(token.text));
                    out.push_str(token.text);
                }
                Err(e) => {
                    nested.into_iter().for_each(|n| self.report(n));
                    self.report(e);
                    out.push_str(token.text);
                }
            }
        }

        out.push_str(&text[last..]);
        out
    }

    /// Feeds `lines` through [`process_line`](Self::process_line) in order,
    /// writing each result to `out` as is. Stops at the first input error.
    pub fn process_lines<I, O>(&mut self, lines: I, out: &mut O) -> Result<(), ProcessError>
    where
        I: IntoIterator<Item = Result<String, InputError>>,
        O: Write + ?Sized,
    {
        for line in lines {
            let line = line?;
            let replaced = self.process_line(&line);
            out.write_all(replaced.as_bytes()).map_err(ProcessError::Output)?;
        }
        out.flush().map_err(ProcessError::Output)
    }

    /// Reads every line of `sources` (standard input when empty, `-` for
    /// standard input in the list) and writes the substituted text to `out`.
    pub fn process_sources<S, O>(&mut self, sources: &[S], out: &mut O) -> Result<(), ProcessError>
    where
        S: AsRef<str>,
        O: Write + ?Sized,
    {
        self.process_lines(InputLines::open(sources), out)
    }

    /// True when no token has failed since construction or the last reset.
    pub fn all_resolved(&self) -> bool {
        self.diagnostics.is_clean()
    }

    /// Forgets recorded failures. Line numbering and the token count carry on.
    pub fn reset(&mut self) {
        self.diagnostics.clear_failures();
    }

    /// Restarts line numbering, so the next line processed is line 1.
    pub fn reset_line_number(&mut self) {
        self.line_number = 0;
    }

    pub fn reset_token_count(&mut self) {
        self.diagnostics.clear_token_count();
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn token_count(&self) -> usize {
        self.diagnostics.token_count()
    }

    pub fn failure_count(&self) -> usize {
        self.diagnostics.failure_count()
    }

    /// Number of the line most recently processed (0 before the first).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn diagnostic_sink(&self) -> &W {
        &self.diagnostic_sink
    }

    pub fn into_diagnostic_sink(self) -> W {
        self.diagnostic_sink
    }

    // Substitutes tokens embedded in a config value. Ordinary failures are
    // deferred and the token kept; a cycle or budget overrun abandons the
    // whole expansion.
    fn scan_nested(&mut self, text: &str, depth: usize) -> Result<String, ResolutionError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let resolver = self.resolver;

        for caps in token_regex().captures_iter(text) {
            let (Some(token), Some(whole)) = (Token::from_captures(&caps), caps.get(0)) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            last = whole.end();
            self.diagnostics.count_token();

            self.expansions += 1;
            if self.expansions > self.max_expansions {
                return Err(ResolutionError::ExpansionLimit {
                    token: token.text.to_string(),
                    limit: self.max_expansions,
                });
            }

            match resolver.resolve(&token, self, depth) {
                Ok(value) => out.push_str(&value),
                Err(e) if e.aborts_expansion() => return Err(e),
                Err(e) => {
                    self.nested_failures.push(e);
                    out.push_str(token.text);
                }
            }
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    fn report(&mut self, error: ResolutionError) {
        if error.aborts_expansion() {
            warn!("Line {}: {}", self.line_number, error);
        }
        let diagnostic = Diagnostic {
            line: self.line_number,
            error,
        };
        if let Err(e) = writeln!(self.diagnostic_sink, "{}", diagnostic) {
            warn!("Failed to write diagnostic '{}': {}", diagnostic, e);
        }
        self.diagnostics.record(diagnostic);
    }
}

impl<W: Write> Expand for TokenReplacer<'_, W> {
    fn expand(&mut self, text: &str, depth: usize) -> Result<String, ResolutionError> {
        self.scan_nested(text, depth)
    }
}
