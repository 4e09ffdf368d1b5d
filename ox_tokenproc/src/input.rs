use crate::error::InputError;
use log::debug;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Source name that selects standard input.
pub const STDIN_SOURCE: &str = "-";

/// Lines from a list of sources, read lazily one source after another.
///
/// Each yielded line keeps its terminator (`\n` or `\r\n`); the last line of
/// a source may have none. A source that cannot be opened or read yields one
/// error and is then abandoned; iteration moves on to the next source.
pub struct InputLines {
    pending: VecDeque<String>,
    current: Option<(String, Box<dyn BufRead>)>,
}

impl InputLines {
    /// No sources means standard input.
    pub fn open<S: AsRef<str>>(sources: &[S]) -> Self {
        let mut pending: VecDeque<String> = sources.iter().map(|s| s.as_ref().to_string()).collect();
        if pending.is_empty() {
            pending.push_back(STDIN_SOURCE.to_string());
        }
        Self {
            pending,
            current: None,
        }
    }

    fn open_source(name: &str) -> io::Result<Box<dyn BufRead>> {
        if name == STDIN_SOURCE {
            Ok(Box::new(io::stdin().lock()))
        } else {
            Ok(Box::new(BufReader::new(File::open(name)?)))
        }
    }
}

impl Iterator for InputLines {
    type Item = Result<String, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let name = self.pending.pop_front()?;
                debug!("Reading input from {}", name);
                match Self::open_source(&name) {
                    Ok(reader) => self.current = Some((name, reader)),
                    Err(source) => {
                        return Some(Err(InputError {
                            source_name: name,
                            source,
                        }));
                    }
                }
            }

            let (name, reader) = self.current.as_mut()?;
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => self.current = None,
                Ok(_) => return Some(Ok(line)),
                Err(source) => {
                    let source_name = name.clone();
                    self.current = None;
                    return Some(Err(InputError { source_name, source }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_sources_in_order_keeping_terminators() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "one\ntwo\r\n").unwrap();
        fs::write(&second, "three").unwrap();

        let sources = [first.to_str().unwrap(), second.to_str().unwrap()];
        let lines: Vec<String> = InputLines::open(&sources).map(Result::unwrap).collect();
        assert_eq!(lines, vec!["one\n", "two\r\n", "three"]);
    }

    #[test]
    fn test_missing_source_yields_error_then_continues() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, "here\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let sources = [missing.to_str().unwrap(), present.to_str().unwrap()];
        let mut lines = InputLines::open(&sources);

        let err = lines.next().unwrap().unwrap_err();
        assert_eq!(err.source_name, missing.to_str().unwrap());
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);

        assert_eq!(lines.next().unwrap().unwrap(), "here\n");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_source_list_means_stdin() {
        let lines = InputLines::open::<&str>(&[]);
        assert_eq!(lines.pending.iter().collect::<Vec<_>>(), vec![STDIN_SOURCE]);
    }
}
