use crate::error::ResolutionError;
use crate::token::Token;
use crate::transform::Transform;
use log::trace;
use serde_json::Value;

/// Default bound on how deeply config values may reference other values.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Expands tokens embedded in a resolved config string.
///
/// The resolver calls back into this before applying a transform, so values
/// like `"Hello, ${name}!"` are fully substituted first. `depth` is the
/// nesting level the embedded tokens are resolved at.
pub trait Expand {
    fn expand(&mut self, text: &str, depth: usize) -> Result<String, ResolutionError>;
}

/// Looks up a token's key path in a configuration tree and applies its
/// transform.
#[derive(Debug, Clone, Copy)]
pub struct TokenResolver<'a> {
    config: &'a Value,
    max_depth: usize,
}

impl<'a> TokenResolver<'a> {
    pub fn new(config: &'a Value) -> Self {
        Self {
            config,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Resolves `token` at nesting level `depth` (0 for text supplied by the
    /// caller).
    ///
    /// Walks the path one segment per level. A string reached with exactly one
    /// segment left, on a token without a `.transform` suffix, takes that
    /// segment as the transform name, so `${name.upper}` and `${name}.upper`
    /// are equivalent.
    pub fn resolve<E: Expand + ?Sized>(
        &self,
        token: &Token<'_>,
        expander: &mut E,
        depth: usize,
    ) -> Result<String, ResolutionError> {
        if token.has_empty_path() {
            return Err(ResolutionError::MalformedToken {
                token: token.text.to_string(),
            });
        }
        if depth >= self.max_depth {
            return Err(ResolutionError::CyclicReference {
                token: token.text.to_string(),
                depth: self.max_depth,
            });
        }

        let segments: Vec<&str> = token.segments().collect();
        let mut node = self.config;
        let mut inline_transform = None;

        for (i, segment) in segments.iter().enumerate() {
            trace!("Resolving segment '{}' of {}", segment, token.text);
            match node {
                Value::Object(map) => {
                    node = map.get(*segment).ok_or_else(|| ResolutionError::KeyNotFound {
                        token: token.text.to_string(),
                        key: segment.to_string(),
                    })?;
                }
                Value::String(_) if token.suffix.is_none() && i + 1 == segments.len() => {
                    inline_transform = Some(*segment);
                    break;
                }
                _ => {
                    return Err(ResolutionError::KeyNotFound {
                        token: token.text.to_string(),
                        key: segment.to_string(),
                    });
                }
            }
        }

        let Value::String(raw) = node else {
            return Err(ResolutionError::NotATerminalString {
                token: token.text.to_string(),
            });
        };

        let expanded = if raw.contains("${") {
            expander.expand(raw, depth + 1)?
        } else {
            raw.clone()
        };

        match token.suffix.or(inline_transform) {
            None => Ok(expanded),
            Some(name) => Transform::from_name(name)
                .map(|t| t.apply(&expanded))
                .ok_or_else(|| ResolutionError::UnknownTransform {
                    token: token.text.to_string(),
                    name: name.to_string(),
                }),
        }
    }
}
