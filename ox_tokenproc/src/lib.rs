//! Hierarchical token substitution.
//!
//! Replaces `${a.b.c}` placeholders in text with string values looked up in a
//! nested configuration tree, optionally followed by a transform
//! (`${name}.upper`). Tokens that cannot be resolved stay in the output as
//! written and are reported, one diagnostic per failure.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod replacer;
pub mod resolver;
pub mod token;
pub mod transform;

pub use config::{load_config, parse_config};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConfigError, InputError, ProcessError, ResolutionError};
pub use input::InputLines;
pub use replacer::{DEFAULT_MAX_EXPANSIONS, TokenReplacer};
pub use resolver::{DEFAULT_MAX_DEPTH, Expand, TokenResolver};
pub use token::Token;
pub use transform::Transform;
