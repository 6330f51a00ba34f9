//! Canonical declaration order for Go sources.
//!
//! - `fields`: struct fields and interface elements, in buckets.
//! - `specs`: `var`/`const` groups, alphabetically, unless `iota` pins them.
//! - `imports`: redundant aliases removed.
//! - `spacing`: blank line before non-leading exit statements.
//! - `format`: the [`Formatter`] tying the passes to parse and print.

pub mod base;
pub mod config;
pub mod error;
pub mod fields;
pub mod format;
pub mod imports;
pub mod order;
pub mod spacing;
pub mod specs;

pub use base::BaseFormatter;
pub use config::{CanonConfig, ConfigError, FieldOrder};
pub use error::{FormatError, ToolError};
pub use format::{Formatter, Report};
