//! Comment-preserving Go syntax tree for gocanon.
//!
//! - `lexer`: Logos-based tokens with Go semicolon insertion; comments are
//!   tokens too.
//! - `parse`: builds the owned, decorated [`tree::SourceFile`].
//! - `print`: renders a tree back to Go source.
//! - `walk`: mutable visitor plumbing, derived with `#[derive(Walk)]`.

pub mod error;
pub mod lexer;
pub mod parse;
pub mod print;
pub mod tree;
pub mod walk;

// Re-exports for convenience
pub use error::{Diag, DiagKind, ParseFailure, PrintError, Span};
pub use lexer::Lexer;
pub use parse::parse;
pub use print::print;
pub use tree::Decorated;
pub use walk::{VisitorMut, Walk};
