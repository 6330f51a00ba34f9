use thiserror::Error;

/// Compact byte-span used across the syntax crate.
///
/// Positions are `u32`; inputs above 4GiB clamp rather than panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp_u32(start),
            end: clamp_u32(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        let p = clamp_u32(pos);
        Self { start: p, end: p }
    }

    #[inline]
    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[inline]
const fn clamp_u32(pos: usize) -> u32 {
    if pos > u32::MAX as usize {
        u32::MAX
    } else {
        pos as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl std::fmt::Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            DiagKind::Lex => "lex",
            DiagKind::Parse => "parse",
        };
        write!(
            f,
            "{kind} error at {}..{}: {}",
            self.span.start, self.span.end, self.message
        )
    }
}

/// Tree construction failed; nothing was produced for the engine to transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summary(.diags))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

fn summary(diags: &[Diag]) -> String {
    match diags {
        [] => "parse failed".to_string(),
        [one] => one.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

/// The printer met a node it cannot render as valid Go.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("`{keyword}` declaration without specs")]
    EmptyDecl { keyword: &'static str },
    #[error("value spec without a name")]
    UnnamedSpec,
    #[error("type spec without a name")]
    UnnamedType,
    #[error("import spec without a path")]
    MissingImportPath,
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}
