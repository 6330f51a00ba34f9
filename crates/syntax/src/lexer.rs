use crate::error::{Diag, LexError, LexErrorKind, Span};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
const fn first_newline_offset(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'\n' | b'\r') {
            return Some(i);
        }
        i += 1;
    }

    None
}

#[inline(always)]
const fn lower_ascii(b: u8) -> u8 {
    if b >= b'A' && b <= b'Z' {
        b + 32
    } else {
        b
    }
}

#[inline(always)]
const fn is_digit_in(b: u8, base: u8) -> bool {
    match base {
        16 => b.is_ascii_hexdigit() || b == b'_',
        _ => b.is_ascii_digit() || b == b'_',
    }
}

// =============================================================================
// 1. Block comment scanner
// =============================================================================

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    use memchr::memchr;

    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. Number munch
// =============================================================================

/// Extends a number token to its maximal munch: base prefix, digits,
/// fraction, exponent (`e` for decimal, `p` for hex) and the imaginary `i`.
///
/// Literal validity is left to the Go toolchain; the canonicalizer only needs
/// token boundaries.
fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let src = lex.source().as_bytes();
    let start = lex.span().start;
    let n = src.len();

    let mut i = start;
    let mut base = 10u8;

    if src[i] == b'0' && i + 1 < n {
        match lower_ascii(src[i + 1]) {
            b'x' => {
                base = 16;
                i += 2;
            }
            b'o' | b'b' => i += 2,
            _ => {}
        }
    }

    while i < n && is_digit_in(src[i], base) {
        i += 1;
    }

    // fraction; ".." never belongs to a number
    if i < n && src[i] == b'.' && src.get(i + 1) != Some(&b'.') {
        i += 1;
        while i < n && is_digit_in(src[i], base) {
            i += 1;
        }
    }

    if i < n {
        let e = lower_ascii(src[i]);
        let is_exp = (base == 16 && e == b'p') || (base != 16 && e == b'e');
        if is_exp {
            i += 1;
            if i < n && matches!(src[i], b'+' | b'-') {
                i += 1;
            }
            while i < n && is_digit_in(src[i], 10) {
                i += 1;
            }
        }
    }

    if i < n && src[i] == b'i' {
        i += 1;
    }

    let already = lex.span().end;
    if i > already {
        lex.bump(i - already);
    }
    Ok(())
}

// =============================================================================
// 3. Raw token definition
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\f]+")]
enum RawTok {
    #[token("\u{FEFF}")]
    Bom,

    #[regex(r"\r\n|\n|\r")]
    Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)]
    LineComment,
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Ident,
    #[regex(r"[0-9]|\.[0-9]", lex_number)]
    Number,
    #[regex(r"`[^`]*`")]
    RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,
    #[regex(r"'([^'\\\n\r]|\\.)+'")]
    Rune,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,
    #[token("=")]
    Assign,
    #[token(":=")]
    Define,
    #[token("<-")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,

    // Operators the parser never distinguishes
    #[token("...")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("!")]
    #[token("<")]
    #[token(">")]
    Op,

    #[regex(r".", priority = 0)]
    Error,
}

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Number
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::Break
                | Self::Continue
                | Self::Fallthrough
                | Self::Return
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
        )
    }

    #[rustfmt::skip]
    const fn to_tok(self) -> Tok {
        match self {
            Self::Break => Tok::Break, Self::Case => Tok::Case, Self::Chan => Tok::Chan,
            Self::Const => Tok::Const, Self::Continue => Tok::Continue, Self::Default => Tok::Default,
            Self::Defer => Tok::Defer, Self::Else => Tok::Else, Self::Fallthrough => Tok::Fallthrough,
            Self::For => Tok::For, Self::Func => Tok::Func, Self::Go => Tok::Go, Self::Goto => Tok::Goto,
            Self::If => Tok::If, Self::Import => Tok::Import, Self::Interface => Tok::Interface,
            Self::Map => Tok::Map, Self::Package => Tok::Package, Self::Range => Tok::Range,
            Self::Return => Tok::Return, Self::Select => Tok::Select, Self::Struct => Tok::Struct,
            Self::Switch => Tok::Switch, Self::Type => Tok::Type, Self::Var => Tok::Var,

            Self::Ident => Tok::Ident, Self::Number => Tok::Number, Self::RawString => Tok::RawString,
            Self::String => Tok::String, Self::Rune => Tok::Rune,
            Self::LineComment => Tok::LineComment, Self::BlockComment => Tok::BlockComment,

            Self::LParen => Tok::LParen, Self::RParen => Tok::RParen, Self::LBrack => Tok::LBrack,
            Self::RBrack => Tok::RBrack, Self::LBrace => Tok::LBrace, Self::RBrace => Tok::RBrace,
            Self::Comma => Tok::Comma, Self::Semi => Tok::Semi, Self::Colon => Tok::Colon,
            Self::Dot => Tok::Dot, Self::Star => Tok::Star, Self::Assign => Tok::Assign,
            Self::Define => Tok::Define, Self::Arrow => Tok::Arrow, Self::Tilde => Tok::Tilde,
            Self::Inc => Tok::Inc, Self::Dec => Tok::Dec, Self::Op => Tok::Op,

            Self::Bom | Self::Newline | Self::Error => Tok::Error,
        }
    }
}

// =============================================================================
// 4. Public token
// =============================================================================

/// Token kinds the declaration parser works with. Operators it never needs to
/// tell apart collapse into [`Tok::Op`]; comments are kept so the parser can
/// attach them to nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tok {
    Ident,
    Number,
    String,
    RawString,
    Rune,
    LineComment,
    BlockComment,

    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,
    Star,
    Assign,
    Define,
    Arrow,
    Tilde,
    Inc,
    Dec,
    Op,

    Error,
    Eof,
}

impl Tok {
    #[inline]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

impl std::fmt::Display for Tok {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub tok: Tok,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn text<'src>(&self, src: &'src str) -> &'src str {
        &src[self.span.start as usize..self.span.end as usize]
    }

    /// Zero-width semicolons come from automatic insertion.
    #[inline]
    pub fn is_inserted_semi(&self) -> bool {
        self.tok == Tok::Semi && self.span.is_empty()
    }
}

// =============================================================================
// 5. Lexer wrapper: semicolon insertion + diags
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<Token>,
    diags: Vec<Diag>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn semi_at(pos: usize) -> Token {
        Token {
            tok: Tok::Semi,
            span: Span::empty_at(pos),
        }
    }

    fn error_token(&mut self, kind: LexErrorKind, span: Range<usize>) -> Token {
        // A quote that never closes surfaces as a stray quote character.
        let kind = match (kind, self.logos.slice().as_bytes().first()) {
            (LexErrorKind::InvalidToken, Some(b'"' | b'`')) => LexErrorKind::UnterminatedString,
            (kind, _) => kind,
        };
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        Token {
            tok: Tok::Error,
            span: Span::from_range(span),
        }
    }

    fn handle_raw(&mut self, raw: RawTok) -> Option<Token> {
        let span = self.logos.span();
        let token = Token {
            tok: raw.to_tok(),
            span: Span::from_range(span.clone()),
        };

        match raw {
            RawTok::Bom if span.start == 0 => None,
            RawTok::Bom | RawTok::Error => Some(self.error_token(LexErrorKind::InvalidToken, span)),
            RawTok::Newline => {
                if std::mem::take(&mut self.last_can_insert_semi) {
                    Some(Self::semi_at(span.start))
                } else {
                    None
                }
            }
            // The newline that ends a line comment still inserts the semicolon.
            RawTok::LineComment => Some(token),
            RawTok::BlockComment => {
                let spans_lines = first_newline_offset(self.logos.slice()).is_some();
                if spans_lines && std::mem::take(&mut self.last_can_insert_semi) {
                    self.pending = Some(token);
                    Some(Self::semi_at(span.start))
                } else {
                    Some(token)
                }
            }
            _ => {
                self.last_can_insert_semi = raw.can_insert_semicolon();
                Some(token)
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }

            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                None => {
                    self.eof_done = true;
                    if std::mem::take(&mut self.last_can_insert_semi) {
                        return Some(Self::semi_at(self.src_len));
                    }
                }
                Some(Err(kind)) => {
                    let span = self.logos.span();
                    return Some(self.error_token(kind, span));
                }
                Some(Ok(raw)) => {
                    if let Some(tok) = self.handle_raw(raw) {
                        return Some(tok);
                    }
                }
            }
        }
    }
}

/// Lexes the whole input, returning the tokens (without a trailing `Eof`)
/// together with any diagnostics.
pub fn tokenize(src: &str) -> (Vec<Token>, Vec<Diag>) {
    let mut lx = Lexer::new(src);
    let toks: Vec<_> = lx.by_ref().collect();
    (toks, lx.take_diags())
}
