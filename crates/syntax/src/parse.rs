//! Declaration-level Go parser.
//!
//! Builds the owned tree from the token stream. Declarations, specs, struct
//! and interface members, blocks, statements and case clauses become nodes;
//! expressions and types that are never reordered are captured as the exact
//! source text between their first and last token.
//!
//! Comments are attached while parsing:
//! - comments between the previous item and a node are its `leading` ones,
//! - comments on the node's last line are `trailing`,
//! - comments inside a captured text span stay inside that text,
//! - comments just before an opening brace or paren open that list,
//! - anything else found mid-node is kept as a trailing comment of the
//!   innermost enclosing item, so no comment is ever dropped.

use crate::error::{Diag, DiagKind, ParseFailure, Span};
use crate::lexer::{tokenize, Tok, Token};
use crate::tree::*;
use smallvec::SmallVec;
use std::ops::Range;

type PResult<T> = Result<T, Diag>;

/// Parses a Go source file into the owned tree.
pub fn parse(src: &str) -> Result<SourceFile, ParseFailure> {
    let (tokens, diags) = tokenize(src);
    if !diags.is_empty() {
        return Err(ParseFailure { diags });
    }

    let mut parser = Parser::new(src, tokens);
    parser
        .source_file()
        .map_err(|diag| ParseFailure { diags: vec![diag] })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Paren,
    Brack,
    Brace,
    TypeBody,
}

struct Parser<'src> {
    src: &'src str,
    /// Significant tokens, terminated by `Eof`.
    toks: Vec<Token>,
    pos: usize,
    comments: Vec<Range<usize>>,
    next_comment: usize,
    /// Comments skipped over in the middle of a node.
    strays: Vec<String>,
    /// End of the last consumed token or comment.
    cursor_end: usize,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str, tokens: Vec<Token>) -> Self {
        let mut toks = Vec::with_capacity(tokens.len() + 1);
        let mut comments = Vec::new();
        for t in tokens {
            if t.tok.is_comment() {
                comments.push(t.span.start as usize..t.span.end as usize);
            } else {
                toks.push(t);
            }
        }
        toks.push(Token {
            tok: Tok::Eof,
            span: Span::empty_at(src.len()),
        });

        Self {
            src,
            toks,
            pos: 0,
            comments,
            next_comment: 0,
            strays: Vec::new(),
            cursor_end: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Token cursor
    // -------------------------------------------------------------------------

    #[inline]
    fn peek(&self) -> Tok {
        self.toks[self.pos].tok
    }

    #[inline]
    fn nth(&self, k: usize) -> Tok {
        self.toks.get(self.pos + k).map_or(Tok::Eof, |t| t.tok)
    }

    #[inline]
    fn at(&self, tok: Tok) -> bool {
        self.peek() == tok
    }

    #[inline]
    fn cur_start(&self) -> usize {
        self.toks[self.pos].span.start as usize
    }

    /// Previous token inside the region that began at token index `floor`.
    #[inline]
    fn prev_tok(&self, floor: usize) -> Option<Tok> {
        (self.pos > floor).then(|| self.toks[self.pos - 1].tok)
    }

    /// Moves past the current token without looking at comments. Used while
    /// scanning spans that become text.
    #[inline]
    fn advance(&mut self) {
        let t = self.toks[self.pos];
        if t.tok != Tok::Eof {
            self.pos += 1;
        }
        self.cursor_end = self.cursor_end.max(t.span.end as usize);
    }

    fn bump(&mut self) -> Token {
        let t = self.toks[self.pos];
        self.flush_strays_before(t.span.start as usize);
        self.advance();
        t
    }

    fn expect(&mut self, tok: Tok) -> PResult<Token> {
        if self.at(tok) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&format!("{tok:?}")))
        }
    }

    fn expect_semi(&mut self) -> PResult<()> {
        match self.peek() {
            Tok::Semi => {
                self.bump();
                Ok(())
            }
            Tok::Eof => Ok(()),
            _ => Err(self.unexpected("`;` or newline")),
        }
    }

    fn skip_semis(&mut self) {
        while self.at(Tok::Semi) {
            self.bump();
        }
    }

    fn ident(&mut self) -> PResult<String> {
        let t = self.expect(Tok::Ident)?;
        Ok(t.text(self.src).to_string())
    }

    fn ident_list(&mut self) -> PResult<SmallVec<[String; 1]>> {
        let mut names = SmallVec::new();
        names.push(self.ident()?);
        while self.at(Tok::Comma) {
            self.bump();
            names.push(self.ident()?);
        }
        Ok(names)
    }

    fn unexpected(&self, expected: &str) -> Diag {
        let t = self.toks[self.pos];
        let found = match t.tok {
            Tok::Eof => "end of file".to_string(),
            _ if t.is_inserted_semi() => "newline".to_string(),
            _ => format!("`{}`", t.text(self.src)),
        };
        Diag {
            kind: DiagKind::Parse,
            span: t.span,
            message: format!("expected {expected}, found {found}"),
        }
    }

    // -------------------------------------------------------------------------
    // Comments and spacing
    // -------------------------------------------------------------------------

    #[inline]
    fn gap(&self, from: usize, to: usize) -> &'src str {
        if from < to {
            &self.src[from..to]
        } else {
            ""
        }
    }

    fn blank_between(&self, from: usize, to: usize) -> bool {
        memchr::memchr_iter(b'\n', self.gap(from, to).as_bytes()).nth(1).is_some()
    }

    fn newline_between(&self, from: usize, to: usize) -> bool {
        memchr::memchr2(b'\n', b'\r', self.gap(from, to).as_bytes()).is_some()
    }

    fn comment_text(&self, c: &Range<usize>) -> String {
        self.src[c.clone()].to_string()
    }

    fn flush_strays_before(&mut self, pos: usize) {
        while let Some(c) = self.comments.get(self.next_comment).cloned() {
            if c.start >= pos {
                break;
            }
            self.strays.push(self.comment_text(&c));
            self.next_comment += 1;
        }
    }

    /// Comments between the last consumed item and the current token.
    fn leading(&mut self) -> Decorations {
        let node_start = self.cur_start();
        let mut decs = Decorations::default();
        let mut from = self.cursor_end;

        while let Some(c) = self.comments.get(self.next_comment).cloned() {
            if c.start >= node_start {
                break;
            }
            let blank = self.blank_between(from, c.start);
            match decs.leading.last_mut() {
                Some(prev) => prev.blank_after = blank,
                None => decs.before = space(blank),
            }
            decs.leading.push(Comment::new(self.comment_text(&c)));
            self.next_comment += 1;
            from = c.end;
        }

        let blank = self.blank_between(from, node_start);
        match decs.leading.last_mut() {
            Some(last) => last.blank_after = blank,
            None => decs.before = space(blank),
        }
        self.cursor_end = self.cursor_end.max(from);
        decs
    }

    /// Comments on the same line as the last consumed token, up to the next
    /// significant token.
    fn trailing(&mut self) -> Vec<String> {
        let limit = self.toks[self.pos..]
            .iter()
            .find(|t| t.tok != Tok::Semi)
            .map_or(self.src.len(), |t| t.span.start as usize);

        let mut out = Vec::new();
        while let Some(c) = self.comments.get(self.next_comment).cloned() {
            if c.start >= limit || self.newline_between(self.cursor_end, c.start) {
                break;
            }
            out.push(self.comment_text(&c));
            self.next_comment += 1;
            self.cursor_end = self.cursor_end.max(c.end);
        }
        out
    }

    /// Comments before a closing delimiter (or the end of the file).
    fn closing(&mut self) -> Decorations {
        let mut decs = self.leading();
        match decs.leading.last_mut() {
            Some(last) => last.blank_after = false,
            None => decs.before = Space::Line,
        }
        decs
    }

    /// Parses one item with `item` and attaches the comments around it.
    fn decorated<T: Decorated>(
        &mut self,
        item: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let mark = self.strays.len();
        let mut decs = self.leading();
        let mut node = item(self)?;
        decs.trailing = self.strays.split_off(mark);
        decs.trailing.extend(self.trailing());
        *node.decorations_mut() = decs;
        Ok(node)
    }

    /// Source text covered by the token range, comments included.
    fn text_of(&mut self, range: Range<usize>) -> String {
        if range.is_empty() {
            return String::new();
        }
        let Some(first) = self.toks.get(range.start).copied() else {
            return String::new();
        };
        let Some(last) = self.toks[range.clone()]
            .iter()
            .rev()
            .find(|t| !t.is_inserted_semi())
            .copied()
        else {
            return String::new();
        };

        let (start, end) = (first.span.start as usize, last.span.end as usize);
        self.flush_strays_before(start);
        while self
            .comments
            .get(self.next_comment)
            .is_some_and(|c| c.start < end)
        {
            self.next_comment += 1;
        }
        self.cursor_end = self.cursor_end.max(end);
        self.src[start..end].trim().to_string()
    }

    // -------------------------------------------------------------------------
    // Scanning
    // -------------------------------------------------------------------------

    /// Advances over a balanced token run, stopping at depth 0 on `stop`, on a
    /// `;`, or on a closer this run did not open. `stop` sees the token and
    /// the one before it.
    fn scan(&mut self, stop: impl Fn(Tok, Option<Tok>) -> bool) -> PResult<Range<usize>> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            if depth == 0 {
                if stop(tok, self.prev_tok(start)) {
                    break;
                }
                if matches!(
                    tok,
                    Tok::Semi | Tok::RParen | Tok::RBrack | Tok::RBrace | Tok::Eof
                ) {
                    break;
                }
            }
            match tok {
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace => depth -= 1,
                Tok::Eof => return Err(self.unexpected("closing delimiter")),
                _ => {}
            }
            self.advance();
        }
        Ok(start..self.pos)
    }

    fn scan_text(
        &mut self,
        what: &str,
        stop: impl Fn(Tok, Option<Tok>) -> bool,
    ) -> PResult<String> {
        let range = self.scan(stop)?;
        if range.is_empty() {
            return Err(self.unexpected(what));
        }
        Ok(self.text_of(range))
    }

    /// Index of the `]` matching the `[` at token index `open`.
    fn matching_brack(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, t) in self.toks.iter().enumerate().skip(open) {
            match t.tok {
                Tok::LBrack => depth += 1,
                Tok::RBrack => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                Tok::Eof => return None,
                _ => {}
            }
        }
        None
    }

    // -------------------------------------------------------------------------
    // Lists
    // -------------------------------------------------------------------------

    /// Consumes `open` and returns the comments that belong right after it:
    /// any left between the preceding text and `open`, then those on its line.
    fn opening(&mut self, open: Tok) -> PResult<Vec<String>> {
        let mark = self.strays.len();
        self.expect(open)?;
        let mut opening = self.strays.split_off(mark);
        opening.extend(self.trailing());
        Ok(opening)
    }

    /// `open item ; item ; ... close`
    fn list<T: Decorated>(
        &mut self,
        open: Tok,
        close: Tok,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<List<T>> {
        let opening = self.opening(open)?;
        let mut items = Vec::new();

        loop {
            self.skip_semis();
            if self.at(close) {
                break;
            }
            if self.at(Tok::Eof) {
                return Err(self.unexpected(&format!("{close:?}")));
            }
            items.push(self.decorated(&mut item)?);
            if !self.at(close) {
                self.expect_semi()?;
            }
        }

        let closing = self.closing();
        self.expect(close)?;
        Ok(List {
            opening,
            items,
            closing,
        })
    }

    // -------------------------------------------------------------------------
    // File and declarations
    // -------------------------------------------------------------------------

    fn source_file(&mut self) -> PResult<SourceFile> {
        self.skip_semis();
        let package = self.decorated(|p| {
            p.expect(Tok::Package)?;
            Ok(PackageClause {
                decs: Decorations::default(),
                name: p.ident()?,
            })
        })?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        loop {
            self.skip_semis();
            if self.at(Tok::Eof) {
                break;
            }
            decls.push(self.decorated(Self::decl)?);
            self.expect_semi()?;
        }

        let mut closing = self.closing();
        let strays = std::mem::take(&mut self.strays);
        closing
            .leading
            .splice(0..0, strays.into_iter().map(Comment::new));
        Ok(SourceFile {
            package,
            decls,
            closing,
        })
    }

    fn decl(&mut self) -> PResult<Decl> {
        match self.peek() {
            Tok::Import => {
                self.bump();
                Ok(Decl::Import(self.gen_decl(Self::import_spec)?))
            }
            Tok::Const => {
                self.bump();
                Ok(Decl::Const(self.gen_decl(Self::value_spec)?))
            }
            Tok::Var => {
                self.bump();
                Ok(Decl::Var(self.gen_decl(Self::value_spec)?))
            }
            Tok::Type => {
                self.bump();
                Ok(Decl::Type(self.gen_decl(Self::type_spec)?))
            }
            Tok::Func => Ok(Decl::Func(self.func_decl()?)),
            _ => Err(self.unexpected("declaration")),
        }
    }

    fn gen_decl<S: Decorated>(
        &mut self,
        item: impl FnMut(&mut Self) -> PResult<S>,
    ) -> PResult<GenDecl<S>> {
        if self.at(Tok::LParen) {
            let specs = self.list(Tok::LParen, Tok::RParen, item)?;
            return Ok(GenDecl {
                decs: Decorations::default(),
                grouped: true,
                specs,
            });
        }
        let mut item = item;
        Ok(GenDecl::single(item(self)?))
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.peek() {
            Tok::Ident | Tok::Dot => Some(self.bump().text(self.src).to_string()),
            _ => None,
        };
        let path = match self.peek() {
            Tok::String | Tok::RawString => self.bump().text(self.src).to_string(),
            _ => return Err(self.unexpected("import path")),
        };
        Ok(ImportSpec {
            decs: Decorations::default(),
            name,
            path,
        })
    }

    fn value_spec(&mut self) -> PResult<ValueSpec> {
        let names = self.ident_list()?;

        let ty = match self.peek() {
            Tok::Assign | Tok::Semi | Tok::RParen | Tok::Eof => None,
            _ => Some(self.scan_text("type", |t, _| t == Tok::Assign)?),
        };

        let (values, iota) = if self.at(Tok::Assign) {
            self.bump();
            let range = self.scan(|_, _| false)?;
            if range.is_empty() {
                return Err(self.unexpected("expression"));
            }
            let iota = self.toks[range.clone()]
                .iter()
                .any(|t| t.tok == Tok::Ident && t.text(self.src) == "iota");
            (Some(self.text_of(range)), iota)
        } else {
            (None, false)
        };

        Ok(ValueSpec {
            decs: Decorations::default(),
            names,
            ty,
            values,
            iota,
        })
    }

    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.ident()?;

        let params = if self.at(Tok::LBrack) && self.starts_type_params() {
            let open = self.pos;
            let close = self
                .matching_brack(open)
                .ok_or_else(|| self.unexpected("`]`"))?;
            while self.pos <= close {
                self.advance();
            }
            Some(self.text_of(open..close + 1))
        } else {
            None
        };

        let alias = self.at(Tok::Assign);
        if alias {
            self.bump();
        }

        Ok(TypeSpec {
            decs: Decorations::default(),
            name,
            params,
            alias,
            ty: self.type_expr()?,
        })
    }

    /// `type A[T any]` vs. the array type in `type A [N]T`.
    fn starts_type_params(&self) -> bool {
        self.nth(1) == Tok::Ident
            && matches!(
                self.nth(2),
                Tok::Ident
                    | Tok::Comma
                    | Tok::Interface
                    | Tok::Map
                    | Tok::Chan
                    | Tok::Func
                    | Tok::Struct
                    | Tok::Tilde
            )
    }

    /// A struct or interface literal type becomes a member list; any other
    /// type stays text.
    fn type_expr(&mut self) -> PResult<TypeExpr> {
        match (self.peek(), self.nth(1)) {
            (Tok::Struct, Tok::LBrace) => {
                self.bump();
                Ok(TypeExpr::Struct(self.list(
                    Tok::LBrace,
                    Tok::RBrace,
                    Self::struct_field,
                )?))
            }
            (Tok::Interface, Tok::LBrace) => {
                self.bump();
                Ok(TypeExpr::Interface(self.list(
                    Tok::LBrace,
                    Tok::RBrace,
                    Self::interface_elem,
                )?))
            }
            _ => Ok(TypeExpr::Text(self.scan_text("type", |t, _| {
                matches!(t, Tok::String | Tok::RawString)
            })?)),
        }
    }

    fn struct_field(&mut self) -> PResult<Field> {
        let (names, ty) = if self.field_is_embedded() {
            let ty = self.scan_text("embedded type", |t, _| {
                matches!(t, Tok::String | Tok::RawString)
            })?;
            (SmallVec::new(), TypeExpr::Text(ty))
        } else {
            (self.ident_list()?, self.type_expr()?)
        };

        let tag = match self.peek() {
            Tok::String | Tok::RawString => Some(self.bump().text(self.src).to_string()),
            _ => None,
        };

        Ok(Field {
            decs: Decorations::default(),
            names,
            ty,
            tag,
        })
    }

    fn field_is_embedded(&self) -> bool {
        let ends_field = |t: Tok| {
            matches!(
                t,
                Tok::Semi | Tok::RBrace | Tok::String | Tok::RawString | Tok::Eof
            )
        };
        match self.peek() {
            Tok::Star => true,
            Tok::Ident => match self.nth(1) {
                Tok::Dot => true,
                // `List[T]` embedded vs. `Names []T`
                Tok::LBrack => self
                    .matching_brack(self.pos + 1)
                    .and_then(|close| self.toks.get(close + 1))
                    .is_some_and(|t| ends_field(t.tok)),
                t => ends_field(t),
            },
            _ => false,
        }
    }

    fn interface_elem(&mut self) -> PResult<Field> {
        if self.at(Tok::Ident) && self.nth(1) == Tok::LParen {
            let name = self.ident()?;
            let sig = self.scan_text("method signature", |_, _| false)?;
            return Ok(Field::named(&name, TypeExpr::Signature(sig)));
        }
        let ty = self.scan_text("interface element", |_, _| false)?;
        Ok(Field::embedded(TypeExpr::Text(ty)))
    }

    fn func_decl(&mut self) -> PResult<FuncDecl> {
        self.expect(Tok::Func)?;
        let signature = self.scan_text("function signature", |t, prev| {
            t == Tok::LBrace && !matches!(prev, Some(Tok::Struct | Tok::Interface))
        })?;
        let body = if self.at(Tok::LBrace) {
            Some(self.func_body()?)
        } else {
            None
        };
        Ok(FuncDecl {
            decs: Decorations::default(),
            signature,
            body,
        })
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn block(&mut self) -> PResult<Block> {
        let list = self.list(Tok::LBrace, Tok::RBrace, Self::stmt)?;
        Ok(Block {
            opening: list.opening,
            stmts: list.items,
            closing: list.closing,
            one_line: false,
        })
    }

    fn func_body(&mut self) -> PResult<Block> {
        let open = self.cur_start();
        let mut body = self.block()?;
        let close = self.toks[self.pos - 1].span.start as usize;
        body.one_line = !self.newline_between(open, close);
        Ok(body)
    }

    fn stmt(&mut self) -> PResult<Stmt> {
        let label = if self.at(Tok::Ident) && self.nth(1) == Tok::Colon {
            let label = self.ident()?;
            self.bump();
            Some(label)
        } else {
            None
        };

        let kind = match (label.is_some(), self.peek()) {
            (true, _) => StmtKind::Plain,
            (false, Tok::Return) => StmtKind::Exit(Exit::Return),
            (false, Tok::Break) => StmtKind::Exit(Exit::Break),
            (false, Tok::Continue) => StmtKind::Exit(Exit::Continue),
            (false, Tok::Goto) => StmtKind::Exit(Exit::Goto),
            (false, Tok::Fallthrough) => StmtKind::Exit(Exit::Fallthrough),
            _ => StmtKind::Plain,
        };

        let parts = match self.peek() {
            Tok::Semi | Tok::RBrace | Tok::Eof if label.is_some() => Vec::new(),
            Tok::LBrace => vec![Part::Block(self.block()?)],
            _ => self.stmt_parts()?,
        };

        Ok(Stmt {
            decs: Decorations::default(),
            label,
            kind,
            parts,
        })
    }

    fn flush_text(&mut self, parts: &mut Vec<Part>, seg: usize) {
        if seg < self.pos {
            let text = self.text_of(seg..self.pos);
            if !text.is_empty() {
                parts.push(Part::Text(text));
            }
        }
    }

    /// Splits one statement into text and the blocks nested in it: bodies of
    /// `if`/`for`/`switch`/`select`/`else` and function literals.
    fn stmt_parts(&mut self) -> PResult<Vec<Part>> {
        let first = self.pos;
        let mut parts = Vec::new();
        let mut seg = self.pos;
        let mut stack: Vec<Frame> = Vec::new();
        // Stack depths at which a `func` still waits for its body.
        let mut funcs: Vec<usize> = Vec::new();
        // Keyword whose body is still ahead.
        let mut header: Option<Tok> = None;
        let mut type_body_ends: Vec<usize> = Vec::new();

        loop {
            let tok = self.peek();
            let depth = stack.len();
            match tok {
                Tok::Eof => return Err(self.unexpected("end of statement")),
                Tok::Semi if depth == 0 && header.is_none() => break,
                Tok::RBrace | Tok::RParen | Tok::RBrack if depth == 0 => break,
                Tok::Case | Tok::Default if depth == 0 && header.is_none() => break,
                Tok::If | Tok::For | Tok::Switch | Tok::Select if depth == 0 => {
                    header = Some(tok);
                    self.advance();
                }
                Tok::Func => {
                    let prev = self.prev_tok(first);
                    if !matches!(prev, Some(Tok::RBrack | Tok::Chan))
                        && stack.last() != Some(&Frame::TypeBody)
                    {
                        funcs.push(depth);
                    }
                    self.advance();
                }
                Tok::LBrace => {
                    let prev = self.prev_tok(first);
                    if matches!(prev, Some(Tok::Struct | Tok::Interface)) {
                        stack.push(Frame::TypeBody);
                        self.advance();
                        continue;
                    }

                    if funcs.last() == Some(&depth) {
                        funcs.pop();
                        self.flush_text(&mut parts, seg);
                        parts.push(Part::Block(self.func_body()?));
                        seg = self.pos;
                        continue;
                    }

                    let body = depth == 0
                        && (prev == Some(Tok::Else)
                            || header.is_some() && !self.opens_composite(first, &type_body_ends));
                    if body {
                        self.flush_text(&mut parts, seg);
                        match header.take() {
                            Some(Tok::Switch | Tok::Select) => {
                                parts.push(Part::Cases(self.case_body()?))
                            }
                            _ => parts.push(Part::Block(self.block()?)),
                        }
                        seg = self.pos;
                        continue;
                    }

                    stack.push(Frame::Brace);
                    self.advance();
                }
                Tok::LParen => {
                    stack.push(Frame::Paren);
                    self.advance();
                }
                Tok::LBrack => {
                    stack.push(Frame::Brack);
                    self.advance();
                }
                Tok::RBrace | Tok::RParen | Tok::RBrack => {
                    if stack.pop() == Some(Frame::TypeBody) {
                        type_body_ends.push(self.pos);
                    }
                    let depth = stack.len();
                    funcs.retain(|&d| d <= depth);
                    self.advance();
                }
                Tok::Semi | Tok::Comma | Tok::Assign | Tok::Define
                    if funcs.last() == Some(&depth) =>
                {
                    // a function type, not a literal
                    funcs.pop();
                    self.advance();
                }
                _ => self.advance(),
            }
        }

        self.flush_text(&mut parts, seg);
        Ok(parts)
    }

    /// Whether the `{` at the cursor opens a composite literal inside a
    /// statement header, as in `range []T{a, b} {`.
    fn opens_composite(&self, floor: usize, type_body_ends: &[usize]) -> bool {
        let Some(prev) = self.pos.checked_sub(1).filter(|&i| i >= floor) else {
            return false;
        };
        match self.toks[prev].tok {
            Tok::RBrace => type_body_ends.contains(&prev),
            Tok::Ident => {
                let mut i = prev;
                while i > floor && matches!(self.toks[i - 1].tok, Tok::Ident | Tok::Dot) {
                    i -= 1;
                }
                while i > floor && self.toks[i - 1].tok == Tok::Star {
                    i -= 1;
                }
                i > floor && self.toks[i - 1].tok == Tok::RBrack
            }
            _ => false,
        }
    }

    fn case_body(&mut self) -> PResult<CaseBody> {
        let opening = self.opening(Tok::LBrace)?;
        let mut clauses = Vec::new();

        loop {
            self.skip_semis();
            match self.peek() {
                Tok::RBrace => break,
                Tok::Case | Tok::Default => clauses.push(self.decorated(Self::case_clause)?),
                _ => return Err(self.unexpected("`case` or `default`")),
            }
        }

        let closing = self.closing();
        self.expect(Tok::RBrace)?;
        Ok(CaseBody {
            opening,
            clauses,
            closing,
        })
    }

    fn case_clause(&mut self) -> PResult<CaseClause> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Tok::Colon if depth == 0 => break,
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace if depth > 0 => depth -= 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace | Tok::Eof => {
                    return Err(self.unexpected("`:`"))
                }
                _ => {}
            }
            self.advance();
        }
        let head = self.text_of(start..self.pos);
        self.bump();
        let opening = self.trailing();

        let ends_clause = |t: Tok| matches!(t, Tok::Case | Tok::Default | Tok::RBrace);
        let mut body = Vec::new();
        loop {
            self.skip_semis();
            if ends_clause(self.peek()) {
                break;
            }
            if self.at(Tok::Eof) {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.decorated(Self::stmt)?);
            if !ends_clause(self.peek()) {
                self.expect_semi()?;
            }
        }

        Ok(CaseClause {
            decs: Decorations::default(),
            head,
            opening,
            body,
        })
    }
}

#[inline]
fn space(blank: bool) -> Space {
    if blank {
        Space::Blank
    } else {
        Space::Line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> SourceFile {
        match parse(src) {
            Ok(f) => f,
            Err(e) => panic!("parse failed: {e}\n{src}"),
        }
    }

    fn struct_fields(file: &SourceFile) -> &List<Field> {
        match &file.decls[0] {
            Decl::Type(g) => match &g.specs.items[0].ty {
                TypeExpr::Struct(l) => l,
                other => panic!("not a struct: {other:?}"),
            },
            other => panic!("not a type decl: {other:?}"),
        }
    }

    #[test]
    fn field_shapes() {
        let f = parse_ok(
            "package p\n\ntype T struct {\n\tio.Reader\n\t*Base\n\tList[int]\n\tNames []string\n\tA, B int `json:\"a\"`\n}\n",
        );
        let fields = struct_fields(&f);
        let embedded: Vec<_> = fields.items.iter().map(Field::is_embedded).collect();
        assert_eq!(embedded, vec![true, true, true, false, false]);
        assert_eq!(fields.items[4].names.as_slice(), ["A", "B"]);
        assert_eq!(fields.items[4].tag.as_deref(), Some("`json:\"a\"`"));
    }

    #[test]
    fn comments_attach_to_fields() {
        let f = parse_ok(
            "package p\n\ntype T struct { // open\n\t// doc for A\n\tA int // about A\n\n\tB int\n\t// dangling\n}\n",
        );
        let fields = struct_fields(&f);
        assert_eq!(fields.opening, vec!["// open"]);
        assert_eq!(fields.items[0].decs.leading[0].text, "// doc for A");
        assert_eq!(fields.items[0].decs.trailing, vec!["// about A"]);
        assert_eq!(fields.items[1].decs.before, Space::Blank);
        assert_eq!(fields.closing.leading[0].text, "// dangling");
    }

    #[test]
    fn iota_is_detected() {
        let f = parse_ok("package p\n\nconst (\n\tA = iota + 1\n\tB\n)\n");
        let Decl::Const(g) = &f.decls[0] else {
            panic!("expected const");
        };
        assert!(g.specs.items[0].iota);
        assert_eq!(g.specs.items[1].values, None);

        let f = parse_ok("package p\n\nconst (\n\tA = \"iota\"\n\tB = `iota`\n)\n");
        let Decl::Const(g) = &f.decls[0] else {
            panic!("expected const");
        };
        assert!(g.specs.items.iter().all(|s| !s.iota));
    }

    #[test]
    fn statements_split_into_blocks() {
        let f = parse_ok(
            "package p\n\nfunc f(xs []int) error {\n\tfor _, x := range []int{1, 2} {\n\t\tif x > 1 {\n\t\t\tbreak\n\t\t} else {\n\t\t\tcontinue\n\t\t}\n\t}\n\treturn nil\n}\n",
        );
        let Decl::Func(func) = &f.decls[0] else {
            panic!("expected func");
        };
        assert_eq!(func.signature, "f(xs []int) error");
        let body = func.body.as_ref().expect("body");
        assert_eq!(body.stmts.len(), 2);
        assert_eq!(body.stmts[1].kind, StmtKind::Exit(Exit::Return));

        let for_parts = &body.stmts[0].parts;
        assert_eq!(for_parts[0], Part::Text("for _, x := range []int{1, 2}".into()));
        let Part::Block(for_body) = &for_parts[1] else {
            panic!("expected loop body");
        };
        let if_parts = &for_body.stmts[0].parts;
        assert_eq!(if_parts.len(), 4);
        assert_eq!(if_parts[2], Part::Text("else".into()));
    }

    #[test]
    fn switch_clauses() {
        let f = parse_ok(
            "package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1, 2:\n\t\tg()\n\t\treturn\n\tdefault:\n\t}\n}\n",
        );
        let Decl::Func(func) = &f.decls[0] else {
            panic!("expected func");
        };
        let stmt = &func.body.as_ref().expect("body").stmts[0];
        let Part::Cases(cases) = &stmt.parts[1] else {
            panic!("expected case body");
        };
        assert_eq!(cases.clauses.len(), 2);
        assert_eq!(cases.clauses[0].head, "case 1, 2");
        assert_eq!(cases.clauses[0].body.len(), 2);
        assert!(cases.clauses[1].body.is_empty());
    }

    #[test]
    fn func_literal_bodies_are_blocks() {
        let f = parse_ok("package p\n\nfunc f() {\n\tgo func() {\n\t\treturn\n\t}()\n\tvar h func()\n\t_ = h\n}\n");
        let Decl::Func(func) = &f.decls[0] else {
            panic!("expected func");
        };
        let stmts = &func.body.as_ref().expect("body").stmts;
        assert_eq!(stmts.len(), 3);
        assert!(matches!(stmts[0].parts.as_slice(), [Part::Text(_), Part::Block(_), Part::Text(t)] if t == "()"));
        assert_eq!(stmts[1].parts, vec![Part::Text("var h func()".into())]);
    }

    #[test]
    fn one_line_func_bodies_are_marked() {
        let f = parse_ok("package p\n\nfunc f() { return }\n\nfunc g() {\n\th := func() { f() }\n\tif true { h() }\n}\n");
        let bodies: Vec<&Block> = f
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Func(func) => func.body.as_ref(),
                _ => None,
            })
            .collect();
        assert!(bodies[0].one_line);
        assert!(!bodies[1].one_line);

        let nested: Vec<bool> = bodies[1]
            .stmts
            .iter()
            .flat_map(|s| &s.parts)
            .filter_map(|p| match p {
                Part::Block(b) => Some(b.one_line),
                _ => None,
            })
            .collect();
        // func literal, then the `if` body
        assert_eq!(nested, vec![true, false]);
    }

    #[test]
    fn comment_before_body_brace_opens_the_body() {
        let f = parse_ok("package p\n\nfunc f() {\n\tif x /* c */ {\n\t\treturn\n\t}\n\tg()\n}\n");
        let Decl::Func(func) = &f.decls[0] else {
            panic!("expected func");
        };
        let stmt = &func.body.as_ref().expect("body").stmts[0];
        assert!(stmt.decs.trailing.is_empty(), "{:?}", stmt.decs);
        let Part::Block(body) = &stmt.parts[1] else {
            panic!("expected if body");
        };
        assert_eq!(body.opening, vec!["/* c */"]);
    }

    #[test]
    fn reports_position_of_syntax_error() {
        let err = parse("package p\n\nfunc f() {\n").unwrap_err();
        assert_eq!(err.diags.len(), 1);
        assert_eq!(err.diags[0].kind, DiagKind::Parse);
    }
}
