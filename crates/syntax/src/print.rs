//! Renders the owned tree back to Go source.
//!
//! Layout is gofmt-shaped: tab indentation, one item per line, comments where
//! the parser found them. Column alignment is left to the base formatter.

use crate::error::PrintError;
use crate::tree::*;

/// Prints a file. Fails only on nodes that cannot be valid Go, such as a
/// value spec without names.
pub fn print(file: &SourceFile) -> Result<String, PrintError> {
    let mut p = Printer::default();
    p.source_file(file)?;
    Ok(p.out)
}

type PResult = Result<(), PrintError>;

#[derive(Default)]
struct Printer {
    out: String,
}

/// Text that binds to a preceding `}` without a space.
const TIGHT_AFTER_BRACE: &[char] = &[')', ',', '.', '(', ';', ']', ':', '}'];

impl Printer {
    #[inline]
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    #[inline]
    fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Tab depth of the line currently being written, at least `min`.
    fn line_depth(&self, min: usize) -> usize {
        let line = match self.out.rfind('\n') {
            Some(i) => &self.out[i + 1..],
            None => &self.out,
        };
        let tabs = line.bytes().take_while(|&b| b == b'\t').count();
        tabs.max(min)
    }

    fn leading(&mut self, decs: &Decorations, depth: usize, first: bool) {
        if !first && decs.before == Space::Blank {
            self.newline();
        }
        for c in &decs.leading {
            self.indent(depth);
            self.out.push_str(&c.text);
            self.newline();
            if c.blank_after {
                self.newline();
            }
        }
    }

    fn trailing(&mut self, comments: &[String]) {
        for c in comments {
            self.out.push(' ');
            self.out.push_str(c);
        }
    }

    fn closing(&mut self, decs: &Decorations, depth: usize) {
        if decs.leading.is_empty() {
            return;
        }
        self.leading(decs, depth, false);
    }

    /// One line-oriented item: leading comments, `body`, trailing comments.
    fn item(
        &mut self,
        decs: &Decorations,
        depth: usize,
        first: bool,
        body: impl FnOnce(&mut Self) -> PResult,
    ) -> PResult {
        self.leading(decs, depth, first);
        self.indent(depth);
        body(self)?;
        self.trailing(&decs.trailing);
        self.newline();
        Ok(())
    }

    /// `open` items `close`, with `bare` for an empty list without comments.
    fn seq<T: Decorated>(
        &mut self,
        (open, close, bare): (&str, &str, &str),
        opening: &[String],
        items: &[T],
        closing: &Decorations,
        depth: usize,
        mut each: impl FnMut(&mut Self, &T, usize) -> PResult,
    ) -> PResult {
        if items.is_empty() && opening.is_empty() && closing.leading.is_empty() {
            self.out.push_str(bare);
            return Ok(());
        }

        self.out.push_str(open);
        self.trailing(opening);
        self.newline();
        for (i, it) in items.iter().enumerate() {
            self.item(it.decorations(), depth + 1, i == 0, |p| each(p, it, depth + 1))?;
        }
        self.closing(closing, depth + 1);
        self.indent(depth);
        self.out.push_str(close);
        Ok(())
    }

    fn source_file(&mut self, file: &SourceFile) -> PResult {
        let pkg = &file.package;
        self.item(&pkg.decs, 0, true, |p| {
            p.out.push_str("package ");
            p.out.push_str(&pkg.name);
            Ok(())
        })?;

        for decl in &file.decls {
            self.item(decl.decorations(), 0, false, |p| p.decl(decl, 0))?;
        }

        self.closing(&file.closing, 0);
        Ok(())
    }

    fn decl(&mut self, decl: &Decl, depth: usize) -> PResult {
        match decl {
            Decl::Import(g) => self.gen_decl("import", g, depth, |p, s, _| p.import_spec(s)),
            Decl::Const(g) => self.gen_decl("const", g, depth, |p, s, _| p.value_spec(s)),
            Decl::Var(g) => self.gen_decl("var", g, depth, |p, s, _| p.value_spec(s)),
            Decl::Type(g) => self.gen_decl("type", g, depth, Self::type_spec),
            Decl::Func(f) => self.func_decl(f, depth),
        }
    }

    fn gen_decl<S: Decorated>(
        &mut self,
        keyword: &'static str,
        g: &GenDecl<S>,
        depth: usize,
        mut spec: impl FnMut(&mut Self, &S, usize) -> PResult,
    ) -> PResult {
        self.out.push_str(keyword);
        self.out.push(' ');

        let specs = &g.specs;
        let inline = !g.grouped
            && specs.opening.is_empty()
            && specs.closing.leading.is_empty()
            && specs.items.len() == 1
            && specs.items[0].decorations().leading.is_empty();

        if inline {
            let only = &specs.items[0];
            spec(self, only, depth)?;
            self.trailing(&only.decorations().trailing);
            return Ok(());
        }
        if !g.grouped && specs.items.is_empty() {
            return Err(PrintError::EmptyDecl { keyword });
        }

        self.seq(
            ("(", ")", "()"),
            &specs.opening,
            &specs.items,
            &specs.closing,
            depth,
            spec,
        )
    }

    fn import_spec(&mut self, s: &ImportSpec) -> PResult {
        if s.path.is_empty() {
            return Err(PrintError::MissingImportPath);
        }
        if let Some(name) = &s.name {
            self.out.push_str(name);
            self.out.push(' ');
        }
        self.out.push_str(&s.path);
        Ok(())
    }

    fn value_spec(&mut self, s: &ValueSpec) -> PResult {
        if s.names.is_empty() {
            return Err(PrintError::UnnamedSpec);
        }
        self.out.push_str(&s.names.join(", "));
        if let Some(ty) = &s.ty {
            self.out.push(' ');
            self.out.push_str(ty);
        }
        if let Some(values) = &s.values {
            self.out.push_str(" = ");
            self.out.push_str(values);
        }
        Ok(())
    }

    fn type_spec(&mut self, s: &TypeSpec, depth: usize) -> PResult {
        if s.name.is_empty() {
            return Err(PrintError::UnnamedType);
        }
        self.out.push_str(&s.name);
        if let Some(params) = &s.params {
            self.out.push_str(params);
        }
        self.out.push_str(if s.alias { " = " } else { " " });
        self.type_expr(&s.ty, depth)
    }

    fn type_expr(&mut self, ty: &TypeExpr, depth: usize) -> PResult {
        match ty {
            TypeExpr::Struct(l) => self.seq(
                ("struct {", "}", "struct{}"),
                &l.opening,
                &l.items,
                &l.closing,
                depth,
                Self::field,
            ),
            TypeExpr::Interface(l) => self.seq(
                ("interface {", "}", "interface{}"),
                &l.opening,
                &l.items,
                &l.closing,
                depth,
                Self::field,
            ),
            TypeExpr::Signature(s) | TypeExpr::Text(s) => {
                self.out.push_str(s);
                Ok(())
            }
        }
    }

    fn field(&mut self, f: &Field, depth: usize) -> PResult {
        self.out.push_str(&f.names.join(", "));
        if !f.names.is_empty() && !matches!(f.ty, TypeExpr::Signature(_)) {
            self.out.push(' ');
        }
        self.type_expr(&f.ty, depth)?;
        if let Some(tag) = &f.tag {
            self.out.push(' ');
            self.out.push_str(tag);
        }
        Ok(())
    }

    fn func_decl(&mut self, f: &FuncDecl, depth: usize) -> PResult {
        self.out.push_str("func ");
        self.out.push_str(&f.signature);
        if let Some(body) = &f.body {
            self.out.push(' ');
            self.block(body, depth)?;
        }
        Ok(())
    }

    fn block(&mut self, b: &Block, depth: usize) -> PResult {
        if stays_on_one_line(b) {
            match b.stmts.first() {
                Some(only) => {
                    self.out.push_str("{ ");
                    self.stmt(only, depth)?;
                    self.out.push_str(" }");
                }
                None => self.out.push_str("{}"),
            }
            return Ok(());
        }
        self.seq(
            ("{", "}", "{}"),
            &b.opening,
            &b.stmts,
            &b.closing,
            depth,
            Self::stmt,
        )
    }

    /// Statement body; the caller has already indented to `depth`.
    fn stmt(&mut self, s: &Stmt, depth: usize) -> PResult {
        if let Some(label) = &s.label {
            // Labels sit one level left of their statement.
            self.out.truncate(self.out.trim_end_matches('\t').len());
            self.indent(depth.saturating_sub(1));
            self.out.push_str(label);
            self.out.push(':');
            if s.parts.is_empty() {
                return Ok(());
            }
            self.newline();
            self.indent(depth);
        }

        let mut after_brace = false;
        for (i, part) in s.parts.iter().enumerate() {
            match part {
                Part::Text(t) => {
                    if after_brace && !t.starts_with(TIGHT_AFTER_BRACE) {
                        self.out.push(' ');
                    }
                    self.out.push_str(t);
                    after_brace = false;
                }
                Part::Block(b) => {
                    if i > 0 {
                        self.out.push(' ');
                    }
                    let d = self.line_depth(depth);
                    self.block(b, d)?;
                    after_brace = true;
                }
                Part::Cases(c) => {
                    if i > 0 {
                        self.out.push(' ');
                    }
                    let d = self.line_depth(depth);
                    self.cases(c, d)?;
                    after_brace = true;
                }
            }
        }
        Ok(())
    }

    /// `switch`/`select` body: clauses line up with the keyword.
    fn cases(&mut self, c: &CaseBody, depth: usize) -> PResult {
        if c.clauses.is_empty() && c.opening.is_empty() && c.closing.leading.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }

        self.out.push('{');
        self.trailing(&c.opening);
        self.newline();
        for (i, clause) in c.clauses.iter().enumerate() {
            self.leading(&clause.decs, depth, i == 0);
            self.indent(depth);
            self.out.push_str(&clause.head);
            self.out.push(':');
            self.trailing(&clause.opening);
            self.trailing(&clause.decs.trailing);
            self.newline();
            for (j, s) in clause.body.iter().enumerate() {
                self.item(&s.decs, depth + 1, j == 0, |p| p.stmt(s, depth + 1))?;
            }
        }
        self.closing(&c.closing, depth + 1);
        self.indent(depth);
        self.out.push('}');
        Ok(())
    }
}

/// A one-line function body that still holds at most one plain statement.
fn stays_on_one_line(b: &Block) -> bool {
    b.one_line
        && b.opening.is_empty()
        && b.closing.leading.is_empty()
        && b.stmts.len() <= 1
        && b.stmts.iter().all(|s| {
            s.label.is_none()
                && s.decs.is_bare()
                && s.parts.iter().all(|part| match part {
                    Part::Text(_) => true,
                    Part::Block(inner) => stays_on_one_line(inner),
                    Part::Cases(_) => false,
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn roundtrip(src: &str) -> String {
        let file = parse(src).expect("parses");
        print(&file).expect("prints")
    }

    #[test]
    fn gofmt_shaped_input_is_unchanged() {
        let src = "// Package p does things.\npackage p\n\nimport (\n\t\"fmt\"\n\n\tlog \"github.com/sirupsen/logrus\"\n)\n\n// T is a thing.\ntype T struct {\n\tA int // a\n\n\t// B doc\n\tB struct {\n\t\tC string `json:\"c\"`\n\t}\n}\n\nfunc (t *T) M() error {\n\tfor i := 0; i < 3; i++ {\n\t\tif i == 2 {\n\t\t\tcontinue\n\t\t}\n\t}\n\n\treturn fmt.Errorf(\"x\")\n}\n";
        assert_eq!(roundtrip(src), src);
    }

    #[test]
    fn labels_are_outdented() {
        let src = "package p\n\nfunc f() {\nouter:\n\tfor {\n\t\tbreak outer\n\t}\n}\n";
        assert_eq!(roundtrip(src), src);
    }

    #[test]
    fn switch_layout() {
        let src = "package p\n\nfunc f(x int) int {\n\tswitch x {\n\tcase 1:\n\t\treturn 1\n\tdefault:\n\t}\n\n\treturn 0\n}\n";
        assert_eq!(roundtrip(src), src);
    }

    #[test]
    fn func_literal_in_call_keeps_indentation() {
        let src = "package p\n\nfunc f() {\n\trun(\n\t\tfunc() {\n\t\t\tg()\n\t\t},\n\t)\n}\n";
        assert_eq!(roundtrip(src), src);
    }

    #[test]
    fn unnamed_value_spec_is_an_error() {
        let mut file = parse("package p\n\nvar x = 1\n").expect("parses");
        if let Decl::Var(g) = &mut file.decls[0] {
            g.specs.items[0].names.clear();
        }
        assert!(matches!(print(&file), Err(PrintError::UnnamedSpec)));
    }

    #[test]
    fn one_line_func_bodies_stay_on_one_line() {
        for src in [
            "package p\n\nfunc f() { return }\n",
            "package p\n\nfunc f() (err error) {\n\tdefer func() { err = wrap(err) }()\n\tg()\n\n\treturn\n}\n",
            "package p\n\nfunc f() {\n\tif ok := func() bool { return true }; ok() {\n\t\tg()\n\t}\n}\n",
            "package p\n\nfunc f() {\n\th := func() func() { return func() { g() } }\n\t_ = h\n}\n",
        ] {
            assert_eq!(roundtrip(src), src);
        }
    }

    #[test]
    fn one_line_body_with_several_statements_is_expanded() {
        let src = "package p\n\nfunc f() { g(); return }\n";
        assert_eq!(roundtrip(src), "package p\n\nfunc f() {\n\tg()\n\treturn\n}\n");
    }

    #[test]
    fn one_line_body_with_inserted_blank_is_expanded() {
        let mut file = parse("package p\n\nfunc f() { g(); return }\n").expect("parses");
        if let Decl::Func(f) = &mut file.decls[0] {
            let body = f.body.as_mut().expect("body");
            body.stmts.truncate(1);
            body.stmts[0].decs.before = Space::Blank;
        }
        assert_eq!(
            print(&file).expect("prints"),
            "package p\n\nfunc f() {\n\tg()\n}\n"
        );
    }

    #[test]
    fn comment_before_body_opens_the_block() {
        let src = "package p\n\nfunc f() {\n\tif x /* c */ {\n\t\treturn\n\t}\n}\n";
        assert_eq!(
            roundtrip(src),
            "package p\n\nfunc f() {\n\tif x { /* c */\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn empty_lists_print_bare() {
        let src = "package p\n\ntype E struct{}\n\ntype I interface{}\n\nfunc f() {}\n";
        assert_eq!(roundtrip(src), src);
    }
}
