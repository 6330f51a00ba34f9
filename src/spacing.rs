//! Blank line before `return`, `break`, `continue`, `goto` and
//! `fallthrough` when they are not the first statement of their block.

use gocanon_syntax::tree::{Block, CaseClause, FuncDecl, Space, Stmt};
use gocanon_syntax::{VisitorMut, Walk};

#[derive(Debug, Default)]
pub struct ControlFlowSpacer {
    /// Blank lines added so far.
    pub inserted: usize,
}

impl ControlFlowSpacer {
    pub fn space(&mut self, func: &mut FuncDecl) {
        func.walk(self);
    }

    fn space_list(&mut self, stmts: &mut [Stmt]) {
        for stmt in stmts.iter_mut().skip(1) {
            if stmt.is_exit() && stmt.label.is_none() && stmt.decs.before != Space::Blank {
                stmt.decs.before = Space::Blank;
                self.inserted += 1;
            }
        }
    }
}

impl VisitorMut for ControlFlowSpacer {
    fn visit_block(&mut self, b: &mut Block) {
        self.space_list(&mut b.stmts);
        b.walk_children(self);
    }

    fn visit_case_clause(&mut self, c: &mut CaseClause) {
        self.space_list(&mut c.body);
        c.walk_children(self);
    }
}
