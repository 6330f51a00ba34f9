use crate::tree::*;
use smallvec::SmallVec;

// Core traits
pub trait Walk {
    /// Visit this node. Nodes with a `#[walk(visit = ..)]` hook route through
    /// the visitor first; everything else descends directly.
    #[inline(always)]
    fn walk<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        self.walk_children(v);
    }

    fn walk_children<V: VisitorMut + ?Sized>(&mut self, v: &mut V);
}

/// Mutable visitor over the owned tree. Every default descends into the
/// node's children, so an override that still wants the subtree visited
/// calls `node.walk_children(self)` itself.
pub trait VisitorMut {
    #[inline(always)]
    fn visit_source_file(&mut self, f: &mut SourceFile) {
        f.walk_children(self);
    }

    #[inline(always)]
    fn visit_block(&mut self, b: &mut Block) {
        b.walk_children(self);
    }

    #[inline(always)]
    fn visit_case_clause(&mut self, c: &mut CaseClause) {
        c.walk_children(self);
    }
}

impl<T: Walk> Walk for Vec<T> {
    #[inline(always)]
    fn walk_children<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        for item in self.iter_mut() {
            item.walk(v);
        }
    }
}

impl<T: Walk> Walk for Option<T> {
    #[inline(always)]
    fn walk_children<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        if let Some(inner) = self {
            inner.walk(v);
        }
    }
}

impl<T: Walk> Walk for Box<T> {
    #[inline(always)]
    fn walk<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        (**self).walk(v);
    }

    #[inline(always)]
    fn walk_children<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        (**self).walk_children(v);
    }
}

// Leaves: text and decorations carry no structure to visit.
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Walk for $ty {
                #[inline(always)]
                fn walk_children<V: VisitorMut + ?Sized>(&mut self, _v: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    String,
    bool,
    Space,
    Comment,
    Decorations,
    StmtKind,
    Exit,
    SmallVec<[String; 1]>,
}

impl SourceFile {
    /// Entry point for a visitor over the whole file.
    pub fn accept<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        v.visit_source_file(self);
    }
}
