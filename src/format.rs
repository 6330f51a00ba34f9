//! Dispatches every top-level declaration to its canonicalizer.

use gocanon_syntax::tree::{Decl, SourceFile};
use gocanon_syntax::{parse, print, ParseFailure};
use tracing::debug;

use crate::base::BaseFormatter;
use crate::config::CanonConfig;
use crate::error::FormatError;
use crate::fields::FieldCategorizer;
use crate::imports;
use crate::spacing::ControlFlowSpacer;
use crate::specs::{sort_group, SpecOutcome};

/// What one pass over a file changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub aliases_stripped: usize,
    pub groups_sorted: usize,
    pub groups_frozen: usize,
    pub field_lists_reordered: usize,
    pub blank_lines_inserted: usize,
}

impl Report {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    fn record(&mut self, outcome: SpecOutcome) {
        match outcome {
            SpecOutcome::Sorted => self.groups_sorted += 1,
            SpecOutcome::Frozen => self.groups_frozen += 1,
            SpecOutcome::Unchanged => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: CanonConfig,
    base: Option<BaseFormatter>,
}

impl Formatter {
    pub fn new(config: CanonConfig) -> Self {
        Self { config, base: None }
    }

    /// Runs `base` over the source before parsing and over the result.
    pub fn with_base(mut self, base: BaseFormatter) -> Self {
        self.base = Some(base);
        self
    }

    pub fn config(&self) -> &CanonConfig {
        &self.config
    }

    /// Applies every rule to the tree in place.
    pub fn canonicalize(&self, file: &mut SourceFile) -> Report {
        let mut report = Report::default();
        let fields = FieldCategorizer::new(&self.config.fields);
        let mut spacer = ControlFlowSpacer::default();

        for decl in &mut file.decls {
            match decl {
                Decl::Import(g) => report.aliases_stripped += imports::normalize(&mut g.specs),
                Decl::Const(g) => report.record(sort_group(&mut g.specs, true)),
                Decl::Var(g) => report.record(sort_group(&mut g.specs, false)),
                Decl::Type(g) => {
                    for spec in &mut g.specs.items {
                        report.field_lists_reordered += fields.categorize_type(&mut spec.ty);
                    }
                }
                Decl::Func(f) => spacer.space(f),
            }
        }
        report.blank_lines_inserted = spacer.inserted;
        debug!(?report, "canonicalized");
        report
    }

    /// Canonicalizes a parse result.
    pub fn format_tree(
        &self,
        parsed: Result<SourceFile, ParseFailure>,
    ) -> Result<SourceFile, FormatError> {
        let mut file = parsed?;
        self.canonicalize(&mut file);
        Ok(file)
    }

    /// Source text in, canonical source text out.
    pub fn format_source(&self, src: &str) -> Result<String, FormatError> {
        let based;
        let src = match &self.base {
            Some(base) => {
                based = base.run(src)?;
                based.as_str()
            }
            None => src,
        };

        let file = self.format_tree(parse(src))?;
        if file.decls.is_empty() {
            return Ok(src.to_string());
        }
        let out = print(&file)?;
        match &self.base {
            Some(base) => Ok(base.run(&out)?),
            None => Ok(out),
        }
    }
}
