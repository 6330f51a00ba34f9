//! Drops import aliases that only restate the package's default name.

use gocanon_syntax::tree::{ImportSpec, List};

/// Name a package is imported as without an alias: the last path segment,
/// with `-` written as `_`.
pub fn default_package_name(path: &str) -> String {
    let unquoted = path.trim_matches(|c| c == '"' || c == '`');
    let base = unquoted.rsplit('/').next().unwrap_or(unquoted);
    base.replace('-', "_")
}

/// Removes redundant aliases in place. Order is preserved. Returns how many
/// aliases were dropped.
pub fn normalize(imports: &mut List<ImportSpec>) -> usize {
    let mut stripped = 0;
    for spec in &mut imports.items {
        let Some(name) = &spec.name else {
            continue;
        };
        if *name == default_package_name(&spec.path) {
            spec.name = None;
            stripped += 1;
        }
    }
    stripped
}
