//! Alphabetical order for `var` and `const` groups.

use gocanon_syntax::tree::{List, ValueSpec};

use crate::order::sort_folded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecOutcome {
    Unchanged,
    Sorted,
    /// Order carries meaning (`iota`, implicit repetition) and was kept.
    Frozen,
}

/// Whether reordering `specs` could change what the group declares.
pub fn is_frozen(specs: &[ValueSpec], is_const: bool) -> bool {
    specs
        .iter()
        .any(|s| s.iota || (is_const && s.values.is_none()))
}

pub fn sort_group(specs: &mut List<ValueSpec>, is_const: bool) -> SpecOutcome {
    if specs.len() < 2 {
        return SpecOutcome::Unchanged;
    }
    if is_frozen(&specs.items, is_const) {
        return SpecOutcome::Frozen;
    }

    // Unnamed specs are pinned; the named ones are sorted around them.
    let slots: Vec<usize> = specs
        .items
        .iter()
        .enumerate()
        .filter(|(_, s)| s.first_name().is_some())
        .map(|(i, _)| i)
        .collect();
    let mut named: Vec<ValueSpec> = slots.iter().map(|&i| specs.items[i].clone()).collect();
    if !sort_folded(&mut named, |s| s.first_name().unwrap_or_default()) {
        return SpecOutcome::Unchanged;
    }
    for (slot, spec) in slots.into_iter().zip(named) {
        specs.items[slot] = spec;
    }
    SpecOutcome::Sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn spec(name: &str, value: Option<&str>) -> ValueSpec {
        ValueSpec {
            decs: Default::default(),
            names: if name.is_empty() { smallvec![] } else { smallvec![name.to_string()] },
            ty: None,
            values: value.map(str::to_string),
            iota: value.is_some_and(|v| v.contains("iota")),
        }
    }

    fn order(list: &List<ValueSpec>) -> Vec<&str> {
        list.items.iter().map(|s| s.first_name().unwrap_or("?")).collect()
    }

    #[test]
    fn sorts_case_insensitively() {
        let mut l = List::new(vec![
            spec("zeta", Some("1")),
            spec("Beta", Some("2")),
            spec("alpha", Some("3")),
        ]);
        assert_eq!(sort_group(&mut l, false), SpecOutcome::Sorted);
        assert_eq!(order(&l), ["alpha", "Beta", "zeta"]);
    }

    #[test]
    fn iota_freezes_group() {
        let mut l = List::new(vec![
            spec("C", Some("iota")),
            spec("B", Some("2")),
            spec("A", Some("3")),
        ]);
        assert_eq!(sort_group(&mut l, true), SpecOutcome::Frozen);
        assert_eq!(order(&l), ["C", "B", "A"]);
    }

    #[test]
    fn iota_inside_expression_freezes_group() {
        let mut l = List::new(vec![spec("KB", Some("1 << (10 * (iota + 1))")), spec("A", Some("0"))]);
        assert_eq!(sort_group(&mut l, true), SpecOutcome::Frozen);
    }

    #[test]
    fn implicit_repetition_freezes_const_only() {
        let mut c = List::new(vec![spec("B", Some("1")), spec("A", None)]);
        assert_eq!(sort_group(&mut c, true), SpecOutcome::Frozen);

        let mut v = List::new(vec![spec("B", Some("1")), spec("A", None)]);
        assert_eq!(sort_group(&mut v, false), SpecOutcome::Sorted);
        assert_eq!(order(&v), ["A", "B"]);
    }

    #[test]
    fn unnamed_specs_stay_in_place() {
        let mut l = List::new(vec![
            spec("c", Some("1")),
            spec("", Some("2")),
            spec("b", Some("3")),
            spec("a", Some("4")),
        ]);
        assert_eq!(sort_group(&mut l, false), SpecOutcome::Sorted);
        assert_eq!(order(&l), ["a", "?", "b", "c"]);
    }

    #[test]
    fn singletons_and_sorted_groups_are_unchanged() {
        let mut one = List::new(vec![spec("x", Some("1"))]);
        assert_eq!(sort_group(&mut one, false), SpecOutcome::Unchanged);
        let mut two = List::new(vec![spec("a", Some("1")), spec("B", Some("1"))]);
        assert_eq!(sort_group(&mut two, false), SpecOutcome::Unchanged);
    }
}
