//! Canonical order for struct fields and interface elements.

use gocanon_syntax::tree::{Field, List, TypeExpr};

use crate::config::FieldOrder;
use crate::order::sort_folded;

/// Emission order of field categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Embedded,
    Role,
    Identifier,
    General,
    Temporal,
}

pub struct FieldCategorizer<'a> {
    order: &'a FieldOrder,
}

impl<'a> FieldCategorizer<'a> {
    pub fn new(order: &'a FieldOrder) -> Self {
        Self { order }
    }

    pub fn bucket(&self, field: &Field) -> Bucket {
        let Some(name) = field.names.first() else {
            return Bucket::Embedded;
        };
        if *name == self.order.role {
            Bucket::Role
        } else if *name == self.order.identifier {
            Bucket::Identifier
        } else if self.order.is_timestamp(name) {
            Bucket::Temporal
        } else {
            Bucket::General
        }
    }

    /// Reorders the member list of a struct or interface type, nested lists
    /// first. Returns how many lists changed order.
    pub fn categorize_type(&self, ty: &mut TypeExpr) -> usize {
        match ty {
            TypeExpr::Struct(list) | TypeExpr::Interface(list) => self.categorize(list),
            TypeExpr::Signature(_) | TypeExpr::Text(_) => 0,
        }
    }

    pub fn categorize(&self, list: &mut List<Field>) -> usize {
        let nested: usize = list
            .items
            .iter_mut()
            .map(|f| self.categorize_type(&mut f.ty))
            .sum();
        if list.items.len() < 2 {
            return nested;
        }

        let mut buckets: [Vec<Field>; 5] = Default::default();
        let mut changed = false;
        let mut last = Bucket::Embedded;
        for field in list.items.drain(..) {
            let b = self.bucket(&field);
            changed |= b < last;
            last = last.max(b);
            buckets[b as usize].push(field);
        }
        for bucket in &mut buckets {
            changed |= sort_folded(bucket, sort_key);
        }
        list.items.extend(buckets.into_iter().flatten());
        nested + usize::from(changed)
    }
}

/// First name, or the type text for embedded entries.
fn sort_key(field: &Field) -> &str {
    match field.names.first() {
        Some(name) => name,
        None => match &field.ty {
            TypeExpr::Text(t) | TypeExpr::Signature(t) => t,
            TypeExpr::Struct(_) => "struct",
            TypeExpr::Interface(_) => "interface",
        },
    }
}
