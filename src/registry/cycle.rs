//! Inheritance cycle detection for the type registry.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::host::DeclaredType;
use crate::type_ref::TypeRef;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Find one inheritance cycle, if any, as a closed path starting at its
/// smallest type.
pub(super) fn find_cycle(types: &IndexMap<TypeRef, DeclaredType>) -> Option<Vec<TypeRef>> {
    let mut detector = CycleDetector::new(types);
    types.keys().find_map(|node| {
        if detector.is_visited(node) {
            None
        } else {
            detector.visit(node)
        }
    })
}

struct CycleDetector<'a> {
    types: &'a IndexMap<TypeRef, DeclaredType>,
    stack: Vec<TypeRef>,
    states: HashMap<TypeRef, VisitState>,
}

impl<'a> CycleDetector<'a> {
    fn new(types: &'a IndexMap<TypeRef, DeclaredType>) -> Self {
        Self {
            types,
            stack: Vec::new(),
            states: HashMap::new(),
        }
    }

    fn is_visited(&self, node: &TypeRef) -> bool {
        matches!(self.states.get(node), Some(VisitState::Visited))
    }

    fn visit(&mut self, node: &TypeRef) -> Option<Vec<TypeRef>> {
        match self.states.get(node) {
            Some(VisitState::Visited) => return None,
            Some(VisitState::Visiting) => {
                let idx = self.stack.iter().position(|n| n == node).unwrap_or(0);
                let mut cycle: Vec<TypeRef> = self.stack.iter().skip(idx).cloned().collect();
                cycle.push(node.clone());
                return Some(canonicalize_cycle(cycle));
            }
            None => {
                self.states.insert(node.clone(), VisitState::Visiting);
            }
        }

        self.stack.push(node.clone());
        if let Some(declared) = self.types.get(node) {
            let supertypes = declared.superclass.iter().chain(&declared.interfaces);
            for supertype in supertypes {
                // Undeclared supertypes (library types) end the walk.
                if !self.types.contains_key(supertype) {
                    continue;
                }
                if let Some(cycle) = self.visit(supertype) {
                    return Some(cycle);
                }
            }
        }
        self.stack.pop();
        self.states.insert(node.clone(), VisitState::Visited);
        None
    }
}

fn canonicalize_cycle(mut cycle: Vec<TypeRef>) -> Vec<TypeRef> {
    if cycle.len() < 2 {
        return cycle;
    }
    let len = cycle.len() - 1;
    let start = cycle
        .iter()
        .take(len)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(idx, _)| idx);
    let (prefix, suffix) = cycle.split_at_mut(len);
    prefix.rotate_left(start);
    if let (Some(first), Some(slot)) = (prefix.first().cloned(), suffix.first_mut()) {
        *slot = first;
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TypeKind;

    fn tr(name: &str) -> TypeRef {
        TypeRef::new("a", name)
    }

    fn registry(edges: &[(&str, &[&str])]) -> IndexMap<TypeRef, DeclaredType> {
        edges
            .iter()
            .map(|(name, supers)| {
                let declared = supers.iter().fold(
                    DeclaredType::new(tr(name), TypeKind::Interface),
                    |t, s| t.implementing(tr(s)),
                );
                (tr(name), declared)
            })
            .collect()
    }

    #[test]
    fn self_extension_is_a_cycle() {
        let types = registry(&[("A", &["A"])]);
        assert_eq!(find_cycle(&types), Some(vec![tr("A"), tr("A")]));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let types = registry(&[("D", &["B", "C"]), ("B", &["A"]), ("C", &["A"]), ("A", &[])]);
        assert_eq!(find_cycle(&types), None);
    }

    #[test]
    fn undeclared_supertypes_are_skipped() {
        let types = registry(&[("A", &["Library"])]);
        assert_eq!(find_cycle(&types), None);
    }

    #[test]
    fn cycle_starts_at_smallest_type() {
        let types = registry(&[("C", &["A"]), ("A", &["B"]), ("B", &["C"])]);
        assert_eq!(
            find_cycle(&types),
            Some(vec![tr("A"), tr("B"), tr("C"), tr("A")])
        );
    }
}
