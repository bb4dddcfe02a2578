//! Candidate site scanning over a lowered [`Unit`].
//!
//! Both scans are lazy, single-pass, and hold no state beyond the unit they
//! borrow.

use crate::detector::ConstructorDetector;
use crate::model::{BindingSite, CallSite, Declaration, ResolvedType, Target, Unit, Value};

/// A binding slot whose value is a call to an in-program declaration.
#[derive(Debug, Clone, Copy)]
pub struct BindingCandidate<'a> {
    /// The binding the slot belongs to.
    pub binding: &'a BindingSite,
    /// Slot index.
    pub index: usize,
    /// Name of the left-hand identifier.
    pub target: &'a str,
    /// Declared or inferred type of the left-hand identifier.
    pub target_ty: &'a ResolvedType,
    /// The call on the right-hand side.
    pub call: &'a CallSite,
    /// The declaration the call resolves to.
    pub callee: &'a Declaration,
}

/// Yields constructor-shaped declarations that declare at least one result.
pub fn declaration_sites<'a>(
    unit: &'a Unit,
    detector: &'a dyn ConstructorDetector,
) -> impl Iterator<Item = &'a Declaration> + 'a {
    unit.declarations
        .iter()
        .filter(move |decl| !decl.results.is_empty() && detector.is_constructor(&decl.name))
}

/// Yields every identifier slot bound to a resolved in-program call.
pub fn binding_sites(unit: &Unit) -> impl Iterator<Item = BindingCandidate<'_>> {
    unit.bindings.iter().flat_map(|binding| {
        binding
            .targets
            .iter()
            .zip(&binding.values)
            .enumerate()
            .filter_map(move |(index, pair)| match pair {
                (Target::Ident { name, ty }, Value::Call(call)) => {
                    call.callee.as_ref().map(|callee| BindingCandidate {
                        binding,
                        index,
                        target: name.as_str(),
                        target_ty: ty,
                        call,
                        callee,
                    })
                }
                _ => None,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::PrefixDetector;
    use crate::model::Position;

    fn decl(name: &str, results: Vec<ResolvedType>) -> Declaration {
        Declaration::new(name, Position::new(1, 1), results)
    }

    fn call(callee: Option<Declaration>) -> Value {
        Value::Call(CallSite {
            callee_path: callee
                .as_ref()
                .map_or_else(|| "external".to_string(), |d| d.name.clone()),
            position: Position::new(2, 13),
            callee,
        })
    }

    fn ident(name: &str) -> Target {
        Target::Ident {
            name: name.to_string(),
            ty: ResolvedType::data("T"),
        }
    }

    fn binding(targets: Vec<Target>, values: Vec<Value>) -> BindingSite {
        BindingSite {
            position: Position::new(2, 5),
            targets,
            values,
        }
    }

    #[test]
    fn declaration_scan_keeps_constructors_with_results() {
        let mut unit = Unit::new("a.rs");
        unit.declarations = vec![
            decl("NewService", vec![ResolvedType::data("Service")]),
            decl("NewNothing", vec![]),
            decl("Add", vec![ResolvedType::data("i32")]),
            decl("New", vec![ResolvedType::data("X")]),
        ];
        let detector = PrefixDetector::default();

        let names: Vec<&str> = declaration_sites(&unit, &detector)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["NewService"]);
    }

    #[test]
    fn binding_scan_pairs_slots_positionally() {
        let a = decl("NewA", vec![ResolvedType::data("A")]);
        let b = decl("NewB", vec![ResolvedType::data("B")]);
        let mut unit = Unit::new("a.rs");
        unit.bindings = vec![binding(
            vec![ident("a"), Target::Other, ident("c")],
            vec![call(Some(a)), call(Some(b.clone())), call(Some(b))],
        )];

        let found: Vec<(usize, &str, &str)> = binding_sites(&unit)
            .map(|c| (c.index, c.target, c.callee.name.as_str()))
            .collect();
        assert_eq!(found, vec![(0, "a", "NewA"), (2, "c", "NewB")]);
    }

    #[test]
    fn binding_scan_skips_external_and_non_call_values() {
        let mut unit = Unit::new("a.rs");
        unit.bindings = vec![
            binding(vec![ident("x")], vec![call(None)]),
            binding(vec![ident("y")], vec![Value::Other]),
        ];
        assert_eq!(binding_sites(&unit).count(), 0);
    }

    #[test]
    fn binding_scan_ignores_uncovered_slots() {
        let a = decl("NewA", vec![ResolvedType::data("A")]);
        let mut unit = Unit::new("a.rs");
        unit.bindings = vec![
            binding(vec![ident("x"), ident("y")], vec![call(Some(a.clone()))]),
            binding(vec![ident("z")], vec![call(Some(a.clone())), call(Some(a))]),
        ];

        let targets: Vec<&str> = binding_sites(&unit).map(|c| c.target).collect();
        assert_eq!(targets, vec!["x", "z"]);
    }

    #[test]
    fn scans_are_restartable() {
        let mut unit = Unit::new("a.rs");
        unit.declarations = vec![decl("NewA", vec![ResolvedType::data("A")])];
        let detector = PrefixDetector::default();
        assert_eq!(declaration_sites(&unit, &detector).count(), 1);
        assert_eq!(declaration_sites(&unit, &detector).count(), 1);
    }
}
