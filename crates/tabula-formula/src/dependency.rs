//! Dependency tracking between formula fields
//!
//! A formula reads other fields of the same row by name. When one formula
//! reads another formula's output, the reader has to be computed second.
//! [`FormulaDependencies`] works out that order for a table's fields and
//! reports formulas that read each other in a cycle.

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::functions::function_registry;
use crate::parser::parse_formula;
use ahash::{AHashMap, AHashSet};
use tabula_core::{Field, FieldType};

/// Field names referenced by an expression, in first-use order, without duplicates
pub fn referenced_fields(expression: &str) -> FormulaResult<Vec<String>> {
    let ast = parse_formula(expression)?;
    Ok(field_refs(&ast))
}

/// Whether an expression calls a volatile function (`NOW`, `TODAY`)
pub fn is_volatile(expression: &str) -> FormulaResult<bool> {
    let ast = parse_formula(expression)?;
    Ok(calls_volatile(&ast))
}

/// Field names referenced by an AST, in first-use order, without duplicates
pub fn field_refs(expr: &FormulaExpr) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    expr.walk(&mut |node| {
        if let FormulaExpr::FieldRef(name) = node {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    });
    names
}

/// Whether an AST calls a volatile function
pub fn calls_volatile(expr: &FormulaExpr) -> bool {
    let mut volatile = false;
    expr.walk(&mut |node| {
        if let FormulaExpr::Function { name, .. } = node {
            volatile |= function_registry().is_volatile(name);
        }
    });
    volatile
}

/// Dependency graph keyed by field id
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Field -> fields that read it (dependents)
    dependents: AHashMap<String, AHashSet<String>>,
    /// Field -> fields it reads (precedents)
    precedents: AHashMap<String, AHashSet<String>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency: dependent reads precedent
    pub fn add_dependency(&mut self, precedent: &str, dependent: &str) {
        self.dependents
            .entry(precedent.to_string())
            .or_default()
            .insert(dependent.to_string());
        self.precedents
            .entry(dependent.to_string())
            .or_default()
            .insert(precedent.to_string());
    }

    /// Fields that read the given field
    pub fn get_dependents<'a>(&'a self, field_id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.dependents
            .get(field_id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Fields the given field reads
    pub fn get_precedents<'a>(&'a self, field_id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.precedents
            .get(field_id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether the field takes part in a cycle
    pub fn has_circular_reference(&self, field_id: &str) -> bool {
        let mut visited = AHashSet::new();
        let mut stack: Vec<&str> = self.get_precedents(field_id).collect();

        while let Some(current) = stack.pop() {
            if current == field_id {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.get_precedents(current));
            }
        }

        false
    }

    /// Every field that directly or transitively reads the given field
    pub fn all_dependents(&self, field_id: &str) -> AHashSet<String> {
        let mut result = AHashSet::new();
        let mut stack: Vec<&str> = self.get_dependents(field_id).collect();

        while let Some(current) = stack.pop() {
            if result.insert(current.to_string()) {
                stack.extend(self.get_dependents(current));
            }
        }

        result
    }
}

/// Calculation order of a table's formula fields
#[derive(Debug, Default)]
pub struct FormulaDependencies {
    graph: DependencyGraph,
    order: Vec<String>,
    cyclic: Vec<String>,
}

impl FormulaDependencies {
    /// Analyze the formula fields among `fields`
    ///
    /// Formulas that fail to parse have no dependencies; they still get a
    /// place in the order so their error is materialized.
    pub fn build(fields: &[Field]) -> Self {
        let mut graph = DependencyGraph::new();
        let by_name: AHashMap<&str, &Field> =
            fields.iter().rev().map(|f| (f.name.as_str(), f)).collect();

        let formulas: Vec<&Field> = fields
            .iter()
            .filter(|f| matches!(f.field_type, FieldType::Formula(_)))
            .collect();

        for field in &formulas {
            let FieldType::Formula(config) = &field.field_type else {
                continue;
            };
            let Ok(names) = referenced_fields(&config.expression) else {
                continue;
            };
            for name in names {
                if let Some(precedent) = by_name.get(name.as_str()) {
                    graph.add_dependency(&precedent.id, &field.id);
                }
            }
        }

        // Kahn's algorithm over formula -> formula edges, stable in field order
        let formula_ids: AHashSet<&str> = formulas.iter().map(|f| f.id.as_str()).collect();
        let mut pending: AHashMap<&str, usize> = formulas
            .iter()
            .map(|f| {
                let count = graph
                    .get_precedents(&f.id)
                    .filter(|p| formula_ids.contains(p) && *p != f.id)
                    .count();
                (f.id.as_str(), count)
            })
            .collect();
        let self_referencing: AHashSet<&str> = formulas
            .iter()
            .filter(|f| graph.get_precedents(&f.id).any(|p| p == f.id))
            .map(|f| f.id.as_str())
            .collect();

        let mut order: Vec<String> = Vec::with_capacity(formulas.len());
        let mut done: AHashSet<&str> = AHashSet::new();
        loop {
            let ready: Vec<&str> = formulas
                .iter()
                .map(|f| f.id.as_str())
                .filter(|id| {
                    !done.contains(id)
                        && !self_referencing.contains(id)
                        && pending.get(id).copied() == Some(0)
                })
                .collect();
            if ready.is_empty() {
                break;
            }
            for id in ready {
                done.insert(id);
                order.push(id.to_string());
                for dependent in graph.get_dependents(id) {
                    if let Some(count) = pending.get_mut(dependent) {
                        *count = count.saturating_sub(1);
                    }
                }
            }
        }

        let cyclic: Vec<String> = formulas
            .iter()
            .filter(|f| !done.contains(f.id.as_str()))
            .map(|f| f.id.clone())
            .collect();

        Self {
            graph,
            order,
            cyclic,
        }
    }

    /// Formula field ids that can be computed, precedents first
    pub fn calculation_order(&self) -> &[String] {
        &self.order
    }

    /// Formula field ids on (or downstream of) a dependency cycle
    pub fn cyclic_fields(&self) -> &[String] {
        &self.cyclic
    }

    /// Formula field ids whose value may change when `field_id` changes,
    /// in calculation order with cyclic fields last
    pub fn affected_by(&self, field_id: &str) -> Vec<String> {
        let affected = self.graph.all_dependents(field_id);
        self.order
            .iter()
            .chain(self.cyclic.iter())
            .filter(|id| affected.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// The underlying graph
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_referenced_fields() {
        assert_eq!(
            referenced_fields("IF({Qty} > 0, {Price} * {Qty}, {Price})").unwrap(),
            vec!["Qty".to_string(), "Price".to_string()]
        );
        assert!(referenced_fields("1 + 2").unwrap().is_empty());
        assert!(referenced_fields("{Open").is_err());
    }

    #[test]
    fn test_is_volatile() {
        assert!(is_volatile("DAYS(TODAY(), {Due})").unwrap());
        assert!(is_volatile("now()").unwrap());
        assert!(!is_volatile("DAYS({Start}, {Due})").unwrap());
    }

    #[test]
    fn test_graph() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("price", "total");
        graph.add_dependency("total", "tax");

        assert!(graph.get_dependents("price").any(|f| f == "total"));
        assert!(graph.get_precedents("tax").any(|f| f == "total"));
        assert!(!graph.has_circular_reference("tax"));

        let all = graph.all_dependents("price");
        assert!(all.contains("total") && all.contains("tax"));
    }

    #[test]
    fn test_circular_reference() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "c");
        graph.add_dependency("c", "a");

        assert!(graph.has_circular_reference("a"));
        assert!(graph.has_circular_reference("b"));
        assert!(graph.has_circular_reference("c"));
    }

    #[test]
    fn test_calculation_order() {
        let fields = vec![
            Field::formula("tax", "Tax", "{Total} * 0.2"),
            Field::number("price", "Price"),
            Field::formula("total", "Total", "{Price} * {Qty}"),
            Field::number("qty", "Qty"),
            Field::formula("label", "Label", "CONCAT({Total}, ' incl. ', {Tax})"),
        ];
        let deps = FormulaDependencies::build(&fields);

        assert_eq!(deps.calculation_order(), &["total", "tax", "label"]);
        assert!(deps.cyclic_fields().is_empty());
        assert_eq!(deps.affected_by("price"), vec!["total", "tax", "label"]);
        assert_eq!(deps.affected_by("tax"), vec!["label"]);
    }

    #[test]
    fn test_cycles_are_reported() {
        let fields = vec![
            Field::formula("a", "A", "{B} + 1"),
            Field::formula("b", "B", "{A} + 1"),
            Field::formula("c", "C", "{C}"),
            Field::formula("d", "D", "{A} * 2"),
            Field::formula("e", "E", "1 +"),
        ];
        let deps = FormulaDependencies::build(&fields);

        assert_eq!(deps.calculation_order(), &["e"]);
        assert_eq!(deps.cyclic_fields(), &["a", "b", "c", "d"]);
    }
}
