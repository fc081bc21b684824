//! Table calculation
//!
//! Materializes the computed cells of a table's rows: relations, lookups and
//! rollups first, then creation and edit timestamps, then formulas in
//! dependency order so a formula can read a lookup or another formula.
//!
//! # Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let table = Table::new("items", "Items")
//!     .with_field(Field::number("price", "Price"))
//!     .with_field(Field::number("qty", "Qty"))
//!     .with_field(Field::formula("total", "Total", "{Price} * {Qty}"))
//!     .with_row(Row::new("r1").with_cell("price", 2.5).with_cell("qty", 4.0));
//!
//! let db = Database::new();
//! let (rows, stats) = table.calculate(&db);
//! assert_eq!(rows[0].get("total"), &CellValue::Number(10.0));
//! assert_eq!(stats.formula_cells, 1);
//! ```

use crate::{
    evaluate_formula_with, is_error_value, is_volatile, resolve_relation, CellValue,
    EvaluationContext, Field, FieldType, FormulaDependencies, Row, Table, TableRegistry,
};
use chrono::{DateTime, SecondsFormat, Utc};

/// Options for table calculation
#[derive(Debug, Clone)]
pub struct CalculationOptions {
    /// Materialize Relation, Lookup and Rollup cells
    pub resolve_relations: bool,
    /// Evaluate Formula cells
    pub evaluate_formulas: bool,
    /// Fill CreatedTime and LastEditedTime cells from the row's timestamps
    pub fill_timestamps: bool,
    /// Clock for `NOW()` and `TODAY()`; the wall clock is read once per pass when unset
    pub now: Option<DateTime<Utc>>,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            resolve_relations: true,
            evaluate_formulas: true,
            fill_timestamps: true,
            now: None,
        }
    }
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Number of rows calculated
    pub rows: usize,
    /// Number of formula cells evaluated
    pub formula_cells: usize,
    /// Formula cells that produced an error value
    pub formula_errors: usize,
    /// Formula cells calling NOW or TODAY
    pub volatile_cells: usize,
    /// Relation, lookup and rollup cells resolved
    pub relation_cells: usize,
    /// Formula fields on a dependency cycle
    pub cyclic_fields: usize,
}

/// Extension trait for Table to add calculation methods
pub trait TableCalculationExt {
    /// Calculate every row with default options
    fn calculate<R: TableRegistry + ?Sized>(&self, registry: &R) -> (Vec<Row>, CalculationStats);

    /// Calculate every row with custom options
    fn calculate_with_options<R: TableRegistry + ?Sized>(
        &self,
        registry: &R,
        options: &CalculationOptions,
    ) -> (Vec<Row>, CalculationStats);
}

impl TableCalculationExt for Table {
    fn calculate<R: TableRegistry + ?Sized>(&self, registry: &R) -> (Vec<Row>, CalculationStats) {
        self.calculate_with_options(registry, &CalculationOptions::default())
    }

    fn calculate_with_options<R: TableRegistry + ?Sized>(
        &self,
        registry: &R,
        options: &CalculationOptions,
    ) -> (Vec<Row>, CalculationStats) {
        compute_rows(self, &self.rows, registry, options)
    }
}

/// Copy of `row` with every computed cell of `table` materialized
pub fn compute_row<R>(table: &Table, row: &Row, registry: &R, options: &CalculationOptions) -> Row
where
    R: TableRegistry + ?Sized,
{
    let engine = CalculationEngine::new(table, options);
    engine.compute(row, registry, &mut CalculationStats::default())
}

/// Materialize many rows of `table`, keeping their order
pub fn compute_rows<'a, I, R>(
    table: &Table,
    rows: I,
    registry: &R,
    options: &CalculationOptions,
) -> (Vec<Row>, CalculationStats)
where
    I: IntoIterator<Item = &'a Row>,
    R: TableRegistry + ?Sized,
{
    let engine = CalculationEngine::new(table, options);
    let mut stats = CalculationStats {
        cyclic_fields: engine.cyclic_field_count(),
        ..Default::default()
    };

    let computed: Vec<Row> = rows
        .into_iter()
        .map(|row| engine.compute(row, registry, &mut stats))
        .collect();

    log::debug!(
        "calculated {} rows of table {}: {} formula cells, {} errors, {} relation cells",
        stats.rows,
        table.id,
        stats.formula_cells,
        stats.formula_errors,
        stats.relation_cells
    );

    (computed, stats)
}

/// Per-table calculation state, built once per pass
pub(crate) struct CalculationEngine<'t> {
    table: &'t Table,
    options: &'t CalculationOptions,
    dependencies: FormulaDependencies,
    /// Formula fields in evaluation order, cyclic ones last
    formulas: Vec<FormulaCell<'t>>,
    now: DateTime<Utc>,
}

struct FormulaCell<'t> {
    field_id: &'t str,
    expression: &'t str,
    volatile: bool,
}

impl<'t> CalculationEngine<'t> {
    pub(crate) fn new(table: &'t Table, options: &'t CalculationOptions) -> Self {
        let dependencies = FormulaDependencies::build(&table.fields);
        if !dependencies.cyclic_fields().is_empty() {
            log::warn!(
                "table {}: formula fields {:?} form a dependency cycle",
                table.id,
                dependencies.cyclic_fields()
            );
        }

        let formulas = dependencies
            .calculation_order()
            .iter()
            .chain(dependencies.cyclic_fields())
            .filter_map(|id| table.field(id))
            .filter_map(|field| match &field.field_type {
                FieldType::Formula(config) => Some(FormulaCell {
                    field_id: &field.id,
                    expression: &config.expression,
                    volatile: is_volatile(&config.expression).unwrap_or(false),
                }),
                _ => None,
            })
            .collect();

        Self {
            table,
            options,
            dependencies,
            formulas,
            now: options.now.unwrap_or_else(Utc::now),
        }
    }

    pub(crate) fn cyclic_field_count(&self) -> usize {
        self.dependencies.cyclic_fields().len()
    }

    pub(crate) fn compute<R>(&self, row: &Row, registry: &R, stats: &mut CalculationStats) -> Row
    where
        R: TableRegistry + ?Sized,
    {
        let fields = &self.table.fields;
        let mut out = row.clone();
        stats.rows += 1;

        if self.options.resolve_relations {
            for field in fields.iter().filter(|f| is_relational(f)) {
                out.set(field.id.clone(), resolve_relation(row, field, registry, fields));
                stats.relation_cells += 1;
            }
        }

        if self.options.fill_timestamps {
            for field in fields {
                match field.field_type {
                    FieldType::CreatedTime => out.set(field.id.clone(), timestamp(row.created_at)),
                    FieldType::LastEditedTime => {
                        out.set(field.id.clone(), timestamp(row.updated_at))
                    }
                    _ => {}
                }
            }
        }

        if self.options.evaluate_formulas {
            for formula in &self.formulas {
                let value = {
                    let ctx = EvaluationContext::with_now(&out, fields, self.now);
                    evaluate_formula_with(formula.expression, &ctx)
                };
                stats.formula_cells += 1;
                if is_error_value(&value) {
                    stats.formula_errors += 1;
                }
                if formula.volatile {
                    stats.volatile_cells += 1;
                }
                out.set(formula.field_id, value);
            }
        }

        out
    }
}

fn is_relational(field: &Field) -> bool {
    matches!(
        field.field_type,
        FieldType::Relation(_) | FieldType::Lookup(_) | FieldType::Rollup(_)
    )
}

fn timestamp(at: DateTime<Utc>) -> CellValue {
    CellValue::Text(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
