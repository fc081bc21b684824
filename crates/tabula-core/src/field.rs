//! Field (column) definitions

use std::fmt;
use std::str::FromStr;

/// A column of a table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Stable identifier; row cells are keyed by it
    pub id: String,
    /// Display name; formulas reference fields by it
    pub name: String,
    /// Type plus type-specific configuration
    pub field_type: FieldType,
}

impl Field {
    /// Create a new field
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
        }
    }

    /// Create a text field
    pub fn text<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self::new(id, name, FieldType::Text)
    }

    /// Create a number field
    pub fn number<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self::new(id, name, FieldType::Number)
    }

    /// Create a relation field linking to rows of `target_table_id`
    pub fn relation<I, N, T>(id: I, name: N, target_table_id: T, allow_multiple: bool) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        T: Into<String>,
    {
        Self::new(
            id,
            name,
            FieldType::Relation(RelationConfig {
                target_table_id: target_table_id.into(),
                display_field_id: None,
                allow_multiple,
            }),
        )
    }

    /// Create a lookup field reading `target_field_id` through `relation_field_id`
    pub fn lookup<I, N, R, T>(id: I, name: N, relation_field_id: R, target_field_id: T) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        R: Into<String>,
        T: Into<String>,
    {
        Self::new(
            id,
            name,
            FieldType::Lookup(LookupConfig {
                relation_field_id: relation_field_id.into(),
                target_field_id: target_field_id.into(),
            }),
        )
    }

    /// Create a rollup field aggregating `target_field_id` through `relation_field_id`
    pub fn rollup<I, N, R, T>(
        id: I,
        name: N,
        relation_field_id: R,
        target_field_id: T,
        aggregation: AggregationKind,
    ) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        R: Into<String>,
        T: Into<String>,
    {
        Self::new(
            id,
            name,
            FieldType::Rollup(RollupConfig {
                relation_field_id: relation_field_id.into(),
                target_field_id: target_field_id.into(),
                aggregation,
            }),
        )
    }

    /// Create a formula field
    pub fn formula<I: Into<String>, N: Into<String>, E: Into<String>>(
        id: I,
        name: N,
        expression: E,
    ) -> Self {
        Self::new(
            id,
            name,
            FieldType::Formula(FormulaConfig {
                expression: expression.into(),
            }),
        )
    }

    /// The type tag of this field
    pub fn kind(&self) -> FieldKind {
        self.field_type.kind()
    }

    /// Whether the field's value is derived rather than stored
    pub fn is_computed(&self) -> bool {
        self.kind().is_computed()
    }
}

/// Field type with its type-specific configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum FieldType {
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
    Url,
    Email,
    Phone,
    Relation(RelationConfig),
    Lookup(LookupConfig),
    Rollup(RollupConfig),
    Formula(FormulaConfig),
    CreatedTime,
    LastEditedTime,
}

impl FieldType {
    /// The type tag without configuration
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::Text => FieldKind::Text,
            FieldType::Number => FieldKind::Number,
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Select => FieldKind::Select,
            FieldType::MultiSelect => FieldKind::MultiSelect,
            FieldType::Date => FieldKind::Date,
            FieldType::Url => FieldKind::Url,
            FieldType::Email => FieldKind::Email,
            FieldType::Phone => FieldKind::Phone,
            FieldType::Relation(_) => FieldKind::Relation,
            FieldType::Lookup(_) => FieldKind::Lookup,
            FieldType::Rollup(_) => FieldKind::Rollup,
            FieldType::Formula(_) => FieldKind::Formula,
            FieldType::CreatedTime => FieldKind::CreatedTime,
            FieldType::LastEditedTime => FieldKind::LastEditedTime,
        }
    }
}

/// Closed set of field type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
    Url,
    Email,
    Phone,
    Relation,
    Lookup,
    Rollup,
    Formula,
    CreatedTime,
    LastEditedTime,
}

impl FieldKind {
    /// Whether values of this kind sort numerically
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number)
    }

    /// Whether values of this kind are derived rather than stored
    pub fn is_computed(&self) -> bool {
        matches!(
            self,
            FieldKind::Lookup
                | FieldKind::Rollup
                | FieldKind::Formula
                | FieldKind::CreatedTime
                | FieldKind::LastEditedTime
        )
    }
}

/// Relation field configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationConfig {
    /// Table whose rows are linked
    pub target_table_id: String,
    /// Field shown for a linked row
    pub display_field_id: Option<String>,
    /// Whether more than one link is allowed
    pub allow_multiple: bool,
}

/// Lookup field configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupConfig {
    /// Relation field (in the same table) to traverse
    pub relation_field_id: String,
    /// Field to read on the linked rows
    pub target_field_id: String,
}

/// Rollup field configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollupConfig {
    /// Relation field (in the same table) to traverse
    pub relation_field_id: String,
    /// Field to read on the linked rows
    pub target_field_id: String,
    /// How the linked values are reduced
    pub aggregation: AggregationKind,
}

/// Formula field configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaConfig {
    pub expression: String,
}

/// Reduction applied by a rollup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AggregationKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    PercentEmpty,
    PercentFilled,
}

impl AggregationKind {
    /// Name used by hosts to store the aggregation
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Count => "count",
            AggregationKind::Sum => "sum",
            AggregationKind::Avg => "avg",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::PercentEmpty => "percent_empty",
            AggregationKind::PercentFilled => "percent_filled",
        }
    }
}

impl FromStr for AggregationKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(AggregationKind::Count),
            "sum" => Ok(AggregationKind::Sum),
            "avg" => Ok(AggregationKind::Avg),
            "min" => Ok(AggregationKind::Min),
            "max" => Ok(AggregationKind::Max),
            "percent_empty" => Ok(AggregationKind::PercentEmpty),
            "percent_filled" => Ok(AggregationKind::PercentFilled),
            _ => Err(crate::Error::UnknownAggregation(s.to_string())),
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let field = Field::lookup("f1", "Project Name", "rel", "name");
        assert_eq!(field.kind(), FieldKind::Lookup);
        assert!(field.is_computed());
        assert!(!Field::text("t", "Title").is_computed());
        assert!(FieldKind::Number.is_numeric());
        assert!(!FieldKind::Rollup.is_numeric());
    }

    #[test]
    fn test_aggregation_names() {
        for kind in [
            AggregationKind::Count,
            AggregationKind::Sum,
            AggregationKind::Avg,
            AggregationKind::Min,
            AggregationKind::Max,
            AggregationKind::PercentEmpty,
            AggregationKind::PercentFilled,
        ] {
            assert_eq!(kind.as_str().parse::<AggregationKind>().unwrap(), kind);
        }
        assert!("median".parse::<AggregationKind>().is_err());
    }
}
