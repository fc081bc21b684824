//! Saved views: filters, sorts, grouping and field visibility

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A saved, non-destructive configuration over a table's rows
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    pub id: String,
    pub name: String,
    /// Filters, all of which a row must satisfy
    pub filters: Vec<Filter>,
    /// Sort keys in priority order
    pub sorts: Vec<Sort>,
    /// Field whose value partitions the rows
    pub group_by: Option<String>,
    /// Fields not shown by the view
    pub hidden_fields: HashSet<String>,
    /// Preferred display order of field ids
    pub field_order: Vec<String>,
}

impl View {
    /// Create a view with no filters, sorts or grouping
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a sort key
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Group by a field
    pub fn with_group_by<S: Into<String>>(mut self, field_id: S) -> Self {
        self.group_by = Some(field_id.into());
        self
    }

    /// Hide a field
    pub fn with_hidden<S: Into<String>>(mut self, field_id: S) -> Self {
        self.hidden_fields.insert(field_id.into());
        self
    }
}

/// A single row predicate
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Filter {
    pub field_id: String,
    pub operator: FilterOperator,
    /// Comparison value, always text
    pub value: String,
}

impl Filter {
    /// Create a new filter
    pub fn new<F: Into<String>, V: Into<String>>(
        field_id: F,
        operator: FilterOperator,
        value: V,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterOperator {
    Is,
    IsNot,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
    Gt,
    Lt,
    /// An operator this engine does not recognize; every row passes it
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Is => "is",
            FilterOperator::IsNot => "is_not",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
            FilterOperator::Gt => "gt",
            FilterOperator::Lt => "lt",
            FilterOperator::Unknown => "unknown",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "is" => FilterOperator::Is,
            "is_not" => FilterOperator::IsNot,
            "contains" => FilterOperator::Contains,
            "not_contains" => FilterOperator::NotContains,
            "is_empty" => FilterOperator::IsEmpty,
            "is_not_empty" => FilterOperator::IsNotEmpty,
            "gt" => FilterOperator::Gt,
            "lt" => FilterOperator::Lt,
            _ => FilterOperator::Unknown,
        })
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort key
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sort {
    pub field_id: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending sort on a field
    pub fn asc<S: Into<String>>(field_id: S) -> Self {
        Self {
            field_id: field_id.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on a field
    pub fn desc<S: Into<String>>(field_id: S) -> Self {
        Self {
            field_id: field_id.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(crate::Error::UnknownSortDirection(s.to_string())),
        }
    }
}
