//! Declarative read specification
//!
//! Pages describe what they fetch — equality filters plus one or more order
//! keys — and each backend renders that however its transport needs:
//! the in-memory backend evaluates it against JSON rows, the REST backend
//! turns it into query-string parameters.
//!
//! ISO dates (`2024-06-03`) and `HH:MM` times sort correctly under plain
//! string comparison, which is all the application's collections need.

use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction for one order key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One order key: field name plus direction
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Equality filter on one field
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

/// A fetch specification: filters first, then order keys in priority order
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Add an order key (keys added first take priority)
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Check a JSON row against every filter
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|filter| {
            match row.get(&filter.field) {
                Some(Value::String(s)) => s == &filter.value,
                Some(other) => other.to_string() == filter.value,
                None => false,
            }
        })
    }

    /// Sort JSON rows in place according to the order keys
    ///
    /// The sort is stable, so rows equal under every key keep their original
    /// relative order.
    pub fn sort_rows(&self, rows: &mut [Value]) {
        if self.order.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for key in &self.order {
                let ordering = compare_field(a, b, &key.field);
                let ordering = match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

/// Compare two rows on one field
///
/// Numbers compare numerically, strings lexicographically; rows missing the
/// field sort after rows that have it.
fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(va), Some(vb)) => compare_values(va, vb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(na), Value::Number(nb)) => {
            let fa = na.as_f64().unwrap_or(f64::NAN);
            let fb = nb.as_f64().unwrap_or(f64::NAN);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (Value::String(sa), Value::String(sb)) => sa.cmp(sb),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => a.to_string().cmp(&b.to_string()),
    }
}
