use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// What the table page renders for one normalized file.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    /// Object rows with the sorted union of their keys as columns.
    Records {
        columns: Vec<String>,
        rows: Vec<Value>,
    },
    /// Primitives (or an empty list) shown one per line.
    Values(Vec<Value>),
}

impl TableView {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                let columns = sorted_keys(items.iter().filter_map(Value::as_object));
                TableView::Records { columns, rows: items }
            }
            Value::Array(items) => TableView::Values(items),
            Value::Object(map) => {
                let columns = sorted_keys(std::iter::once(&map));
                TableView::Records {
                    columns,
                    rows: vec![Value::Object(map)],
                }
            }
            scalar => TableView::Values(vec![scalar]),
        }
    }

    pub fn columns(&self) -> Option<&[String]> {
        match self {
            TableView::Records { columns, .. } => Some(columns),
            TableView::Values(_) => None,
        }
    }
}

pub(crate) fn sorted_keys<'a>(objects: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<String> {
    objects
        .flat_map(|obj| obj.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_use_sorted_key_union() {
        let view = TableView::from_value(json!([{"b": 1, "a": 2}, {"c": 3}, 7]));
        match view {
            TableView::Records { columns, rows } => {
                assert_eq!(columns, ["a", "b", "c"]);
                assert_eq!(rows.len(), 3);
            }
            other => panic!("expected records, got {other:?}"),
        }
    }

    #[test]
    fn single_object_becomes_one_record() {
        let view = TableView::from_value(json!({"z": 1, "y": 2}));
        assert_eq!(view.columns(), Some(&["y".to_string(), "z".to_string()][..]));
    }

    #[test]
    fn primitives_and_empty_lists_have_no_columns() {
        assert_eq!(
            TableView::from_value(json!([1, "two", null])),
            TableView::Values(vec![json!(1), json!("two"), json!(null)])
        );
        assert_eq!(TableView::from_value(json!([])), TableView::Values(vec![]));
        assert_eq!(TableView::from_value(json!(5)).columns(), None);
    }
}
