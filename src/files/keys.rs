use serde_json::Value;

use super::view::sorted_keys;

pub const PRIMITIVE_LIST: &str = "(primitive list)";
pub const UNKNOWN_TOP_LEVEL: &str = "(unknown JSON top-level)";

/// Keys found at the top level of a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonKeys {
    Keys(Vec<String>),
    PrimitiveList,
    UnknownTopLevel,
}

impl JsonKeys {
    pub fn inspect(doc: &Value) -> Self {
        match doc {
            Value::Array(items) => match items.first() {
                None => JsonKeys::Keys(Vec::new()),
                Some(Value::Object(_)) => {
                    JsonKeys::Keys(sorted_keys(items.iter().filter_map(Value::as_object)))
                }
                Some(_) => JsonKeys::PrimitiveList,
            },
            Value::Object(map) => JsonKeys::Keys(sorted_keys(std::iter::once(map))),
            _ => JsonKeys::UnknownTopLevel,
        }
    }

    /// Display labels, sentinels included.
    pub fn labels(&self) -> Vec<String> {
        match self {
            JsonKeys::Keys(keys) => keys.clone(),
            JsonKeys::PrimitiveList => vec![PRIMITIVE_LIST.to_string()],
            JsonKeys::UnknownTopLevel => vec![UNKNOWN_TOP_LEVEL.to_string()],
        }
    }
}
