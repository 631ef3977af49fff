//! Wire shape of a stored record
//!
//! Typed records normalize what they read. `null` and `[]` become an empty
//! field that is not written back, a bare string read into a list becomes a
//! one-entry list, and a number read into a text field becomes a string.
//! [`Shape`] remembers those keys so an untouched record serializes to the
//! JSON it was read from.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Shape {
    blanks: Map<String, Value>,
    numbers: Map<String, Value>,
    texts: BTreeSet<String>,
}

/// Wire shape is not part of a record's value.
impl PartialEq for Shape {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Shape {
    /// Take blank values out of `map` and note the scalar keys the typed
    /// record may rewrite.
    pub fn capture(map: &mut Map<String, Value>) -> Self {
        let mut shape = Self::default();
        map.retain(|key, value| {
            match value {
                Value::Null => {}
                Value::Array(items) if items.is_empty() => {}
                Value::Number(_) => {
                    shape.numbers.insert(key.clone(), value.clone());
                    return true;
                }
                Value::String(_) => {
                    shape.texts.insert(key.clone());
                    return true;
                }
                _ => return true,
            }
            shape.blanks.insert(key.clone(), value.clone());
            false
        });
        shape
    }

    /// Put back what `capture` noted, for every key the record did not change.
    pub fn restore(&self, value: Value) -> Value {
        let Value::Object(mut map) = value else {
            return value;
        };

        for (key, value) in map.iter_mut() {
            if self.texts.contains(key) {
                if let Value::Array(items) = value {
                    if items.len() == 1 && items[0].is_string() {
                        let item = items.remove(0);
                        *value = item;
                    }
                }
            } else if let Some(number) = self.numbers.get(key) {
                if matches!(value, Value::String(text) if *text == number.to_string()) {
                    *value = number.clone();
                }
            }
        }

        for (key, blank) in &self.blanks {
            map.entry(key.clone()).or_insert_with(|| blank.clone());
        }
        Value::Object(map)
    }
}
