//! Output formatting.
//!
//! One run produces one report, printed either as key=value summary lines
//! for humans or as a single JSON object for scripts.

use serde_json::{Map, Value};

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Vec<(String, Value)>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Vec::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields
            .push((key.to_string(), Value::String(value.to_string())));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.push((key.to_string(), Value::from(value)));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.push((key.to_string(), value));
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Print the output
    pub fn print(self) {
        if self.json_mode {
            let object = Value::Object(Map::from_iter(self.fields));
            println!(
                "{}",
                serde_json::to_string_pretty(&object).unwrap_or_default()
            );
        } else if let Some(msg) = self.message {
            println!("{}", msg);
        }
    }
}
