use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde::Serialize;

/// Text decoded from a boarding-pass barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedPass {
    /// Decoded text exactly as the symbol carried it
    pub raw: String,
}

impl ScannedPass {
    /// Wrap decoded text
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Text to show the user.
    ///
    /// JSON objects are pretty-printed with four-space indentation; anything
    /// else (including IATA BCBP strings) is returned unchanged.
    pub fn display_text(&self) -> String {
        match serde_json::from_str::<Value>(&self.raw) {
            Ok(value @ Value::Object(_)) => pretty_json(&value).unwrap_or_else(|| self.raw.clone()),
            _ => self.raw.clone(),
        }
    }
}

fn pretty_json(value: &Value) -> Option<String> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).ok()?;
    String::from_utf8(out).ok()
}
