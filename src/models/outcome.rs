use crate::error::ScanError;

/// Result of analysing a single frame
#[derive(Debug)]
pub enum ScanOutcome {
    /// A PDF417 symbol was found and its text extracted
    Decoded(String),
    /// No symbol in this frame
    NotFound,
    /// The frame could not be analysed; the session continues
    Error(ScanError),
}

impl ScanOutcome {
    /// Whether a symbol was decoded
    pub fn is_decoded(&self) -> bool {
        matches!(self, ScanOutcome::Decoded(_))
    }

    /// Decoded text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            ScanOutcome::Decoded(text) => Some(text),
            _ => None,
        }
    }
}
