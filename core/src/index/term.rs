use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::from_utf8,
};

/// A term: a field name and the exact token bytes indexed in that field.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Term {
    field: String,
    bytes: Vec<u8>,
}

impl Term {
    /// Constructs a Term with the given field and bytes.
    pub fn new<B: Into<Vec<u8>>>(field: &str, bytes: B) -> Self {
        Self {
            field: field.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Returns the field of this term. The field indicates the part of a document which this term came from.
    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the raw bytes of this term.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the text of this term. Bytes that are not valid UTF-8 are rendered as space-separated hex in brackets.
    pub fn text(&self) -> String {
        match from_utf8(&self.bytes) {
            Ok(s) => s.to_string(),
            Err(_) => {
                let hex: Vec<String> = self.bytes.iter().map(|b| format!("{b:02x}")).collect();
                format!("[{}]", hex.join(" "))
            }
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}:{}", self.field, self.text())
    }
}
