use super::ValueError;

/// Stored value of a string parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringValue {
    /// Free text, at most `max_len` bytes
    Text(String),
    /// Exactly `max_len` bytes, hex-encoded with an optional separator
    Raw {
        bytes: Vec<u8>,
        separator: Option<char>,
    },
}

/// Text or raw-bytes string parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringParam {
    max_len: usize,
    value: StringValue,
    initial: StringValue,
}

impl StringParam {
    /// Text-mode string; `initial` is truncated to `max_len` bytes
    pub fn text(max_len: usize, initial: &str) -> Self {
        let value = StringValue::Text(truncate(initial, max_len).to_string());
        Self {
            max_len,
            initial: value.clone(),
            value,
        }
    }

    /// Raw-bytes string of exactly `len` zero bytes
    pub fn raw(len: usize, separator: Option<char>) -> Self {
        let value = StringValue::Raw {
            bytes: vec![0; len],
            separator,
        };
        Self {
            max_len: len,
            initial: value.clone(),
            value,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.value, StringValue::Raw { .. })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn value(&self) -> &StringValue {
        &self.value
    }

    /// Separator used between hex pairs in raw mode
    pub fn separator(&self) -> Option<char> {
        match &self.value {
            StringValue::Raw { separator, .. } => *separator,
            StringValue::Text(_) => None,
        }
    }

    /// Text value, or None in raw mode
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            StringValue::Text(text) => Some(text),
            StringValue::Raw { .. } => None,
        }
    }

    /// Raw bytes, or None in text mode
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            StringValue::Raw { bytes, .. } => Some(bytes),
            StringValue::Text(_) => None,
        }
    }

    /// Set the text value, truncating at `max_len` bytes on a char boundary
    ///
    /// In raw mode the text's bytes are copied in and the rest zero-filled.
    pub fn set_text(&mut self, text: &str) {
        let max_len = self.max_len;
        match &mut self.value {
            StringValue::Text(value) => {
                *value = truncate(text, max_len).to_string();
            }
            StringValue::Raw { bytes, .. } => {
                bytes.fill(0);
                let n = text.len().min(max_len);
                bytes[..n].copy_from_slice(&text.as_bytes()[..n]);
            }
        }
    }

    /// Replace the raw bytes; the slice must be exactly `max_len` long
    pub fn set_raw_bytes(&mut self, data: &[u8]) -> Result<(), ValueError> {
        if data.len() != self.max_len {
            return Err(ValueError::LengthMismatch {
                expected: self.max_len,
                actual: data.len(),
            });
        }
        match &mut self.value {
            StringValue::Raw { bytes, .. } => bytes.copy_from_slice(data),
            StringValue::Text(value) => {
                *value = String::from_utf8_lossy(data).into_owned();
            }
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.value = self.initial.clone();
    }
}

fn truncate(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
