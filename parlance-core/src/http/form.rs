//! Multipart form encoding for file-bearing uploads
//!
//! Call sites build a [`Form`] from an explicit list of named parts; there
//! is no runtime struct inspection. Unset optionals are skipped entirely,
//! never serialized as null (form encoding has no null representation).
//!
//! The body encodes to a reusable `Bytes` buffer so the retry engine can
//! resend it byte-for-byte on every attempt.

use crate::optional::Optional;
use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

#[derive(Debug, Clone)]
enum PartValue {
    Text(String),
    File { filename: String, content: Bytes },
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    value: PartValue,
}

/// An ordered multipart/form-data payload
#[derive(Debug, Clone, Default)]
pub struct Form {
    parts: Vec<Part>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parts.push(Part {
            name: name.into(),
            value: PartValue::Text(value.to_string()),
        });
        self
    }

    /// Append a text field only when the optional holds a value.
    pub fn maybe_text<T: ToString>(self, name: impl Into<String>, value: &Optional<T>) -> Self {
        match value {
            Optional::Value(v) => self.text(name, v.to_string()),
            Optional::Absent | Optional::Null => self,
        }
    }

    /// Append a file field with the given filename and raw content.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            value: PartValue::File {
                filename: filename.into(),
                content: content.into(),
            },
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Encode to a `(content_type, body)` pair with a fresh boundary.
    pub(crate) fn encode(&self) -> (String, Bytes) {
        let boundary = format!("parlance-{}", Uuid::new_v4().simple());
        let content_type = format!("multipart/form-data; boundary={boundary}");

        let mut buf = BytesMut::new();
        for part in &self.parts {
            buf.put_slice(format!("--{boundary}\r\n").as_bytes());
            match &part.value {
                PartValue::Text(text) => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_disposition(&part.name)
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(text.as_bytes());
                }
                PartValue::File { filename, content } => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            escape_disposition(&part.name),
                            escape_disposition(filename)
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(content);
                }
            }
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{boundary}--\r\n").as_bytes());

        (content_type, buf.freeze())
    }
}

/// Percent-escape the characters that would break out of a quoted
/// `Content-Disposition` parameter (RFC 7578 §4.2 encoding).
fn escape_disposition(value: &str) -> String {
    value
        .replace('\r', "%0D")
        .replace('\n', "%0A")
        .replace('"', "%22")
}
