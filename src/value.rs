//! Runtime values
//!
//! `Value` is what the glue hands to `Store::set` after unwrapping a runtime
//! argument; `StoredValue` is what the storage engine keeps.

use bytes::Bytes;

use crate::buffer::NativeBuffer;
use crate::text::TextHandle;

/// A value passed in from the runtime for the duration of one call
#[derive(Debug)]
pub enum Value<'a> {
    Bool(bool),
    Number(f64),
    String(TextHandle<'a>),
    Buffer(NativeBuffer<'a>),
}

impl Value<'_> {
    /// Runtime type name, for logs and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Buffer(_) => "ArrayBuffer",
        }
    }

    /// Detach from the call's borrowed memory and convert for storage
    pub fn into_stored(self) -> StoredValue {
        match self {
            Value::Bool(b) => StoredValue::Bool(b),
            Value::Number(n) => StoredValue::Number(n),
            Value::String(text) => {
                let string = match String::from_utf8(text.into_bytes()) {
                    Ok(s) => s,
                    Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
                };
                StoredValue::String(string)
            }
            Value::Buffer(buffer) => StoredValue::Buffer(Bytes::from(buffer.into_vec())),
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value<'_> {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(TextHandle::from(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(TextHandle::from(s))
    }
}

impl<'a> From<TextHandle<'a>> for Value<'a> {
    fn from(text: TextHandle<'a>) -> Self {
        Value::String(text)
    }
}

impl<'a> From<NativeBuffer<'a>> for Value<'a> {
    fn from(buffer: NativeBuffer<'a>) -> Self {
        Value::Buffer(buffer)
    }
}

/// A value held by the storage engine
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Bool(bool),
    Number(f64),
    String(String),
    Buffer(Bytes),
}

impl StoredValue {
    /// Approximate encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            StoredValue::Bool(_) => 1,
            StoredValue::Number(_) => 8,
            StoredValue::String(s) => s.len(),
            StoredValue::Buffer(b) => b.len(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StoredValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&Bytes> {
        match self {
            StoredValue::Buffer(b) => Some(b),
            _ => None,
        }
    }
}
