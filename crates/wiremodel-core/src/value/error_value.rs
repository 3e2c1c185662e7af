//! Error-object runtime value.

use serde_json::{Map, Value};
use std::fmt;

/// Default name for error values built from plain text.
pub const DEFAULT_ERROR_NAME: &str = "Error";

/// An error object carried as data.
///
/// Error values only describe a failure, they are never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    name: String,
    message: String,
    stack: Option<String>,
}

impl ErrorValue {
    /// A generic `Error` with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::named(DEFAULT_ERROR_NAME, message)
    }

    /// An error with a specific name such as `TypeError`.
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attach a stack trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Parse text of the form `Name: message`.
    ///
    /// Text without an identifier-like prefix becomes the message of a
    /// generic `Error`.
    pub fn parse(text: &str) -> Self {
        match text.split_once(": ") {
            Some((name, message)) if is_error_name(name) => Self::named(name, message),
            _ => Self::new(text),
        }
    }

    /// Build from a `{name, message, stack}` object. Missing name defaults to
    /// `Error`; a missing or non-string message yields `None`.
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let message = object.get("message")?.as_str()?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ERROR_NAME);
        let mut value = Self::named(name, message);
        if let Some(stack) = object.get("stack").and_then(Value::as_str) {
            value.stack = Some(stack.to_string());
        }
        Some(value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Tagged wire object.
    pub fn to_wire(&self) -> Value {
        let mut object = Map::new();
        object.insert("__type".into(), Value::String("Error".into()));
        object.insert("name".into(), Value::String(self.name.clone()));
        object.insert("message".into(), Value::String(self.message.clone()));
        if let Some(stack) = &self.stack {
            object.insert("stack".into(), Value::String(stack.clone()));
        }
        Value::Object(object)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

fn is_error_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
