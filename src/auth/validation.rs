//! Client-side validation for the sign-in form
//!
//! Both fields are required. Every violation is collected before reporting,
//! so a form with two empty fields yields two messages.

use std::collections::BTreeMap;

/// A sign-in form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Password,
}

impl Field {
    /// Label shown above the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    /// Message shown when the field is left empty
    pub fn required_message(&self) -> &'static str {
        match self {
            Field::Username => "Username is required",
            Field::Password => "Password is required",
        }
    }

    /// The field after this one, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        }
    }

    /// The field before this one, wrapping around
    pub fn previous(&self) -> Self {
        // Two fields: previous and next coincide
        self.next()
    }
}

/// Validation messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// All messages for a field, if any
    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    /// First message for a field (what the form displays inline)
    pub fn first(&self, field: Field) -> Option<&str> {
        self.get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Fields with at least one message, in form order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Check the sign-in form
///
/// A field is missing only when it is the empty string; whitespace counts as
/// input and is sent as typed.
pub fn validate_sign_in(username: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for (field, value) in [(Field::Username, username), (Field::Password, password)] {
        if value.is_empty() {
            errors.add(field, field.required_message());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
