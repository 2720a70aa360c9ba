//! Common types used across the platform

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Keys under which an error message can be reported back to the form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKey {
    Name,
    Industry,
    Timezone,
    DefaultReplyTone,
    /// Page-level message not tied to an input
    General,
    /// Caller is not signed in
    Auth,
}

impl ErrorKey {
    /// Wire name of the key, as used by the form fields
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKey::Name => "name",
            ErrorKey::Industry => "industry",
            ErrorKey::Timezone => "timezone",
            ErrorKey::DefaultReplyTone => "defaultReplyTone",
            ErrorKey::General => "general",
            ErrorKey::Auth => "auth",
        }
    }

    /// Map a struct field identifier onto its error key.
    /// Unknown fields are reported as page-level errors.
    pub fn from_field(field: &str) -> Self {
        match field {
            "name" => ErrorKey::Name,
            "industry" => ErrorKey::Industry,
            "timezone" => ErrorKey::Timezone,
            "default_reply_tone" | "defaultReplyTone" => ErrorKey::DefaultReplyTone,
            "auth" => ErrorKey::Auth,
            _ => ErrorKey::General,
        }
    }
}

impl std::fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error messages keyed by field, `general` or `auth`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<ErrorKey, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping holding a single message
    pub fn single(key: ErrorKey, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(key, message);
        errors
    }

    /// Record a message; the first message for a key wins
    pub fn insert(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.0.entry(key).or_insert_with(|| message.into());
    }

    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ErrorKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(ErrorKey, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (ErrorKey, String)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (key, message) in iter {
            errors.insert(key, message);
        }
        errors
    }
}
