use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub const MISSING_FIELD: &str = "Missing data for required field.";
pub const NULL_FIELD: &str = "Field may not be null.";
pub const UNKNOWN_FIELD: &str = "Unknown field.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "Not a valid integer.";
pub const NOT_A_DATE: &str = "Not a valid date.";
pub const INVALID_INPUT_TYPE: &str = "Invalid input type.";

/// Key used for errors that concern the payload as a whole.
pub const SCHEMA_KEY: &str = "_schema";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

static ISO_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()\- ]+$").expect("valid phone pattern"));

/// Field-level validation failures, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error that applies to the whole payload.
    pub fn schema(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(SCHEMA_KEY, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, messages.join(" "))?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// How a field's presence and nullability are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Must be present and non-null.
    Required,
    /// Must be present; null means "no value".
    RequiredNullable,
    /// May be absent or null.
    Optional,
    /// May be absent (keep the stored value) but never null.
    Patch,
}

/// Reads typed fields out of a JSON object, collecting every error instead of
/// stopping at the first one.
pub struct PayloadReader<'a> {
    fields: &'a Map<String, Value>,
    allowed: &'static [&'static str],
    errors: ValidationErrors,
}

impl<'a> PayloadReader<'a> {
    pub fn new(body: &'a Value, allowed: &'static [&'static str]) -> Result<Self, ValidationErrors> {
        match body.as_object() {
            Some(fields) => Ok(Self {
                fields,
                allowed,
                errors: ValidationErrors::new(),
            }),
            None => Err(ValidationErrors::schema(INVALID_INPUT_TYPE)),
        }
    }

    pub fn string(&mut self, field: &'static str, rule: Rule, max_len: usize) -> Option<String> {
        self.read(field, rule, |value| match value {
            Value::String(s) if s.chars().count() > max_len => {
                Err(format!("Longer than maximum length {}.", max_len))
            }
            Value::String(s) => Ok(s.clone()),
            _ => Err(NOT_A_STRING.to_string()),
        })
    }

    pub fn integer(&mut self, field: &'static str, rule: Rule) -> Option<i32> {
        self.read(field, rule, |value| parse_integer(value).ok_or_else(|| NOT_AN_INTEGER.to_string()))
    }

    pub fn date(&mut self, field: &'static str, rule: Rule) -> Option<NaiveDate> {
        self.read(field, rule, |value| {
            value
                .as_str()
                .and_then(parse_iso_date)
                .ok_or_else(|| NOT_A_DATE.to_string())
        })
    }

    /// Records an error against a field that parsed but broke a domain rule.
    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Flags unknown fields and returns every collected error.
    pub fn finish(mut self) -> Result<(), ValidationErrors> {
        let fields = self.fields;
        for key in fields.keys() {
            if !self.allowed.contains(&key.as_str()) {
                self.errors.add(key, UNKNOWN_FIELD);
            }
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn read<T>(
        &mut self,
        field: &'static str,
        rule: Rule,
        parse: impl FnOnce(&Value) -> Result<T, String>,
    ) -> Option<T> {
        let fields = self.fields;
        match (fields.get(field), rule) {
            (None, Rule::Required | Rule::RequiredNullable) => {
                self.errors.add(field, MISSING_FIELD);
                None
            }
            (None, _) => None,
            (Some(Value::Null), Rule::Required | Rule::Patch) => {
                self.errors.add(field, NULL_FIELD);
                None
            }
            (Some(Value::Null), _) => None,
            (Some(value), _) => match parse(value) {
                Ok(parsed) => Some(parsed),
                Err(message) => {
                    self.errors.add(field, message);
                    None
                }
            },
        }
    }
}

/// Accepts JSON integers and numeric strings that fit in an `i32`.
fn parse_integer(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses an ISO calendar date. Only the exact `YYYY-MM-DD` shape is accepted:
/// no padding, no sign, no year zero or five-digit years.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    if !ISO_DATE_PATTERN.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| date.year() >= 1)
}

/// Email validation
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err("Not a valid email address.");
    }
    Ok(())
}

/// Phone validation: digits plus common separators.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_PATTERN.is_match(phone) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err("Not a valid phone number.");
    }
    Ok(())
}
