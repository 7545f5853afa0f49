//! Value object trait and the value objects shared by several resources.
//!
//! Value objects have **no identity**: they are defined entirely by their
//! attribute values. Two value objects with the same values are equal.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// - **Value Object**: no identity (`PhoneNumber { "90", "5551234567" }`)
/// - **Entity**: has identity (two roles with the same id are the same role)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A phone number split into country code and line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    country_code: String,
    line_number: String,
}

impl ValueObject for PhoneNumber {}

impl PhoneNumber {
    /// Both parts must be non-empty and numeric.
    pub fn new(country_code: impl Into<String>, line_number: impl Into<String>) -> DomainResult<Self> {
        let country_code = country_code.into();
        let line_number = line_number.into();

        if !is_digits(&country_code) {
            return Err(DomainError::validation("phone number country code must be numeric"));
        }
        if !is_digits(&line_number) {
            return Err(DomainError::validation("phone number line number must be numeric"));
        }

        Ok(Self {
            country_code,
            line_number,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn line_number(&self) -> &str {
        &self.line_number
    }
}

impl core::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "+{} {}", self.country_code, self.line_number)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
