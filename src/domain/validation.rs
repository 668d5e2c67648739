//! Per-step validation rules.
//!
//! Validation runs against the whole candidate record and reports, for each
//! failing field, the message of the first rule it violated. A record either
//! passes completely or nothing is committed.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{PackageInfo, Person};

/// Field keys, matching the wire names of the validated records.
pub mod keys {
    pub const FULL_NAME: &str = "fullname";
    pub const TAX_ID: &str = "cpf";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const POSTAL_CODE: &str = "cep";
    pub const STATE: &str = "state";
    pub const STATE_CODE: &str = "uf";
    pub const CITY: &str = "city";
    pub const NEIGHBORHOOD: &str = "neighborhood";
    pub const STREET: &str = "street";
    pub const NUMBER: &str = "number";
    pub const DESCRIPTION: &str = "description";
}

/// Minimum masked lengths. A full CPF mask is `###.###.###-##`.
pub const MIN_TAX_ID_LEN: usize = 14;
pub const MIN_PHONE_LEN: usize = 14;
pub const MIN_POSTAL_CODE_LEN: usize = 9;
pub const MIN_STATE_LEN: usize = 2;
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Message stored under [`keys::DESCRIPTION`] when the description is too short.
pub const DESCRIPTION_TOO_SHORT: &str = "description must be at least 10 characters";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
});

/// Field key to message of the first rule that field violated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless the field already failed an earlier rule.
    pub fn add(&mut self, key: &'static str, message: impl Into<String>) {
        self.0.entry(key).or_insert_with(|| message.into());
    }

    /// Message for `key`, if that field failed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Drops every message, as a successful submit does.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Failed fields and their messages, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Messages shown when a person record fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonMessages {
    pub full_name: &'static str,
    pub tax_id: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub postal_code: &'static str,
    pub state: &'static str,
    pub state_code: &'static str,
    pub city: &'static str,
    pub neighborhood: &'static str,
    pub street: &'static str,
    pub number: &'static str,
}

impl Default for PersonMessages {
    fn default() -> Self {
        Self {
            full_name: "Full name is required",
            tax_id: "Invalid CPF",
            phone: "Invalid phone number",
            email: "Invalid email",
            postal_code: "Invalid CEP",
            state: "State is required",
            state_code: "Invalid UF",
            city: "City is required",
            neighborhood: "Neighborhood is required",
            street: "Street is required",
            number: "Number is required",
        }
    }
}

/// Validates a sender or receiver.
pub fn validate_person(person: &Person, messages: &PersonMessages) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let address = &person.address;

    require_min(&mut errors, keys::FULL_NAME, &person.full_name, 1, messages.full_name);
    require_min(&mut errors, keys::TAX_ID, &person.tax_id, MIN_TAX_ID_LEN, messages.tax_id);
    require_min(&mut errors, keys::PHONE, &person.phone, MIN_PHONE_LEN, messages.phone);
    if !is_valid_email(&person.email) {
        errors.add(keys::EMAIL, messages.email);
    }

    require_min(
        &mut errors,
        keys::POSTAL_CODE,
        &address.postal_code,
        MIN_POSTAL_CODE_LEN,
        messages.postal_code,
    );
    require_min(&mut errors, keys::STATE, &address.state, MIN_STATE_LEN, messages.state);
    if !is_state_code(&address.state_code) {
        errors.add(keys::STATE_CODE, messages.state_code);
    }
    require_min(&mut errors, keys::CITY, &address.city, 1, messages.city);
    require_min(
        &mut errors,
        keys::NEIGHBORHOOD,
        &address.neighborhood,
        1,
        messages.neighborhood,
    );
    require_min(&mut errors, keys::STREET, &address.street, 1, messages.street);
    require_min(&mut errors, keys::NUMBER, &address.number, 1, messages.number);

    errors.into_result()
}

/// Validates the package step. Only the declared description is checked.
pub fn validate_package(package: &PackageInfo) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_min(
        &mut errors,
        keys::DESCRIPTION,
        &package.declaration.description,
        MIN_DESCRIPTION_LEN,
        DESCRIPTION_TOO_SHORT,
    );
    errors.into_result()
}

/// Loose syntactic check: one `@`, no spaces and a dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

fn is_state_code(value: &str) -> bool {
    value.chars().count() == 2 && value.chars().all(char::is_alphabetic)
}

fn require_min(
    errors: &mut FieldErrors,
    key: &'static str,
    value: &str,
    min_chars: usize,
    message: &str,
) {
    if value.chars().count() < min_chars {
        errors.add(key, message);
    }
}
