//! Declarative form validation.
//! A schema maps field names to rules (required / pattern / minimum length);
//! a generic evaluator returns field-level errors. A form that fails
//! validation never issues a request.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Default)]
pub struct FieldRule {
    required: Option<String>,
    min_length: Option<(usize, String)>,
    patterns: Vec<(Regex, String)>,
}

impl FieldRule {
    pub fn required(msg: &str) -> Self {
        Self { required: Some(msg.to_string()), ..Default::default() }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, len: usize, msg: &str) -> Self {
        self.min_length = Some((len, msg.to_string()));
        self
    }

    pub fn pattern(mut self, re: &str, msg: &str) -> Self {
        // Schemas are static; a malformed pattern is a programming error.
        self.patterns.push((Regex::new(re).expect("invalid schema pattern"), msg.to_string()));
        self
    }

    fn check(&self, field: &str, value: Option<&str>, errors: &mut Vec<FieldError>) {
        let value = value.unwrap_or("").trim();
        if value.is_empty() {
            if let Some(msg) = &self.required {
                errors.push(FieldError { field: field.to_string(), message: msg.clone() });
            }
            return;
        }
        if let Some((len, msg)) = &self.min_length {
            if value.chars().count() < *len {
                errors.push(FieldError { field: field.to_string(), message: msg.clone() });
            }
        }
        for (re, msg) in &self.patterns {
            if !re.is_match(value) {
                errors.push(FieldError { field: field.to_string(), message: msg.clone() });
            }
        }
    }
}

pub struct Schema {
    fields: Vec<(&'static str, FieldRule)>,
}

impl Schema {
    pub fn new(fields: Vec<(&'static str, FieldRule)>) -> Self {
        Self { fields }
    }

    /// Evaluate the schema against submitted values. Errors come back in
    /// schema field order, at most one required-error per field before the
    /// finer checks run.
    pub fn validate(&self, values: &HashMap<&str, &str>) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        for (field, rule) in &self.fields {
            rule.check(field, values.get(field).copied(), &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and collapse into the unified error model (first message
    /// wins); used by engine entry points that take pre-built forms.
    pub fn validate_as_app_error(&self, values: &HashMap<&str, &str>) -> AppResult<()> {
        self.validate(values)
            .map_err(|errs| AppError::validation("invalid_form".to_string(), errs[0].message.clone()))
    }
}

static EMAIL_RE: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub static LOGIN_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        (
            "email",
            FieldRule::required("Please enter your email address")
                .pattern(EMAIL_RE, "Please enter a valid email address"),
        ),
        ("password", FieldRule::required("Please enter your password")),
    ])
});

pub static REGISTER_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        ("name", FieldRule::required("Please enter your name")),
        ("photo", FieldRule::required("Please upload a profile picture")),
        (
            "email",
            FieldRule::required("Please enter your email address")
                .pattern(EMAIL_RE, "Please enter a valid email address"),
        ),
        (
            "password",
            FieldRule::required("Please enter a password")
                .min_length(6, "Password must be at least 6 characters")
                .pattern(r"[A-Z]", "Password must include an uppercase letter")
                .pattern(r"[!@#$&*]", "Password must include a special character"),
        ),
    ])
});

pub static ADD_PET_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        ("petImage", FieldRule::required("Please upload an image of your pet.")),
        ("petName", FieldRule::required("Please put your pet's name.")),
        (
            "petAge",
            FieldRule::required("Please put your pet's age.")
                .pattern(r"^\d+$", "Age must be a whole number"),
        ),
        ("petCategory", FieldRule::required("Please select a category for your pet.")),
        ("petLocation", FieldRule::required("Please tell us where your pet is located.")),
        ("shortDescription", FieldRule::required("Please write a short description of your pet.")),
    ])
});

pub static CAMPAIGN_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        ("petName", FieldRule::required("Pet name is required")),
        ("petImage", FieldRule::required("Please upload a picture")),
        (
            "maxDonationAmount",
            FieldRule::required("This field is required")
                .pattern(r"^\d+(\.\d+)?$", "Amount must be a number"),
        ),
        (
            "lastDateOfDonation",
            FieldRule::required("This field is required")
                .pattern(r"^\d{4}-\d{2}-\d{2}$", "Date must be YYYY-MM-DD"),
        ),
        ("shortDescription", FieldRule::required("A short description is required")),
    ])
});

pub static ADOPTION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        ("phoneNumber", FieldRule::required("Phone number is required.")),
        ("address", FieldRule::required("Address is required.")),
    ])
});
