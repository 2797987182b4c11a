//! Identity record data model and validation
//!
//! An `IdRecord` is the personal data printed on one in-world identity
//! document. Validity is a pure function of the fields, evaluated on demand
//! at commit time and again at display time; there is no persisted flag.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("hardcoded pattern"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("hardcoded pattern"))
}

/// Personal data for one identity document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdRecord {
    /// Canonical identity of the holder, stamped at display time
    #[serde(default)]
    pub id: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Date of birth in DD/MM/YYYY form
    pub date_of_birth: String,

    /// Free-text address
    pub address: String,

    /// true = male, false = female
    pub sex: bool,

    /// Height in centimeters
    pub height: i32,

    /// Weight in kilograms
    pub weight: i32,
}

impl IdRecord {
    /// Copy of the record with first and last name capitalized
    ///
    /// First letter uppercase, remainder lowercase. This is the form that
    /// gets committed; case differences in input all collapse to it.
    pub fn normalized(&self) -> IdRecord {
        IdRecord {
            first_name: capitalize_first_letter(&self.first_name),
            last_name: capitalize_first_letter(&self.last_name),
            ..self.clone()
        }
    }

    /// Whether the record passes all shape checks
    ///
    /// Names must be non-empty and alphabetic (spaces, apostrophes and
    /// hyphens allowed); the date of birth must match the DD/MM/YYYY shape.
    /// The date is not checked for calendar validity, and height/weight are
    /// well-formed by construction once stored as integers.
    pub fn is_valid(&self) -> bool {
        !self.first_name.is_empty()
            && name_pattern().is_match(&self.first_name)
            && !self.last_name.is_empty()
            && name_pattern().is_match(&self.last_name)
            && !self.date_of_birth.is_empty()
            && date_pattern().is_match(&self.date_of_birth)
    }

    /// One-letter sex label for display
    pub fn sex_label(&self) -> &'static str {
        if self.sex {
            "M"
        } else {
            "F"
        }
    }
}

/// Capitalize the first letter of a string and lowercase the remainder
pub fn capitalize_first_letter(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
