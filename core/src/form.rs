use plans4you_protocol::{DentalPreference, HealthcareFormValues};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must contain digits only (got {value:?})")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("state must be a two-letter code such as FL (got {value:?})")]
    InvalidState { value: String },

    #[error("{field} must be yes or no (got {value:?})")]
    InvalidChoice { field: &'static str, value: String },
}

/// Form fields exactly as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub age: String,
    pub income: String,
    pub dependents: String,
    pub state: String,
    pub dental: String,
}

impl FormDraft {
    pub fn validate(&self) -> Result<HealthcareFormValues, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingField { field: "name" });
        }

        let age = parse_count("age", &self.age)?;
        if !(1..=120).contains(&age) {
            return Err(FormError::OutOfRange {
                field: "age",
                value: age,
                min: 1,
                max: 120,
            });
        }
        let dependents = parse_count("dependents", &self.dependents)?;
        let dependents = u32::try_from(dependents).map_err(|_| FormError::OutOfRange {
            field: "dependents",
            value: dependents,
            min: 0,
            max: u64::from(u32::MAX),
        })?;
        let income = parse_count("income", &self.income)?;

        Ok(HealthcareFormValues {
            name: name.to_string(),
            age: age as u32,
            income: income as f64,
            dependents,
            state: parse_state(&self.state)?,
            dental_plan_required: parse_dental(&self.dental)?,
        })
    }
}

/// Digits only; an empty field counts as zero.
pub fn parse_count(field: &'static str, text: &str) -> Result<u64, FormError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormError::NotANumber {
            field,
            value: text.to_string(),
        });
    }
    text.parse().map_err(|_| FormError::NotANumber {
        field,
        value: text.to_string(),
    })
}

pub fn parse_state(text: &str) -> Result<String, FormError> {
    let state = text.trim();
    if state.len() == 2 && state.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(state.to_ascii_uppercase())
    } else {
        Err(FormError::InvalidState {
            value: state.to_string(),
        })
    }
}

pub fn parse_dental(text: &str) -> Result<DentalPreference, FormError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(DentalPreference::Yes),
        "no" | "n" | "" => Ok(DentalPreference::No),
        other => Err(FormError::InvalidChoice {
            field: "dental",
            value: other.to_string(),
        }),
    }
}
