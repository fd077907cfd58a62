use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::validation::{self, Field, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "English" | "" => Ok(Language::English),
            "Hindi" => Ok(Language::Hindi),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        })
    }
}

/// The raw identity/birth data a visitor submits.
///
/// The date of birth is kept in display format (`DD/MM/YYYY`); wire DTOs
/// convert it at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub name: String,
    pub dob: String,
    pub mobile: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub language: Language,
}

impl SubmissionForm {
    /// Mobile number with all non-digit characters stripped.
    pub fn mobile_digits(&self) -> String {
        self.mobile.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Date of birth in the wire format (`DD-MM-YYYY`).
    pub fn dob_wire(&self) -> String {
        self.dob.replace('/', "-")
    }
}

/// A form plus its per-field "touched" tracking.
///
/// Every mutation re-validates the whole form, so `is_submittable` is always
/// current. Errors are only *visible* for fields the user has visited; submit
/// marks everything touched so all outstanding errors surface at once.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    form: SubmissionForm,
    touched: HashSet<Field>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.form.name = value.into();
    }

    pub fn set_dob(&mut self, value: impl Into<String>) {
        self.form.dob = value.into();
    }

    pub fn set_mobile(&mut self, value: impl Into<String>) {
        self.form.mobile = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.form.email = value.into();
    }

    pub fn set_gender(&mut self, value: Gender) {
        self.form.gender = Some(value);
    }

    pub fn set_language(&mut self, value: Language) {
        self.form.language = value;
    }

    /// Marks a field visited; its error (if any) becomes visible.
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    /// Forces every outstanding error visible. Called on submit.
    pub fn mark_all_touched(&mut self) {
        for field in Field::ALL {
            self.touched.insert(field);
        }
    }

    /// All current field errors, touched or not.
    pub fn errors(&self) -> Vec<FieldError> {
        validation::validate_form(&self.form)
    }

    /// Errors for fields the user has visited.
    pub fn visible_errors(&self) -> Vec<FieldError> {
        self.errors()
            .into_iter()
            .filter(|e| self.touched.contains(&e.field))
            .collect()
    }

    /// Submit-eligibility is computed from validity alone, independent of
    /// which fields have been touched.
    pub fn is_submittable(&self) -> bool {
        self.errors().is_empty()
    }
}
