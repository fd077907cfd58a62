use std::fmt;

use jiff::civil;

use crate::domain::form::SubmissionForm;

/// A validatable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Dob,
    Mobile,
    Email,
    Gender,
    Coupon,
}

impl Field {
    /// The required fields, in display order. `Coupon` is optional and only
    /// carries server-side rejections, so it is not part of this set.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Dob,
        Field::Mobile,
        Field::Email,
        Field::Gender,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Dob => "dob",
            Field::Mobile => "mobile",
            Field::Email => "email",
            Field::Gender => "gender",
            Field::Coupon => "coupon",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The current civil year, used as the DOB upper bound.
pub fn current_year() -> i16 {
    jiff::Zoned::now().date().year()
}

pub fn validate_name(value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new(Field::Name, "Full name is required"));
    }
    if trimmed.len() < 2 {
        return Some(FieldError::new(
            Field::Name,
            "Name must be at least 2 characters",
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        return Some(FieldError::new(Field::Name, "Name can only contain letters"));
    }
    None
}

/// Validates a `DD/MM/YYYY` date against `year_bound` (normally the current
/// year). Constructing the civil date rejects impossible days such as 31/02.
pub fn validate_dob_with_year(value: &str, year_bound: i16) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::new(Field::Dob, "Date of birth is required"));
    }
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return Some(FieldError::new(Field::Dob, "Use DD/MM/YYYY format"));
    }
    let (Ok(day), Ok(month), Ok(year)) = (
        parts[0].parse::<i8>(),
        parts[1].parse::<i8>(),
        parts[2].parse::<i16>(),
    ) else {
        return Some(FieldError::new(Field::Dob, "Invalid date format"));
    };
    if !(1..=31).contains(&day) {
        return Some(FieldError::new(Field::Dob, "Invalid day"));
    }
    if !(1..=12).contains(&month) {
        return Some(FieldError::new(Field::Dob, "Invalid month"));
    }
    if year < 1900 || year > year_bound {
        return Some(FieldError::new(Field::Dob, "Invalid year"));
    }
    if civil::Date::new(year, month, day).is_err() {
        return Some(FieldError::new(Field::Dob, "Invalid date for this month"));
    }
    None
}

pub fn validate_dob(value: &str) -> Option<FieldError> {
    validate_dob_with_year(value, current_year())
}

/// Conservative `local@domain.tld` shape: no whitespace, exactly one `@`,
/// and a dot-separated domain with non-empty parts.
pub fn validate_email(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::new(Field::Email, "Email address is required"));
    }
    let invalid = || Some(FieldError::new(Field::Email, "Invalid email format"));
    if value.chars().any(char::is_whitespace) {
        return invalid();
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return invalid();
    };
    if local.is_empty() || domain.is_empty() {
        return invalid();
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return invalid();
    };
    if host.is_empty() || tld.is_empty() {
        return invalid();
    }
    None
}

pub fn validate_mobile(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::new(Field::Mobile, "Mobile number is required"));
    }
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 10 {
        return Some(FieldError::new(
            Field::Mobile,
            "Enter a valid 10-digit number",
        ));
    }
    None
}

pub fn validate_gender(form: &SubmissionForm) -> Option<FieldError> {
    if form.gender.is_none() {
        return Some(FieldError::new(Field::Gender, "Please select your gender"));
    }
    None
}

/// All field errors at once, not just the first.
pub fn validate_form(form: &SubmissionForm) -> Vec<FieldError> {
    [
        validate_name(&form.name),
        validate_dob(&form.dob),
        validate_mobile(&form.mobile),
        validate_email(&form.email),
        validate_gender(form),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Parses an already-validated DOB into (day, month, year) for the
/// numerology engine. Accepts both display (`/`) and wire (`-`) separators.
pub fn parse_dob(value: &str) -> Option<(u32, u32, u32)> {
    let sep = if value.contains('/') { '/' } else { '-' };
    let mut parts = value.split(sep);
    let day = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let year = parts.next()?.parse().ok()?;
    Some((day, month, year))
}
