use std::io::Read;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::form::{Gender, Language, SubmissionForm};
use crate::error::{CheckoutError, Result};

/// One CSV row of submission input. Gender and language stay raw strings
/// here; mapping them onto the enums is part of building the form, so an
/// unknown value becomes a validation error instead of a parse failure.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SubmissionRecord {
    pub name: String,
    pub dob: String,
    pub mobile: String,
    pub email: String,
    pub gender: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub coupon: String,
}

impl SubmissionRecord {
    pub fn into_form(self) -> SubmissionForm {
        SubmissionForm {
            name: self.name,
            dob: self.dob,
            mobile: self.mobile,
            email: self.email,
            gender: Gender::from_str(&self.gender).ok(),
            language: Language::from_str(&self.language).unwrap_or_default(),
        }
    }
}

/// Reads submissions from a CSV source.
///
/// Wraps `csv::Reader` and yields `Result<SubmissionRecord>` lazily, so large
/// batches stream without loading the whole file.
pub struct SubmissionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SubmissionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn submissions(self) -> impl Iterator<Item = Result<SubmissionRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "name, dob, mobile, email, gender, language, coupon\n\
                    Amit Sharma, 29/11/1990, 9876543210, amit@example.com, Male, Hindi,\n\
                    Priya Patel, 05/03/1985, 9123456780, priya@example.com, Female, , vijay";
        let reader = SubmissionReader::new(data.as_bytes());
        let results: Vec<Result<SubmissionRecord>> = reader.submissions().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.name, "Amit Sharma");
        assert_eq!(first.coupon, "");

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.coupon, "vijay");
        let form = second.clone().into_form();
        assert_eq!(form.gender, Some(Gender::Female));
        assert_eq!(form.language, Language::English);
    }

    #[test]
    fn test_unknown_gender_becomes_missing() {
        let data = "name, dob, mobile, email, gender\n\
                    Amit, 29/11/1990, 9876543210, amit@example.com, Unknown";
        let reader = SubmissionReader::new(data.as_bytes());
        let record = reader.submissions().next().unwrap().unwrap();
        assert_eq!(record.into_form().gender, None);
    }

    #[test]
    fn test_reader_missing_columns() {
        let data = "name, dob\nAmit, 29/11/1990";
        let reader = SubmissionReader::new(data.as_bytes());
        let results: Vec<Result<SubmissionRecord>> = reader.submissions().collect();
        assert!(results[0].is_err());
    }
}
