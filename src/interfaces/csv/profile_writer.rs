use std::io::Write;

use serde::Serialize;

use crate::domain::form::SubmissionForm;
use crate::domain::numerology::NumerologyProfile;
use crate::error::Result;

/// One CSV output row: the identity columns plus the five computed numbers
/// and, when a checkout ran, the minted report locator.
#[derive(Debug, Serialize, PartialEq)]
pub struct ProfileRow {
    pub name: String,
    pub dob: String,
    pub life_path: u32,
    pub destiny: u32,
    pub soul_urge: u32,
    pub personality: u32,
    pub birthday: u32,
    pub report: String,
}

impl ProfileRow {
    pub fn new(form: &SubmissionForm, profile: NumerologyProfile) -> Self {
        Self {
            name: form.name.trim().to_string(),
            dob: form.dob.clone(),
            life_path: profile.life_path,
            destiny: profile.destiny,
            soul_urge: profile.soul_urge,
            personality: profile.personality,
            birthday: profile.birthday,
            report: String::new(),
        }
    }

    pub fn with_report(mut self, locator: impl Into<String>) -> Self {
        self.report = locator.into();
        self
    }
}

/// Writes profile rows as CSV.
pub struct ProfileWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProfileWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_row(&mut self, row: &ProfileRow) -> Result<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{Gender, SubmissionForm};

    #[test]
    fn test_writer_emits_header_and_rows() {
        let form = SubmissionForm {
            name: "Amit".to_string(),
            dob: "29/11/1990".to_string(),
            mobile: "9876543210".to_string(),
            email: "amit@example.com".to_string(),
            gender: Some(Gender::Male),
            language: Default::default(),
        };
        let profile = NumerologyProfile::compute("Amit", 29, 11, 1990);

        let mut buffer = Vec::new();
        {
            let mut writer = ProfileWriter::new(&mut buffer);
            writer.write_row(&ProfileRow::new(&form, profile)).unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,dob,life_path,destiny,soul_urge,personality,birthday,report"
        );
        assert_eq!(lines.next().unwrap(), "Amit,29/11/1990,5,7,1,6,11,");
    }
}
