pub mod profile_writer;
pub mod submission_reader;
