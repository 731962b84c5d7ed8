//! CSV export of search results.

use std::io::{Read, Write};

use thiserror::Error;

use crate::model::JobPosting;

/// Name offered for the downloaded results.
pub const EXPORT_FILE_NAME: &str = "job_search_results.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Writes a header row followed by one row per posting.
pub fn write_csv<W: Write>(writer: W, jobs: &[JobPosting]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for job in jobs {
        csv_writer.serialize(job)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(jobs: &[JobPosting]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, jobs)?;
    Ok(String::from_utf8(buffer)?)
}

/// Reads postings back from an export.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<JobPosting>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut jobs = Vec::new();
    for record in csv_reader.deserialize() {
        jobs.push(record?);
    }
    Ok(jobs)
}
