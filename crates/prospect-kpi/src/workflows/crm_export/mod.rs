mod mapping;
mod normalizer;
mod parser;

use crate::workflows::prospecting::{Dataset, Field};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

pub(crate) use mapping::field_for_header;
pub use parser::{parse_day, parse_instant};

#[derive(Debug, thiserror::Error)]
pub enum CrmExportError {
    #[error("failed to read CRM export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CRM export CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads HubSpot/lemlist/Aircall contact exports into a [`Dataset`].
pub struct CrmExportLoader;

impl CrmExportLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, CrmExportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, CrmExportError> {
        let raw = parser::parse_export(reader)?;
        let dataset = Dataset::new(raw.headers, raw.rows);

        let unrecognized = dataset
            .headers()
            .iter()
            .filter(|header| field_for_header(header).is_none())
            .count();
        debug!(
            rows = dataset.len(),
            columns = dataset.headers().len(),
            recognized = ?dataset.recognized_fields(),
            unrecognized,
            "loaded CRM export"
        );

        Ok(dataset)
    }
}

/// Writes `dataset` as CSV with its original headers and cells.
pub fn write_export<W: Write>(dataset: &Dataset, writer: W) -> Result<(), CrmExportError> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    if !dataset.headers().is_empty() {
        csv_writer.write_record(dataset.headers())?;
    }
    for row in dataset.rows() {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders `dataset` as an in-memory CSV string.
pub fn export_to_string(dataset: &Dataset) -> Result<String, CrmExportError> {
    let mut buffer = Vec::new();
    write_export(dataset, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
}

/// Segmentation fields a header row resolves to, for diagnostics.
pub fn recognized_segments(dataset: &Dataset) -> Vec<Field> {
    Field::segments()
        .into_iter()
        .filter(|field| dataset.has_column(*field))
        .collect()
}
