use super::tags::{parse_tags, TagSet};
use crate::workflows::crm_export::{field_for_header, parse_instant};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Semantic columns of a CRM contact export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CallTimestamp,
    CallTags,
    EmailLeadStatus,
    LifecyclePhase,
    Campaign,
    JobTitle,
    Sector,
    CompanySize,
    Location,
    LastActivityDate,
}

impl Field {
    /// Segmentation dimensions, in the order the filter engine applies them.
    pub const fn segments() -> [Self; 5] {
        [
            Self::Campaign,
            Self::JobTitle,
            Self::Sector,
            Self::CompanySize,
            Self::Location,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CallTimestamp => "Last call timestamp",
            Self::CallTags => "Last call tags",
            Self::EmailLeadStatus => "Email lead status",
            Self::LifecyclePhase => "Lifecycle phase",
            Self::Campaign => "Campaign",
            Self::JobTitle => "Job title",
            Self::Sector => "Sector",
            Self::CompanySize => "Company size",
            Self::Location => "Location",
            Self::LastActivityDate => "Last activity date",
        }
    }
}

#[derive(Debug)]
struct Schema {
    headers: Vec<String>,
    columns: HashMap<Field, usize>,
}

impl Schema {
    fn resolve(headers: Vec<String>) -> Self {
        let mut columns = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(field) = field_for_header(header) {
                columns.entry(field).or_insert(index);
            }
        }
        Self { headers, columns }
    }
}

/// One contact of the export. Cells are kept verbatim so the row can be
/// written back out with its original columns.
#[derive(Debug, Clone)]
pub struct ContactRow {
    schema: Arc<Schema>,
    cells: Vec<String>,
}

impl ContactRow {
    /// Value of `field`, or `None` when the column is missing from the export
    /// or the cell is blank.
    pub fn get(&self, field: Field) -> Option<&str> {
        let index = *self.schema.columns.get(&field)?;
        self.cells
            .get(index)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    /// Value of `field` parsed as an instant; unparseable values are absent.
    pub fn instant(&self, field: Field) -> Option<NaiveDateTime> {
        self.get(field).and_then(parse_instant)
    }

    pub fn tags(&self) -> TagSet {
        parse_tags(self.get(Field::CallTags))
    }

    pub fn is_called(&self) -> bool {
        self.instant(Field::CallTimestamp).is_some()
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// In-memory CRM export: original headers plus contact rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Vec<ContactRow>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let schema = Arc::new(Schema::resolve(headers));
        let rows = rows
            .into_iter()
            .map(|cells| ContactRow {
                schema: Arc::clone(&schema),
                cells,
            })
            .collect();
        Self { schema, rows }
    }

    /// Convenience constructor for literal tables.
    pub fn from_table(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|header| header.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn headers(&self) -> &[String] {
        &self.schema.headers
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.schema.columns.contains_key(&field)
    }

    /// Semantic fields recognized among the export headers.
    pub fn recognized_fields(&self) -> BTreeSet<Field> {
        self.schema.columns.keys().copied().collect()
    }

    pub fn rows(&self) -> &[ContactRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New view holding the rows matching `keep`; `self` is left untouched.
    pub fn select<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&ContactRow) -> bool,
    {
        Dataset {
            schema: Arc::clone(&self.schema),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// Sorted distinct non-blank values of `field`; empty when the column is missing.
    pub fn distinct_values(&self, field: Field) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(field))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}
