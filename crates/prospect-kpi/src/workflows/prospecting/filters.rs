use super::dataset::{ContactRow, Dataset, Field};
use crate::workflows::crm_export::{parse_day, parse_instant};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// How a date bound behaves when no dated row satisfies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilterMode {
    /// The bound is dropped and the view is kept as is.
    #[default]
    Lenient,
    /// The view becomes empty.
    Strict,
}

impl DateFilterMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Segmentation and date constraints chosen by the user. Empty lists and
/// `None` bounds do not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub campaigns: Vec<String>,
    pub job_titles: Vec<String>,
    pub sectors: Vec<String>,
    pub company_sizes: Vec<String>,
    pub locations: Vec<String>,
    #[serde(deserialize_with = "deserialize_optional_instant")]
    pub start: Option<NaiveDateTime>,
    /// A date-only value is read as the last second of that day.
    #[serde(deserialize_with = "deserialize_optional_end")]
    pub end: Option<NaiveDateTime>,
    pub date_mode: Option<DateFilterMode>,
}

impl FilterCriteria {
    pub fn allowed_values(&self, field: Field) -> &[String] {
        match field {
            Field::Campaign => &self.campaigns,
            Field::JobTitle => &self.job_titles,
            Field::Sector => &self.sectors,
            Field::CompanySize => &self.company_sizes,
            Field::Location => &self.locations,
            _ => &[],
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        Field::segments()
            .into_iter()
            .all(|field| self.allowed_values(field).is_empty())
            && self.start.is_none()
            && self.end.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
enum DateBound {
    Start(NaiveDateTime),
    End(NaiveDateTime),
}

impl DateBound {
    fn admits(self, instant: NaiveDateTime) -> bool {
        match self {
            DateBound::Start(start) => instant >= start,
            DateBound::End(end) => instant <= end,
        }
    }

    fn admits_row(self, row: &ContactRow) -> bool {
        [Field::CallTimestamp, Field::LastActivityDate]
            .into_iter()
            .filter_map(|field| row.instant(field))
            .any(|instant| self.admits(instant))
    }
}

/// Applies segment filters (campaign, title, sector, size, location) and
/// then the start and end bounds, each to the output of the previous step.
pub fn apply_filters(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    if criteria.is_unrestricted() {
        return dataset.clone();
    }

    let mut view = dataset.clone();

    for field in Field::segments() {
        view = retain_segment(view, field, criteria.allowed_values(field));
    }

    let mode = criteria.date_mode.unwrap_or_default();
    if let Some(start) = criteria.start {
        view = retain_dated(view, DateBound::Start(start), mode);
    }
    if let Some(end) = criteria.end {
        view = retain_dated(view, DateBound::End(end), mode);
    }

    debug!(
        rows_in = dataset.len(),
        rows_out = view.len(),
        "applied prospecting filters"
    );
    view
}

fn retain_segment(view: Dataset, field: Field, allowed: &[String]) -> Dataset {
    if allowed.is_empty() || !view.has_column(field) {
        return view;
    }

    view.select(|row| {
        let value = row.get(field).unwrap_or("");
        allowed.iter().any(|candidate| candidate == value)
    })
}

fn retain_dated(view: Dataset, bound: DateBound, mode: DateFilterMode) -> Dataset {
    let matched = view.select(|row| bound.admits_row(row));
    if !matched.is_empty() || view.is_empty() {
        return matched;
    }

    match mode {
        DateFilterMode::Lenient => {
            debug!(?bound, rows = view.len(), "date bound matched no rows, ignoring it");
            view
        }
        DateFilterMode::Strict => matched,
    }
}

fn deserialize_optional_instant<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bound(deserializer, parse_instant)
}

fn deserialize_optional_end<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bound(deserializer, |raw| match parse_day(raw) {
        Some(day) => day.and_hms_opt(23, 59, 59),
        None => parse_instant(raw),
    })
}

fn deserialize_bound<'de, D, P>(deserializer: D, parse: P) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
    P: Fn(&str) -> Option<NaiveDateTime>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date '{raw}'"))),
    }
}
