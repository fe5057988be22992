use super::super::dataset::Field;
use super::super::distribution::TagDistributionRow;
use super::super::metrics::ProspectingMetrics;
use super::super::offers::MissionContext;
use serde::Serialize;

/// One headline figure with its conversion rate, as shown on a KPI card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub key: &'static str,
    pub label: &'static str,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProspectingReportSummary {
    pub phone: Vec<KpiCard>,
    pub email: Vec<KpiCard>,
    pub meetings: Vec<KpiCard>,
}

impl ProspectingReportSummary {
    pub fn cards(&self) -> impl Iterator<Item = &KpiCard> {
        self.phone
            .iter()
            .chain(self.email.iter())
            .chain(self.meetings.iter())
    }
}

/// Values available for one segmentation picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOption {
    pub field: Field,
    pub label: &'static str,
    pub values: Vec<String>,
}

/// Serializable form of a report, returned by the HTTP API and `report --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub contacts_total: usize,
    pub contacts_filtered: usize,
    pub metrics: ProspectingMetrics,
    pub summary: ProspectingReportSummary,
    pub distribution: Vec<TagDistributionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<MissionContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_csv: Option<String>,
}
