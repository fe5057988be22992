use super::super::dataset::{Dataset, Field};
use super::super::distribution::{compute_distribution, TagDistributionRow};
use super::super::filters::{apply_filters, FilterCriteria};
use super::super::metrics::{compute_metrics, ProspectingMetrics};
use super::super::offers::MissionContext;
use super::views::{KpiCard, ProspectingReportSummary, ReportDocument, SegmentOption};
use tracing::debug;

/// Filtered view of an export together with the KPIs computed on it.
#[derive(Debug, Clone)]
pub struct ProspectingReport {
    pub contacts_total: usize,
    pub filtered: Dataset,
    pub metrics: ProspectingMetrics,
    pub distribution: Vec<TagDistributionRow>,
}

impl ProspectingReport {
    pub fn generate(dataset: &Dataset, criteria: &FilterCriteria) -> Self {
        let filtered = apply_filters(dataset, criteria);
        let metrics = compute_metrics(&filtered);
        let distribution = compute_distribution(&filtered);

        let unknown_tags = distribution.iter().filter(|row| !row.known).count();
        if unknown_tags > 0 {
            debug!(unknown_tags, "call tags outside the known outcome vocabulary");
        }

        Self {
            contacts_total: dataset.len(),
            filtered,
            metrics,
            distribution,
        }
    }

    pub fn contacts_filtered(&self) -> usize {
        self.filtered.len()
    }

    pub fn summary(&self) -> ProspectingReportSummary {
        let m = &self.metrics;

        ProspectingReportSummary {
            phone: vec![
                card("calls_total", "Appels total", m.calls_total, None),
                card(
                    "calls_connected",
                    "Appels connectés",
                    m.calls_connected,
                    Some(("connection_rate", m.connection_rate)),
                ),
                card(
                    "calls_pitched",
                    "Pitchs",
                    m.calls_pitched,
                    Some(("pitch_rate", m.pitch_rate)),
                ),
                card(
                    "rdv_phone",
                    "RDV téléphone",
                    m.rdv_phone,
                    Some(("phone_conv_rate", m.phone_conv_rate)),
                ),
            ],
            email: vec![
                card("contacts_email", "Contacts email", m.contacts_email, None),
                card(
                    "contacts_opened",
                    "Ouvertures",
                    m.contacts_opened,
                    Some(("open_rate", m.open_rate)),
                ),
                card(
                    "contacts_replied",
                    "Réponses",
                    m.contacts_replied,
                    Some(("reply_rate", m.reply_rate)),
                ),
                card(
                    "rdv_email",
                    "RDV e-mail",
                    m.rdv_email,
                    Some(("email_conv_rate", m.email_conv_rate)),
                ),
            ],
            meetings: vec![card(
                "rdv_total",
                "RDV total",
                m.rdv_total,
                Some(("overall_conv_rate", m.overall_conv_rate)),
            )],
        }
    }

    pub fn document(&self, context: Option<MissionContext>) -> ReportDocument {
        ReportDocument {
            contacts_total: self.contacts_total,
            contacts_filtered: self.contacts_filtered(),
            metrics: self.metrics.clone(),
            summary: self.summary(),
            distribution: self.distribution.clone(),
            context,
            export_csv: None,
        }
    }
}

fn card(
    key: &'static str,
    label: &'static str,
    count: u64,
    rate: Option<(&'static str, f64)>,
) -> KpiCard {
    KpiCard {
        key,
        label,
        count,
        rate_key: rate.map(|(rate_key, _)| rate_key),
        rate: rate.map(|(_, value)| value),
    }
}

/// Picker values for every segmentation column present with at least one value.
pub fn segment_options(dataset: &Dataset) -> Vec<SegmentOption> {
    Field::segments()
        .into_iter()
        .filter(|field| dataset.has_column(*field))
        .map(|field| SegmentOption {
            field,
            label: field.label(),
            values: dataset.distinct_values(field),
        })
        .filter(|option| !option.values.is_empty())
        .collect()
}
