use super::dataset::{Dataset, Field};
use super::tags::TagVocabulary;
use serde::Serialize;

pub const EMAIL_OPENED: &str = "Email opened";
pub const EMAIL_REPLIED: &str = "Email replied";
pub const LIFECYCLE_MEETING_BOOKED: &str = "RDV - Bon contact";

/// Funnel KPIs for the phone and e-mail channels of one export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProspectingMetrics {
    pub calls_total: u64,
    pub calls_connected: u64,
    pub calls_pitched: u64,
    pub rdv_phone: u64,
    pub connection_rate: f64,
    pub pitch_rate: f64,
    pub rdv_phone_rate: f64,
    pub contacts_email: u64,
    pub contacts_opened: u64,
    pub contacts_replied: u64,
    pub open_rate: f64,
    pub reply_rate: f64,
    pub rdv_email: u64,
    pub rdv_total: u64,
    pub email_conv_rate: f64,
    pub phone_conv_rate: f64,
    pub overall_conv_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Rate(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Count(count) => count as f64,
            MetricValue::Rate(rate) => rate,
        }
    }
}

impl ProspectingMetrics {
    /// Flat name/value pairs in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        use MetricValue::{Count, Rate};

        vec![
            ("calls_total", Count(self.calls_total)),
            ("calls_connected", Count(self.calls_connected)),
            ("calls_pitched", Count(self.calls_pitched)),
            ("rdv_phone", Count(self.rdv_phone)),
            ("connection_rate", Rate(self.connection_rate)),
            ("pitch_rate", Rate(self.pitch_rate)),
            ("rdv_phone_rate", Rate(self.rdv_phone_rate)),
            ("contacts_email", Count(self.contacts_email)),
            ("contacts_opened", Count(self.contacts_opened)),
            ("contacts_replied", Count(self.contacts_replied)),
            ("open_rate", Rate(self.open_rate)),
            ("reply_rate", Rate(self.reply_rate)),
            ("rdv_email", Count(self.rdv_email)),
            ("rdv_total", Count(self.rdv_total)),
            ("email_conv_rate", Rate(self.email_conv_rate)),
            ("phone_conv_rate", Rate(self.phone_conv_rate)),
            ("overall_conv_rate", Rate(self.overall_conv_rate)),
        ]
    }

    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Default)]
struct FunnelCounts {
    calls_total: u64,
    calls_connected: u64,
    calls_pitched: u64,
    rdv_phone: u64,
    contacts_email: u64,
    contacts_opened: u64,
    contacts_replied: u64,
    rdv_email: u64,
    // Meetings booked by e-mail whose contact was also called.
    rdv_email_called: u64,
}

pub fn compute_metrics(dataset: &Dataset) -> ProspectingMetrics {
    let mut counts = FunnelCounts::default();

    for row in dataset.rows() {
        let called = row.is_called();
        let tags = row.tags();

        let rdv_by_phone = called && tags.intersects(TagVocabulary::RdvPhone);
        if called {
            counts.calls_total += 1;
            if tags.intersects(TagVocabulary::Connected) {
                counts.calls_connected += 1;
            }
            if tags.intersects(TagVocabulary::Pitched) {
                counts.calls_pitched += 1;
            }
            if rdv_by_phone {
                counts.rdv_phone += 1;
            }
        }

        let status = row.get(Field::EmailLeadStatus);
        if status.is_some() {
            counts.contacts_email += 1;
        }
        if status == Some(EMAIL_OPENED) {
            counts.contacts_opened += 1;
        }
        let replied = status == Some(EMAIL_REPLIED);
        if replied {
            counts.contacts_replied += 1;
        }

        let meeting_phase = row.get(Field::LifecyclePhase) == Some(LIFECYCLE_MEETING_BOOKED);
        if meeting_phase && replied && !rdv_by_phone {
            counts.rdv_email += 1;
            if called {
                counts.rdv_email_called += 1;
            }
        }
    }

    counts.into_metrics()
}

impl FunnelCounts {
    fn into_metrics(self) -> ProspectingMetrics {
        let rdv_total = self.rdv_phone + self.rdv_email;
        let reached = (self.contacts_email + self.calls_total)
            .saturating_sub(self.rdv_email_called)
            .max(1);

        ProspectingMetrics {
            calls_total: self.calls_total,
            calls_connected: self.calls_connected,
            calls_pitched: self.calls_pitched,
            rdv_phone: self.rdv_phone,
            connection_rate: ratio(self.calls_connected, self.calls_total),
            pitch_rate: ratio(self.calls_pitched, self.calls_connected),
            rdv_phone_rate: ratio(self.rdv_phone, self.calls_total),
            contacts_email: self.contacts_email,
            contacts_opened: self.contacts_opened,
            contacts_replied: self.contacts_replied,
            open_rate: ratio(self.contacts_opened, self.contacts_email),
            reply_rate: ratio(self.contacts_replied, self.contacts_email),
            rdv_email: self.rdv_email,
            rdv_total,
            email_conv_rate: ratio(self.rdv_email, self.contacts_email),
            phone_conv_rate: ratio(self.rdv_phone, self.calls_total),
            overall_conv_rate: rdv_total as f64 / reached as f64,
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
