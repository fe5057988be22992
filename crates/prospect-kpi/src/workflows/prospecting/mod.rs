//! Prospecting KPI engine.
//!
//! A CRM export is reduced by [`apply_filters`], then measured by
//! [`compute_metrics`] (phone and e-mail funnels, meeting conversion) and
//! [`compute_distribution`] (call outcome tags). [`ProspectingReport`] runs
//! the whole chain and shapes the result for presentation.

mod dataset;
mod distribution;
mod filters;
mod metrics;
pub mod offers;
pub mod report;
mod router;
mod tags;

pub use dataset::{ContactRow, Dataset, Field};
pub use distribution::{compute_distribution, TagDistributionRow};
pub use filters::{apply_filters, DateFilterMode, FilterCriteria};
pub use metrics::{
    compute_metrics, MetricValue, ProspectingMetrics, EMAIL_OPENED, EMAIL_REPLIED,
    LIFECYCLE_MEETING_BOOKED,
};
pub use offers::{
    Channel, MissionContext, MissionContextRequest, Offer, OfferCatalog, OfferError,
    ReportCadence, CUSTOM_OFFER, MIN_CUSTOM_CONTACTS_TARGET,
};
pub use report::views::{KpiCard, ProspectingReportSummary, ReportDocument, SegmentOption};
pub use report::{segment_options, ProspectingReport};
pub use router::prospecting_router;
pub use tags::{parse_tags, TagSet, TagVocabulary};
