use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::filters::FilterCriteria;
use super::offers::{MissionContext, MissionContextRequest, Offer, OfferCatalog};
use super::report::views::{ReportDocument, SegmentOption};
use super::report::{segment_options, ProspectingReport};
use crate::config::ReportingConfig;
use crate::error::AppError;
use crate::workflows::crm_export::{export_to_string, CrmExportLoader};

struct ReportingState {
    config: ReportingConfig,
    catalog: OfferCatalog,
}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    csv: String,
    #[serde(default)]
    filters: FilterCriteria,
    #[serde(default)]
    context: Option<MissionContextRequest>,
    #[serde(default)]
    include_export: bool,
}

#[derive(Debug, Deserialize)]
struct SegmentsRequest {
    csv: String,
}

/// Router builder exposing the reporting endpoints over uploaded CSV exports.
///
/// Exports travel inline in the JSON body, so the body limit comes from
/// `ReportingConfig::max_upload_bytes` rather than axum's 2 MB default.
/// A date-only `filters.end` covers the whole day.
pub fn prospecting_router(config: ReportingConfig) -> Router {
    let body_limit = config.max_upload_bytes;
    let state = Arc::new(ReportingState {
        config,
        catalog: OfferCatalog::standard(),
    });

    Router::new()
        .route("/api/v1/prospecting/report", post(report_handler))
        .route("/api/v1/prospecting/segments", post(segments_handler))
        .route("/api/v1/offers", get(offers_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn report_handler(
    State(state): State<Arc<ReportingState>>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportDocument>, AppError> {
    let dataset = CrmExportLoader::from_reader(request.csv.as_bytes())?;

    let mut criteria = request.filters;
    if criteria.date_mode.is_none() {
        criteria.date_mode = Some(state.config.date_filter_mode);
    }

    let context = request
        .context
        .map(|context| MissionContext::resolve(&state.catalog, context))
        .transpose()?;

    let report = ProspectingReport::generate(&dataset, &criteria);
    info!(
        contacts = report.contacts_total,
        filtered = report.contacts_filtered(),
        calls = report.metrics.calls_total,
        "prospecting report generated"
    );

    let mut document = report.document(context);
    if request.include_export {
        document.export_csv = Some(export_to_string(&report.filtered)?);
    }
    Ok(Json(document))
}

async fn segments_handler(
    Json(request): Json<SegmentsRequest>,
) -> Result<Json<Vec<SegmentOption>>, AppError> {
    let dataset = CrmExportLoader::from_reader(request.csv.as_bytes())?;
    Ok(Json(segment_options(&dataset)))
}

async fn offers_handler(State(state): State<Arc<ReportingState>>) -> Json<Vec<Offer>> {
    Json(state.catalog.offers().to_vec())
}
