use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fraud::{FraudAssessment, FraudScorer};
use super::input::batches_from_value;
use super::market::{analyze_market_data, MarketStats};
use super::normalize::{normalize_batch, normalize_listing};
use super::pipeline::{ListingPipeline, PipelineConfig, PipelineReport};
use super::property::{Property, RawListing};
use crate::error::AppError;

/// Shared defaults for the listing endpoints.
#[derive(Debug, Clone)]
pub struct ListingState {
    pub pipeline: PipelineConfig,
    pub default_country: String,
}

impl ListingState {
    pub fn new(pipeline: PipelineConfig, default_country: impl Into<String>) -> Self {
        Self {
            pipeline,
            default_country: default_country.into(),
        }
    }

    fn country_or_default(&self, requested: Option<String>) -> String {
        requested
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| self.default_country.clone())
    }
}

/// Router builder exposing the processing stages over HTTP.
pub fn listing_router(state: Arc<ListingState>) -> Router {
    Router::new()
        .route("/api/v1/listings/process", post(process_handler))
        .route("/api/v1/listings/normalize", post(normalize_handler))
        .route("/api/v1/listings/fraud-check", post(fraud_check_handler))
        .route("/api/v1/listings/market", post(market_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub listings: Value,
    #[serde(default)]
    pub check_fraud: Option<bool>,
    #[serde(default)]
    pub drop_suspicious: Option<bool>,
}

pub(crate) async fn process_handler(
    State(state): State<Arc<ListingState>>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<PipelineReport>, AppError> {
    let batches = batches_from_value(request.listings, request.source.as_deref().unwrap_or(""))?;

    let mut config = state.pipeline.clone();
    if let Some(check_fraud) = request.check_fraud {
        config.check_fraud = check_fraud;
    }
    if let Some(drop_suspicious) = request.drop_suspicious {
        config.drop_suspicious = drop_suspicious;
    }

    let country = state.country_or_default(request.country);
    let report = ListingPipeline::new(config).process(&batches, &country);
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub source: String,
    pub records: Vec<RawListing>,
}

pub(crate) async fn normalize_handler(
    Json(request): Json<NormalizeRequest>,
) -> Json<Vec<Property>> {
    Json(normalize_batch(&request.records, &request.source))
}

#[derive(Debug, Deserialize)]
pub struct FraudCheckRequest {
    #[serde(default)]
    pub source: String,
    pub listing: RawListing,
}

#[derive(Debug, Serialize)]
pub struct FraudCheckResponse {
    pub listing: Property,
    pub assessment: FraudAssessment,
    pub max_score: u32,
}

pub(crate) async fn fraud_check_handler(
    State(state): State<Arc<ListingState>>,
    Json(request): Json<FraudCheckRequest>,
) -> Json<FraudCheckResponse> {
    let scorer = FraudScorer::new(state.pipeline.fraud.clone());
    let listing = normalize_listing(&request.listing, &request.source);
    let assessment = scorer.assess(&listing);

    Json(FraudCheckResponse {
        listing,
        assessment,
        max_score: scorer.max_score(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MarketRequest {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub listings: Value,
}

pub(crate) async fn market_handler(
    State(state): State<Arc<ListingState>>,
    Json(request): Json<MarketRequest>,
) -> Result<Json<MarketStats>, AppError> {
    let batches = batches_from_value(request.listings, request.source.as_deref().unwrap_or(""))?;
    let properties: Vec<Property> = batches
        .iter()
        .flat_map(|batch| normalize_batch(&batch.records, &batch.source))
        .collect();

    let country = state.country_or_default(request.country);
    Ok(Json(analyze_market_data(&properties, &country)))
}
