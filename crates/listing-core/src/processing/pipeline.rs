use super::dedup::{detect_duplicates, DuplicatePair};
use super::fraud::{FraudAssessment, FraudConfig, FraudScorer};
use super::market::{analyze_market_data, MarketStats};
use super::normalize::normalize_batch;
use super::property::{Property, RawListing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Raw records delivered by one feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceBatch {
    pub source: String,
    #[serde(default)]
    pub records: Vec<RawListing>,
}

impl SourceBatch {
    pub fn new(source: impl Into<String>, records: Vec<RawListing>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fraud: FraudConfig,
    pub check_fraud: bool,
    pub drop_suspicious: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fraud: FraudConfig::default(),
            check_fraud: true,
            drop_suspicious: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub property: Property,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud: Option<FraudAssessment>,
}

impl ScoredListing {
    pub fn is_suspicious(&self) -> bool {
        self.fraud
            .as_ref()
            .map(|assessment| assessment.is_suspicious)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStatistics {
    pub total_received: usize,
    pub unique: usize,
    pub duplicates_removed: usize,
    pub suspicious: usize,
    pub dropped_suspicious: usize,
    /// Surviving listings per normalized `source` tag.
    pub sources: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub country: String,
    pub processed_at: DateTime<Utc>,
    pub statistics: PipelineStatistics,
    pub listings: Vec<ScoredListing>,
    pub duplicates: Vec<DuplicatePair>,
    pub market: MarketStats,
}

/// Normalize, deduplicate, score and aggregate one request's worth of feeds.
pub struct ListingPipeline {
    scorer: FraudScorer,
    check_fraud: bool,
    drop_suspicious: bool,
}

impl ListingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_scorer(
            FraudScorer::new(config.fraud),
            config.check_fraud,
            config.drop_suspicious,
        )
    }

    pub fn with_scorer(scorer: FraudScorer, check_fraud: bool, drop_suspicious: bool) -> Self {
        Self {
            scorer,
            check_fraud,
            drop_suspicious,
        }
    }

    pub fn scorer(&self) -> &FraudScorer {
        &self.scorer
    }

    pub fn process(&self, batches: &[SourceBatch], country_code: &str) -> PipelineReport {
        let normalized: Vec<Property> = batches
            .iter()
            .flat_map(|batch| normalize_batch(&batch.records, &batch.source))
            .collect();
        let total_received = normalized.len();

        let dedup = detect_duplicates(normalized);
        for pair in &dedup.duplicates {
            debug!(
                fingerprint = %pair.fingerprint,
                original_source = %pair.original.source,
                duplicate_source = %pair.duplicate.source,
                "duplicate listing dropped"
            );
        }
        let unique = dedup.unique_properties.len();

        let scored: Vec<ScoredListing> = dedup
            .unique_properties
            .into_iter()
            .map(|property| {
                let fraud = self.check_fraud.then(|| self.scorer.assess(&property));
                ScoredListing { property, fraud }
            })
            .collect();

        let suspicious = scored.iter().filter(|listing| listing.is_suspicious()).count();
        for listing in scored.iter().filter(|listing| listing.is_suspicious()) {
            if let Some(assessment) = &listing.fraud {
                debug!(
                    id = ?listing.property.id,
                    source = %listing.property.source,
                    score = assessment.fraud_score,
                    indicators = ?assessment.fraud_indicators,
                    "suspicious listing"
                );
            }
        }

        let listings: Vec<ScoredListing> = if self.drop_suspicious {
            scored
                .into_iter()
                .filter(|listing| !listing.is_suspicious())
                .collect()
        } else {
            scored
        };
        let dropped_suspicious = unique - listings.len();

        let mut sources: BTreeMap<String, usize> = BTreeMap::new();
        for listing in &listings {
            *sources.entry(listing.property.source.clone()).or_default() += 1;
        }

        let final_set: Vec<Property> = listings
            .iter()
            .map(|listing| listing.property.clone())
            .collect();
        let market = analyze_market_data(&final_set, country_code);

        info!(
            country = %market.country,
            total_received,
            unique,
            duplicates_removed = dedup.duplicates_count,
            suspicious,
            dropped_suspicious,
            "listing batch processed"
        );

        PipelineReport {
            country: market.country.clone(),
            processed_at: Utc::now(),
            statistics: PipelineStatistics {
                total_received,
                unique,
                duplicates_removed: dedup.duplicates_count,
                suspicious,
                dropped_suspicious,
                sources,
            },
            listings,
            duplicates: dedup.duplicates,
            market,
        }
    }
}

impl Default for ListingPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
