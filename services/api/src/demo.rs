use clap::Args;
use listing_core::config::{AppConfig, ProcessingConfig};
use listing_core::error::AppError;
use listing_core::processing::input::{batch_sizes, batches_from_value, load_path};
use listing_core::processing::{
    enrich_listing, EnrichedProperty, FraudAssessment, ListingPipeline, PipelineReport,
    SourceBatch,
};
use listing_core::processing::ListingInputError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

const SAMPLE_FEEDS: &str = include_str!("../fixtures/listings.json");

#[derive(Args, Debug)]
pub(crate) struct ProcessArgs {
    /// JSON (array or object of feeds) or CSV export to process
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Feed name for records without their own `source` (CSV defaults to the file stem)
    #[arg(long)]
    pub(crate) source: Option<String>,
    /// ISO country code echoed into the market statistics
    #[arg(long, value_parser = crate::infra::parse_country)]
    pub(crate) country: Option<String>,
    /// Skip the fraud heuristics entirely
    #[arg(long)]
    pub(crate) skip_fraud: bool,
    /// Remove listings scored as suspicious before market analysis
    #[arg(long)]
    pub(crate) drop_suspicious: bool,
    /// Attach neighbourhood ratings to every surviving listing
    #[arg(long)]
    pub(crate) enrich: bool,
    /// Seed for the enrichment ratings, for reproducible output
    #[arg(long, requires = "enrich")]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// ISO country code for the market summary. Defaults to LISTINGS_DEFAULT_COUNTRY.
    #[arg(long, value_parser = crate::infra::parse_country)]
    pub(crate) country: Option<String>,
}

#[derive(Debug, Serialize)]
struct EnrichedListing {
    #[serde(flatten)]
    listing: EnrichedProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    fraud: Option<FraudAssessment>,
}

pub(crate) fn run_process(args: ProcessArgs) -> Result<(), AppError> {
    let processing = AppConfig::load()?.processing;
    let output = process_export(args, &processing)?;
    let rendered = serde_json::to_string_pretty(&output).map_err(ListingInputError::from)?;
    println!("{rendered}");
    Ok(())
}

fn process_export(args: ProcessArgs, processing: &ProcessingConfig) -> Result<Value, AppError> {
    let ProcessArgs {
        input,
        source,
        country,
        skip_fraud,
        drop_suspicious,
        enrich,
        seed,
    } = args;

    let batches = load_path(&input, source.as_deref().unwrap_or(""))?;

    let mut config = processing.pipeline_config();
    config.check_fraud = !skip_fraud;
    config.drop_suspicious |= drop_suspicious;

    let country = country.unwrap_or_else(|| processing.default_country.clone());
    let report = ListingPipeline::new(config).process(&batches, &country);

    let mut output = serde_json::to_value(&report).map_err(ListingInputError::from)?;
    if enrich {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let listings = enrich_report(report, &mut rng);
        output["listings"] = serde_json::to_value(listings).map_err(ListingInputError::from)?;
    }

    Ok(output)
}

fn enrich_report<R: Rng>(report: PipelineReport, rng: &mut R) -> Vec<EnrichedListing> {
    report
        .listings
        .into_iter()
        .map(|scored| EnrichedListing {
            listing: enrich_listing(scored.property, &mut *rng),
            fraud: scored.fraud,
        })
        .collect()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let processing = AppConfig::load()?.processing;
    let country = args
        .country
        .unwrap_or_else(|| processing.default_country.clone());

    let batches = sample_batches()?;
    println!("Listing processing demo");
    println!("Sample feeds:");
    for (source, count) in batch_sizes(&batches) {
        println!("  - {source}: {count} records");
    }

    let report = ListingPipeline::new(processing.pipeline_config()).process(&batches, &country);
    render_report(&report);
    Ok(())
}

fn sample_batches() -> Result<Vec<SourceBatch>, AppError> {
    let payload: Value = serde_json::from_str(SAMPLE_FEEDS).map_err(ListingInputError::from)?;
    Ok(batches_from_value(payload, "")?)
}

fn render_report(report: &PipelineReport) {
    let stats = &report.statistics;
    println!(
        "\nPipeline summary ({}, processed {})",
        report.country,
        report.processed_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "- {} received | {} unique | {} duplicates removed",
        stats.total_received, stats.unique, stats.duplicates_removed
    );
    println!(
        "- {} flagged as suspicious | {} dropped",
        stats.suspicious, stats.dropped_suspicious
    );

    if !report.duplicates.is_empty() {
        println!("Duplicates:");
        for pair in &report.duplicates {
            println!(
                "  - {} from {} repeats {} from {} [{}]",
                describe_id(pair.duplicate.id),
                pair.duplicate.source,
                describe_id(pair.original.id),
                pair.original.source,
                pair.fingerprint
            );
        }
    }

    let flagged: Vec<_> = report
        .listings
        .iter()
        .filter_map(|listing| {
            listing
                .fraud
                .as_ref()
                .filter(|assessment| assessment.fraud_score > 0)
                .map(|assessment| (listing, assessment))
        })
        .collect();
    if !flagged.is_empty() {
        println!("Fraud indicators:");
        for (listing, assessment) in flagged {
            println!(
                "  - {} ({}): score {}{} | {}",
                describe_id(listing.property.id),
                listing.property.source,
                assessment.fraud_score,
                if assessment.is_suspicious { " SUSPICIOUS" } else { "" },
                assessment.fraud_indicators.join(", ")
            );
        }
    }

    let market = &report.market;
    println!("\nMarket snapshot: {} listings", market.total_properties);
    println!("Price ranges:");
    for (range, count) in &market.price_ranges {
        println!("  - {}: {}", range.key(), count);
    }
    println!("Average prices:");
    for (group, average) in &market.average_prices {
        println!("  - {group}: {average:.0}");
    }
}

fn describe_id(id: Option<u64>) -> String {
    id.map(|id| format!("#{id}"))
        .unwrap_or_else(|| "unnumbered listing".to_string())
}
