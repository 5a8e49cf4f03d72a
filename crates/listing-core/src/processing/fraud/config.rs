use super::super::property::{PropertyType, TransactionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_SUSPICION_THRESHOLD: u32 = 50;
pub const DEFAULT_PRICE_FLOOR_RATIO: f64 = 0.5;
pub const DEFAULT_LOOKUP_COUNTRY: &str = "UA";

const DEFAULT_SPAM_KEYWORDS: &[&str] = &[
    "100% гарантия",
    "срочно без залога",
    "без предоплаты",
    "только по телефону",
    "не перезванивайте мне",
    "переведите деньги",
    "оплата сегодня",
    "western union",
    "money gram",
];

// (country, type, sale average, rent average)
const DEFAULT_MARKET_AVERAGES: &[(&str, PropertyType, f64, f64)] = &[
    ("UA", PropertyType::Apartment, 50_000.0, 500.0),
    ("UA", PropertyType::House, 100_000.0, 800.0),
    ("UA", PropertyType::Commercial, 80_000.0, 1_000.0),
    ("UA", PropertyType::Land, 30_000.0, 300.0),
    ("PL", PropertyType::Apartment, 80_000.0, 700.0),
    ("PL", PropertyType::House, 150_000.0, 1_000.0),
    ("PL", PropertyType::Commercial, 120_000.0, 1_500.0),
    ("PL", PropertyType::Land, 50_000.0, 400.0),
];

/// Reference averages keyed by country, property type and transaction kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketAverages(BTreeMap<String, BTreeMap<PropertyType, BTreeMap<TransactionKind, f64>>>);

impl MarketAverages {
    pub fn insert(
        &mut self,
        country: &str,
        property_type: PropertyType,
        transaction: TransactionKind,
        average: f64,
    ) {
        self.0
            .entry(country.trim().to_ascii_uppercase())
            .or_default()
            .entry(property_type)
            .or_default()
            .insert(transaction, average);
    }

    /// Unknown combinations average to zero.
    pub fn average(
        &self,
        country: &str,
        property_type: PropertyType,
        transaction: TransactionKind,
    ) -> f64 {
        self.0
            .get(&country.trim().to_ascii_uppercase())
            .and_then(|types| types.get(&property_type))
            .and_then(|kinds| kinds.get(&transaction))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Tunables for the fraud heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudConfig {
    pub suspicion_threshold: u32,
    pub price_floor_ratio: f64,
    pub default_country: String,
    pub spam_keywords: Vec<String>,
    pub market_averages: MarketAverages,
}

impl FraudConfig {
    pub fn with_threshold(mut self, suspicion_threshold: u32) -> Self {
        self.suspicion_threshold = suspicion_threshold;
        self
    }

    pub fn with_price_floor_ratio(mut self, price_floor_ratio: f64) -> Self {
        self.price_floor_ratio = price_floor_ratio;
        self
    }
}

impl Default for FraudConfig {
    fn default() -> Self {
        let mut market_averages = MarketAverages::default();
        for (country, property_type, sale, rent) in DEFAULT_MARKET_AVERAGES {
            market_averages.insert(country, *property_type, TransactionKind::Sale, *sale);
            market_averages.insert(country, *property_type, TransactionKind::Rent, *rent);
        }

        Self {
            suspicion_threshold: DEFAULT_SUSPICION_THRESHOLD,
            price_floor_ratio: DEFAULT_PRICE_FLOOR_RATIO,
            default_country: DEFAULT_LOOKUP_COUNTRY.to_string(),
            spam_keywords: DEFAULT_SPAM_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            market_averages,
        }
    }
}
