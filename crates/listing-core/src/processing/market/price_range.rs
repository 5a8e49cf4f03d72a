use super::super::property::TransactionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

const RENT_BOUNDS: [f64; 3] = [300.0, 700.0, 1_500.0];
const SALE_BOUNDS: [f64; 3] = [50_000.0, 150_000.0, 300_000.0];

/// Price tier; each upper bound is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRange {
    Budget,
    Standard,
    Premium,
    Luxury,
}

impl PriceRange {
    pub const fn ordered() -> [Self; 4] {
        [Self::Budget, Self::Standard, Self::Premium, Self::Luxury]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Luxury => "luxury",
        }
    }

    pub fn classify(price: f64, transaction: TransactionKind) -> Self {
        let [budget, standard, premium] = match transaction {
            TransactionKind::Rent => RENT_BOUNDS,
            TransactionKind::Sale => SALE_BOUNDS,
        };
        let price = if price.is_finite() { price } else { 0.0 };

        if price < budget {
            Self::Budget
        } else if price < standard {
            Self::Standard
        } else if price < premium {
            Self::Premium
        } else {
            Self::Luxury
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
