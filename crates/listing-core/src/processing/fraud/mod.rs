mod config;
mod rules;

pub use config::{
    FraudConfig, MarketAverages, DEFAULT_LOOKUP_COUNTRY, DEFAULT_PRICE_FLOOR_RATIO,
    DEFAULT_SUSPICION_THRESHOLD,
};
pub use rules::{INVALID_CONTACTS, PRICE_TOO_LOW, SPAM_KEYWORDS, STOCK_IMAGES};

use super::property::Property;
use serde::{Deserialize, Serialize};

/// Predicate signature shared by every fraud heuristic.
pub type FraudCheck = fn(&Property, &FraudConfig) -> bool;

/// One named, weighted heuristic. Rules are independent of each other.
#[derive(Debug, Clone, Copy)]
pub struct FraudRule {
    pub indicator: &'static str,
    pub weight: u32,
    pub check: FraudCheck,
}

impl FraudRule {
    pub const fn new(indicator: &'static str, weight: u32, check: FraudCheck) -> Self {
        Self {
            indicator,
            weight,
            check,
        }
    }
}

/// Scoring result for a single listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub is_suspicious: bool,
    pub fraud_score: u32,
    pub fraud_indicators: Vec<String>,
}

/// Stateless scorer that evaluates its rule list against a listing.
#[derive(Debug, Clone)]
pub struct FraudScorer {
    config: FraudConfig,
    rules: Vec<FraudRule>,
}

impl FraudScorer {
    pub fn new(config: FraudConfig) -> Self {
        Self {
            config,
            rules: rules::default_rules(),
        }
    }

    /// Adds a rule; an existing rule with the same indicator is replaced.
    pub fn register(&mut self, rule: FraudRule) {
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.indicator == rule.indicator)
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn config(&self) -> &FraudConfig {
        &self.config
    }

    pub fn rules(&self) -> &[FraudRule] {
        &self.rules
    }

    /// Highest score reachable when every rule fires.
    pub fn max_score(&self) -> u32 {
        self.rules.iter().map(|rule| rule.weight).sum()
    }

    pub fn assess(&self, property: &Property) -> FraudAssessment {
        let mut fraud_score = 0;
        let mut fraud_indicators = Vec::new();

        for rule in &self.rules {
            if (rule.check)(property, &self.config) {
                fraud_score += rule.weight;
                fraud_indicators.push(rule.indicator.to_string());
            }
        }

        FraudAssessment {
            is_suspicious: fraud_score >= self.config.suspicion_threshold,
            fraud_score,
            fraud_indicators,
        }
    }
}

impl Default for FraudScorer {
    fn default() -> Self {
        Self::new(FraudConfig::default())
    }
}

/// Scores a listing with the default rules and reference prices.
pub fn check_for_fraud(property: &Property) -> FraudAssessment {
    FraudScorer::default().assess(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::property::{ContactInfo, PropertyType, TransactionKind};

    fn reachable(phone: &str, email: &str) -> Option<ContactInfo> {
        Some(ContactInfo {
            name: None,
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            email: (!email.is_empty()).then(|| email.to_string()),
        })
    }

    fn clean_listing() -> Property {
        Property {
            description: "Bright apartment near the metro".to_string(),
            property_type: PropertyType::Apartment,
            transaction_type: TransactionKind::Sale,
            price: 120_000.0,
            country: Some("UA".to_string()),
            contact_info: reachable("+380501234567", ""),
            ..Property::default()
        }
    }

    #[test]
    fn clean_listing_scores_zero() {
        let assessment = check_for_fraud(&clean_listing());
        assert_eq!(assessment.fraud_score, 0);
        assert!(assessment.fraud_indicators.is_empty());
        assert!(!assessment.is_suspicious);
    }

    #[test]
    fn spam_and_missing_contacts_are_suspicious() {
        let property = Property {
            description: "Срочно без залога, переведите деньги".to_string(),
            contact_info: None,
            ..clean_listing()
        };

        let assessment = check_for_fraud(&property);

        assert_eq!(assessment.fraud_score, 65);
        assert_eq!(
            assessment.fraud_indicators,
            vec![SPAM_KEYWORDS.to_string(), INVALID_CONTACTS.to_string()]
        );
        assert!(assessment.is_suspicious);
    }

    #[test]
    fn price_floor_is_half_the_market_average() {
        let below = Property {
            price: 24_999.0,
            ..clean_listing()
        };
        assert!(check_for_fraud(&below)
            .fraud_indicators
            .contains(&PRICE_TOO_LOW.to_string()));

        let at_floor = Property {
            price: 25_000.0,
            ..clean_listing()
        };
        assert!(check_for_fraud(&at_floor).fraud_indicators.is_empty());
    }

    #[test]
    fn missing_country_uses_default_lookup_country() {
        let property = Property {
            country: None,
            transaction_type: TransactionKind::Rent,
            price: 100.0,
            ..clean_listing()
        };
        assert_eq!(check_for_fraud(&property).fraud_score, 30);
    }

    #[test]
    fn unknown_markets_are_never_flagged_on_price() {
        let property = Property {
            country: Some("GE".to_string()),
            price: 0.0,
            ..clean_listing()
        };
        assert!(!check_for_fraud(&property)
            .fraud_indicators
            .contains(&PRICE_TOO_LOW.to_string()));
    }

    #[test]
    fn untyped_listings_are_priced_as_apartments() {
        let cheap = Property {
            property_type: PropertyType::Unknown,
            price: 100.0,
            ..clean_listing()
        };
        assert_eq!(
            check_for_fraud(&cheap).fraud_indicators,
            vec![PRICE_TOO_LOW.to_string()]
        );

        let at_apartment_floor = Property {
            property_type: PropertyType::Unknown,
            price: 25_000.0,
            ..clean_listing()
        };
        assert!(check_for_fraud(&at_apartment_floor).fraud_indicators.is_empty());
    }

    #[test]
    fn contact_validation_accepts_either_channel() {
        let scorer = FraudScorer::default();
        let cases = [
            (reachable("+1234567890", ""), false),
            (reachable("123456789", ""), true),
            (reachable("+12 345 678 90", ""), true),
            (reachable("", "agent@example.com"), false),
            (reachable("", "agent@example"), true),
            (reachable("bad", "agent@example.com"), false),
            (None, true),
        ];

        for (contact_info, expect_flag) in cases {
            let property = Property {
                contact_info: contact_info.clone(),
                ..clean_listing()
            };
            let flagged = scorer
                .assess(&property)
                .fraud_indicators
                .contains(&INVALID_CONTACTS.to_string());
            assert_eq!(flagged, expect_flag, "contact {contact_info:?}");
        }
    }

    #[test]
    fn stock_images_never_fire_but_count_toward_maximum() {
        let scorer = FraudScorer::default();
        let property = Property {
            images: vec!["https://example.com/stock.jpg".to_string(); 3],
            ..clean_listing()
        };
        assert!(!scorer
            .assess(&property)
            .fraud_indicators
            .contains(&STOCK_IMAGES.to_string()));
        assert_eq!(scorer.max_score(), 115);
    }

    #[test]
    fn registered_rules_participate_in_scoring() {
        fn always(_: &Property, _: &FraudConfig) -> bool {
            true
        }

        let mut scorer = FraudScorer::new(FraudConfig::default().with_threshold(10));
        scorer.register(FraudRule::new("always", 10, always));
        scorer.register(FraudRule::new(STOCK_IMAGES, 5, rules::uses_stock_images));

        let assessment = scorer.assess(&clean_listing());
        assert_eq!(assessment.fraud_score, 10);
        assert!(assessment.is_suspicious);
        assert_eq!(scorer.rules().len(), 5);
        assert_eq!(scorer.max_score(), 110);
    }
}
