mod price_range;

pub use price_range::PriceRange;

use super::property::{Property, PropertyType, TransactionKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate view of a listing set, keyed for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketStats {
    pub country: String,
    pub total_properties: usize,
    pub by_type: BTreeMap<PropertyType, usize>,
    pub by_transaction: BTreeMap<TransactionKind, usize>,
    pub price_ranges: BTreeMap<PriceRange, usize>,
    pub average_prices: BTreeMap<String, f64>,
}

impl MarketStats {
    pub fn average_price(
        &self,
        property_type: PropertyType,
        transaction: TransactionKind,
    ) -> Option<f64> {
        self.average_prices
            .get(&format!("{}_{}", property_type.key(), transaction.key()))
            .copied()
    }
}

#[derive(Default)]
struct PriceGroup {
    count: usize,
    sum: f64,
}

pub fn analyze_market_data(properties: &[Property], country_code: &str) -> MarketStats {
    let mut stats = MarketStats {
        country: country_code.trim().to_ascii_uppercase(),
        total_properties: properties.len(),
        ..MarketStats::default()
    };
    let mut groups: BTreeMap<String, PriceGroup> = BTreeMap::new();

    for property in properties {
        let price = if property.price.is_finite() {
            property.price
        } else {
            0.0
        };

        *stats.by_type.entry(property.property_type).or_default() += 1;
        *stats
            .by_transaction
            .entry(property.transaction_type)
            .or_default() += 1;
        *stats
            .price_ranges
            .entry(PriceRange::classify(price, property.transaction_type))
            .or_default() += 1;

        let group = groups.entry(property.group_key()).or_default();
        group.count += 1;
        group.sum += price;
    }

    stats.average_prices = groups
        .into_iter()
        .filter(|(_, group)| group.count > 0)
        .map(|(key, group)| (key, group.sum / group.count as f64))
        .collect();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(property_type: PropertyType, transaction: TransactionKind, price: f64) -> Property {
        Property {
            property_type,
            transaction_type: transaction,
            price,
            ..Property::default()
        }
    }

    #[test]
    fn averages_are_grouped_by_type_and_transaction() {
        let properties = vec![
            listing(PropertyType::Apartment, TransactionKind::Sale, 100_000.0),
            listing(PropertyType::Apartment, TransactionKind::Sale, 200_000.0),
            listing(PropertyType::House, TransactionKind::Rent, 900.0),
        ];

        let stats = analyze_market_data(&properties, "ua");

        assert_eq!(stats.country, "UA");
        assert_eq!(stats.total_properties, 3);
        assert_eq!(stats.average_prices["apartment_SALE"], 150_000.0);
        assert_eq!(
            stats.average_price(PropertyType::House, TransactionKind::Rent),
            Some(900.0)
        );
        assert_eq!(
            stats.average_price(PropertyType::Land, TransactionKind::Sale),
            None
        );
        assert_eq!(stats.by_type[&PropertyType::Apartment], 2);
        assert_eq!(stats.by_transaction[&TransactionKind::Rent], 1);
        assert_eq!(stats.price_ranges[&PriceRange::Standard], 1);
        assert_eq!(stats.price_ranges[&PriceRange::Premium], 2);
    }

    #[test]
    fn bucket_counts_sum_to_total() {
        let properties: Vec<Property> = [0.0, 299.0, 300.0, 1_499.0, 1_500.0, 5_000.0]
            .into_iter()
            .map(|price| listing(PropertyType::Apartment, TransactionKind::Rent, price))
            .collect();

        let stats = analyze_market_data(&properties, "PL");

        assert_eq!(stats.price_ranges.values().sum::<usize>(), properties.len());
        assert_eq!(stats.price_ranges[&PriceRange::Budget], 2);
        assert_eq!(stats.price_ranges[&PriceRange::Standard], 1);
        assert_eq!(stats.price_ranges[&PriceRange::Premium], 1);
        assert_eq!(stats.price_ranges[&PriceRange::Luxury], 2);
    }

    #[test]
    fn empty_input_produces_no_groups() {
        let stats = analyze_market_data(&[], "GE");
        assert_eq!(stats.total_properties, 0);
        assert!(stats.average_prices.is_empty());
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn serialized_keys_match_feed_vocabulary() {
        let stats = analyze_market_data(
            &[listing(PropertyType::Land, TransactionKind::Sale, 10_000.0)],
            "UA",
        );
        let value = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(value["by_type"]["land"], 1);
        assert_eq!(value["by_transaction"]["SALE"], 1);
        assert_eq!(value["price_ranges"]["budget"], 1);
        assert_eq!(value["average_prices"]["land_SALE"], 10_000.0);
    }
}
