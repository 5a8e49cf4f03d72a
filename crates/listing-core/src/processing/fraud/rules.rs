use super::super::property::{Property, PropertyType};
use super::config::FraudConfig;
use super::FraudRule;
use regex::Regex;
use std::sync::OnceLock;

pub const PRICE_TOO_LOW: &str = "price_too_low";
pub const SPAM_KEYWORDS: &str = "spam_keywords";
pub const INVALID_CONTACTS: &str = "invalid_contacts";
pub const STOCK_IMAGES: &str = "stock_images";

static PHONE_PATTERN: OnceLock<Regex> = OnceLock::new();
static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

pub(crate) fn default_rules() -> Vec<FraudRule> {
    vec![
        FraudRule::new(PRICE_TOO_LOW, 30, price_too_low),
        FraudRule::new(SPAM_KEYWORDS, 25, has_spam_keywords),
        FraudRule::new(INVALID_CONTACTS, 40, has_invalid_contacts),
        FraudRule::new(STOCK_IMAGES, 20, uses_stock_images),
    ]
}

pub(crate) fn price_too_low(property: &Property, config: &FraudConfig) -> bool {
    let country = property
        .country
        .as_deref()
        .filter(|code| !code.trim().is_empty())
        .unwrap_or(&config.default_country);

    // Untyped listings are priced against apartments.
    let property_type = match property.property_type {
        PropertyType::Unknown => PropertyType::Apartment,
        known => known,
    };

    let average = config.market_averages.average(
        country,
        property_type,
        property.transaction_type,
    );

    property.price < average * config.price_floor_ratio
}

pub(crate) fn has_spam_keywords(property: &Property, config: &FraudConfig) -> bool {
    if property.description.trim().is_empty() {
        return false;
    }

    let description = property.description.to_lowercase();
    config
        .spam_keywords
        .iter()
        .any(|keyword| description.contains(&keyword.to_lowercase()))
}

pub(crate) fn has_invalid_contacts(property: &Property, _config: &FraudConfig) -> bool {
    let valid_phone = property
        .contact_phone()
        .map(|phone| phone_pattern().is_match(phone))
        .unwrap_or(false);
    let valid_email = property
        .contact_email()
        .map(|email| email_pattern().is_match(email))
        .unwrap_or(false);

    !valid_phone && !valid_email
}

// TODO: compare image hashes across listings once an image fingerprint store exists.
pub(crate) fn uses_stock_images(_property: &Property, _config: &FraudConfig) -> bool {
    false
}

fn phone_pattern() -> &'static Regex {
    PHONE_PATTERN.get_or_init(|| {
        Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern compiles")
    })
}

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}
