//! Feed-specific normalization into the canonical [`Property`] shape.
//!
//! Every feed shares the generic field extraction; the [`FeedSource`] variant
//! only decides how the transaction kind is derived and which `source` tag the
//! record carries afterwards. Normalization never fails: malformed numerics
//! become `0`/`None` and unrecognized fields are kept in [`Property::extra`].

mod fields;

use super::property::{Property, PropertyType, RawListing, TransactionKind};
use serde::{Deserialize, Serialize};

const MODELED_FIELDS: &[&str] = &[
    "id",
    "title",
    "description",
    "location",
    "type",
    "transaction_type",
    "price",
    "currency",
    "area",
    "bedrooms",
    "bathrooms",
    "source",
    "country",
    "contactInfo",
    "contact_info",
    "images",
    "main_image",
];

const GENERIC_SOURCE_TAG: &str = "generic";

/// Listing feeds with a dedicated transform; everything else is `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    DomRia,
    Olx,
    Facebook,
    Otodom,
    BinaAz,
    MyHomeGe,
    Generic,
}

impl FeedSource {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::DomRia,
            Self::Olx,
            Self::Facebook,
            Self::Otodom,
            Self::BinaAz,
            Self::MyHomeGe,
            Self::Generic,
        ]
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "domria" => Self::DomRia,
            "olx" => Self::Olx,
            "facebook" => Self::Facebook,
            "otodom" => Self::Otodom,
            "bina.az" => Self::BinaAz,
            "myhome.ge" => Self::MyHomeGe,
            _ => Self::Generic,
        }
    }

    /// Canonical `source` tag, `None` for the generic transform.
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            Self::DomRia => Some("domria"),
            Self::Olx => Some("olx"),
            Self::Facebook => Some("facebook"),
            Self::Otodom => Some("otodom"),
            Self::BinaAz => Some("bina.az"),
            Self::MyHomeGe => Some("myhome.ge"),
            Self::Generic => None,
        }
    }

    fn transaction_kind(self, raw: &RawListing) -> TransactionKind {
        let feed_specific = match self {
            Self::DomRia => fields::non_empty_text(raw, "operation_type")
                .map(|value| kind_if(value.eq_ignore_ascii_case("sale"))),
            Self::Olx => fields::non_empty_text(raw, "offer_type")
                .map(|value| kind_if(value.eq_ignore_ascii_case("selling"))),
            _ => None,
        };

        feed_specific.unwrap_or_else(|| generic_transaction_kind(raw))
    }

    fn source_tag(self, raw: &RawListing, requested: &str) -> String {
        if let Some(tag) = self.tag() {
            return tag.to_string();
        }

        fields::non_empty_text(raw, "source")
            .or_else(|| {
                let requested = requested.trim();
                (!requested.is_empty()).then(|| requested.to_string())
            })
            .unwrap_or_else(|| GENERIC_SOURCE_TAG.to_string())
    }
}

fn kind_if(is_sale: bool) -> TransactionKind {
    if is_sale {
        TransactionKind::Sale
    } else {
        TransactionKind::Rent
    }
}

fn generic_transaction_kind(raw: &RawListing) -> TransactionKind {
    if let Some(kind) = fields::text(raw, "transaction_type")
        .as_deref()
        .and_then(TransactionKind::parse)
    {
        return kind;
    }

    if fields::flag(raw, "is_rent") {
        TransactionKind::Rent
    } else {
        TransactionKind::Sale
    }
}

/// Maps one raw feed record into the canonical shape. The input is only borrowed.
pub fn normalize_listing(raw: &RawListing, source_name: &str) -> Property {
    let feed = FeedSource::from_name(source_name);

    let extra = raw
        .iter()
        .filter(|(key, _)| !MODELED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Property {
        id: fields::identifier(raw, "id"),
        title: fields::text(raw, "title").unwrap_or_default(),
        description: fields::text(raw, "description").unwrap_or_default(),
        location: fields::text(raw, "location").unwrap_or_default(),
        property_type: fields::text(raw, "type")
            .map(|value| PropertyType::parse(&value))
            .unwrap_or_default(),
        transaction_type: feed.transaction_kind(raw),
        price: fields::non_negative(raw, "price").unwrap_or(0.0),
        currency: fields::non_empty_text(raw, "currency").unwrap_or_default(),
        area: fields::non_negative(raw, "area"),
        bedrooms: fields::count(raw, "bedrooms"),
        bathrooms: fields::count(raw, "bathrooms"),
        source: feed.source_tag(raw, source_name),
        country: fields::non_empty_text(raw, "country").map(|code| code.to_ascii_uppercase()),
        contact_info: fields::contact(raw),
        images: fields::images(raw),
        extra,
    }
}

pub fn normalize_batch(records: &[RawListing], source_name: &str) -> Vec<Property> {
    records
        .iter()
        .map(|raw| normalize_listing(raw, source_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawListing {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn generic_keeps_explicit_transaction_type() {
        let property = normalize_listing(
            &raw(json!({ "transaction_type": "RENT", "is_rent": false })),
            "unknown-feed",
        );
        assert_eq!(property.transaction_type, TransactionKind::Rent);
    }

    #[test]
    fn generic_derives_rent_from_flag_and_defaults_to_sale() {
        let rent = normalize_listing(&raw(json!({ "is_rent": true })), "");
        assert_eq!(rent.transaction_type, TransactionKind::Rent);

        let sale = normalize_listing(&raw(json!({ "title": "Plot" })), "");
        assert_eq!(sale.transaction_type, TransactionKind::Sale);
        assert_eq!(sale.source, GENERIC_SOURCE_TAG);
    }

    #[test]
    fn generic_prefers_record_source_over_requested_name() {
        let property = normalize_listing(&raw(json!({ "source": "lun.ua" })), "partner");
        assert_eq!(property.source, "lun.ua");

        let property = normalize_listing(&raw(json!({})), "partner");
        assert_eq!(property.source, "partner");
    }

    #[test]
    fn domria_maps_operation_type() {
        let sale = normalize_listing(&raw(json!({ "operation_type": "sale" })), "domria");
        assert_eq!(sale.transaction_type, TransactionKind::Sale);
        assert_eq!(sale.source, "domria");
        assert_eq!(sale.extra.get("operation_type"), Some(&json!("sale")));

        let rent = normalize_listing(
            &raw(json!({ "operation_type": "rent", "source": "other" })),
            "DomRia",
        );
        assert_eq!(rent.transaction_type, TransactionKind::Rent);
        assert_eq!(rent.source, "domria");
    }

    #[test]
    fn domria_without_operation_type_falls_back_to_generic_rule() {
        let property = normalize_listing(&raw(json!({ "is_rent": true })), "domria");
        assert_eq!(property.transaction_type, TransactionKind::Rent);
    }

    #[test]
    fn olx_maps_offer_type() {
        let sale = normalize_listing(&raw(json!({ "offer_type": "selling" })), "olx");
        assert_eq!(sale.transaction_type, TransactionKind::Sale);

        let rent = normalize_listing(&raw(json!({ "offer_type": "renting" })), "olx");
        assert_eq!(rent.transaction_type, TransactionKind::Rent);
        assert_eq!(rent.source, "olx");
    }

    #[test]
    fn regional_feeds_only_retag_source() {
        for (name, tag) in [
            ("facebook", "facebook"),
            ("otodom", "otodom"),
            ("bina.az", "bina.az"),
            ("myhome.ge", "myhome.ge"),
        ] {
            let property = normalize_listing(
                &raw(json!({ "transaction_type": "RENT", "source": "scraper" })),
                name,
            );
            assert_eq!(property.source, tag);
            assert_eq!(property.transaction_type, TransactionKind::Rent);
        }
    }

    #[test]
    fn tolerant_numeric_parsing() {
        let property = normalize_listing(
            &raw(json!({
                "id": "101",
                "price": "120 000",
                "area": "75.5",
                "bedrooms": 2,
                "bathrooms": "1",
            })),
            "",
        );
        assert_eq!(property.id, Some(101));
        assert_eq!(property.price, 120_000.0);
        assert_eq!(property.area, Some(75.5));
        assert_eq!(property.bedrooms, Some(2));
        assert_eq!(property.bathrooms, Some(1));

        let malformed = normalize_listing(
            &raw(json!({ "price": "call us", "area": null, "bedrooms": -1 })),
            "",
        );
        assert_eq!(malformed.price, 0.0);
        assert_eq!(malformed.area, None);
        assert_eq!(malformed.bedrooms, None);

        let negative = normalize_listing(&raw(json!({ "price": -50 })), "");
        assert_eq!(negative.price, 0.0);
    }

    #[test]
    fn decimal_parser_ignores_grouping() {
        assert_eq!(fields::parse_decimal_for_tests("1 500.25"), Some(1500.25));
        assert_eq!(fields::parse_decimal_for_tests("1_000"), Some(1000.0));
        assert_eq!(fields::parse_decimal_for_tests("   "), None);
    }

    #[test]
    fn contacts_images_and_passthrough_fields() {
        let input = raw(json!({
            "type": "House",
            "country": "pl",
            "main_image": "https://img/cover.jpg",
            "images": ["https://img/1.jpg", "https://img/cover.jpg"],
            "contactInfo": { "name": "Agent", "phone": "+1234567890" },
            "features": ["Parking"],
            "views": 150,
        }));
        let property = normalize_listing(&input, "otodom");

        assert_eq!(property.property_type, PropertyType::House);
        assert_eq!(property.country.as_deref(), Some("PL"));
        assert_eq!(
            property.images,
            vec!["https://img/1.jpg".to_string(), "https://img/cover.jpg".to_string()]
        );
        assert_eq!(property.contact_phone(), Some("+1234567890"));
        assert_eq!(property.contact_email(), None);
        assert_eq!(property.extra.get("views"), Some(&json!(150)));
        assert_eq!(property.extra.get("features"), Some(&json!(["Parking"])));
        assert!(!property.extra.contains_key("main_image"));
        assert_eq!(input.get("country"), Some(&json!("pl")));
    }

    #[test]
    fn main_image_leads_when_not_already_listed() {
        let property = normalize_listing(
            &raw(json!({ "main_image": "https://img/cover.jpg" })),
            "",
        );
        assert_eq!(property.images, vec!["https://img/cover.jpg".to_string()]);
    }

    #[test]
    fn feed_names_round_trip_through_tags() {
        for feed in FeedSource::ordered() {
            match feed.tag() {
                Some(tag) => assert_eq!(FeedSource::from_name(tag), feed),
                None => assert_eq!(feed, FeedSource::Generic),
            }
        }
    }
}
