use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Loosely-typed record exactly as a listing feed delivered it.
pub type RawListing = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Commercial,
    Land,
    Unknown,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Apartment,
            Self::House,
            Self::Commercial,
            Self::Land,
            Self::Unknown,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Commercial => "commercial",
            Self::Land => "land",
            Self::Unknown => "unknown",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::House => "House",
            Self::Commercial => "Commercial",
            Self::Land => "Land",
            Self::Unknown => "Unknown",
        }
    }

    /// Lenient parse; anything unrecognized becomes `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "apartment" | "flat" => Self::Apartment,
            "house" => Self::House,
            "commercial" => Self::Commercial,
            "land" => Self::Land,
            _ => Self::Unknown,
        }
    }
}

impl Default for PropertyType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Sale,
    Rent,
}

impl TransactionKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::Sale, Self::Rent]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Rent => "RENT",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Rent => "Rent",
        }
    }

    /// Strict parse used when honoring an explicit `transaction_type`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SALE" => Some(Self::Sale),
            "RENT" => Some(Self::Rent),
            _ => None,
        }
    }
}

impl Default for TransactionKind {
    fn default() -> Self {
        Self::Sale
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Canonical listing shape shared by every processing stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub transaction_type: TransactionKind,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Feed fields the canonical shape does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Property {
    pub fn contact_phone(&self) -> Option<&str> {
        self.contact_info
            .as_ref()
            .and_then(|contact| contact.phone.as_deref())
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_info
            .as_ref()
            .and_then(|contact| contact.email.as_deref())
    }

    /// Grouping key used by the market analyzer, e.g. `apartment_SALE`.
    pub fn group_key(&self) -> String {
        format!("{}_{}", self.property_type.key(), self.transaction_type.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_type_parse_is_lenient() {
        assert_eq!(PropertyType::parse(" Apartment "), PropertyType::Apartment);
        assert_eq!(PropertyType::parse("LAND"), PropertyType::Land);
        assert_eq!(PropertyType::parse("castle"), PropertyType::Unknown);
        assert_eq!(PropertyType::parse(""), PropertyType::Unknown);
    }

    #[test]
    fn transaction_kind_parse_rejects_unknown_values() {
        assert_eq!(TransactionKind::parse("rent"), Some(TransactionKind::Rent));
        assert_eq!(TransactionKind::parse("SALE"), Some(TransactionKind::Sale));
        assert_eq!(TransactionKind::parse("lease"), None);
    }

    #[test]
    fn property_serializes_with_feed_field_names() {
        let mut property = Property {
            id: Some(7),
            property_type: PropertyType::House,
            transaction_type: TransactionKind::Rent,
            price: 900.0,
            source: "olx".to_string(),
            ..Property::default()
        };
        property
            .extra
            .insert("offer_type".to_string(), json!("renting"));

        let value = serde_json::to_value(&property).expect("serialize");
        assert_eq!(value["type"], json!("house"));
        assert_eq!(value["transaction_type"], json!("RENT"));
        assert_eq!(value["offer_type"], json!("renting"));
        assert!(value.get("contact_info").is_none());
        assert_eq!(property.group_key(), "house_RENT");
    }
}
