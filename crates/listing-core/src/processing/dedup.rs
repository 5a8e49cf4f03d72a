use super::property::Property;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Heuristic identity key: location, area, bedrooms and a coarse price.
///
/// Two listings with equal fingerprints are treated as the same property even
/// when other fields differ, so sparse records collide with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(property: &Property) -> Self {
        let location = property.location.trim().to_lowercase();
        let area = round_half_up(property.area.unwrap_or(0.0) * 10.0) / 10.0;
        let bedrooms = property.bedrooms.unwrap_or(0);
        let price = round_half_up(property.price / 100.0) * 100.0;

        Self(format!("{location}|{area:.1}|{bedrooms}|{price:.0}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Halves round toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub fingerprint: Fingerprint,
    pub original: Property,
    pub duplicate: Property,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateReport {
    pub unique_properties: Vec<Property>,
    pub duplicates_count: usize,
    pub duplicates: Vec<DuplicatePair>,
}

impl DuplicateReport {
    pub fn duplicate_ratio(&self) -> f64 {
        let total = self.unique_properties.len() + self.duplicates_count;
        if total == 0 {
            0.0
        } else {
            self.duplicates_count as f64 / total as f64
        }
    }
}

/// Keeps the first listing seen for each fingerprint, preserving input order.
pub fn detect_duplicates(properties: Vec<Property>) -> DuplicateReport {
    let mut first_seen: HashMap<Fingerprint, usize> = HashMap::with_capacity(properties.len());
    let mut unique_properties: Vec<Property> = Vec::with_capacity(properties.len());
    let mut duplicates = Vec::new();

    for property in properties {
        let fingerprint = Fingerprint::of(&property);
        match first_seen.get(&fingerprint) {
            Some(&index) => duplicates.push(DuplicatePair {
                fingerprint,
                original: unique_properties[index].clone(),
                duplicate: property,
            }),
            None => {
                first_seen.insert(fingerprint, unique_properties.len());
                unique_properties.push(property);
            }
        }
    }

    DuplicateReport {
        unique_properties,
        duplicates_count: duplicates.len(),
        duplicates,
    }
}
