use super::property::Property;
use rand::Rng;
use serde::Serialize;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Listing decorated with neighbourhood ratings on a 1-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProperty {
    #[serde(flatten)]
    pub property: Property,
    pub enriched: bool,
    pub neighborhood_rating: u8,
    pub transport_accessibility: u8,
    pub infrastructure_score: u8,
}

/// Placeholder ratings until a geocoding-backed provider is wired in. The
/// generator is injected so callers can seed it.
pub fn enrich_listing<R: Rng>(property: Property, rng: &mut R) -> EnrichedProperty {
    EnrichedProperty {
        property,
        enriched: true,
        neighborhood_rating: rng.gen_range(MIN_RATING..=MAX_RATING),
        transport_accessibility: rng.gen_range(MIN_RATING..=MAX_RATING),
        infrastructure_score: rng.gen_range(MIN_RATING..=MAX_RATING),
    }
}
