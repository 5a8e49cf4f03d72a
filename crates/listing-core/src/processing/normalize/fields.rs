use serde_json::Value;

use super::super::property::{ContactInfo, RawListing};

pub(crate) fn text(raw: &RawListing, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

pub(crate) fn non_empty_text(raw: &RawListing, key: &str) -> Option<String> {
    text(raw, key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Numbers or numeric strings; anything non-finite is dropped.
pub(crate) fn number(raw: &RawListing, key: &str) -> Option<f64> {
    let parsed = match raw.get(key)? {
        Value::Number(value) => value.as_f64(),
        Value::String(value) => parse_decimal(value),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

pub(crate) fn non_negative(raw: &RawListing, key: &str) -> Option<f64> {
    number(raw, key).filter(|value| *value >= 0.0)
}

pub(crate) fn count(raw: &RawListing, key: &str) -> Option<u32> {
    let value = non_negative(raw, key)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

pub(crate) fn identifier(raw: &RawListing, key: &str) -> Option<u64> {
    match raw.get(key)? {
        Value::Number(value) => value.as_u64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn flag(raw: &RawListing, key: &str) -> bool {
    match raw.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::Number(value)) => value.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(value)) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    }
}

pub(crate) fn contact(raw: &RawListing) -> Option<ContactInfo> {
    let object = raw
        .get("contactInfo")
        .or_else(|| raw.get("contact_info"))?
        .as_object()?;

    let contact = ContactInfo {
        name: non_empty_text(object, "name"),
        phone: non_empty_text(object, "phone"),
        email: non_empty_text(object, "email"),
    };

    if contact.name.is_none() && contact.phone.is_none() && contact.email.is_none() {
        None
    } else {
        Some(contact)
    }
}

pub(crate) fn images(raw: &RawListing) -> Vec<String> {
    let mut images: Vec<String> = match raw.get("images") {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(url)) if !url.trim().is_empty() => vec![url.trim().to_string()],
        _ => Vec::new(),
    };

    if let Some(cover) = non_empty_text(raw, "main_image") {
        if !images.contains(&cover) {
            images.insert(0, cover);
        }
    }

    images
}

fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
pub(crate) fn parse_decimal_for_tests(value: &str) -> Option<f64> {
    parse_decimal(value)
}
