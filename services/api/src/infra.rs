use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Two or three ASCII letters, returned upper-cased.
pub(crate) fn parse_country(raw: &str) -> Result<String, String> {
    let code = raw.trim();
    let valid_length = (2..=3).contains(&code.len());
    if valid_length && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(format!("'{raw}' is not an ISO country code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_codes_are_normalized() {
        assert_eq!(parse_country(" ua ").as_deref(), Ok("UA"));
        assert_eq!(parse_country("pol").as_deref(), Ok("POL"));
        assert!(parse_country("U").is_err());
        assert!(parse_country("U1").is_err());
        assert!(parse_country("Україна").is_err());
    }
}
