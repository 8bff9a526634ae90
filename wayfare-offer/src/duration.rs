//! Conversions between provider ISO-8601 durations (`PT2H30M`) and the
//! compact text shown to shoppers (`2h 30m`).

use once_cell::sync::Lazy;
use regex::Regex;

static HOURS_MINUTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?").unwrap());
static FULL_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid ISO-8601 duration: {0:?}")]
    InvalidIso(String),
    #[error("invalid duration text: {0:?}")]
    InvalidText(String),
}

/// `PT2H30M` -> `2h 30m`. Zero components are dropped; all-zero is `0m`.
pub fn to_text(iso: &str) -> Result<String, DurationError> {
    let caps = HOURS_MINUTES_RE
        .captures(iso.trim())
        .ok_or_else(|| DurationError::InvalidIso(iso.to_string()))?;

    let hours = capture_u64(caps.get(1)).ok_or_else(|| DurationError::InvalidIso(iso.to_string()))?;
    let minutes = capture_u64(caps.get(2)).ok_or_else(|| DurationError::InvalidIso(iso.to_string()))?;

    Ok(match (hours, minutes) {
        (0, 0) => "0m".to_string(),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    })
}

/// `2h 30m` -> `PT2H30M`. Zero components are dropped; all-zero is `PT`.
pub fn to_iso(text: &str) -> Result<String, DurationError> {
    let trimmed = text.trim();
    let invalid = || DurationError::InvalidText(text.to_string());

    let parts: Vec<&str> = trimmed
        .split(['h', 'm'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let (hours, minutes) = match parts.as_slice() {
        [value] if trimmed.ends_with('h') => (parse_part(value).ok_or_else(invalid)?, 0),
        [value] if trimmed.ends_with('m') && !trimmed.contains('h') => {
            (0, parse_part(value).ok_or_else(invalid)?)
        }
        [h, m] if trimmed.ends_with('m') && trimmed.matches('h').count() == 1 => (
            parse_part(h).ok_or_else(invalid)?,
            parse_part(m).ok_or_else(invalid)?,
        ),
        _ => return Err(invalid()),
    };

    let mut iso = String::from("PT");
    if hours > 0 {
        iso.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        iso.push_str(&format!("{}M", minutes));
    }
    Ok(iso)
}

/// Whole minutes in a `P[nD]T[nH][nM][nS]` duration, truncating seconds.
pub fn to_minutes(iso: &str) -> Result<i64, DurationError> {
    let invalid = || DurationError::InvalidIso(iso.to_string());
    let trimmed = iso.trim();
    if trimmed == "P" || trimmed.ends_with('T') && trimmed != "PT" {
        return Err(invalid());
    }
    let caps = FULL_DURATION_RE.captures(trimmed).ok_or_else(invalid)?;

    let days = capture_u64(caps.get(1)).ok_or_else(invalid)? as i64;
    let hours = capture_u64(caps.get(2)).ok_or_else(invalid)? as i64;
    let minutes = capture_u64(caps.get(3)).ok_or_else(invalid)? as i64;
    let seconds = match caps.get(4) {
        Some(m) => m.as_str().parse::<f64>().map_err(|_| invalid())?,
        None => 0.0,
    };

    Ok(days * 24 * 60 + hours * 60 + minutes + (seconds / 60.0).trunc() as i64)
}

fn capture_u64(m: Option<regex::Match<'_>>) -> Option<u64> {
    match m {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}

fn parse_part(value: &str) -> Option<u64> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
