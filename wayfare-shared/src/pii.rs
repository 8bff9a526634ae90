use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps customer contact data so it never reaches a log line in clear text.
///
/// `Debug` and `Display` print a redacted form; serialization passes the
/// real value through, since API responses and provider payloads need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0.as_ref()))
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0.as_ref()))
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

/// Emails keep their first character and domain (`j*******@example.com`),
/// anything else keeps its last two characters.
pub fn redact(value: &str) -> String {
    if let Some((local, domain)) = value.split_once('@') {
        let first: String = local.chars().take(1).collect();
        return format!("{}{}@{}", first, "*".repeat(local.chars().count().saturating_sub(1).max(3)), domain);
    }

    let count = value.chars().count();
    if count <= 2 {
        return "*".repeat(count.max(3));
    }
    let tail: String = value.chars().skip(count - 2).collect();
    format!("{}{}", "*".repeat(count - 2), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_redacted_in_debug() {
        let email = Masked::new("jane.doe@example.com".to_string());
        assert_eq!(format!("{:?}", email), "j*******@example.com");
        assert_eq!(email.to_string(), "j*******@example.com");
    }

    #[test]
    fn test_phone_keeps_last_digits() {
        let phone = Masked::new("8031234567");
        assert_eq!(format!("{}", phone), "********67");
    }

    #[test]
    fn test_serialize_exposes_value() {
        let email = Masked::new("jane.doe@example.com".to_string());
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"jane.doe@example.com\"");
    }
}
