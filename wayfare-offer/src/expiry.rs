use chrono::{DateTime, Duration, Utc};
use wayfare_core::booking::StoredOffer;

pub const DEFAULT_OFFER_TTL_MINUTES: i64 = 60;

/// How long a verified offer stays bookable.
///
/// The cleanup job deletes offers past their TTL; lookups in between treat
/// an offer past its TTL as already gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferExpiryPolicy {
    ttl: Duration,
}

impl OfferExpiryPolicy {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_expired(&self, offer: &StoredOffer, now: DateTime<Utc>) -> bool {
        offer.created_at + self.ttl <= now
    }

    /// Offers created before this instant are stale.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.ttl
    }

    /// Drops the offer if it has outlived the TTL.
    pub fn live(&self, offer: Option<StoredOffer>, now: DateTime<Utc>) -> Option<StoredOffer> {
        offer.filter(|o| !self.is_expired(o, now))
    }
}

impl Default for OfferExpiryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_OFFER_TTL_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_created(at: DateTime<Utc>) -> StoredOffer {
        StoredOffer {
            client_ref: "ref".to_string(),
            payload: serde_json::json!({}),
            created_at: at,
        }
    }

    #[test]
    fn test_offer_expiry() {
        let policy = OfferExpiryPolicy::default();
        let now = Utc::now();

        let fresh = offer_created(now - Duration::minutes(59));
        assert!(!policy.is_expired(&fresh, now));
        assert!(policy.live(Some(fresh), now).is_some());

        let stale = offer_created(now - Duration::minutes(60));
        assert!(policy.is_expired(&stale, now));
        assert!(policy.live(Some(stale), now).is_none());
    }

    #[test]
    fn test_cutoff() {
        let policy = OfferExpiryPolicy::new(30);
        let now = Utc::now();
        assert_eq!(policy.cutoff(now), now - Duration::minutes(30));
        assert_eq!(policy.ttl(), Duration::minutes(30));
    }
}
