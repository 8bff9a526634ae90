use std::sync::Arc;

use wayfare_offer::ShoppingService;
use wayfare_order::BookingLifecycle;
use wayfare_store::app_config::RateLimitConfig;
use wayfare_store::RedisClient;

use crate::metrics::ApiMetrics;

#[derive(Clone)]
pub struct AppState {
    pub shopping: Arc<ShoppingService>,
    pub bookings: Arc<BookingLifecycle>,
    /// Rate limiting is skipped without Redis.
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
    pub metrics: ApiMetrics,
}
