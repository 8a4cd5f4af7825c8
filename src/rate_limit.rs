//! Per-IP request ceiling, applied uniformly to the whole API at serve time.
//!
//! The limiter keys on the peer address, so it is layered in `main` where
//! connect info is available; the bare router used by tests is not limited.

use std::sync::Arc;

use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor, GovernorLayer,
};

pub type RateLimitLayer = GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// One token replenished every `1/per_second` seconds, with `burst` tokens of
/// headroom per client IP. Zero parameters are clamped to 1; the builder
/// rejects them outright.
pub fn ip_rate_limiter(per_second: u64, burst: u32) -> RateLimitLayer {
    let config = GovernorConfigBuilder::default()
        .per_second(per_second.max(1))
        .burst_size(burst.max(1))
        .finish()
        .expect("nonzero rate limit parameters are always accepted");
    GovernorLayer {
        config: Arc::new(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_parameters_are_clamped_not_fatal() {
        // would panic inside the builder without the clamp
        let _ = ip_rate_limiter(0, 0);
    }

    #[test]
    fn typical_parameters_build() {
        let _ = ip_rate_limiter(6, 100);
    }
}
