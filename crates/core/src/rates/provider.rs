//! Cached base-rate provider.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use rust_decimal::Decimal;
use tally_shared::{LendingConfig, RateConfig};

use super::error::RateError;

/// External source of the base interest rate.
pub trait RateSource: Send + Sync {
    /// Returns the current base rate in percent.
    ///
    /// # Errors
    ///
    /// Returns `RateError` if the rate cannot be obtained.
    fn base_rate(&self) -> Result<Decimal, RateError>;
}

/// Rate source that always answers with the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRateSource {
    rate: Decimal,
}

impl FixedRateSource {
    /// Creates a source answering with `rate` percent.
    #[must_use]
    pub const fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl RateSource for FixedRateSource {
    fn base_rate(&self) -> Result<Decimal, RateError> {
        Ok(self.rate)
    }
}

/// Base rate lookup with caching and fallback.
///
/// Successful answers are cached for the configured time-to-live behind the
/// cache's own synchronization, independent of the ledger lock. Failures are
/// not cached: the next call asks the source again.
#[derive(Clone)]
pub struct BaseRateProvider {
    source: Arc<dyn RateSource>,
    cache: Cache<(), Decimal>,
    fallback: Decimal,
}

impl BaseRateProvider {
    /// Creates a provider over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn RateSource>, ttl: Duration, fallback: Decimal) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(ttl)
            .build();

        Self {
            source,
            cache,
            fallback,
        }
    }

    /// Creates a provider using the configured TTL and fallback rate.
    #[must_use]
    pub fn from_config(
        source: Arc<dyn RateSource>,
        rates: &RateConfig,
        lending: &LendingConfig,
    ) -> Self {
        Self::new(
            source,
            Duration::from_secs(rates.cache_ttl_secs),
            lending.fallback_base_rate,
        )
    }

    /// Returns the base rate in percent, or the fallback if the source fails.
    #[must_use]
    pub fn current_rate(&self) -> Decimal {
        match self.cache.try_get_with((), || self.fetch()) {
            Ok(rate) => rate,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    fallback = %self.fallback,
                    "Base rate unavailable, using fallback"
                );
                self.fallback
            }
        }
    }

    /// Drops the cached rate so the next call asks the source.
    pub fn invalidate(&self) {
        self.cache.invalidate(&());
    }

    fn fetch(&self) -> Result<Decimal, RateError> {
        let rate = self.source.base_rate()?;
        if rate.is_sign_negative() {
            return Err(RateError::InvalidRate(rate));
        }
        tracing::debug!(rate = %rate, "Fetched base rate");
        Ok(rate)
    }
}
