//! Leg distance estimation.
//!
//! Known corridors come from a small lookup table. Anything else is answered
//! by a pluggable fallback, so planning never fails on an unknown pair.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::{FALLBACK_MAX_MILES, FALLBACK_MIN_MILES, MAX_LEG_MILES};
use crate::request::TripRequest;
use crate::simulator::LegDistances;

/// Canonical form used for table lookups: lowercase, letters and commas only.
#[must_use]
pub fn normalize_location(location: &str) -> String {
    location
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || *c == ',')
        .collect()
}

/// Undirected table of known corridor distances.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorTable {
    miles: HashMap<(String, String), f64>,
}

impl CorridorTable {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            miles: HashMap::new(),
        }
    }

    /// Add or replace a corridor; endpoints are normalized.
    pub fn insert(&mut self, a: &str, b: &str, miles: f64) {
        self.miles.insert(Self::key(a, b), miles);
    }

    #[must_use]
    pub fn with(mut self, a: &str, b: &str, miles: f64) -> Self {
        self.insert(a, b, miles);
        self
    }

    /// Miles between two places if known. Identical places are 0 miles apart.
    ///
    /// Locations with nothing left after normalization (digits only, non-Latin
    /// scripts) never match, so they stay on the fallback.
    #[must_use]
    pub fn lookup(&self, a: &str, b: &str) -> Option<f64> {
        let (first, second) = Self::key(a, b);
        if first.is_empty() || second.is_empty() {
            return None;
        }
        if first == second {
            return Some(0.0);
        }
        self.miles.get(&(first, second)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.miles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.miles.is_empty()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        let a = normalize_location(a);
        let b = normalize_location(b);
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl Default for CorridorTable {
    fn default() -> Self {
        Self::empty()
            .with("Dallas, TX", "Phoenix, AZ", 887.0)
            .with("Dallas, TX", "Houston, TX", 239.0)
            .with("Atlanta, GA", "Miami, FL", 662.0)
            .with("Chicago, IL", "Detroit, MI", 238.0)
            .with("Los Angeles, CA", "Las Vegas, NV", 270.0)
            .with("New York, NY", "Philadelphia, PA", 95.0)
    }
}

/// Source of miles for pairs the table does not know.
pub trait FallbackStrategy {
    fn fallback_miles(&mut self, origin: &str, destination: &str) -> f64;
}

/// Whole miles drawn uniformly from `[200, 1000)`.
#[derive(Debug, Clone)]
pub struct RandomFallback {
    rng: ChaCha20Rng,
}

impl RandomFallback {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }
}

impl FallbackStrategy for RandomFallback {
    fn fallback_miles(&mut self, _origin: &str, _destination: &str) -> f64 {
        f64::from(self.rng.gen_range(FALLBACK_MIN_MILES..FALLBACK_MAX_MILES))
    }
}

/// Always answers the same distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFallback(pub f64);

impl FallbackStrategy for FixedFallback {
    fn fallback_miles(&mut self, _origin: &str, _destination: &str) -> f64 {
        self.0
    }
}

/// Estimates road miles between two free-text locations.
pub trait DistanceEstimator {
    fn estimate_miles(&mut self, origin: &str, destination: &str) -> f64;
}

/// Table lookup with a fallback for unknown pairs.
#[derive(Debug, Clone)]
pub struct TableEstimator<F> {
    table: CorridorTable,
    fallback: F,
}

impl<F: FallbackStrategy> TableEstimator<F> {
    #[must_use]
    pub fn new(table: CorridorTable, fallback: F) -> Self {
        Self { table, fallback }
    }

    #[must_use]
    pub fn with_fallback(fallback: F) -> Self {
        Self::new(CorridorTable::default(), fallback)
    }

    #[must_use]
    pub const fn table(&self) -> &CorridorTable {
        &self.table
    }
}

impl TableEstimator<RandomFallback> {
    /// Default corridors with a seeded random fallback.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_fallback(RandomFallback::seeded(seed))
    }
}

impl<F: FallbackStrategy> DistanceEstimator for TableEstimator<F> {
    fn estimate_miles(&mut self, origin: &str, destination: &str) -> f64 {
        if let Some(miles) = self.table.lookup(origin, destination) {
            return miles;
        }
        let miles = self.fallback.fallback_miles(origin, destination);
        log::debug!("no corridor for {origin:?} -> {destination:?}; using {miles} mi");
        miles
    }
}

/// Errors from an external routing service.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("routing service unavailable: {0}")]
    Unavailable(String),
    #[error("no route between {origin} and {destination}")]
    NoRoute { origin: String, destination: String },
    #[error("routing service returned an invalid distance ({miles})")]
    InvalidDistance { miles: f64 },
}

/// External road-distance source.
pub trait RouteProvider {
    /// # Errors
    ///
    /// Returns an error when the provider cannot produce a distance.
    fn route_miles(&mut self, origin: &str, destination: &str) -> Result<f64, RoutingError>;
}

/// Asks the provider first and falls back to a local estimator on any error.
#[derive(Debug, Clone)]
pub struct ProviderWithFallback<P, E> {
    provider: P,
    local: E,
}

impl<P: RouteProvider, E: DistanceEstimator> ProviderWithFallback<P, E> {
    #[must_use]
    pub const fn new(provider: P, local: E) -> Self {
        Self { provider, local }
    }
}

impl<P: RouteProvider, E: DistanceEstimator> DistanceEstimator for ProviderWithFallback<P, E> {
    fn estimate_miles(&mut self, origin: &str, destination: &str) -> f64 {
        match self
            .provider
            .route_miles(origin, destination)
            .and_then(checked_miles)
        {
            Ok(miles) => miles,
            Err(err) => {
                log::warn!("route lookup {origin:?} -> {destination:?} failed: {err}; using local estimate");
                self.local.estimate_miles(origin, destination)
            }
        }
    }
}

fn checked_miles(miles: f64) -> Result<f64, RoutingError> {
    if (0.0..=MAX_LEG_MILES).contains(&miles) {
        Ok(miles)
    } else {
        Err(RoutingError::InvalidDistance { miles })
    }
}

/// Estimate both legs of a request.
pub fn resolve_legs<E: DistanceEstimator + ?Sized>(
    estimator: &mut E,
    request: &TripRequest,
) -> LegDistances {
    let to_pickup = estimator.estimate_miles(&request.origin, &request.pickup);
    let to_dropoff = estimator.estimate_miles(&request.pickup, &request.dropoff);
    LegDistances::new(to_pickup, to_dropoff)
}

#[cfg(feature = "async")]
pub use self::concurrent::{AsyncRouteProvider, resolve_legs_async};

#[cfg(feature = "async")]
mod concurrent {
    use std::future::Future;

    use super::{DistanceEstimator, LegDistances, RoutingError, TripRequest, checked_miles};

    /// Routing service queried over the network.
    pub trait AsyncRouteProvider: Sync {
        fn route_miles(
            &self,
            origin: &str,
            destination: &str,
        ) -> impl Future<Output = Result<f64, RoutingError>> + Send;
    }

    /// Look up both legs concurrently, falling back per leg on failure.
    pub async fn resolve_legs_async<P, E>(
        provider: &P,
        local: &mut E,
        request: &TripRequest,
    ) -> LegDistances
    where
        P: AsyncRouteProvider,
        E: DistanceEstimator + ?Sized,
    {
        let (first, second) = tokio::join!(
            provider.route_miles(&request.origin, &request.pickup),
            provider.route_miles(&request.pickup, &request.dropoff),
        );
        let to_pickup = leg_or_local(first, local, &request.origin, &request.pickup);
        let to_dropoff = leg_or_local(second, local, &request.pickup, &request.dropoff);
        LegDistances::new(to_pickup, to_dropoff)
    }

    fn leg_or_local<E: DistanceEstimator + ?Sized>(
        looked_up: Result<f64, RoutingError>,
        local: &mut E,
        origin: &str,
        destination: &str,
    ) -> f64 {
        match looked_up.and_then(checked_miles) {
            Ok(miles) => miles,
            Err(err) => {
                log::warn!("async route lookup {origin:?} -> {destination:?} failed: {err}");
                local.estimate_miles(origin, destination)
            }
        }
    }

}
