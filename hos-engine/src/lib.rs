//! HOS Trip Engine
//!
//! Platform-agnostic trip planning for commercial truck drivers. The engine
//! simulates a trip under a simplified Hours-of-Service model, inserts
//! mandatory stops, and produces daily duty-status logs with compliance flags.
//! It performs no I/O.

pub mod api;
pub mod clock;
pub mod compliance;
pub mod constants;
pub mod distance;
pub mod duty_log;
pub mod history;
pub mod numbers;
pub mod planner;
pub mod request;
pub mod result;
pub mod rules;
pub mod simulator;
pub mod stops;

// Re-export commonly used types
pub use api::{CalculateTripPayload, CalculateTripResponse, RoutePoint};
pub use clock::{ClockError, TimeOfDay, TripClock};
pub use compliance::{ComplianceIssue, ComplianceReport, evaluate};
pub use distance::{
    CorridorTable, DistanceEstimator, FallbackStrategy, FixedFallback, ProviderWithFallback,
    RandomFallback, RouteProvider, RoutingError, TableEstimator, normalize_location, resolve_legs,
};
#[cfg(feature = "async")]
pub use distance::{AsyncRouteProvider, resolve_legs_async};
pub use duty_log::{DailyLog, DutyLogEntry, DutyStatus, DutyTotals, LogSheetHeader, synthesize};
pub use history::TripHistory;
pub use planner::{PlanError, TripPlanner};
pub use request::{RequestError, TripRequest};
pub use result::{TripResult, trip_id};
pub use rules::{HosRules, RulesError};
pub use simulator::{DutyCounters, LegDistances, SimulationOutcome, simulate};
pub use stops::{RouteStop, StopKind};

/// Trait for abstracting where rule overrides come from
/// Platform-specific implementations should provide this
pub trait RulesSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw rules document, or `None` to use the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read.
    fn load_rules_json(&self) -> Result<Option<String>, Self::Error>;
}

/// Resolve a validated rule set from a source.
///
/// # Errors
///
/// Returns an error if the source fails or the document is not valid rules.
pub fn load_rules<S>(source: &S) -> Result<HosRules, anyhow::Error>
where
    S: RulesSource,
{
    match source.load_rules_json()? {
        Some(json) => Ok(HosRules::from_json(&json)?),
        None => Ok(HosRules::default()),
    }
}
