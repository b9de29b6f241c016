use anyhow::Result;
use hos_engine::{LegDistances, TripRequest, TripResult};
use std::sync::Arc;

/// Request to plan plus the assertions its result must satisfy.
#[derive(Debug, Clone)]
pub struct TripPlan {
    pub request: TripRequest,
    /// Fixed leg miles; `None` resolves them through the estimator.
    pub legs: Option<LegDistances>,
    pub expectations: Vec<TripExpectation>,
}

impl TripPlan {
    #[must_use]
    pub const fn new(request: TripRequest) -> Self {
        Self {
            request,
            legs: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_legs(mut self, to_pickup: f64, to_dropoff: f64) -> Self {
        self.legs = Some(LegDistances::new(to_pickup, to_dropoff));
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<TripExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    /// First failing expectation, if any.
    pub fn evaluate(&self, result: &TripResult) -> Result<()> {
        for expectation in &self.expectations {
            expectation.evaluate(result)?;
        }
        Ok(())
    }
}

/// Assertion hook run after a trip is planned.
type TripExpectationFn = Arc<dyn Fn(&TripResult) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct TripExpectation(TripExpectationFn);

impl std::fmt::Debug for TripExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripExpectation").finish()
    }
}

impl TripExpectation {
    pub fn evaluate(&self, result: &TripResult) -> Result<()> {
        (self.0)(result)
    }
}

impl<F> From<F> for TripExpectation
where
    F: Fn(&TripResult) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}
