use serde::{Deserialize, Serialize};

use crate::result::TripResult;

/// Planned trips for one session, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripHistory {
    current: Option<TripResult>,
    past: Vec<TripResult>,
}

impl TripHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `trip` current; the previous current trip moves to the front of `past`.
    ///
    /// Trip ids are deterministic, so re-planning the same request on the same
    /// date replaces the earlier entry instead of adding a second one.
    pub fn record(&mut self, trip: TripResult) {
        self.past.retain(|earlier| earlier.id != trip.id);
        let id = trip.id.clone();
        if let Some(previous) = self.current.replace(trip)
            && previous.id != id
        {
            self.past.insert(0, previous);
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&TripResult> {
        self.current.as_ref()
    }

    /// Earlier trips, most recent first.
    #[must_use]
    pub fn past(&self) -> &[TripResult] {
        &self.past
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&TripResult> {
        self.current
            .iter()
            .chain(self.past.iter())
            .find(|trip| trip.id == id)
    }

    /// Remove a trip by id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<TripResult> {
        if self.current.as_ref().is_some_and(|trip| trip.id == id) {
            return self.current.take();
        }
        let idx = self.past.iter().position(|trip| trip.id == id)?;
        Some(self.past.remove(idx))
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.past.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.current.is_some()) + self.past.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{FixedFallback, TableEstimator};
    use crate::planner::TripPlanner;
    use crate::request::TripRequest;
    use chrono::NaiveDate;

    fn trip(dropoff: &str) -> TripResult {
        let mut planner = TripPlanner::new(TableEstimator::with_fallback(FixedFallback(300.0)));
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        planner
            .plan(&TripRequest::new("Dallas, TX", "Dallas, TX", dropoff, 0.0), date)
            .unwrap()
    }

    #[test]
    fn record_moves_current_to_past() {
        let mut history = TripHistory::new();
        assert!(history.is_empty());
        let first = trip("Houston, TX");
        let second = trip("Phoenix, AZ");
        history.record(first.clone());
        history.record(second.clone());
        assert_eq!(history.current().map(|t| &t.id), Some(&second.id));
        assert_eq!(history.past().len(), 1);
        assert_eq!(history.past()[0].id, first.id);
        assert_eq!(history.len(), 2);
        assert!(history.find(&first.id).is_some());
        assert!(history.find("trip-missing").is_none());
    }

    #[test]
    fn replanning_a_trip_keeps_one_entry() {
        let mut history = TripHistory::new();
        let houston = trip("Houston, TX");
        let phoenix = trip("Phoenix, AZ");
        history.record(houston.clone());
        history.record(trip("Houston, TX"));
        assert_eq!(history.len(), 1);

        history.record(phoenix.clone());
        history.record(trip("Houston, TX"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().map(|t| &t.id), Some(&houston.id));
        assert_eq!(history.past()[0].id, phoenix.id);

        assert!(history.remove(&houston.id).is_some());
        assert!(history.find(&houston.id).is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut history = TripHistory::new();
        let first = trip("Houston, TX");
        let second = trip("Austin, TX");
        history.record(first.clone());
        history.record(second.clone());
        assert_eq!(history.remove(&second.id).map(|t| t.id), Some(second.id));
        assert!(history.current().is_none());
        assert_eq!(history.len(), 1);
        assert!(history.remove("trip-missing").is_none());
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn history_survives_json() {
        let mut history = TripHistory::new();
        history.record(trip("Houston, TX"));
        let json = serde_json::to_string(&history).unwrap();
        let restored: TripHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(
            restored.current().map(|t| &t.id),
            history.current().map(|t| &t.id)
        );
    }
}
