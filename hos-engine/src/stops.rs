use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{TimeOfDay, TripClock};
use crate::duty_log::DutyStatus;

/// Kind of event on the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    /// Trip start and pre-trip inspection
    Start,
    /// Loading at the shipper
    Pickup,
    /// Unloading at the receiver
    Dropoff,
    /// Refueling every fuel interval
    Fuel,
    /// 30-minute break after continuous driving
    Rest,
    /// Sleeper-berth period resetting the daily counters
    Sleeper,
}

impl StopKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
            Self::Fuel => "fuel",
            Self::Rest => "rest",
            Self::Sleeper => "sleeper",
        }
    }

    /// Duty status the driver holds while at this stop.
    #[must_use]
    pub const fn duty_status(self) -> DutyStatus {
        match self {
            Self::Start | Self::Pickup | Self::Dropoff | Self::Fuel => DutyStatus::OnDuty,
            Self::Rest => DutyStatus::OffDuty,
            Self::Sleeper => DutyStatus::Sleeper,
        }
    }

    /// Breaks stop the driving clock instead of consuming on-duty time.
    #[must_use]
    pub const fn is_break(self) -> bool {
        matches!(self, Self::Rest | Self::Sleeper)
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event on the route, in temporal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: String,
    pub kind: StopKind,
    pub location: String,
    /// One-based trip day on which the stop begins.
    pub day: u32,
    pub time: TimeOfDay,
    pub duration_minutes: u32,
    pub description: String,
    pub mileage: f64,
    pub cumulative_driving_hours: f64,
    pub cumulative_on_duty_hours: f64,
}

impl RouteStop {
    /// Absolute clock at which the stop begins.
    #[must_use]
    pub const fn clock(&self) -> TripClock {
        TripClock::at(self.day, self.time)
    }

    /// Absolute clock at which the stop ends.
    #[must_use]
    pub const fn end_clock(&self) -> TripClock {
        self.clock().advanced(self.duration_minutes)
    }
}
