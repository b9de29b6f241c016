pub mod checks;
pub mod plan;
pub mod reports;
pub mod scenarios;
pub mod tester;
pub mod trip_report;

pub use scenarios::{expand_scenario_keys, find_catalog_scenario, list_scenarios};
pub use tester::*;
