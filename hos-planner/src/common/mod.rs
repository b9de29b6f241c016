pub mod util;

pub use util::{RulesFile, split_csv};
