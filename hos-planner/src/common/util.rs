use hos_engine::RulesSource;
use std::fs;
use std::path::PathBuf;

/// Rule overrides read from an optional JSON file.
#[derive(Debug, Clone, Default)]
pub struct RulesFile {
    path: Option<PathBuf>,
}

impl RulesFile {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl RulesSource for RulesFile {
    type Error = std::io::Error;

    fn load_rules_json(&self) -> Result<Option<String>, Self::Error> {
        self.path.as_ref().map(fs::read_to_string).transpose()
    }
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}
