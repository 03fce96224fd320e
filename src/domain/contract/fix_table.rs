//! Injectable violation-to-fix phrase table.
//!
//! The table ships embedded so the sanitizer works out of the box, but
//! deployments can load their own mapping without touching sanitizer
//! logic.

use once_cell::sync::Lazy;
use serde::Deserialize;

const FIX_TABLE_YAML: &str = include_str!("fix_table.yaml");

static EMBEDDED: Lazy<FixTable> = Lazy::new(|| {
    FixTable::from_yaml(FIX_TABLE_YAML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded fix table: {}", e))
});

#[derive(Debug, Clone, Deserialize)]
pub struct FixTable {
    entries: Vec<FixEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixEntry {
    pub find: String,
    pub replace: String,
}

impl FixTable {
    pub fn embedded() -> &'static FixTable {
        &EMBEDDED
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_entries(entries: Vec<FixEntry>) -> Self {
        FixTable { entries }
    }

    /// First entry whose phrase occurs in the step wins.
    pub fn rewrite(&self, step: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|e| step.contains(e.find.as_str()))
            .map(|e| step.replace(e.find.as_str(), &e.replace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_and_rewrites() {
        let table = FixTable::embedded();
        let fixed = table.rewrite("深呼吸放松").unwrap();
        assert_eq!(fixed, "深呼吸5次");
    }

    #[test]
    fn first_matching_entry_wins() {
        let table = FixTable::from_entries(vec![
            FixEntry {
                find: "休息".to_string(),
                replace: "休息5分钟".to_string(),
            },
            FixEntry {
                find: "好好休息".to_string(),
                replace: "休息1小时".to_string(),
            },
        ]);
        assert_eq!(table.rewrite("好好休息").unwrap(), "好好休息5分钟");
    }

    #[test]
    fn unmatched_steps_pass_through() {
        assert!(FixTable::embedded().rewrite("按时吃饭").is_none());
    }
}
