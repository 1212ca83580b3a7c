//! Benchmark case identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// One benchmark configuration: a case name run with a given process count
///
/// Displays as `<name>_np<N>`, which is also the key used in reports.
///
/// # Example
/// ```
/// use perfwatch::case::CaseKey;
///
/// let key = CaseKey::new("ant-2-20km_ml_line", 384);
/// assert_eq!(key.to_string(), "ant-2-20km_ml_line_np384");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseKey {
    pub name: String,
    pub nps: u32,
}

impl CaseKey {
    pub fn new(name: impl Into<String>, nps: u32) -> Self {
        Self {
            name: name.into(),
            nps,
        }
    }

    /// Build keys for every case name with a shared process count, keeping order
    pub fn for_cases<I, S>(names: I, nps: u32) -> Vec<CaseKey>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|n| CaseKey::new(n, nps)).collect()
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_np{}", self.name, self.nps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_key() {
        assert_eq!(CaseKey::new("cube", 4).to_string(), "cube_np4");
    }

    #[test]
    fn test_for_cases_preserves_order() {
        let keys = CaseKey::for_cases(["b", "a", "c"], 8);
        let names: Vec<_> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["b_np8", "a_np8", "c_np8"]);
    }
}
