//! Tentative-cluster hints
//!
//! An externally supplied partial partition biases candidate ranking toward
//! listed pairs. It never overrides the TM threshold; a hinted candidate
//! still has to pass confirmation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// Label -> labels considered a priori related (pairwise symmetric within
/// each input line).
pub type HintMap = FxHashMap<String, FxHashSet<String>>;

/// Read a hint file: one tentative cluster per line, tab-separated labels.
pub fn read_hints(path: &Path) -> Result<HintMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read tentative cluster file {}", path.display()))?;
    Ok(parse_hints(&text))
}

pub fn parse_hints(text: &str) -> HintMap {
    let mut map = HintMap::default();
    for line in text.lines() {
        let labels: Vec<&str> = line
            .split('\t')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if labels.len() < 2 {
            continue;
        }
        for (i, &label) in labels.iter().enumerate() {
            let entry = map.entry(label.to_string()).or_default();
            for (j, &other) in labels.iter().enumerate() {
                if i != j {
                    entry.insert(other.to_string());
                }
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_pairwise_symmetric() {
        let map = parse_hints("a\tb\tc\nd\te\n");
        assert_eq!(map["a"].len(), 2);
        assert!(map["a"].contains("b") && map["a"].contains("c"));
        assert!(map["b"].contains("a") && map["b"].contains("c"));
        assert!(map["c"].contains("a"));
        assert!(map["d"].contains("e"));
        assert!(map["e"].contains("d"));
    }

    #[test]
    fn singleton_lines_are_ignored() {
        let map = parse_hints("alone\n\n");
        assert!(map.is_empty());
    }
}
