use crate::ProblemScraper;
use crate::geeksforgeeks::GeeksforGeeksScraper;
use scout_common::{Result, ScoutError};
use scout_config::ScoutConfig;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Scrapers keyed by lower-case platform name (aliases included).
///
/// Built once from configuration and then only read.
#[derive(Default, Clone)]
pub struct PlatformRegistry {
    by_name: BTreeMap<String, Arc<dyn ProblemScraper>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every built-in platform using `config`.
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let mut registry = Self::new();
        let gfg: Arc<dyn ProblemScraper> = Arc::new(GeeksforGeeksScraper::from_config(config)?);
        registry.register(&["geeksforgeeks", "gfg"], gfg);
        Ok(registry)
    }

    pub fn register(&mut self, names: &[&str], scraper: Arc<dyn ProblemScraper>) {
        for name in names {
            self.by_name
                .insert(name.to_ascii_lowercase(), Arc::clone(&scraper));
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Result<Arc<dyn ProblemScraper>> {
        let key = name.trim().to_ascii_lowercase();
        self.by_name.get(&key).cloned().ok_or_else(|| {
            tracing::warn!(platform = %name, "registry.unsupported_platform");
            ScoutError::UnsupportedPlatform(name.to_string())
        })
    }

    /// First scraper whose admission check accepts `url`.
    pub fn detect(&self, url: &str) -> Option<Arc<dyn ProblemScraper>> {
        self.by_name.values().find(|s| s.validate(url)).cloned()
    }

    /// Registered names, aliases included, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered_with_alias() {
        let registry = PlatformRegistry::from_config(&ScoutConfig::default()).unwrap();
        assert_eq!(registry.names(), vec!["geeksforgeeks", "gfg"]);
        assert_eq!(registry.get("GFG").unwrap().platform(), "geeksforgeeks");
        assert_eq!(registry.get(" GeeksForGeeks ").unwrap().platform(), "geeksforgeeks");
    }

    #[test]
    fn unknown_platform_is_an_error() {
        let registry = PlatformRegistry::from_config(&ScoutConfig::default()).unwrap();
        assert!(matches!(
            registry.get("leetcode"),
            Err(ScoutError::UnsupportedPlatform(name)) if name == "leetcode"
        ));
    }

    #[test]
    fn detects_platform_from_url() {
        let registry = PlatformRegistry::from_config(&ScoutConfig::default()).unwrap();
        let found = registry
            .detect("https://www.geeksforgeeks.org/problems/kadanes-algorithm-1587115620/1")
            .unwrap();
        assert_eq!(found.platform(), "geeksforgeeks");
        assert!(registry.detect("https://leetcode.com/problems/two-sum/").is_none());
    }
}
