//! RepoLens configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main RepoLens configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoLensConfig {
    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum traversal depth (0 = repository root only)
    pub max_depth: usize,

    /// Maximum age of a cached note before it goes stale, in hours
    pub max_note_age_hours: i64,

    /// Path substrings excluded from traversal
    pub exclusions: Vec<String>,

    /// Number of work items analyzed concurrently (1 = sequential)
    pub concurrency: usize,

    /// Analyze individual files
    pub include_files: bool,

    /// Analyze directories
    pub include_directories: bool,

    /// Analyze module manifests
    pub include_modules: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_note_age_hours: 24,
            exclusions: default_exclusions(),
            concurrency: 1,
            include_files: true,
            include_directories: true,
            include_modules: true,
        }
    }
}

/// Path substrings that are never worth analyzing
fn default_exclusions() -> Vec<String> {
    [
        "node_modules",
        "target",
        "dist",
        "build",
        "vendor",
        "__pycache__",
        "venv",
        "coverage",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Model invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key reference: the environment variable holding the key
    pub api_key_ref: String,

    /// Custom base URL (None = provider default)
    pub base_url: Option<String>,

    /// Default model ID
    pub default_model: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Maximum response tokens
    pub max_tokens: u32,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key_ref: "anthropic_api_key".to_string(),
            base_url: None,
            default_model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    /// Resolve the API key from the environment variable named by
    /// `api_key_ref`. Tries the exact ref first, then the UPPER_CASE form
    /// (e.g. `"anthropic_api_key"` also reads `$ANTHROPIC_API_KEY`).
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_ref)
            .or_else(|_| std::env::var(self.api_key_ref.to_uppercase()))
            .ok()
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for persisted notes
    pub notes_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs_next::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("repolens");

        Self {
            notes_dir: base.join("notes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RepoLensConfig::default();
        assert_eq!(config.analysis.max_depth, 3);
        assert_eq!(config.analysis.max_note_age_hours, 24);
        assert_eq!(config.analysis.concurrency, 1);
        assert!(config.analysis.include_files);
    }

    #[test]
    fn test_default_exclusions_cover_dependency_caches() {
        let config = AnalysisConfig::default();
        assert!(config.exclusions.iter().any(|e| e == "node_modules"));
        assert!(config.exclusions.iter().any(|e| e == "target"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RepoLensConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: RepoLensConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.model.default_model, config.model.default_model);
        assert_eq!(parsed.analysis.max_depth, config.analysis.max_depth);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [analysis]
            max_depth = 5
            max_note_age_hours = 48
            exclusions = []
            concurrency = 4
            include_files = true
            include_directories = false
            include_modules = true
        "#;
        let parsed: RepoLensConfig = toml::from_str(toml).unwrap();
        assert_eq!(parsed.analysis.max_depth, 5);
        assert!(!parsed.analysis.include_directories);
        // Missing sections fall back to defaults
        assert_eq!(parsed.model.timeout_secs, 120);
    }

    #[test]
    fn test_resolve_api_key_uppercase_fallback() {
        let config = ModelConfig {
            api_key_ref: "repolens_test_key_xyz".to_string(),
            ..Default::default()
        };
        std::env::set_var("REPOLENS_TEST_KEY_XYZ", "sk-test");
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
        std::env::remove_var("REPOLENS_TEST_KEY_XYZ");
    }
}
