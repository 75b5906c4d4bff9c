//! Configuration file support for enrichment runs

use anyhow::{Context, Result};
use commentprep_core::PipelineConfig;
use commentprep_filters::{LanguageIdentifierConfig, ProductVocabularyConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete run configuration as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineFileConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub products: ProductVocabularyConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl PipelineFileConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            _ => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                extension
            )),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Convert into the pipeline's own configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            text_field: self.input.text_field.clone(),
            target_language: self.language.target.clone(),
            products: self.products.clone(),
            language: LanguageIdentifierConfig {
                min_chars: self.language.min_chars,
                min_words: self.language.min_words,
                allowlist: self.language.allowlist.clone(),
            },
            chunk_size: self.processing.chunk_size,
            num_threads: self.processing.num_threads,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Field holding the raw comment text
    pub text_field: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            text_field: "text".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Language identification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Code records are flagged against
    pub target: String,
    pub min_chars: usize,
    pub min_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let identifier = LanguageIdentifierConfig::default();
        Self {
            target: "en".to_string(),
            min_chars: identifier.min_chars,
            min_words: identifier.min_words,
            allowlist: identifier.allowlist,
        }
    }
}

/// Parallelism settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of threads (None = auto-detect)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
    /// Records per parallel batch
    pub chunk_size: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            chunk_size: PipelineConfig::default().chunk_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> PipelineFileConfig {
        let mut config = PipelineFileConfig::default();
        config.input.path = Some("comments.csv".to_string());
        config.input.text_field = "Comment Text".to_string();
        config.output.path = Some("enriched.csv".to_string());
        config.products.phrases = vec!["photoshop".to_string(), "after effects".to_string()];
        config.language.target = "es".to_string();
        config.language.allowlist = Some(vec!["en".to_string(), "es".to_string()]);
        config.processing.num_threads = Some(2);
        config
    }

    #[test]
    fn test_defaults_match_pipeline() {
        let config = PipelineFileConfig::default().pipeline_config();
        let defaults = PipelineConfig::default();

        assert_eq!(config.text_field, defaults.text_field);
        assert_eq!(config.target_language, defaults.target_language);
        assert_eq!(config.chunk_size, defaults.chunk_size);
        assert_eq!(config.products.phrases, defaults.products.phrases);
        assert_eq!(config.language.min_chars, defaults.language.min_chars);
    }

    #[test]
    fn test_save_and_load_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.yaml");
        let config = sample_config();

        config.save(&path).unwrap();
        let loaded = PipelineFileConfig::load(&path).unwrap();

        assert_eq!(loaded.input.path, config.input.path);
        assert_eq!(loaded.input.text_field, "Comment Text");
        assert_eq!(loaded.products.phrases, config.products.phrases);
        assert_eq!(loaded.language.allowlist, config.language.allowlist);
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.toml");
        let config = sample_config();

        config.save(&path).unwrap();
        let loaded = PipelineFileConfig::load(&path).unwrap();

        assert_eq!(loaded.output.path, config.output.path);
        assert_eq!(loaded.language.target, "es");
        assert_eq!(loaded.processing.num_threads, Some(2));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.yml");
        std::fs::write(&path, "products:\n  phrases: [firefly]\nlanguage:\n  target: fr\n").unwrap();

        let loaded = PipelineFileConfig::load(&path).unwrap();
        assert_eq!(loaded.products.phrases, vec!["firefly"]);
        assert_eq!(loaded.language.target, "fr");
        assert_eq!(loaded.language.min_words, 2);
        assert_eq!(loaded.input.text_field, "text");
        assert_eq!(loaded.processing.chunk_size, 10_000);
    }

    #[test]
    fn test_unsupported_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.json");

        assert!(sample_config().save(&path).is_err());
        std::fs::write(&path, "{}").unwrap();
        assert!(PipelineFileConfig::load(&path).is_err());
    }
}
