use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, placeholder expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing, or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the API key or default model is blank, or a
    /// capability pattern is not a valid regex
    pub fn validate(&self) -> anyhow::Result<()> {
        let provider = &self.provider;

        if provider
            .api_key
            .as_ref()
            .is_some_and(|key| key.expose_secret().trim().is_empty())
        {
            anyhow::bail!("provider.api_key must not be empty");
        }

        if provider.default_model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            anyhow::bail!("provider.default_model must not be empty");
        }

        for rule in &provider.capabilities {
            regex::Regex::new(&rule.pattern)
                .map_err(|e| anyhow::anyhow!("invalid capability pattern '{}': {e}", rule.pattern))?;
        }

        Ok(())
    }
}
