use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Provider connection settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model used when the caller does not name one
    #[serde(default)]
    pub default_model: Option<String>,
    /// Extra capability rules, checked before the built-in ones
    #[serde(default)]
    pub capabilities: Vec<CapabilityRuleConfig>,
}

/// Capability rule for model names matching `pattern`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityRuleConfig {
    /// Regex matched against the model name
    pub pattern: String,
    /// Tool calls carry thought signatures
    #[serde(default)]
    pub thought_signatures: bool,
    /// Model can return reasoning text
    #[serde(default)]
    pub thinking: bool,
}
