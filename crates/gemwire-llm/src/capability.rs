//! Model capability lookup
//!
//! Decides per model name whether the thought-signature protocol applies.
//! Rules are regex patterns checked in order; the first match wins.

use std::sync::OnceLock;

use gemwire_config::CapabilityRuleConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Features a model family supports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Tool calls carry thought signatures that must be replayed
    pub thought_signatures: bool,
    /// Model can return reasoning text
    pub thinking: bool,
}

/// Single pattern-to-capabilities rule
#[derive(Debug, Clone)]
pub struct CapabilityRule {
    pattern: Regex,
    capabilities: ModelCapabilities,
}

impl CapabilityRule {
    /// Create a rule from a regex pattern
    pub fn new(pattern: &str, capabilities: ModelCapabilities) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            capabilities,
        })
    }

    /// Whether this rule applies to `model`
    pub fn matches(&self, model: &str) -> bool {
        self.pattern.is_match(model)
    }
}

impl TryFrom<&CapabilityRuleConfig> for CapabilityRule {
    type Error = regex::Error;

    fn try_from(config: &CapabilityRuleConfig) -> Result<Self, Self::Error> {
        Self::new(
            &config.pattern,
            ModelCapabilities {
                thought_signatures: config.thought_signatures,
                thinking: config.thinking,
            },
        )
    }
}

/// Ordered capability rules
#[derive(Debug, Clone)]
pub struct CapabilityTable {
    rules: Vec<CapabilityRule>,
}

impl CapabilityTable {
    /// Table with no rules; every model gets default capabilities
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in rules for known model families
    ///
    /// Gemini 3 names (`gemini-3...`, plus `gemini?3-pro` / `gemini?3-flash`
    /// spellings with any separator) require thought signatures.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern is invalid (should never happen).
    pub fn builtin() -> Self {
        let gemini3 = ModelCapabilities {
            thought_signatures: true,
            thinking: true,
        };

        Self {
            rules: vec![
                CapabilityRule::new(r"^gemini-3", gemini3).expect("must be valid regex"),
                CapabilityRule::new(r"^gemini.3-(?:pro|flash)", gemini3).expect("must be valid regex"),
            ],
        }
    }

    /// Built-in rules preceded by configured overrides
    pub fn from_config(rules: &[CapabilityRuleConfig]) -> Result<Self, regex::Error> {
        let overrides = rules.iter().map(CapabilityRule::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::builtin().with_overrides(overrides))
    }

    /// Put `rules` ahead of the existing ones
    #[must_use]
    pub fn with_overrides(mut self, rules: Vec<CapabilityRule>) -> Self {
        self.rules.splice(0..0, rules);
        self
    }

    /// Append a rule checked after the existing ones
    #[must_use]
    pub fn with_rule(mut self, rule: CapabilityRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Capabilities of `model`, default when no rule matches
    pub fn lookup(&self, model: &str) -> ModelCapabilities {
        let model = model.strip_prefix("models/").unwrap_or(model);
        self.rules
            .iter()
            .find(|rule| rule.matches(model))
            .map(|rule| rule.capabilities)
            .unwrap_or_default()
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whether `model` is a Gemini 3 model that needs thought signatures
pub fn is_gemini3_model(model: &str) -> bool {
    static TABLE: OnceLock<CapabilityTable> = OnceLock::new();
    TABLE.get_or_init(CapabilityTable::builtin).lookup(model).thought_signatures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini3_names_require_signatures() {
        for model in [
            "gemini-3",
            "gemini-3-pro-preview",
            "gemini-3-flash",
            "gemini-3.0-flash",
            "gemini_3-pro",
            "models/gemini-3-pro-preview",
        ] {
            assert!(is_gemini3_model(model), "{model} should match");
        }
    }

    #[test]
    fn other_names_do_not() {
        for model in [
            "",
            "gemini",
            "gemini-2.0-flash",
            "gemini-2.5-pro-preview-06-05",
            "gemini-1.5-pro",
            "gemini_3-ultra",
            "gpt-4o",
            "my-gemini-3-pro",
        ] {
            assert!(!is_gemini3_model(model), "{model} should not match");
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let none = ModelCapabilities::default();
        let signatures = ModelCapabilities {
            thought_signatures: true,
            thinking: false,
        };

        let table = CapabilityTable::builtin().with_overrides(vec![
            CapabilityRule::new("^gemini-3-lite", none).unwrap(),
            CapabilityRule::new("^tuned-", signatures).unwrap(),
        ]);

        assert_eq!(table.lookup("gemini-3-lite-001"), none);
        assert_eq!(table.lookup("tuned-weather-v2"), signatures);
        assert!(table.lookup("gemini-3-pro-preview").thought_signatures);
    }

    #[test]
    fn empty_table_has_no_capabilities() {
        let table = CapabilityTable::empty();
        assert_eq!(table.lookup("gemini-3-pro-preview"), ModelCapabilities::default());

        let table = table.with_rule(CapabilityRule::new("pro", ModelCapabilities::default()).unwrap());
        assert!(!table.lookup("gemini-3-pro-preview").thinking);
    }

    #[test]
    fn config_rules_compile() {
        let rules = vec![CapabilityRuleConfig {
            pattern: "^custom-".to_owned(),
            thought_signatures: true,
            thinking: true,
        }];
        let table = CapabilityTable::from_config(&rules).unwrap();
        assert!(table.lookup("custom-model").thought_signatures);

        let bad = vec![CapabilityRuleConfig {
            pattern: "(".to_owned(),
            thought_signatures: true,
            thinking: false,
        }];
        assert!(CapabilityTable::from_config(&bad).is_err());
    }
}
