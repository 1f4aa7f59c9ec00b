//! Evidence pack configuration.
//!
//! Defaults match the commerce deployment. Override via environment
//! variables or one of the named presets.

use crate::error::ConfigError;

/// How pack-id suffixes are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackIdScheme {
    /// Process-local counter (`0001`, `0002`, ...).
    #[default]
    Counter,
    /// Eight random hex characters.
    Random,
}

impl std::str::FromStr for PackIdScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "counter" => Ok(Self::Counter),
            "random" => Ok(Self::Random),
            _ => Err(ConfigError::InvalidScheme {
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for building evidence packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceConfig {
    /// Pack-id prefix, e.g. `COM`.
    pub pack_prefix: String,
    /// Reject entity types missing from the policy table instead of
    /// falling back to the default classification.
    pub strict_policy: bool,
    /// Pack-id suffix scheme.
    pub pack_id_scheme: PackIdScheme,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self::commerce()
    }
}

impl EvidenceConfig {
    /// Commerce preset: prefix `COM`.
    pub fn commerce() -> Self {
        Self {
            pack_prefix: "COM".to_string(),
            strict_policy: false,
            pack_id_scheme: PackIdScheme::Counter,
        }
    }

    /// Agricultural preset: prefix `AGRI`.
    pub fn agri() -> Self {
        Self {
            pack_prefix: "AGRI".to_string(),
            ..Self::commerce()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `EVTRAIL_PACK_PREFIX` (default: `COM`)
    /// - `EVTRAIL_STRICT_POLICY` (default: `false`)
    /// - `EVTRAIL_PACK_ID_SCHEME` (`counter` | `random`, default: `counter`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::commerce();

        let pack_prefix = match lookup("EVTRAIL_PACK_PREFIX") {
            Some(raw) => validate_prefix(raw)?,
            None => defaults.pack_prefix,
        };
        let strict_policy = match lookup("EVTRAIL_STRICT_POLICY") {
            Some(raw) => parse_bool("EVTRAIL_STRICT_POLICY", &raw)?,
            None => defaults.strict_policy,
        };
        let pack_id_scheme = match lookup("EVTRAIL_PACK_ID_SCHEME") {
            Some(raw) => raw.parse()?,
            None => defaults.pack_id_scheme,
        };

        Ok(Self {
            pack_prefix,
            strict_policy,
            pack_id_scheme,
        })
    }

    /// Set the pack-id prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Result<Self, ConfigError> {
        self.pack_prefix = validate_prefix(prefix.into())?;
        Ok(self)
    }
}

fn validate_prefix(raw: String) -> Result<String, ConfigError> {
    let prefix = raw.trim();
    let valid = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !valid {
        return Err(ConfigError::InvalidPrefix { value: raw });
    }
    Ok(prefix.to_string())
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = EvidenceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, EvidenceConfig::commerce());
    }

    #[test]
    fn test_presets() {
        assert_eq!(EvidenceConfig::commerce().pack_prefix, "COM");
        assert_eq!(EvidenceConfig::agri().pack_prefix, "AGRI");
        assert!(!EvidenceConfig::agri().strict_policy);
    }

    #[test]
    fn test_reads_all_variables() {
        let cfg = EvidenceConfig::from_lookup(lookup(&[
            ("EVTRAIL_PACK_PREFIX", "AGRI"),
            ("EVTRAIL_STRICT_POLICY", "true"),
            ("EVTRAIL_PACK_ID_SCHEME", "random"),
        ]))
        .unwrap();
        assert_eq!(cfg.pack_prefix, "AGRI");
        assert!(cfg.strict_policy);
        assert_eq!(cfg.pack_id_scheme, PackIdScheme::Random);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EvidenceConfig::from_lookup(lookup(&[("EVTRAIL_PACK_PREFIX", "com-1")])),
            Err(ConfigError::InvalidPrefix { .. })
        ));
        assert!(matches!(
            EvidenceConfig::from_lookup(lookup(&[("EVTRAIL_STRICT_POLICY", "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            EvidenceConfig::from_lookup(lookup(&[("EVTRAIL_PACK_ID_SCHEME", "uuid")])),
            Err(ConfigError::InvalidScheme { .. })
        ));
    }

    #[test]
    fn test_with_prefix_validates() {
        assert_eq!(
            EvidenceConfig::commerce().with_prefix("B2B").unwrap().pack_prefix,
            "B2B"
        );
        assert!(EvidenceConfig::commerce().with_prefix("").is_err());
    }
}
