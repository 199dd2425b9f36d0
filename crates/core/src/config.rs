use std::env;

use serde::{Deserialize, Serialize};

use crate::settings::{EngineSettings, MinuteHandling, OffsetSource, ParseMode};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    lookup(key).filter(|s| !s.is_empty())
}

fn profiled_or<F>(lookup: &F, profile: &str, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    profiled_opt(lookup, profile, key).unwrap_or_else(|| default.to_string())
}

/// Parse a profiled key, logging and falling back to `default` on bad input.
fn profiled_parse<F, T>(lookup: &F, profile: &str, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match profiled_opt(lookup, profile, key) {
        Some(raw) => match raw.parse() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key = %key, value = %raw, error = %e, "ignoring invalid setting");
                default
            }
        },
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub engine: EngineSettings,
    pub defaults: ZoneDefaults,
    /// Maximum records kept per session history (0 = unbounded).
    pub history_limit: usize,
}

/// Zones pre-selected when the caller does not name one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefaults {
    pub source_zone: String,
    pub target_zone: String,
}

impl Default for ZoneDefaults {
    fn default() -> Self {
        Self {
            source_zone: "UTC".to_string(),
            target_zone: "America/New_York".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            engine: EngineSettings::default(),
            defaults: ZoneDefaults::default(),
            history_limit: 50,
        }
    }
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SCHEDKIT_PROFILE`. When set (e.g. `OPS`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SCHEDKIT_PROFILE", "").to_uppercase();
        Self::from_lookup(&profile, env_opt)
    }

    /// Build config for `profile` from an arbitrary key lookup.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let base = Self::default();

        let reference_year = profiled_opt(&lookup, p, "SCHEDKIT_REFERENCE_YEAR").and_then(|raw| {
            match raw.parse::<i32>() {
                Ok(year) => Some(year),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "ignoring invalid reference year");
                    None
                }
            }
        });

        Self {
            profile: p.to_string(),
            engine: EngineSettings {
                parse_mode: profiled_parse(&lookup, p, "SCHEDKIT_PARSE_MODE", ParseMode::default()),
                offset_source: profiled_parse(
                    &lookup,
                    p,
                    "SCHEDKIT_OFFSET_SOURCE",
                    OffsetSource::default(),
                ),
                minute_handling: profiled_parse(
                    &lookup,
                    p,
                    "SCHEDKIT_MINUTE_HANDLING",
                    MinuteHandling::default(),
                ),
                reference_year,
            },
            defaults: ZoneDefaults {
                source_zone: profiled_or(&lookup, p, "SCHEDKIT_DEFAULT_FROM", &base.defaults.source_zone),
                target_zone: profiled_or(&lookup, p, "SCHEDKIT_DEFAULT_TO", &base.defaults.target_zone),
            },
            history_limit: profiled_parse(&lookup, p, "SCHEDKIT_HISTORY_LIMIT", base.history_limit),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::debug!("Config loaded (profile: {}):", self.profile_label());
        tracing::debug!(
            "  engine:   parse_mode={}, offsets={}, minutes={}, reference_year={}",
            self.engine.parse_mode,
            self.engine.offset_source,
            self.engine.minute_handling,
            self.engine
                .reference_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "(current)".to_string()),
        );
        tracing::debug!(
            "  defaults: from={}, to={}",
            self.defaults.source_zone,
            self.defaults.target_zone
        );
        tracing::debug!("  history:  limit={}", self.history_limit);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = Config::from_lookup("", lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.profile_label(), "default");
    }

    #[test]
    fn reads_plain_keys() {
        let config = Config::from_lookup(
            "",
            lookup(&[
                ("SCHEDKIT_PARSE_MODE", "strict"),
                ("SCHEDKIT_OFFSET_SOURCE", "iana"),
                ("SCHEDKIT_MINUTE_HANDLING", "carry"),
                ("SCHEDKIT_REFERENCE_YEAR", "2024"),
                ("SCHEDKIT_DEFAULT_TO", "Asia/Tokyo"),
                ("SCHEDKIT_HISTORY_LIMIT", "5"),
            ]),
        );
        assert_eq!(config.engine.parse_mode, ParseMode::Strict);
        assert_eq!(config.engine.offset_source, OffsetSource::Iana);
        assert_eq!(config.engine.minute_handling, MinuteHandling::Carry);
        assert_eq!(config.engine.reference_year, Some(2024));
        assert_eq!(config.defaults.source_zone, "UTC");
        assert_eq!(config.defaults.target_zone, "Asia/Tokyo");
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn profile_prefix_wins_over_plain_key() {
        let config = Config::from_lookup(
            "ops",
            lookup(&[
                ("SCHEDKIT_PARSE_MODE", "lenient"),
                ("OPS_SCHEDKIT_PARSE_MODE", "strict"),
                ("SCHEDKIT_DEFAULT_FROM", "Europe/London"),
            ]),
        );
        assert_eq!(config.profile, "OPS");
        assert_eq!(config.engine.parse_mode, ParseMode::Strict);
        assert_eq!(config.defaults.source_zone, "Europe/London");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = Config::from_lookup(
            "",
            lookup(&[
                ("SCHEDKIT_PARSE_MODE", "sloppy"),
                ("SCHEDKIT_REFERENCE_YEAR", "soon"),
                ("SCHEDKIT_HISTORY_LIMIT", "-1"),
            ]),
        );
        assert_eq!(config.engine.parse_mode, ParseMode::Lenient);
        assert_eq!(config.engine.reference_year, None);
        assert_eq!(config.history_limit, 50);
    }
}
