//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for AppConfig.
///
/// This is maintained manually to match the struct hierarchy in app_config.rs.
/// Any new field added to AppConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [site]
        "site",
        "site.region",
        "site.name",
        "site.latitude",
        "site.longitude",
        // [server]
        "server",
        "server.addr",
        // [forecast]
        "forecast",
        "forecast.days",
        // [cache]
        "cache",
        "cache.weather_ttl_minutes",
        "cache.storms_ttl_minutes",
        "cache.seismic_ttl_minutes",
        "cache.buoys_ttl_minutes",
        "cache.sweep_interval_minutes",
        // [refresh]
        "refresh",
        "refresh.interval_secs",
        "refresh.on_start",
        // [storage]
        "storage",
        "storage.data_dir",
        // [http]
        "http",
        "http.timeout_secs",
        "http.user_agent",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 {
            if let Some((_, best_dist)) = best {
                if dist < best_dist {
                    best = Some((k, dist));
                }
            } else {
                best = Some((k, dist));
            }
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys — it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate value ranges on a parsed AppConfig.
///
/// Returns (errors, warnings) — errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_ranges(config: &super::AppConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Coordinate overrides must be on the planet
    if let Some(lat) = config.site.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            errors.push(format!(
                "site.latitude = {:.2} is outside the valid range (-90 to 90)",
                lat
            ));
        }
    }
    if let Some(lon) = config.site.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            errors.push(format!(
                "site.longitude = {:.2} is outside the valid range (-180 to 180)",
                lon
            ));
        }
    }

    // Refresh faster than every 10s hammers the upstream APIs for no benefit:
    // the shortest cache lifetime is measured in minutes.
    if config.refresh.interval_secs < 10 {
        warnings.push(ValidationWarning {
            field: "refresh.interval_secs".to_string(),
            message: format!(
                "refresh.interval_secs = {} is unusually aggressive (typical: 60)",
                config.refresh.interval_secs
            ),
            suggestion: None,
        });
    }

    // A day-old marine forecast is stale enough to be operationally useless
    if config.cache.weather_ttl_minutes > 1440 {
        warnings.push(ValidationWarning {
            field: "cache.weather_ttl_minutes".to_string(),
            message: format!(
                "cache.weather_ttl_minutes = {} exceeds 24h — forecasts will go stale",
                config.cache.weather_ttl_minutes
            ),
            suggestion: None,
        });
    }

    if config.http.timeout_secs > 120 {
        warnings.push(ValidationWarning {
            field: "http.timeout_secs".to_string(),
            message: format!(
                "http.timeout_secs = {} is outside the typical range (1-120)",
                config.http.timeout_secs
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("latidude", "latitude"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_flat() {
        let toml: toml::Value = r#"
            a = 1
            b = "hello"
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"a".to_string()));
        assert!(keys.contains(&"b".to_string()));
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [cache]
            weather_ttl_minutes = 15
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"cache".to_string()));
        assert!(keys.contains(&"cache.weather_ttl_minutes".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[cache]
wether_ttl_minutes = 15
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("wether_ttl_minutes"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("cache.weather_ttl_minutes")
        );
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[site]
region = "northsea"

[server]
addr = "127.0.0.1:9000"

[cache]
buoys_ttl_minutes = 30
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(
            warnings.is_empty(),
            "Expected 0 warnings, got: {:?}",
            warnings
        );
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let toml_str = r#"
[typo_section]
some_field = 42
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(
            !warnings.is_empty(),
            "Expected warnings for unknown section"
        );
        assert!(warnings
            .iter()
            .any(|w| w.field.contains("typo_section")));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        let suggestion = suggest_correction("completely_unrelated_garbage_key_xyz", &known);
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_known_keys_covers_all_sections() {
        let known = known_config_keys();
        // Spot-check that every top-level section is represented
        assert!(known.contains("site"));
        assert!(known.contains("server"));
        assert!(known.contains("forecast"));
        assert!(known.contains("cache"));
        assert!(known.contains("refresh"));
        assert!(known.contains("storage"));
        assert!(known.contains("http"));
        // Spot-check leaf keys
        assert!(known.contains("cache.seismic_ttl_minutes"));
        assert!(known.contains("refresh.on_start"));
        assert!(known.contains("http.user_agent"));
    }

    #[test]
    fn test_latitude_out_of_range_is_an_error() {
        let mut config = crate::config::AppConfig::default();
        config.site.latitude = Some(123.0);
        let (errors, _) = validate_ranges(&config);
        assert!(
            errors.iter().any(|e| e.contains("site.latitude")),
            "Latitude 123 should be an error"
        );
    }

    #[test]
    fn test_aggressive_refresh_is_a_warning_not_error() {
        let mut config = crate::config::AppConfig::default();
        config.refresh.interval_secs = 1;
        let (errors, warnings) = validate_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings
            .iter()
            .any(|w| w.field.contains("refresh.interval_secs")));
    }

    #[test]
    fn test_range_defaults_clean() {
        let config = crate::config::AppConfig::default();
        let (errors, warnings) = validate_ranges(&config);
        assert!(
            errors.is_empty(),
            "Defaults should produce no errors: {:?}",
            errors
        );
        assert!(
            warnings.is_empty(),
            "Defaults should produce no warnings: {:?}",
            warnings
        );
    }
}
