//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::HarborConfig;
use super::secret::secret_string;
use crate::domain::errors::HarborError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into HarborConfig
/// 4. Applies environment variable overrides (HARBOR_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, the TOML is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use harbor::config::loader::load_config;
///
/// let config = load_config("harbor.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HarborConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HarborError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HarborError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: HarborConfig = toml::from_str(&contents)
        .map_err(|e| HarborError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration from a file if it exists, otherwise from defaults
///
/// Environment overrides and validation apply in both cases, so a run driven
/// purely by `HARBOR_*` variables needs no configuration file at all.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<HarborConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        finish(HarborConfig::default())
    }
}

fn finish(mut config: HarborConfig) -> Result<HarborConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        HarborError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| HarborError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(HarborError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Applies environment variable overrides using the HARBOR_* prefix
///
/// Variables follow the pattern HARBOR_<SECTION>_<KEY>, for example
/// HARBOR_SOURCE_BUCKET or HARBOR_IMPORT_BATCH_SIZE.
fn apply_env_overrides(config: &mut HarborConfig) -> Result<()> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        HarborError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

fn apply_overrides_from<F>(config: &mut HarborConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).map(|value| (name.to_string(), value));

    // Application overrides
    if let Some((_, val)) = get("HARBOR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // AWS overrides
    if let Some((_, val)) = get("HARBOR_AWS_REGION") {
        config.aws.region = val;
    }
    if let Some((_, val)) = get("HARBOR_AWS_ENDPOINT_URL") {
        config.aws.endpoint_url = Some(val);
    }
    if let Some((_, val)) = get("HARBOR_AWS_ACCESS_KEY_ID") {
        config.aws.access_key_id = Some(val);
    }
    if let Some((_, val)) = get("HARBOR_AWS_SECRET_ACCESS_KEY") {
        config.aws.secret_access_key = Some(secret_string(val));
    }
    if let Some((name, val)) = get("HARBOR_AWS_OPERATION_TIMEOUT_SECONDS") {
        config.aws.operation_timeout_seconds = parse_var(&name, &val)?;
    }

    // Source overrides
    if let Some((_, val)) = get("HARBOR_SOURCE_BUCKET") {
        config.source.bucket = val;
    }
    if let Some((_, val)) = get("HARBOR_SOURCE_KEY") {
        config.source.key = Some(val);
    }

    // Target overrides
    if let Some((_, val)) = get("HARBOR_TARGET_TABLE_NAME") {
        config.target.table_name = Some(val);
    }
    if let Some((name, val)) = get("HARBOR_TARGET_CREATE_TABLE") {
        config.target.create_table = parse_var(&name, &val)?;
    }
    if let Some((name, val)) = get("HARBOR_TARGET_OVERWRITE_EXISTING") {
        config.target.overwrite_existing = parse_var(&name, &val)?;
    }

    // Import overrides
    if let Some((name, val)) = get("HARBOR_IMPORT_BATCH_SIZE") {
        config.import.batch_size = parse_var(&name, &val)?;
    }
    if let Some((name, val)) = get("HARBOR_IMPORT_BATCH_DELAY_MS") {
        config.import.batch_delay_ms = parse_var(&name, &val)?;
    }
    if let Some((name, val)) = get("HARBOR_IMPORT_WRITE_CONCURRENCY") {
        config.import.write_concurrency = parse_var(&name, &val)?;
    }
    if let Some((name, val)) = get("HARBOR_IMPORT_DRY_RUN") {
        config.import.dry_run = parse_var(&name, &val)?;
    }
    if let Some((name, val)) = get("HARBOR_IMPORT_MAX_REPORTED_FAILURES") {
        config.import.max_reported_failures = parse_var(&name, &val)?;
    }

    // Table wait overrides
    if let Some((name, val)) = get("HARBOR_TABLE_WAIT_POLL_INTERVAL_MS") {
        config.table_wait.poll_interval_ms = parse_var(&name, &val)?;
    }
    if let Some((name, val)) = get("HARBOR_TABLE_WAIT_MAX_POLL_ATTEMPTS") {
        config.table_wait.max_poll_attempts = parse_var(&name, &val)?;
    }

    // Logging overrides
    if let Some((name, val)) = get("HARBOR_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_var(&name, &val)?;
    }
    if let Some((_, val)) = get("HARBOR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some((_, val)) = get("HARBOR_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("HARBOR_LOADER_TEST_VAR", "test_value");
        let input = "secret_access_key = \"${HARBOR_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "secret_access_key = \"test_value\"");
        std::env::remove_var("HARBOR_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("HARBOR_LOADER_MISSING_VAR");
        let input = "key = \"${HARBOR_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("HARBOR_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# key = \"${HARBOR_LOADER_COMMENTED_VAR}\"\nbucket = \"b\"\n";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(HarborError::Configuration(_))));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = load_config_or_default("definitely-not-here.toml").unwrap();
        assert_eq!(config.import.batch_size, 25);
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[aws]
region = "eu-west-1"
endpoint_url = "http://localhost:4566"

[source]
bucket = "team-exports"
key = "exports/users.json"

[target]
create_table = true
overwrite_existing = true

[import]
batch_size = 10
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.source.key.as_deref(), Some("exports/users.json"));
        assert!(config.target.create_table);
        assert_eq!(config.import.batch_size, 10);
    }

    #[test]
    fn test_load_config_rejects_invalid_batch_size() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[import]\nbatch_size = 100\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("import.batch_size"));
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = HarborConfig::default();
        let lookup = lookup_from(&[
            ("HARBOR_SOURCE_BUCKET", "override-bucket"),
            ("HARBOR_SOURCE_KEY", "a/b.json"),
            ("HARBOR_TARGET_CREATE_TABLE", "true"),
            ("HARBOR_IMPORT_BATCH_SIZE", "5"),
            ("HARBOR_AWS_SECRET_ACCESS_KEY", "s3cr3t"),
            ("HARBOR_TABLE_WAIT_MAX_POLL_ATTEMPTS", "3"),
        ]);

        apply_overrides_from(&mut config, lookup).unwrap();

        assert_eq!(config.source.bucket, "override-bucket");
        assert_eq!(config.source.key.as_deref(), Some("a/b.json"));
        assert!(config.target.create_table);
        assert_eq!(config.import.batch_size, 5);
        assert_eq!(config.table_wait.max_poll_attempts, 3);
        assert_eq!(
            config
                .aws
                .secret_access_key
                .as_ref()
                .unwrap()
                .expose_secret(),
            "s3cr3t"
        );
    }

    #[test]
    fn test_overrides_reject_unparseable_values() {
        let mut config = HarborConfig::default();
        let lookup = lookup_from(&[("HARBOR_IMPORT_BATCH_SIZE", "lots")]);

        let err = apply_overrides_from(&mut config, lookup).unwrap_err();
        assert!(err.to_string().contains("HARBOR_IMPORT_BATCH_SIZE"));
    }
}
