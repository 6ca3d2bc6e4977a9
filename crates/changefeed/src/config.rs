use anyhow::{anyhow, Context, Result};
use changefeed_core::FixedProjection;
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use jira_backend::{ClientConfig, JqlTimezone, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;

const REDACTED: &str = "********";

/// Effective poller configuration: defaults, TOML files, `CHANGEFEED_*`
/// environment variables and command-line flags, in increasing priority
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    /// Jira base URL (the REST API path is appended automatically)
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Issues per search page; 0 or negative lets the server decide
    pub page_size: Option<i32>,
    /// Timezone for JQL dates, e.g. "UTC" or "GMT+1:00"
    pub timezone: Option<String>,
    /// Comma-separated issue fields to request
    pub fields: Option<String>,
    /// Comma-separated expansions to request
    pub expand: Option<String>,
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("CHANGEFEED_"));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli: &Cli) {
        let overrides = [
            (&mut self.url, &cli.url),
            (&mut self.user, &cli.user),
            (&mut self.password, &cli.password),
            (&mut self.timezone, &cli.timezone),
            (&mut self.fields, &cli.fields),
            (&mut self.expand, &cli.expand),
        ];
        for (target, value) in overrides {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = Some(timeout_ms);
        }
        if let Some(page_size) = cli.page_size {
            self.page_size = Some(page_size);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            return Err(anyhow!(
                "Jira URL not configured. Set via --url, CHANGEFEED_URL env var, or config file"
            ));
        }
        Ok(())
    }

    /// Timezone for JQL dates, UTC when unset
    pub fn jql_timezone(&self) -> Result<JqlTimezone> {
        match self.timezone.as_deref() {
            None => Ok(JqlTimezone::default()),
            Some(tz) => tz
                .parse::<JqlTimezone>()
                .with_context(|| format!("Invalid timezone setting '{}'", tz)),
        }
    }

    /// Build the Jira client configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let timeout = self
            .timeout_ms
            .map_or(DEFAULT_TIMEOUT, Duration::from_millis);
        let config = ClientConfig::new(
            self.url.as_deref(),
            self.user.as_deref(),
            self.password.as_deref(),
            timeout,
        )?;

        Ok(config
            .with_max_issues_per_page(self.page_size.unwrap_or(0))
            .with_jql_timezone(self.jql_timezone()?))
    }

    /// Issue fields and expansions to request
    pub fn projection(&self) -> FixedProjection {
        let split = |list: &Option<String>| -> Vec<String> {
            list.as_deref()
                .map(|s| s.split(',').map(str::to_string).collect())
                .unwrap_or_default()
        };
        FixedProjection::new(split(&self.fields), split(&self.expand))
    }

    /// Copy safe to print: the password is masked
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

/// Config files consulted, in merge order (later files win)
pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "changefeed").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("changefeed").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("changefeed")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("changefeed.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use changefeed_core::IssueProjection;
    use clap::Parser;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_explicit_file() {
        let file = write_config(
            r#"
url = "https://issues.example.org"
user = "poller"
password = "secret"
page_size = 50
timezone = "GMT+1:00"
fields = "key,updated"
"#,
        );

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.url.as_deref(), Some("https://issues.example.org"));
        assert_eq!(config.user.as_deref(), Some("poller"));
        assert_eq!(config.page_size, Some(50));
        assert_eq!(config.jql_timezone().unwrap(), JqlTimezone::offset(1, 0).unwrap());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn cli_flags_override_file() {
        let mut config = Config {
            url: Some("https://old.example.org".to_string()),
            page_size: Some(50),
            ..Config::default()
        };
        let cli = Cli::parse_from([
            "changefeed",
            "--url",
            "https://new.example.org",
            "--page-size",
            "10",
            "projects",
        ]);

        config.merge_with_cli(&cli);

        assert_eq!(config.url.as_deref(), Some("https://new.example.org"));
        assert_eq!(config.page_size, Some(10));
    }

    #[test]
    fn validate_requires_url() {
        assert!(Config::default().validate().is_err());
        let blank = Config {
            url: Some("  ".to_string()),
            ..Config::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn client_config_applies_settings() {
        let config = Config {
            url: Some("https://issues.example.org/".to_string()),
            user: Some("poller".to_string()),
            password: Some("secret".to_string()),
            timeout_ms: Some(1500),
            page_size: Some(25),
            timezone: Some("-05:00".to_string()),
            ..Config::default()
        };

        let client_config = config.client_config().unwrap();

        assert_eq!(client_config.api_url(), "https://issues.example.org/rest/api/2/");
        assert!(client_config.auth_configured());
        assert_eq!(client_config.timeout(), Duration::from_millis(1500));
        assert_eq!(client_config.max_issues_per_page, 25);
        assert_eq!(client_config.jql_timezone, JqlTimezone::offset(-5, 0).unwrap());
    }

    #[test]
    fn invalid_timezone_is_reported() {
        let config = Config {
            url: Some("https://issues.example.org".to_string()),
            timezone: Some("Mars/Olympus".to_string()),
            ..Config::default()
        };
        let err = config.client_config().unwrap_err();
        assert!(format!("{:#}", err).contains("Mars/Olympus"));
    }

    #[test]
    fn projection_from_comma_lists() {
        let config = Config {
            fields: Some("key, status,updated".to_string()),
            expand: Some("changelog".to_string()),
            ..Config::default()
        };

        let projection = config.projection();

        assert_eq!(projection.required_issue_fields(), "key,status,updated");
        assert_eq!(projection.required_issue_expansions(), "changelog");
        assert_eq!(Config::default().projection().required_issue_fields(), "");
    }

    #[test]
    fn redacted_masks_password_only() {
        let config = Config {
            user: Some("poller".to_string()),
            password: Some("secret".to_string()),
            ..Config::default()
        };

        let redacted = config.redacted();

        assert_eq!(redacted.user.as_deref(), Some("poller"));
        assert_eq!(redacted.password.as_deref(), Some(REDACTED));
    }

    #[test]
    fn explicit_path_is_the_only_path() {
        let path = Path::new("/tmp/changefeed-test.toml");
        assert_eq!(config_paths(Some(path)), vec![path.to_path_buf()]);
    }
}
