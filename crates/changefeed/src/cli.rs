use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "changefeed",
    version,
    about = "Poll a Jira instance for issues changed since the last sync"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML config file
    #[arg(long, env = "CHANGEFEED_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Jira base URL, e.g. https://issues.example.org (overrides config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Jira username; leave unset for anonymous access
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Jira password or API token
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// HTTP call timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Issues requested per page; 0 lets the server decide
    #[arg(long, global = true, value_name = "N", allow_negative_numbers = true)]
    pub page_size: Option<i32>,

    /// Timezone JQL dates are written in (UTC, local, GMT+1:00, -05:30, ...)
    #[arg(long, global = true, value_name = "TZ")]
    pub timezone: Option<String>,

    /// Comma-separated issue fields to request
    #[arg(long, global = true)]
    pub fields: Option<String>,

    /// Comma-separated expansions to request (e.g. changelog)
    #[arg(long, global = true)]
    pub expand: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the keys of all visible projects
    #[command(visible_alias = "p")]
    Projects,
    /// Fetch issues of a project changed within a time window
    #[command(visible_alias = "c")]
    Changes {
        /// Project key (e.g. ORG)
        project: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Offset of the first issue to fetch
        #[arg(long, default_value_t = 0)]
        start_at: u64,

        /// Follow pagination until all matching issues are fetched
        #[arg(long)]
        all: bool,

        /// Stop after this many issues when using --all
        #[arg(long, requires = "all")]
        limit: Option<usize>,
    },
    /// Print the JQL used to select changed issues, without contacting Jira
    Jql {
        /// Project key (e.g. ORG)
        project: String,

        #[command(flatten)]
        window: WindowArgs,
    },
    /// Configuration inspection
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Only issues updated at or after this time (RFC 3339 or "YYYY-MM-DD HH:MM" UTC)
    #[arg(long, value_parser = parse_timestamp)]
    pub after: Option<DateTime<Utc>>,

    /// Only issues updated at or before this time
    #[arg(long, value_parser = parse_timestamp)]
    pub before: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (password redacted)
    Show,
    /// List config file locations in load order
    Path,
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "changefeed", &mut std::io::stdout());
    }
}

/// Parse a command-line timestamp; naive forms are taken as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(format!(
        "invalid timestamp '{}': expected RFC 3339 or YYYY-MM-DD HH:MM",
        value
    ))
}
