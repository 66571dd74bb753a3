use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config::{OutputFormat, Shell};

#[derive(Parser, Debug)]
#[command(name = "deploycfg", version, about)]
pub struct Args {
    /// Path to deploycfg.toml (overrides DEPLOYCFG_CONFIG and ./deploycfg.toml)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Path to package.json (overrides [app].package_json)
    #[arg(long)]
    pub package: Option<std::path::PathBuf>,

    /// Release identifier used in NEXT_PUBLIC_APP_NAME_VERSION
    #[arg(long)]
    pub release_tag: Option<String>,

    /// Build instant in epoch milliseconds (defaults to now)
    #[arg(long)]
    pub build_time_ms: Option<i64>,

    /// Output format (overrides [output].format, default json)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shell dialect for --format shell (default bash)
    #[arg(long, value_enum)]
    pub shell: Option<Shell>,

    /// MiniJinja template for --format template
    #[arg(long)]
    pub template: Option<std::path::PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<std::path::PathBuf>,

    /// Print the headers applied to this request path instead of the config
    #[arg(long)]
    pub headers_for: Option<String>,

    /// Print a report of the derived config to stderr
    #[arg(long, value_enum, default_value_t = ReportMode::Off)]
    pub report: ReportMode,

    /// Dump the environment snapshot to stderr
    #[arg(long, default_value_t = false)]
    pub dump_context: bool,

    /// Disable redaction of secret-like values in dumps and reports
    #[arg(long = "no-redact", default_value_t = false)]
    pub no_redact: bool,

    /// Log level (overrides RUST_LOG; info when neither is set)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Args {
    pub fn effective_redact(&self) -> bool {
        !self.no_redact
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    Off,
    Summary,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
