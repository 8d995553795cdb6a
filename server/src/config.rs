//! Process settings. A `.env` file, when present, takes precedence and the
//! settings are read from the environment; otherwise command-line flags are
//! parsed. Defaults fill every gap either way.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use poisk_core::config::{
    SearchOptions, DEFAULT_AROUND_RANGE, DEFAULT_DISTANCE_BETWEEN, DEFAULT_DISTANCE_LIMIT,
    DEFAULT_FREQUENCY_LIMIT, DEFAULT_KEYWORDS_WEIGHT, DEFAULT_MARKER_TAG, DEFAULT_OCCURRENCES,
    DEFAULT_TITLE_WEIGHT, DEFAULT_TRIMMER_PLACEHOLDER,
};

pub const DEFAULT_APP_NAME: &str = "SEARCH-DB-LESS";
pub const DEFAULT_APP_HOST: &str = "";
pub const DEFAULT_APP_PORT: u16 = 8080;
pub const DEFAULT_APP_LOG_LIMIT: usize = 100;

/// Everything the process needs to start: input paths, listen address, audit
/// limit and the search tuning knobs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub search_content: PathBuf,
    pub stop_words: PathBuf,
    pub dicts_dir: Option<PathBuf>,
    pub app_name: String,
    pub app_host: String,
    pub app_port: u16,
    pub app_log_limit: usize,
    pub search: SearchOptions,
}

#[derive(Parser, Debug)]
#[command(name = "poisk-server")]
#[command(about = "In-memory bilingual full-text search over a JSON corpus")]
struct Cli {
    /// Path to the documents JSON
    #[arg(short = 'c', long)]
    search_content: Option<PathBuf>,
    /// Path to the stop-words JSON
    #[arg(short = 'w', long)]
    stop_words: Option<PathBuf>,
    /// Directory of synonym dictionary JSONs
    #[arg(short = 'd', long)]
    dicts_dir: Option<PathBuf>,
    /// Application name, used in audit log file names
    #[arg(short = 'n', long, default_value = DEFAULT_APP_NAME)]
    app_name: String,
    /// Host to bind; empty means all interfaces
    #[arg(long, default_value = DEFAULT_APP_HOST)]
    app_host: String,
    /// Port to bind
    #[arg(short = 'p', long, default_value_t = DEFAULT_APP_PORT)]
    app_port: u16,
    /// Audit records buffered before a flush to disk
    #[arg(short = 'l', long, default_value_t = DEFAULT_APP_LOG_LIMIT)]
    app_log_limit: usize,
    /// Snippet highlight tag
    #[arg(long, default_value = DEFAULT_MARKER_TAG)]
    words_marker_tag: String,
    /// Characters allowed between `+`-joined words
    #[arg(long, default_value_t = DEFAULT_DISTANCE_BETWEEN)]
    words_distance_between: usize,
    /// Ellipsis placeholder for trimmed snippets
    #[arg(long, default_value = DEFAULT_TRIMMER_PLACEHOLDER)]
    words_trimmer_placeholder: String,
    /// Max matches per paragraph; negative means all
    #[arg(long, default_value_t = DEFAULT_OCCURRENCES, allow_hyphen_values = true)]
    words_occurrences: i64,
    /// Characters of context on each side of a snippet
    #[arg(long, default_value_t = DEFAULT_AROUND_RANGE)]
    words_around_range: usize,
    /// Edit-distance cap for fuzzy lookup
    #[arg(long, default_value_t = DEFAULT_DISTANCE_LIMIT)]
    words_distance_limit: usize,
    /// Score floor as a fraction of the top score
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_LIMIT)]
    words_frequency_limit: f64,
    /// Title boost
    #[arg(long, default_value_t = DEFAULT_TITLE_WEIGHT)]
    words_title_weight: f64,
    /// Keyword boost
    #[arg(long, default_value_t = DEFAULT_KEYWORDS_WEIGHT)]
    words_keywords_weight: f64,
}

impl Settings {
    /// Resolve settings: `.env` wins over flags, defaults fill the rest.
    pub fn load() -> Result<Self> {
        if dotenvy::dotenv().is_ok() {
            tracing::info!("settings taken from '.env'");
            Self::from_env()
        } else {
            Self::from_cli(Cli::parse())
        }
    }

    fn from_env() -> Result<Self> {
        Ok(Self {
            search_content: required_path("SEARCH_CONTENT")?,
            stop_words: required_path("STOP_WORDS")?,
            dicts_dir: env_var("DICTS_DIR").map(PathBuf::from),
            app_name: env_var("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            app_host: env_var("APP_HOST").unwrap_or_else(|| DEFAULT_APP_HOST.to_string()),
            app_port: env_parsed("APP_PORT", DEFAULT_APP_PORT)?,
            app_log_limit: env_parsed("APP_LOG_LIMIT", DEFAULT_APP_LOG_LIMIT)?,
            search: SearchOptions {
                marker_tag: env_var("WORDS_MARKER_TAG")
                    .unwrap_or_else(|| DEFAULT_MARKER_TAG.to_string()),
                distance_between: env_parsed("WORDS_DISTANCE_BETWEEN", DEFAULT_DISTANCE_BETWEEN)?,
                trimmer_placeholder: env_var("WORDS_TRIMMER_PLACEHOLDER")
                    .unwrap_or_else(|| DEFAULT_TRIMMER_PLACEHOLDER.to_string()),
                occurrences: env_parsed("WORDS_OCCURRENCES", DEFAULT_OCCURRENCES)?,
                around_range: env_parsed("WORDS_AROUND_RANGE", DEFAULT_AROUND_RANGE)?,
                distance_limit: env_parsed("WORDS_DISTANCE_LIMIT", DEFAULT_DISTANCE_LIMIT)?,
                frequency_limit: env_parsed("WORDS_FREQUENCY_LIMIT", DEFAULT_FREQUENCY_LIMIT)?,
                title_weight: env_parsed("WORDS_TITLE_WEIGHT", DEFAULT_TITLE_WEIGHT)?,
                keywords_weight: env_parsed("WORDS_KEYWORDS_WEIGHT", DEFAULT_KEYWORDS_WEIGHT)?,
            },
        })
    }

    fn from_cli(cli: Cli) -> Result<Self> {
        let Some(search_content) = cli.search_content else {
            bail!("--search-content is required (or set SEARCH_CONTENT via '.env')");
        };
        let Some(stop_words) = cli.stop_words else {
            bail!("--stop-words is required (or set STOP_WORDS via '.env')");
        };
        Ok(Self {
            search_content,
            stop_words,
            dicts_dir: cli.dicts_dir,
            app_name: cli.app_name,
            app_host: cli.app_host,
            app_port: cli.app_port,
            app_log_limit: cli.app_log_limit,
            search: SearchOptions {
                marker_tag: cli.words_marker_tag,
                distance_between: cli.words_distance_between,
                trimmer_placeholder: cli.words_trimmer_placeholder,
                occurrences: cli.words_occurrences,
                around_range: cli.words_around_range,
                distance_limit: cli.words_distance_limit,
                frequency_limit: cli.words_frequency_limit,
                title_weight: cli.words_title_weight,
                keywords_weight: cli.words_keywords_weight,
            },
        })
    }

    /// The address to bind; an empty host means all interfaces.
    pub fn bind_address(&self) -> String {
        let host = if self.app_host.is_empty() {
            "0.0.0.0"
        } else {
            &self.app_host
        };
        format!("{host}:{}", self.app_port)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn required_path(key: &str) -> Result<PathBuf> {
    env_var(key)
        .map(PathBuf::from)
        .with_context(|| format!("{key} must be set"))
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_var(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} has an unparseable value")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_cover_every_knob() {
        let cli = Cli::parse_from(["poisk-server", "-c", "docs.json", "-w", "stop.json"]);
        let settings = Settings::from_cli(cli).unwrap();
        assert_eq!(settings.app_name, DEFAULT_APP_NAME);
        assert_eq!(settings.app_port, DEFAULT_APP_PORT);
        assert_eq!(settings.app_log_limit, DEFAULT_APP_LOG_LIMIT);
        assert_eq!(settings.search.marker_tag, "mark");
        assert_eq!(settings.search.occurrences, -1);
        assert!(settings.dicts_dir.is_none());
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn cli_requires_the_input_paths() {
        let cli = Cli::parse_from(["poisk-server"]);
        assert!(Settings::from_cli(cli).is_err());
    }

    #[test]
    fn explicit_host_is_kept_in_bind_address() {
        let cli = Cli::parse_from([
            "poisk-server",
            "-c",
            "docs.json",
            "-w",
            "stop.json",
            "--app-host",
            "127.0.0.1",
            "-p",
            "9000",
        ]);
        let settings = Settings::from_cli(cli).unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:9000");
    }
}
