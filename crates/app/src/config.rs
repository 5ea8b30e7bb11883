use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use services::media::{
    DEFAULT_IMAGE_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE, DEFAULT_TTS_URL, ImageConfig,
    SpeechConfig,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("cannot prepare database file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "story-reader", version, about = "Leveled English story reader for kids")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

impl Cli {
    /// Subcommand to run; serving is the default.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve,
    /// Write the built-in story catalog into the database and exit.
    Seed,
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// SQLite database URL or path.
    #[arg(
        long = "db",
        env = "STORY_DB_URL",
        default_value = "sqlite://story.sqlite3",
        global = true
    )]
    pub db_url: String,

    #[arg(long, env = "STORY_BIND", default_value = "127.0.0.1:8080", global = true)]
    pub bind: SocketAddr,

    #[arg(long, env = "STORY_TTS_URL", default_value = DEFAULT_TTS_URL, global = true)]
    pub tts_url: String,

    /// Read sentences slowly.
    #[arg(
        long,
        env = "STORY_TTS_SLOW",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub tts_slow: bool,

    #[arg(long, env = "STORY_IMAGE_API_KEY", hide_env_values = true, global = true)]
    pub image_api_key: Option<String>,

    #[arg(
        long,
        env = "STORY_IMAGE_BASE_URL",
        default_value = DEFAULT_IMAGE_BASE_URL,
        global = true
    )]
    pub image_base_url: String,

    #[arg(long, env = "STORY_IMAGE_MODEL", default_value = DEFAULT_IMAGE_MODEL, global = true)]
    pub image_model: String,

    #[arg(long, env = "STORY_IMAGE_SIZE", default_value = DEFAULT_IMAGE_SIZE, global = true)]
    pub image_size: String,

    /// Timeout for speech and image requests.
    #[arg(long, env = "STORY_HTTP_TIMEOUT_SECS", default_value_t = 20, global = true)]
    pub http_timeout_secs: u64,

    /// Drop reading sessions after this many seconds without a request.
    #[arg(long, env = "STORY_SESSION_IDLE_SECS", default_value_t = 1800, global = true)]
    pub session_idle_secs: u64,
}

impl Settings {
    /// Normalised database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        normalize_sqlite_url(&self.db_url)
    }

    #[must_use]
    pub fn speech(&self) -> SpeechConfig {
        SpeechConfig {
            endpoint: self.tts_url.clone(),
            slow: self.tts_slow,
            timeout: self.http_timeout(),
        }
    }

    #[must_use]
    pub fn images(&self) -> ImageConfig {
        ImageConfig {
            base_url: self.image_base_url.clone(),
            api_key: self
                .image_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            model: self.image_model.clone(),
            size: self.image_size.clone(),
            timeout: self.http_timeout(),
        }
    }

    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs.max(1))
    }

    fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }
}

fn is_memory_url(raw: &str) -> bool {
    raw == "sqlite::memory:" || raw.contains("mode=memory")
}

/// Turn a bare or relative path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite:///") {
        return trimmed.to_owned();
    }

    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory if missing.
///
/// # Errors
///
/// Returns `ConfigError` if the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let invalid = || ConfigError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serve_locally() {
        let cli = Cli::try_parse_from(["story-reader"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.settings.bind, "127.0.0.1:8080".parse().unwrap());
        assert!(cli.settings.speech().slow);
        assert_eq!(cli.settings.images().model, "dall-e-3");
        assert_eq!(cli.settings.session_idle_timeout(), Duration::from_secs(1800));
    }

    #[test]
    fn seed_accepts_flags_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "story-reader",
            "seed",
            "--db",
            "sqlite:///tmp/stories.db",
            "--tts-slow",
            "no",
        ])
        .unwrap();
        assert_eq!(cli.command(), Command::Seed);
        assert_eq!(cli.settings.database_url(), "sqlite:///tmp/stories.db");
        assert!(!cli.settings.tts_slow);
    }

    #[test]
    fn blank_api_key_disables_images() {
        let cli = Cli::try_parse_from(["story-reader", "--image-api-key", "  "]).unwrap();
        assert!(cli.settings.images().api_key.is_none());
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("data/story.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/story.sqlite3"));

        let url = normalize_sqlite_url("sqlite://story.sqlite3");
        assert!(url.starts_with("sqlite:///"));
    }

    #[test]
    fn memory_urls_are_left_alone() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert!(prepare_sqlite_file("sqlite:file:x?mode=memory&cache=shared").is_ok());
        assert!(matches!(
            prepare_sqlite_file("postgres://nope"),
            Err(ConfigError::InvalidDbUrl { .. })
        ));
    }
}
