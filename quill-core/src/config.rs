use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_IDENTITY_HEADER: &str = "x-authenticated-user";
pub const DEFAULT_MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the on-disk blob store.
    pub storage_dir: PathBuf,
    pub bind: SocketAddr,
    /// Request header carrying the user id, set by the identity gateway in front of the server.
    pub identity_header: String,
    /// Value of `Access-Control-Allow-Origin` on every response.
    pub cors_origin: String,
    /// Larger request bodies are rejected with 400.
    pub max_body_bytes: usize,
    pub client: ClientConfig,
}

/// Settings used by the terminal client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// Sent as the identity header. Useful when talking to a server without a gateway in front.
    pub user: Option<String>,
    /// Sent as `Authorization: Bearer ...`.
    pub token: Option<String>,
    /// Preferred editor name/binary (e.g. hx for Helix).
    /// Optional; the CLI will fall back to $VISUAL/$EDITOR.
    pub editor: Option<String>,
    pub autosave_delay: Duration,
    pub date_format: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    storage_dir: Option<PathBuf>,
    bind: Option<SocketAddr>,
    identity_header: Option<String>,
    cors_origin: Option<String>,
    max_body_bytes: Option<usize>,
    /// Optional table:
    /// [client]
    /// api_url = "http://127.0.0.1:8787"
    /// user = "me"
    client: Option<FileClientConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct FileClientConfig {
    api_url: Option<String>,
    user: Option<String>,
    token: Option<String>,
    editor: Option<String>,
    autosave_delay_ms: Option<u64>,
    date_format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file_config(FileConfig::default())
    }
}

impl Config {
    /// Public entrypoint: load config from disk (first XDG path, then native) and apply defaults.
    /// An unreadable or malformed file is reported and ignored.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "ignoring config file");
            FileConfig::default()
        });
        Ok(Self::from_file_config(file_config))
    }

    /// Loads a specific file. Unlike [`Config::load`], a bad file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let file_config =
            Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self::from_file_config(file_config))
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        let client = file_config.client.unwrap_or_default();
        let bind = file_config.bind.unwrap_or_else(Self::default_bind);

        Self {
            storage_dir: file_config
                .storage_dir
                .unwrap_or_else(Self::default_storage_dir),
            bind,
            identity_header: file_config
                .identity_header
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.to_string()),
            cors_origin: file_config.cors_origin.unwrap_or_else(|| "*".to_string()),
            max_body_bytes: file_config.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
            client: ClientConfig {
                api_url: client
                    .api_url
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| format!("http://{bind}")),
                user: client.user,
                token: client.token,
                editor: client.editor,
                autosave_delay: client
                    .autosave_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_AUTOSAVE_DELAY),
                date_format: client
                    .date_format
                    .unwrap_or_else(|| "%B %-d, %Y".to_string()),
            },
        }
    }

    fn default_bind() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 8787))
    }

    /// Default storage root: `{data_dir}/quill`
    /// - macOS:   `~/Library/Application Support/quill`
    /// - Linux:   `$XDG_DATA_HOME/quill` or `~/.local/share/quill`
    /// - Windows: `%APPDATA%\quill`
    fn default_storage_dir() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            base.data_dir().join("quill")
        } else {
            PathBuf::from("./quill-data")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b.home_dir().join(".config").join("quill").join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("quill").join("config.toml");
            v.push(native);
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            debug!(path = %path.display(), "reading config");
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    /// Parse a TOML string into `FileConfig`.
    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}
