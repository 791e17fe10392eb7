use crate::render::ColorMode;
use clap::{ArgGroup, Parser};

/// quill: a markdown journal client
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    version,
    about,
    group(
        ArgGroup::new("mode")
            .args(["list", "show", "edit", "delete", "live", "text"])
            .multiple(false)
    ),
)]
pub struct Cli {
    /// Lists your entries, newest first.
    #[arg(long, short)]
    pub list: bool,
    /// Only shows the date and title of listed entries.
    #[arg(long, short, requires = "list")]
    pub short: bool,
    /// Prints one entry (e.g. `quill --show 1723700000000-k3j9x0a1b`).
    #[arg(long, value_name = "ID")]
    pub show: Option<String>,
    /// Opens an entry in your $EDITOR and saves the result.
    #[arg(long, short, value_name = "ID")]
    pub edit: Option<String>,
    /// Deletes an entry.
    #[arg(long, value_name = "ID")]
    pub delete: Option<String>,
    /// Writes an entry from stdin, saving as you go. Ends at EOF (Ctrl-D).
    #[arg(long)]
    pub live: bool,

    /// Title for a new entry. Defaults to "Untitled".
    #[arg(long, short)]
    pub title: Option<String>,
    /// Date for a new entry (`2025-08-15` or RFC 3339). Defaults to now.
    #[arg(long, short)]
    pub date: Option<String>,

    /// API base URL. Overrides `api_url` from the config file.
    #[arg(long, env = "QUILL_API_URL")]
    pub api_url: Option<String>,
    /// User id sent to the API. Overrides `user` from the config file.
    #[arg(long, env = "QUILL_USER")]
    pub user: Option<String>,
    /// Bearer token sent to the API. Overrides `token` from the config file.
    #[arg(long, env = "QUILL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
    /// Logs requests and saves to stderr.
    #[arg(long, short)]
    pub verbose: bool,

    /// Free text for a new entry (e.g. `quill Went for a walk by the river`).
    #[arg()]
    pub text: Vec<String>,
}
