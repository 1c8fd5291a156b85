//! Command-line arguments and the settings resolved from them.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::links::DEFAULT_BASE_URL;
use crate::prefs::{DisplayFlags, FileStorage};

pub const BASE_URL_ENV: &str = "NOTEPAD_BASE_URL";

#[derive(Debug, Parser)]
#[command(name = "notepad")]
#[command(about = "Plain-text notepad with shareable snapshot links")]
#[command(version)]
pub struct Args {
    #[arg(long, global = true, help = "Base URL for snapshot and embed links")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Preferences file to use")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Edit a file interactively (the default)
    Edit { file: Option<PathBuf> },
    /// Print a snapshot link for a file
    Snapshot { file: PathBuf },
    /// Print an embed link for a file
    Embed {
        file: PathBuf,
        #[arg(long)]
        readonly: bool,
        #[arg(long)]
        line_numbers: bool,
        #[arg(long)]
        minimap: bool,
        #[arg(long)]
        sticky_scroll: bool,
    },
    /// Decode the content of a snapshot or embed link
    Restore {
        url: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Render the live preview document of a file
    Preview {
        file: PathBuf,
        #[arg(long)]
        language: Option<String>,
    },
    /// Compose an HTML/CSS/JS playground page
    Playground {
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(long)]
        js: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show or change the stored view preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
    /// Print the web manifest `file_handlers` entry
    Handlers,
}

impl CliCommand {
    /// Embed flags of an `embed` invocation.
    pub fn embed_flags(&self) -> Option<DisplayFlags> {
        match *self {
            Self::Embed {
                readonly,
                line_numbers,
                minimap,
                sticky_scroll,
                ..
            } => Some(DisplayFlags {
                read_only: readonly,
                line_numbers,
                minimap,
                sticky_scroll,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum PrefsAction {
    Set { key: String, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// `None` when no configuration directory could be determined.
    pub prefs_path: Option<PathBuf>,
    pub command: CliCommand,
}

impl Config {
    pub fn from_args_and_env() -> Self {
        Self::from_args(Args::parse())
    }

    /// `--base-url`, else `$NOTEPAD_BASE_URL`, else the local dev server.
    pub fn from_args(args: Args) -> Self {
        let base_url = args
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            prefs_path: args.prefs.or_else(FileStorage::default_path),
            command: args.command.unwrap_or(CliCommand::Edit { file: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(argv: &[&str]) -> Config {
        Config::from_args(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults_to_edit() {
        let config = config(&["notepad", "--prefs", "/tmp/p.json"]);
        assert_eq!(config.command, CliCommand::Edit { file: None });
        assert_eq!(config.prefs_path, Some(PathBuf::from("/tmp/p.json")));
    }

    #[test]
    fn test_base_url_flag() {
        let config = config(&["notepad", "snapshot", "a.md", "--base-url", "https://example.com/"]);
        assert_eq!(config.base_url, "https://example.com/");
        assert_eq!(
            config.command,
            CliCommand::Snapshot {
                file: PathBuf::from("a.md")
            }
        );
    }

    #[test]
    fn test_embed_flags() {
        let config = config(&["notepad", "embed", "a.md", "--minimap", "--readonly"]);
        assert_eq!(
            config.command.embed_flags(),
            Some(DisplayFlags {
                read_only: true,
                line_numbers: false,
                minimap: true,
                sticky_scroll: false,
            })
        );
        assert_eq!(CliCommand::Handlers.embed_flags(), None);
    }

    #[test]
    fn test_prefs_set() {
        let config = config(&["notepad", "prefs", "set", "minimapEnabled", "false"]);
        assert_eq!(
            config.command,
            CliCommand::Prefs {
                action: Some(PrefsAction::Set {
                    key: "minimapEnabled".to_string(),
                    value: "false".to_string(),
                })
            }
        );
    }

    #[test]
    fn test_playground_panes() {
        let config = config(&["notepad", "playground", "--html", "a.html", "--js", "a.js"]);
        assert_eq!(
            config.command,
            CliCommand::Playground {
                html: Some(PathBuf::from("a.html")),
                css: None,
                js: Some(PathBuf::from("a.js")),
                output: None,
            }
        );
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["notepad", "frobnicate"]).is_err());
    }
}
