use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::buffer::BufferSurface;
use crate::eol::Eol;
use crate::fs_access::{FsFileAccess, FsHandle};
use crate::host::Confirm;
use crate::keymap::{KeyChord, KeyDisposition};
use crate::links::parse_incoming_link;
use crate::orchestrator::{Orchestrator, Outcome};
use crate::prefs::{DisplayFlags, KeyValueStorage, PreferencesPatch};

/// Orchestrator driven by the line-oriented terminal host.
pub type TerminalOrchestrator<C, S> = Orchestrator<BufferSurface, FsFileAccess, C, S>;

const DIFF_COLUMN_WIDTH: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Eol(Eol),
    Language(String),
    DefaultEol(Eol),
    LineNumbers(bool),
    Minimap(bool),
    StickyScroll(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Edit(Option<PathBuf>),
    Write,
    SaveAs(Option<PathBuf>),
    Quit,
    ForceQuit,
    Set(Setting),
    Snapshot,
    /// Explicit flags, or `None` for the flags currently in effect.
    Embed(Option<DisplayFlags>),
    OpenLink(String),
    /// Optional language id to show the diff as.
    Diff(Option<String>),
    Preview,
    Status,
    Print,
    Key(KeyChord),
}

impl Command {
    /// Parse the text after the leading `:`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(anyhow::anyhow!("Empty command"));
        }
        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();
        // Paths take the rest of the line so they may contain spaces
        let path_arg = || (!rest.is_empty()).then(|| PathBuf::from(rest));

        let command = match name {
            "new" | "enew" => Self::New,
            "e" | "edit" | "open" => Self::Edit(path_arg()),
            "w" | "write" => Self::Write,
            "saveas" | "sav" => Self::SaveAs(path_arg()),
            "q" | "quit" => Self::Quit,
            "q!" | "quit!" => Self::ForceQuit,
            "set" => {
                let arg = args
                    .first()
                    .ok_or_else(|| anyhow::anyhow!("E471: Argument required"))?;
                Self::Set(parse_setting(arg)?)
            }
            "snapshot" => Self::Snapshot,
            "embed" => Self::Embed(if args.is_empty() {
                None
            } else {
                Some(parse_embed_flags(&args)?)
            }),
            "open-link" => Self::OpenLink(
                args.first()
                    .map(|url| url.to_string())
                    .ok_or_else(|| anyhow::anyhow!("E471: Argument required"))?,
            ),
            "diff" => Self::Diff(match args.first() {
                Some(arg) => Some(
                    arg.strip_prefix("lang=")
                        .filter(|id| !id.is_empty())
                        .ok_or_else(|| anyhow::anyhow!("Unknown diff option: {}", arg))?
                        .to_string(),
                ),
                None => None,
            }),
            "preview" => Self::Preview,
            "status" => Self::Status,
            "p" | "print" => Self::Print,
            "key" => Self::Key(
                args.first()
                    .ok_or_else(|| anyhow::anyhow!("E471: Argument required"))?
                    .parse()?,
            ),
            other => return Err(anyhow::anyhow!("Not an editor command: {}", other)),
        };
        Ok(command)
    }
}

fn parse_setting(arg: &str) -> Result<Setting> {
    if let Some((key, value)) = arg.split_once('=') {
        return match key {
            "eol" | "ff" => Ok(Setting::Eol(value.parse()?)),
            "lang" | "language" | "ft" => Ok(Setting::Language(value.to_string())),
            "defaulteol" => Ok(Setting::DefaultEol(value.parse()?)),
            other => Err(anyhow::anyhow!("Unknown option: {}", other)),
        };
    }

    let (enabled, name) = match arg.strip_prefix("no") {
        Some(name) => (false, name),
        None => (true, arg),
    };
    match name {
        "number" | "nu" => Ok(Setting::LineNumbers(enabled)),
        "minimap" => Ok(Setting::Minimap(enabled)),
        "stickyscroll" => Ok(Setting::StickyScroll(enabled)),
        _ => Err(anyhow::anyhow!("Unknown option: {}", arg)),
    }
}

fn parse_embed_flags(args: &[&str]) -> Result<DisplayFlags> {
    let mut flags = DisplayFlags::default();
    for arg in args {
        match arg.to_ascii_lowercase().as_str() {
            "readonly" | "ro" => flags.read_only = true,
            "number" | "linenumbers" => flags.line_numbers = true,
            "minimap" => flags.minimap = true,
            "stickyscroll" => flags.sticky_scroll = true,
            other => return Err(anyhow::anyhow!("Unknown embed flag: {}", other)),
        }
    }
    Ok(flags)
}

fn outcome_message(outcome: Outcome, done: impl FnOnce() -> String) -> String {
    match outcome {
        Outcome::Done => done(),
        Outcome::Declined => "Kept unsaved changes".to_string(),
        Outcome::Cancelled => "Cancelled".to_string(),
        Outcome::Busy => "Another file operation is still running".to_string(),
    }
}

pub struct CommandProcessor;

impl CommandProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Handle one input line: `:`-prefixed lines are commands, anything else
    /// is appended to the buffer.
    pub async fn process_line<C, S>(
        &self,
        line: &str,
        orchestrator: &mut TerminalOrchestrator<C, S>,
    ) -> Result<String>
    where
        C: Confirm,
        S: KeyValueStorage,
    {
        match line.strip_prefix(':') {
            Some(command) => {
                let command = Command::parse(command)?;
                self.execute_command(command, orchestrator).await
            }
            None => {
                if !orchestrator.editor_mut().append_line(line) {
                    return Err(anyhow::anyhow!("Buffer is read-only"));
                }
                orchestrator.on_user_edit();
                Ok(String::new())
            }
        }
    }

    pub async fn execute_command<C, S>(
        &self,
        command: Command,
        orchestrator: &mut TerminalOrchestrator<C, S>,
    ) -> Result<String>
    where
        C: Confirm,
        S: KeyValueStorage,
    {
        log::debug!("Executing {:?}", command);
        match command {
            Command::New => {
                let outcome = orchestrator.create_new();
                Ok(outcome_message(outcome, || "New document".to_string()))
            }
            Command::Edit(path) => {
                let outcome = orchestrator.open(path.map(FsHandle::new)).await?;
                Ok(outcome_message(outcome, || {
                    format!("Opened {}", orchestrator.document().display_name())
                }))
            }
            Command::Write => {
                let outcome = orchestrator.save(false).await?;
                Ok(outcome_message(outcome, || {
                    format!("Saved {}", orchestrator.document().display_name())
                }))
            }
            Command::SaveAs(path) => {
                if let Some(path) = path {
                    orchestrator.files_mut().preset_save(path);
                }
                let outcome = orchestrator.save(true).await?;
                Ok(outcome_message(outcome, || {
                    format!("Saved {}", orchestrator.document().display_name())
                }))
            }
            Command::Quit => {
                let outcome = orchestrator.exit();
                Ok(outcome_message(outcome, || "Quitting".to_string()))
            }
            Command::ForceQuit => {
                orchestrator.quit_without_saving();
                Ok("Force quitting".to_string())
            }
            Command::Set(setting) => self.apply_setting(setting, orchestrator),
            Command::Snapshot => Ok(orchestrator
                .snapshot_link()
                .map(String::from)
                .unwrap_or_else(|| "Nothing to share, the document is empty".to_string())),
            Command::Embed(flags) => {
                let flags = flags.unwrap_or_else(|| orchestrator.display_flags());
                Ok(orchestrator
                    .embed_link(flags)
                    .map(String::from)
                    .unwrap_or_else(|| "Nothing to share, the document is empty".to_string()))
            }
            Command::OpenLink(raw) => {
                let url = Url::parse(&raw).with_context(|| format!("Invalid URL: {}", raw))?;
                let link = parse_incoming_link(&url)
                    .ok_or_else(|| anyhow::anyhow!("Not a snapshot or embed link: {}", raw))?;
                let outcome = orchestrator.load_link(link);
                Ok(outcome_message(outcome, || {
                    format!("Opened {}", orchestrator.document().display_name())
                }))
            }
            Command::Diff(language) => {
                let mut diff = orchestrator.diff_view();
                if let Some(id) = language {
                    diff.set_language(&id);
                }
                if !diff.has_changes() {
                    return Ok("No changes".to_string());
                }
                Ok(format!(
                    "Diff ({})\n{}",
                    orchestrator.languages().display_name(&diff.language_id),
                    diff.render_side_by_side(DIFF_COLUMN_WIDTH)
                ))
            }
            Command::Preview => Ok(orchestrator.preview()),
            Command::Status => Ok(orchestrator.status_bar().to_string()),
            Command::Print => Ok(orchestrator.editor().render()),
            Command::Key(chord) => match orchestrator.handle_key(&chord).await? {
                KeyDisposition::Handled => Ok(format!("Ran {}", chord)),
                KeyDisposition::PassThrough => Ok(format!("{} is not bound", chord)),
            },
        }
    }

    fn apply_setting<C, S>(
        &self,
        setting: Setting,
        orchestrator: &mut TerminalOrchestrator<C, S>,
    ) -> Result<String>
    where
        C: Confirm,
        S: KeyValueStorage,
    {
        match setting {
            Setting::Eol(eol) => {
                orchestrator.set_eol(eol);
                Ok(format!("End of line: {}", eol))
            }
            Setting::Language(id) => {
                if orchestrator.languages().get(&id).is_none() {
                    log::warn!("Unregistered language id: {}", id);
                }
                orchestrator.set_language(&id);
                Ok(format!("Language: {}", orchestrator.languages().display_name(&id)))
            }
            Setting::DefaultEol(eol) => {
                orchestrator.set_default_eol(eol)?;
                Ok(format!("Default end of line: {}", eol))
            }
            Setting::LineNumbers(enabled) => {
                orchestrator.set_view(PreferencesPatch {
                    line_numbers_enabled: Some(enabled),
                    ..Default::default()
                })?;
                Ok(toggle_message("Line numbers", enabled))
            }
            Setting::Minimap(enabled) => {
                orchestrator.set_view(PreferencesPatch {
                    minimap_enabled: Some(enabled),
                    ..Default::default()
                })?;
                Ok(toggle_message("Minimap", enabled))
            }
            Setting::StickyScroll(enabled) => {
                orchestrator.set_view(PreferencesPatch {
                    sticky_scroll_enabled: Some(enabled),
                    ..Default::default()
                })?;
                Ok(toggle_message("Sticky scroll", enabled))
            }
        }
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn toggle_message(name: &str, enabled: bool) -> String {
    format!("{} {}", name, if enabled { "on" } else { "off" })
}
