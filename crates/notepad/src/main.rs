use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::PathBuf;
use url::Url;

use notepad::config::{CliCommand, PrefsAction};
use notepad::fs_access::{playground_from_files, FsFileAccess, FsHandle};
use notepad::prefs::PreferencesPatch;
use notepad::prompt::{self, StdinConfirm};
use notepad::status::StatusManager;
use notepad::{
    parse_incoming_link, CommandProcessor, Config, EditorSurface, FileHandle, FileStorage,
    LanguageRegistry, LinkBuilder, Orchestrator, Outcome, PreferencesStore, TerminalOrchestrator,
};

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("notepad", LevelFilter::Debug);
    }
    logger.init();

    let config = Config::from_args_and_env();
    let result = run(config).await;
    if let Err(ref e) = result {
        log::error!("Application error: {:#}", e);
    }
    result
}

async fn run(config: Config) -> Result<()> {
    match config.command.clone() {
        CliCommand::Edit { file } => run_editor(&config, file).await,
        CliCommand::Snapshot { file } => {
            let mut orchestrator = open_headless(&config, file).await?;
            let link = orchestrator
                .snapshot_link()
                .context("Nothing to share, the file is empty")?;
            println!("{}", link);
            Ok(())
        }
        CliCommand::Embed { file, .. } => {
            let flags = config.command.embed_flags().unwrap_or_default();
            let mut orchestrator = open_headless(&config, file).await?;
            let link = orchestrator
                .embed_link(flags)
                .context("Nothing to share, the file is empty")?;
            println!("{}", link);
            Ok(())
        }
        CliCommand::Restore { url, output } => {
            let parsed = Url::parse(&url).with_context(|| format!("Invalid URL: {}", url))?;
            let link = parse_incoming_link(&parsed)
                .with_context(|| format!("Not a snapshot or embed link: {}", url))?;
            log::info!("Restored {} bytes of {}", link.content.len(), link.language_id);
            match output {
                Some(path) => FsHandle::new(path).write_text(&link.content).await?,
                None => print!("{}", link.content),
            }
            Ok(())
        }
        CliCommand::Preview { file, language } => {
            let handle = FsHandle::new(file);
            let content = handle.read_text().await?;
            let language = language.unwrap_or_else(|| {
                LanguageRegistry::builtin()
                    .classify(None, handle.name())
                    .to_string()
            });
            let kind = preview::PreviewKind::from_language_id(&language);
            print!("{}", preview::render(kind, &content));
            Ok(())
        }
        CliCommand::Playground {
            html,
            css,
            js,
            output,
        } => {
            let doc =
                playground_from_files(html.as_deref(), css.as_deref(), js.as_deref()).await?;
            match output {
                Some(path) => FsHandle::new(path).write_text(&doc).await?,
                None => print!("{}", doc),
            }
            Ok(())
        }
        CliCommand::Prefs { action } => {
            let mut store = open_preferences(&config)?;
            if let Some(PrefsAction::Set { key, value }) = action {
                store.set(PreferencesPatch::from_key_value(&key, &value)?)?;
            }
            println!("# {}", store.storage().path().display());
            for (key, value) in store.get().entries() {
                println!("{} = {}", key, value);
            }
            Ok(())
        }
        CliCommand::Handlers => {
            let manifest = LanguageRegistry::builtin().file_handler_manifest();
            println!("{}", serde_json::to_string_pretty(&manifest)?);
            Ok(())
        }
    }
}

fn open_preferences(config: &Config) -> Result<PreferencesStore<FileStorage>> {
    let path = config
        .prefs_path
        .clone()
        .context("No configuration directory found, set NOTEPAD_PREFS_PATH")?;
    PreferencesStore::open(FileStorage::open(path)?)
}

fn build_orchestrator(
    config: &Config,
    files: FsFileAccess,
) -> Result<TerminalOrchestrator<StdinConfirm, FileStorage>> {
    let links = LinkBuilder::new(&config.base_url)?;
    Ok(Orchestrator::new(
        notepad::BufferSurface::new(),
        files,
        StdinConfirm,
        open_preferences(config)?,
        links,
    ))
}

async fn open_headless(
    config: &Config,
    file: PathBuf,
) -> Result<TerminalOrchestrator<StdinConfirm, FileStorage>> {
    let mut orchestrator = build_orchestrator(config, FsFileAccess::non_interactive())?;
    orchestrator.open(Some(FsHandle::new(file))).await?;
    Ok(orchestrator)
}

async fn run_editor(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let mut orchestrator = build_orchestrator(config, FsFileAccess::interactive())?;
    let processor = CommandProcessor::new();
    let mut status = StatusManager::new();

    match file {
        Some(path) => match orchestrator.open(Some(FsHandle::new(&path))).await {
            Ok(Outcome::Done) => status.set_success(format!("Opened {}", path.display())),
            Ok(_) => status.set_warning(format!("Did not open {}", path.display())),
            Err(e) => {
                log::error!("Failed to load file '{}': {:#}", path.display(), e);
                status.set_error(format!("{:#}", e));
            }
        },
        None => log::info!("No file specified, starting with empty buffer"),
    }

    println!("Type text to append lines, :w to save, :q to quit.");
    while !orchestrator.should_quit() {
        status.update();
        if let Some(message) = status.take() {
            println!("{}", message);
        }

        let label = format!("{}> ", orchestrator.editor().title());
        let line = tokio::task::spawn_blocking(move || prompt::read_line(&label)).await??;
        let Some(line) = line else {
            // End of input acts like :q, but cannot be declined
            if orchestrator.exit() != Outcome::Done {
                status.set_warning("Input closed, unsaved changes were discarded");
            }
            break;
        };

        match processor.process_line(&line, &mut orchestrator).await {
            Ok(message) if message.is_empty() => {}
            Ok(message) if message.contains('\n') => print!("{}", message),
            Ok(message) if message.starts_with("Saved ") => status.set_success(message),
            Ok(message) => status.set_info(message),
            Err(e) => {
                log::error!("Command error: {:#}", e);
                status.set_error(format!("{:#}", e));
            }
        }
    }

    if let Some(message) = status.take() {
        println!("{}", message);
    }
    log::info!("Editor closed ({} characters)", orchestrator.editor().character_count());
    Ok(())
}
