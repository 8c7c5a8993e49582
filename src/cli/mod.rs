pub mod render;

use std::{io::Write as _, path::PathBuf, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use render::{format_local, print_epics};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::level_filters::LevelFilter;

use crate::{
    config::Preferences,
    locale::{Locale, Messages},
    storage::kv::FileKvStore,
    tracker::{
        error::TrackerError,
        filter::filter_epics,
        migrate::{MigrationStatus, SchemaMigrator},
        session::{DiscardConfirmation, StartOutcome},
        FinishOutcome, Tracker,
    },
    utils::{
        clock::DefaultClock, dir::create_application_default_path, logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Epiclog", version, long_about = None)]
#[command(about = "Track work on epics and log finished sessions into your calendar", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Display language, overrides the configured one")]
    locale: Option<Locale>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Add a new epic. Text after the first / becomes the description")]
    Add { input: String },
    #[command(about = "List epics, filtered by an optional query. The query splits on / like add input")]
    List { query: Option<String> },
    #[command(about = "Replace the description of an epic. The name never changes")]
    Edit { name: String, input: String },
    #[command(about = "Delete an epic. An ongoing session on it keeps running")]
    Delete { name: String },
    #[command(about = "Start working on an epic")]
    Start {
        name: String,
        #[arg(long, help = "Discard ongoing work on another epic without asking")]
        discard: bool,
    },
    #[command(about = "Finish working and print the calendar link for the session")]
    Stop {},
    #[command(about = "Abandon the ongoing session without recording it")]
    Discard {},
    #[command(about = "Show the ongoing session")]
    Status {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_dir = args.dir.map_or_else(create_application_default_path, Ok)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&application_dir, logging_level, args.log)?;

    let mut preferences = Preferences::load(&application_dir)?;
    if let Some(locale) = args.locale {
        preferences.locale = locale;
    }
    let messages = Messages::new(preferences.locale);

    let storage = Arc::new(FileKvStore::new(application_dir.join("kv"))?);

    // The keyed layout has to exist before anything reads through the store.
    let mut migrator = SchemaMigrator::new(storage.clone(), application_dir.clone());
    if migrator.check().await? == MigrationStatus::Needed {
        println!("{}", messages.setting_up());
    }
    migrator.run().await?;

    let mut tracker = Tracker::load(storage, Box::new(DefaultClock)).await?;

    match args.command {
        Commands::Add { input } => add_epic(&mut tracker, &messages, &input).await,
        Commands::List { query } => {
            let view = filter_epics(
                tracker.epics.epics(),
                query.as_deref().unwrap_or(""),
                tracker.active_epic_name(),
            );
            print_epics(&view, tracker.active_epic_name());
            Ok(())
        }
        Commands::Edit { name, input } => {
            if tracker.epics.update(&name, &input).await? {
                println!("{}", messages.epic_updated(&name));
            } else {
                println!("{}", messages.epic_missing(&name));
            }
            Ok(())
        }
        Commands::Delete { name } => {
            if tracker.epics.delete(&name).await? {
                println!("{}", messages.epic_deleted(&name));
            } else {
                println!("{}", messages.epic_missing(&name));
            }
            Ok(())
        }
        Commands::Start { name, discard } => {
            start_epic(&mut tracker, &messages, &name, discard).await
        }
        Commands::Stop {} => stop_epic(&mut tracker, &messages, &preferences).await,
        Commands::Discard {} => {
            match tracker.finish_work(false, "").await? {
                FinishOutcome::Idle => println!("{}", messages.nothing_in_progress()),
                _ => println!("{}", messages.session_discarded()),
            }
            Ok(())
        }
        Commands::Status {} => {
            match tracker.session.active() {
                Some(session) => {
                    let started = session.started_at.map(format_local).unwrap_or_default();
                    let minutes = tracker.elapsed_minutes().unwrap_or(0);
                    println!(
                        "{}",
                        messages.status_line(&session.epic_name, &started, minutes)
                    );
                }
                None => println!("{}", messages.nothing_in_progress()),
            }
            Ok(())
        }
    }
}

async fn add_epic(
    tracker: &mut Tracker<Arc<FileKvStore>>,
    messages: &Messages,
    input: &str,
) -> Result<()> {
    match tracker.epics.add(input).await {
        Ok(()) => {
            let added = tracker.epics.epics().last().expect("epic was just added");
            println!("{}", messages.epic_added(&added.name));
            Ok(())
        }
        Err(e) => match e.downcast_ref::<TrackerError>() {
            Some(TrackerError::DuplicateName(name)) => {
                println!("{}", messages.duplicate_name(name));
                Ok(())
            }
            Some(TrackerError::EmptyName) => {
                println!("{}", messages.empty_name());
                Ok(())
            }
            _ => Err(e),
        },
    }
}

async fn start_epic(
    tracker: &mut Tracker<Arc<FileKvStore>>,
    messages: &Messages,
    name: &str,
    discard: bool,
) -> Result<()> {
    let outcome = if discard {
        tracker.start_work(name, &AlwaysConfirm).await?
    } else {
        tracker
            .start_work(name, &PromptConfirmation(*messages))
            .await?
    };
    match outcome {
        StartOutcome::Started => println!("{}", messages.work_started(name)),
        StartOutcome::AlreadyActive => println!("{}", messages.already_working(name)),
        StartOutcome::Cancelled => println!("{}", messages.start_cancelled()),
    }
    Ok(())
}

async fn stop_epic(
    tracker: &mut Tracker<Arc<FileKvStore>>,
    messages: &Messages,
    preferences: &Preferences,
) -> Result<()> {
    match tracker
        .finish_work(true, &preferences.template_event_url)
        .await
    {
        Ok(FinishOutcome::Recorded(record)) => {
            println!("{}", messages.working_time(record.duration_minutes));
            println!("{}", record.calendar_url);
            Ok(())
        }
        Ok(_) => {
            println!("{}", messages.nothing_in_progress());
            Ok(())
        }
        Err(e) if matches!(
            e.downcast_ref::<TrackerError>(),
            Some(TrackerError::MissingStartTimestamp)
        ) =>
        {
            // The session is cleared anyway, only the recording failed.
            println!("{}", messages.record_failed());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Interactive y/n prompt on the terminal.
struct PromptConfirmation(Messages);

#[async_trait]
impl DiscardConfirmation for PromptConfirmation {
    async fn confirm_discard(&self) -> Result<bool> {
        print!("{} [y/N] ", self.0.discard_prompt());
        std::io::stdout().flush()?;
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        Ok(matches!(line.trim(), "y" | "Y" | "yes"))
    }
}

/// Used when `--discard` pre-confirms the prompt.
struct AlwaysConfirm;

#[async_trait]
impl DiscardConfirmation for AlwaysConfirm {
    async fn confirm_discard(&self) -> Result<bool> {
        Ok(true)
    }
}
