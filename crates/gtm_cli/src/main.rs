//! # gtm
//!
//! Command-line host for the campaign tracker. Each invocation opens the
//! SQLite-backed document, runs one command, and exits.
//!
//! ```bash
//! gtm --db ./campaign.sqlite3 dashboard
//! gtm add-application Acme "Staff Engineer" --status applied --applied-date 2024-01-03
//! gtm toggle deepWork
//! gtm export --out backup.json
//! ```

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gtm_core::{
    init_logging, init_stderr_logging, Application, ApplicationPatch, ApplicationStatus, Clock,
    GtmTracker, NewApplication, RhythmBlock, SettingsPatch, SystemClock, TrackerConfig,
    DEFAULT_STORAGE_KEY,
};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const DEFAULT_CLI_LOG_LEVEL: &str = "warn";
const IMPORT_REJECTED_EXIT: u8 = 2;

#[derive(Parser)]
#[command(
    name = "gtm",
    about = "Track a six-week job-search campaign from the terminal",
    version
)]
struct Cli {
    /// SQLite file holding the tracker document. Created on first use.
    #[arg(long, global = true, default_value = "./gtm-tracker.sqlite3")]
    db: PathBuf,

    /// Key the document is stored under inside the database.
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, default_value = DEFAULT_CLI_LOG_LEVEL)]
    log_level: String,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard snapshot as JSON.
    Dashboard,

    /// Print actual vs. target counts for one campaign week as JSON.
    Week {
        /// 1-based campaign week. Defaults to the current week.
        week: Option<u32>,
    },

    /// List applications, one per line.
    Applications {
        /// Only show applications in this status.
        #[arg(long, value_parser = parse_status)]
        status: Option<ApplicationStatus>,
    },

    /// Add an application and print its id.
    AddApplication {
        company: String,
        role: String,

        #[arg(long, value_parser = parse_status, default_value = "researching")]
        status: ApplicationStatus,

        /// Date the application was sent (YYYY-MM-DD).
        #[arg(long)]
        applied_date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Move an application to another status.
    SetStatus {
        id: String,

        #[arg(value_parser = parse_status)]
        status: ApplicationStatus,

        /// Also record the application date (YYYY-MM-DD).
        #[arg(long)]
        applied_date: Option<NaiveDate>,
    },

    /// Remove an application. Unknown ids are ignored.
    DeleteApplication { id: String },

    /// Flip one daily-rhythm block.
    Toggle {
        /// deepWork|applications|practice|debrief
        #[arg(value_parser = parse_block)]
        block: RhythmBlock,

        /// Day to toggle (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show settings, or change the start date and weekly targets.
    Settings {
        #[arg(long)]
        start_date: Option<NaiveDate>,

        #[arg(long)]
        applications: Option<u32>,

        #[arg(long)]
        mock_interviews: Option<u32>,

        #[arg(long)]
        drills: Option<u32>,

        #[arg(long)]
        networking: Option<u32>,
    },

    /// Write the whole document as JSON.
    Export {
        /// Output file. Prints to stdout when unset.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the whole document with a previously exported JSON file.
    Import { file: PathBuf },

    /// Reset the document to an empty campaign starting today.
    Clear {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let logging = match cli.log_dir.as_deref() {
        Some(dir) => init_logging(&cli.log_level, dir),
        None => init_stderr_logging(&cli.log_level),
    };
    logging
        .map_err(|err| anyhow!(err))
        .context("failed to initialize logging")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let config = TrackerConfig::with_storage_key(cli.storage_key);
    let tracker = GtmTracker::open_sqlite(&cli.db, clock, &config)
        .with_context(|| format!("failed to open tracker database `{}`", cli.db.display()))?;
    info!(
        "event=cli_open module=cli status=ok key={}",
        tracker.store().storage_key()
    );

    match cli.command {
        Commands::Dashboard => print_json(&tracker.dashboard())?,
        Commands::Week { week } => {
            let week = week.unwrap_or_else(|| tracker.current_week());
            print_json(&tracker.weekly_metrics(week))?;
        }
        Commands::Applications { status } => {
            for app in tracker.store().list::<Application>() {
                if status.is_some_and(|wanted| wanted != app.status) {
                    continue;
                }
                println!("{}", application_line(&app));
            }
        }
        Commands::AddApplication {
            company,
            role,
            status,
            applied_date,
            notes,
        } => {
            let id = tracker.add_application(NewApplication {
                status,
                applied_date,
                notes,
                ..NewApplication::new(company, role)
            });
            println!("{id}");
        }
        Commands::SetStatus {
            id,
            status,
            applied_date,
        } => {
            if tracker.store().get::<Application>(&id).is_none() {
                bail!("no application with id `{id}`");
            }
            tracker.update_application(
                &id,
                ApplicationPatch {
                    status: Some(status),
                    applied_date: applied_date.map(Some),
                    ..ApplicationPatch::default()
                },
            );
        }
        Commands::DeleteApplication { id } => tracker.delete_application(&id),
        Commands::Toggle { block, date } => {
            let date = date.unwrap_or_else(|| tracker.today());
            tracker.toggle_rhythm_item(date, block);
            if let Some(rhythm) = tracker.store().rhythm_for(date) {
                println!(
                    "{date} {}={} complete={}/4",
                    block.as_str(),
                    rhythm.block(block),
                    rhythm.completed_blocks()
                );
            }
        }
        Commands::Settings {
            start_date,
            applications,
            mock_interviews,
            drills,
            networking,
        } => {
            let mut targets = tracker.store().settings().weekly_targets;
            let targets_changed = applications.is_some()
                || mock_interviews.is_some()
                || drills.is_some()
                || networking.is_some();
            targets.applications = applications.unwrap_or(targets.applications);
            targets.mock_interviews = mock_interviews.unwrap_or(targets.mock_interviews);
            targets.drills = drills.unwrap_or(targets.drills);
            targets.networking = networking.unwrap_or(targets.networking);

            if start_date.is_some() || targets_changed {
                tracker.update_settings(SettingsPatch {
                    start_date,
                    weekly_targets: targets_changed.then_some(targets),
                });
            }
            print_json(&tracker.store().settings())?;
        }
        Commands::Export { out } => {
            let json = tracker.export_data();
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write `{}`", path.display()))?,
                None => println!("{json}"),
            }
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            if !tracker.import_data(&json) {
                eprintln!(
                    "import rejected: `{}` is not a tracker export; nothing was changed",
                    file.display()
                );
                return Ok(ExitCode::from(IMPORT_REJECTED_EXIT));
            }
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to clear all data without --yes");
            }
            tracker.clear_all_data();
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    println!("{json}");
    Ok(())
}

fn application_line(app: &Application) -> String {
    let applied = app
        .applied_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\t{}\t{}\t{}\t{}",
        app.id,
        app.status.as_str(),
        applied,
        app.company,
        app.role
    )
}

fn parse_status(value: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::parse(value).ok_or_else(|| {
        let known: Vec<&str> = ApplicationStatus::ALL
            .iter()
            .map(|status| status.as_str())
            .collect();
        format!("unknown status `{value}`; expected {}", known.join("|"))
    })
}

fn parse_block(value: &str) -> Result<RhythmBlock, String> {
    RhythmBlock::parse(value).ok_or_else(|| {
        format!("unknown block `{value}`; expected deepWork|applications|practice|debrief")
    })
}

#[cfg(test)]
mod tests {
    use super::{application_line, parse_block, parse_status, Cli, Commands};
    use chrono::{NaiveDate, TimeZone, Utc};
    use clap::{CommandFactory, Parser};
    use gtm_core::{Application, ApplicationStatus, NewApplication, Record, RhythmBlock};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gtm",
            "add-application",
            "Acme",
            "SRE",
            "--status",
            "Applied",
            "--applied-date",
            "2024-01-03",
            "--db",
            "/tmp/x.sqlite3",
        ])
        .unwrap();

        assert_eq!(cli.db.to_str(), Some("/tmp/x.sqlite3"));
        match cli.command {
            Commands::AddApplication {
                status,
                applied_date,
                ..
            } => {
                assert_eq!(status, ApplicationStatus::Applied);
                assert_eq!(applied_date, NaiveDate::from_ymd_opt(2024, 1, 3));
            }
            _ => panic!("expected add-application"),
        }
    }

    #[test]
    fn rejects_unknown_status_and_block() {
        assert!(parse_status("ghosted").unwrap_err().contains("researching|applied"));
        assert!(parse_block("nap").is_err());
        assert_eq!(parse_block("deep-work"), Ok(RhythmBlock::DeepWork));
        assert!(Cli::try_parse_from(["gtm", "toggle", "nap"]).is_err());
    }

    #[test]
    fn application_line_marks_missing_applied_date() {
        let app = Application::create(
            "a1".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            NewApplication::new("Acme", "SRE"),
        );
        assert_eq!(application_line(&app), "a1\tresearching\t-\tAcme\tSRE");
    }
}
