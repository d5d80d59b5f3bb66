//! Letter-pair drill CLI.
//!
//! ```text
//! bld-drill partition --table "Bld Pairs.csv" --out groups/
//! bld-drill groups --dir groups/ --json
//! bld-drill drill --dir groups/ --n-master 3
//! bld-drill edges --seed 7
//! ```
//!
//! Diagnostics go to stderr through `tracing` (`RUST_LOG=debug` for detail);
//! stdout carries only the drill itself.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bld_pair_drill::drill_engine::{
    groups::{discover_groups, load_entries, prompt_selection, write_groups},
    log::{open_session_log, LogKind, LogRow},
};
use bld_pair_drill::{
    partition, Console, DrillConfig, DrillRecord, DrillSession, EdgeQuiz, EdgeRecord, EdgeScheme,
    NullLog, RawTable, RngPicker, SessionLogger, StdConsole,
};

#[derive(Parser, Debug)]
#[command(name = "bld-drill", about = "Blindfolded letter-pair and edge drills", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a letter-pair sheet (CSV matrix) into group files
    Partition {
        /// Sheet with column letters in the header and row letters in column one
        #[arg(short, long)]
        table: PathBuf,
        /// Directory receiving bld_pairs_<group>.csv files
        #[arg(short, long, default_value = "groups")]
        out: PathBuf,
    },

    /// List the group files in a directory
    Groups {
        #[arg(short, long, default_value = "groups")]
        dir: PathBuf,
        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Drill selected groups until every pair is mastered
    Drill {
        #[arg(short, long, default_value = "groups")]
        dir: PathBuf,
        #[command(flatten)]
        session: SessionArgs,
        /// Number of correct answers in a row required for mastery
        #[arg(long)]
        n_master: Option<u32>,
    },

    /// Name the memo letter of random edge stickers
    Edges {
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(clap::Args, Debug)]
struct SessionArgs {
    /// Disable logging for this session
    #[arg(long)]
    no_log: bool,
    /// Directory for session logs
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// RNG seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
}

impl SessionArgs {
    fn apply(&self, config: &mut DrillConfig) {
        if self.no_log {
            config.logging_enabled = false;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DrillConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(DrillConfig::from_file(path)?),
        None => Ok(DrillConfig::default()),
    }
}

/// CSV log under the configured directory, or a no-op when logging is off
/// or the log file cannot be opened.
fn open_log<R, C>(config: &DrillConfig, kind: LogKind, console: &mut C) -> Box<dyn SessionLogger<R>>
where
    R: LogRow + 'static,
    C: Console,
{
    if !config.logging_enabled {
        console.say("Logging is disabled for this session.");
        return Box::new(NullLog);
    }
    let (log, path) = open_session_log::<R>(&config.log_dir, kind);
    match path {
        Some(path) => console.say(&format!("Logging this session to: {}", path.display())),
        None => console.say("Could not open a session log; continuing without logging."),
    }
    log
}

fn run_partition(config: &DrillConfig, table: &Path, out: &Path) -> Result<(), Box<dyn Error>> {
    let sheet = RawTable::from_csv_path(table)?;
    let groups = partition(&sheet, &config.partition.options());
    let paths = write_groups(out, &groups)?;
    for (group, path) in groups.iter().zip(&paths) {
        println!("{:>2}  {:>3} pairs  {}", group.name.label(), group.len(), path.display());
    }
    Ok(())
}

fn run_groups(dir: &Path, as_json: bool) -> Result<(), Box<dyn Error>> {
    let found = discover_groups(dir)?;
    let mut listing = Vec::with_capacity(found.len());
    for (name, path) in &found {
        let entries = load_entries([path.as_path()])?;
        listing.push((name, entries.len(), path));
    }

    if as_json {
        let body: Vec<_> = listing
            .iter()
            .map(|(name, count, path)| json!({ "group": name.label(), "pairs": count, "path": path }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        for (name, count, path) in listing {
            println!("{:>2}  {:>3} pairs  {}", name.label(), count, path.display());
        }
    }
    Ok(())
}

fn run_drill(config: &DrillConfig, dir: &Path) -> Result<(), Box<dyn Error>> {
    let available = discover_groups(dir)?;
    let mut console = StdConsole::stdio();

    console.say(&format!("Mastery requires {} correct answers", config.mastery_threshold));
    let mut log = open_log::<DrillRecord, _>(config, LogKind::LetterPairs, &mut console);

    while let Some(picked) = prompt_selection(&mut console, &available)? {
        let labels: Vec<String> = picked.iter().map(|n| n.label()).collect();
        console.say(&format!("Drilling groups: {}", labels.join(", ")));

        let entries = load_entries(picked.iter().filter_map(|n| available.get(n)).map(PathBuf::as_path))?;
        let mut session = DrillSession::new(
            entries,
            config.mastery_threshold,
            RngPicker::from_seed_option(config.seed),
        )?;
        let outcome = session.run(&mut console, &mut *log)?;
        info!(groups = %labels.join(" "), rounds = outcome.rounds, status = %outcome.status, "Drill finished");
    }
    Ok(())
}

fn run_edges(config: &DrillConfig) -> Result<(), Box<dyn Error>> {
    let mut console = StdConsole::stdio();
    let mut log = open_log::<EdgeRecord, _>(config, LogKind::Edges, &mut console);
    let mut quiz = EdgeQuiz::new(EdgeScheme::speffz(), RngPicker::from_seed_option(config.seed))?;
    let tally = quiz.run(&mut console, &mut *log)?;
    if let Some(accuracy) = tally.accuracy() {
        console.say(&format!("Accuracy: {:.1}%", accuracy * 100.0));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Partition { table, out } => run_partition(&config, table, out),
        Command::Groups { dir, json } => run_groups(dir, *json),
        Command::Drill { dir, session, n_master } => {
            session.apply(&mut config);
            if let Some(n) = n_master {
                config.mastery_threshold = *n;
            }
            config.validate()?;
            run_drill(&config, dir)
        }
        Command::Edges { session } => {
            session.apply(&mut config);
            run_edges(&config)
        }
    }
}
