use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::error::TrackError;
use crate::core::form::{today, JobForm};
use crate::core::formatter::{format_board, format_record, format_stage_list, format_stats, format_table};
use crate::core::stage::StageId;
use crate::core::stats::summarize;
use crate::core::storage::KeyValueStore;
use crate::core::store::Theme;
use crate::core::tracker::Tracker;
use crate::core::view::{derive_view, SortDirection, SortKey, SortSpec};

const STATS_BAR_WIDTH: usize = 30;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding saved jobs, theme and the log file
    #[arg(long, value_name = "DIR", env = "TRACKFLOW_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `trackflow=trace`
    #[arg(long, value_name = "LEVEL", env = "TRACKFLOW_LOG", default_value = "info", global = true)]
    pub log_level: String,
    /// Mirror logs to stderr (ignored by the terminal UI)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(name = "trackflow", version, about = "Job application tracker")]
pub struct SystemCli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Command language typed into the REPL and the TUI input line.
#[derive(Debug, Parser)]
#[command(name = "trackflow", version, about = "Job application tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add an application
    Add(AddArgs),
    /// Edit an application; omitted fields keep their value
    Edit(EditArgs),
    /// Move an application to another stage
    Move(MoveArgs),
    /// Delete an application
    #[command(alias = "delete")]
    Rm(IdArgs),
    /// Show one application in full
    Show(IdArgs),
    /// Filtered, sortable table
    #[command(alias = "ls")]
    List(ListArgs),
    /// Kanban columns
    Board(BoardArgs),
    /// Pipeline analytics
    Stats,
    /// List the pipeline stages
    Stages,
    /// Show or change the colour theme
    Theme(ThemeArgs),
    /// Start the terminal UI
    Tui,
    /// Start the line REPL
    Repl,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub role: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub salary: String,
    #[arg(long, default_value_t = StageId::Wishlist)]
    pub status: StageId,
    /// Applied date (yyyy-mm-dd), defaults to today
    #[arg(long = "date")]
    pub applied_date: Option<String>,
    #[arg(long, default_value = "")]
    pub url: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub status: Option<StageId>,
    #[arg(long = "date")]
    pub applied_date: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub id: String,
    pub status: StageId,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "")]
    pub query: String,
    /// company, role, location, salary, status, appliedDate, url or notes
    #[arg(short, long)]
    pub sort: Option<SortKey>,
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct BoardArgs {
    #[arg(short, long, default_value = "")]
    pub query: String,
}

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[arg(value_enum)]
    pub choice: Option<ThemeChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

impl AddArgs {
    pub fn into_form(self) -> JobForm {
        JobForm {
            company: self.company,
            role: self.role,
            location: self.location,
            salary: self.salary,
            status: self.status,
            applied_date: self.applied_date.unwrap_or_else(today),
            url: self.url,
            notes: self.notes,
        }
    }
}

impl EditArgs {
    /// Overlays the given fields on `form`.
    pub fn apply(self, mut form: JobForm) -> JobForm {
        if let Some(company) = self.company {
            form.company = company;
        }
        if let Some(role) = self.role {
            form.role = role;
        }
        if let Some(location) = self.location {
            form.location = location;
        }
        if let Some(salary) = self.salary {
            form.salary = salary;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(applied_date) = self.applied_date {
            form.applied_date = applied_date;
        }
        if let Some(url) = self.url {
            form.url = url;
        }
        if let Some(notes) = self.notes {
            form.notes = notes;
        }
        form
    }
}

impl ListArgs {
    pub fn sort_spec(&self) -> SortSpec {
        match self.sort {
            Some(key) if self.desc => SortSpec::by(key, SortDirection::Desc),
            Some(key) => SortSpec::by(key, SortDirection::Asc),
            None => SortSpec::default(),
        }
    }
}

pub fn parse_line(line: &str) -> Result<Commands, TrackError> {
    let mut argv = Vec::new();
    argv.push("trackflow".to_string());

    let tokens = shell_words::split(line).map_err(|err| TrackError::InvalidCommand {
        message: err.to_string(),
    })?;
    argv.extend(tokens);

    let parsed = Cli::try_parse_from(argv).map_err(|err| TrackError::InvalidCommand {
        message: err.to_string().trim_end().to_string(),
    })?;
    Ok(parsed.command)
}

/// Runs one command against the tracker and returns the lines to show.
pub fn execute<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    command: Commands,
) -> Result<Vec<String>, TrackError> {
    match command {
        Commands::Add(args) => {
            let form = args.into_form();
            let summary = format!("{} at {} ({})", form.role, form.company, form.status.label());
            let id = tracker.create(form)?;
            Ok(vec![format!("Added [{id}] {summary}")])
        }
        Commands::Edit(args) => {
            let id = args.id.clone();
            let Some(current) = tracker.find(&id) else {
                return Ok(vec![not_found(&id)]);
            };
            let form = args.apply(JobForm::from_record(current));
            tracker.update(&id, form)?;
            Ok(vec![format!("Updated [{id}]")])
        }
        Commands::Move(args) => {
            if tracker.set_status(&args.id, args.status)? {
                Ok(vec![format!("Moved [{}] to {}", args.id, args.status.label())])
            } else {
                Ok(vec![not_found(&args.id)])
            }
        }
        Commands::Rm(args) => {
            if tracker.delete(&args.id)? {
                Ok(vec![format!("Deleted [{}]", args.id)])
            } else {
                Ok(vec![not_found(&args.id)])
            }
        }
        Commands::Show(args) => Ok(tracker
            .find(&args.id)
            .map(format_record)
            .unwrap_or_else(|| vec![not_found(&args.id)])),
        Commands::List(args) => {
            let sort = args.sort_spec();
            let view = derive_view(tracker.jobs(), &args.query, sort);
            Ok(format_table(&view, sort))
        }
        Commands::Board(args) => {
            let view = derive_view(tracker.jobs(), &args.query, SortSpec::default());
            Ok(format_board(&view))
        }
        Commands::Stats => Ok(format_stats(&summarize(tracker.jobs()), STATS_BAR_WIDTH)),
        Commands::Stages => Ok(vec![format_stage_list()]),
        Commands::Theme(args) => {
            let theme = match args.choice {
                None => return Ok(vec![format!("Theme: {}", tracker.theme())]),
                Some(ThemeChoice::Light) => tracker.set_theme(Theme::Light)?,
                Some(ThemeChoice::Dark) => tracker.set_theme(Theme::Dark)?,
                Some(ThemeChoice::Toggle) => tracker.toggle_theme()?,
            };
            Ok(vec![format!("Theme set to {theme}")])
        }
        Commands::Tui | Commands::Repl => Err(TrackError::InvalidCommand {
            message: "already in an interactive session".to_string(),
        }),
    }
}

fn not_found(id: &str) -> String {
    format!("No application with id '{id}'")
}

pub const HELP_LINES: [&str; 12] = [
    "Commands:",
    "  add --company <C> --role <R> [--location ..] [--salary ..] [--status ..] [--date yyyy-mm-dd] [--url ..] [--notes ..]",
    "  edit <id> [--company ..] [--role ..] [--status ..] ...",
    "  move <id> <stage>",
    "  rm <id>",
    "  show <id>",
    "  list [--query <text>] [--sort <field>] [--desc]",
    "  board [--query <text>]",
    "  stats",
    "  stages",
    "  theme [light|dark|toggle]",
    "  help / clear / exit",
];
