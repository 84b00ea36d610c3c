use clap::Parser;

use trackflow::cli::{self, Commands, SystemCli};
use trackflow::config::Config;
use trackflow::core::error::TrackError;
use trackflow::core::storage::FileStore;
use trackflow::core::tracker::Tracker;
use trackflow::{logging, repl, tui};

fn main() {
    let args = SystemCli::parse();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: SystemCli) -> Result<(), TrackError> {
    let uses_terminal = matches!(args.command, None | Some(Commands::Tui));
    let config = Config::from_args(&args.global, !uses_terminal);
    logging::init(&config)?;

    let mut tracker = Tracker::open(FileStore::new(&config.data_dir));

    match args.command {
        None | Some(Commands::Tui) => tui::run(&mut tracker),
        Some(Commands::Repl) => repl::run(&mut tracker),
        Some(command) => {
            for line in cli::execute(&mut tracker, command)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}
