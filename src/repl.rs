use std::io::{self, BufRead, Write};

use crate::cli::{self, HELP_LINES};
use crate::core::error::TrackError;
use crate::core::storage::KeyValueStore;
use crate::core::tracker::Tracker;

pub fn run<S: KeyValueStore>(tracker: &mut Tracker<S>) -> Result<(), TrackError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with(tracker, stdin.lock(), &mut stdout)
}

fn run_with<S, R, W>(tracker: &mut Tracker<S>, mut input: R, out: &mut W) -> Result<(), TrackError>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    let io_err = |e: io::Error| TrackError::Terminal {
        message: e.to_string(),
    };
    let mut line = String::new();

    loop {
        line.clear();
        write!(out, "trackflow> ").map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let bytes_read = input.read_line(&mut line).map_err(io_err)?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        if trimmed.eq_ignore_ascii_case("help") {
            for help in HELP_LINES {
                writeln!(out, "{help}").map_err(io_err)?;
            }
            continue;
        }

        if trimmed.eq_ignore_ascii_case("clear") {
            write!(out, "\x1b[2J\x1b[H").map_err(io_err)?;
            continue;
        }

        let result = cli::parse_line(trimmed).and_then(|command| cli::execute(tracker, command));
        match result {
            Ok(lines) => {
                for output in lines {
                    writeln!(out, "{output}").map_err(io_err)?;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, line = trimmed, "repl command failed");
                writeln!(out, "error: {err}").map_err(io_err)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stage::StageId;
    use crate::core::storage::MemoryStore;

    fn session(script: &str) -> (Tracker<MemoryStore>, String) {
        let mut tracker = Tracker::open(MemoryStore::new());
        let mut out = Vec::new();
        run_with(&mut tracker, script.as_bytes(), &mut out).unwrap();
        (tracker, String::from_utf8(out).unwrap())
    }

    #[test]
    fn runs_commands_until_exit() {
        let (tracker, out) = session("move 1 offer\nrm 2\nexit\nrm 1\n");
        assert_eq!(tracker.jobs().len(), 1);
        assert_eq!(tracker.find("1").unwrap().status, StageId::Offer);
        assert!(out.contains("Moved [1] to Offer"));
        assert!(out.contains("Deleted [2]"));
    }

    #[test]
    fn reports_errors_and_keeps_going() {
        let (tracker, out) = session("move 1 hired\n\nadd --company X --role ''\nmove 2 rejected\n");
        assert!(out.contains("error: invalid command"));
        assert!(out.contains("error: invalid role"));
        assert_eq!(tracker.find("2").unwrap().status, StageId::Rejected);
    }

    #[test]
    fn prints_help() {
        let (_, out) = session("help\n");
        assert!(out.contains("theme [light|dark|toggle]"));
    }
}
