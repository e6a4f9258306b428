//! Swiss tournament CLI
//!
//! Thin driver over a SQLite-backed tournament. The database path comes from
//! `--db PATH`, then `SWISS_DB`, then `tournament.db`. Set `RUST_LOG=debug`
//! to see store writes.

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use swisspair::{
    persist::{decode_snapshot, encode_snapshot},
    tournament::Tournament,
    types::PlayerId,
};

const DEFAULT_DB: &str = "tournament.db";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Register(Vec<String>),
    Report { winner: PlayerId, loser: PlayerId },
    Standings { json: bool },
    Pairings { json: bool },
    Count,
    ResetMatches,
    ResetPlayers,
    Export,
    Import(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    db: Option<String>,
    command: Option<Command>,
}

fn print_usage() {
    println!("Swiss tournament manager");
    println!();
    println!("Usage:");
    println!("  swiss [--db PATH] register <name>...");
    println!("  swiss [--db PATH] report <winner-id> <loser-id>");
    println!("  swiss [--db PATH] standings [--json]");
    println!("  swiss [--db PATH] pairings [--json]");
    println!("  swiss [--db PATH] count");
    println!("  swiss [--db PATH] reset-matches");
    println!("  swiss [--db PATH] reset-players");
    println!("  swiss [--db PATH] export");
    println!("  swiss [--db PATH] import <snapshot.json>");
}

fn parse_id(arg: Option<&String>, what: &str) -> Result<PlayerId, Box<dyn Error>> {
    let raw = arg.ok_or_else(|| format!("missing {what} id"))?;
    raw.parse::<PlayerId>()
        .map_err(|e| format!("invalid {what} id {raw:?}: {e}").into())
}

/// `--json` is an option of the listing commands only; anywhere else it is
/// an ordinary argument.
fn parse_json_flag(command: &str, rest: &[String]) -> Result<bool, Box<dyn Error>> {
    match rest {
        [] => Ok(false),
        [flag] if flag == "--json" => Ok(true),
        [other, ..] => Err(format!("{command}: unexpected argument {other:?}").into()),
    }
}

fn parse_args(mut args: Vec<String>) -> Result<Invocation, Box<dyn Error>> {
    let mut db = None;
    if args.first().map(String::as_str) == Some("--db") {
        if args.len() < 2 {
            return Err("--db requires a path".into());
        }
        db = Some(args.remove(1));
        args.remove(0);
    }

    let Some((command, rest)) = args.split_first() else {
        return Ok(Invocation { db, command: None });
    };

    let command = match command.as_str() {
        "register" => {
            if rest.is_empty() {
                return Err("register requires at least one name".into());
            }
            Command::Register(rest.to_vec())
        }
        "report" => Command::Report {
            winner: parse_id(rest.first(), "winner")?,
            loser: parse_id(rest.get(1), "loser")?,
        },
        "standings" => Command::Standings {
            json: parse_json_flag(command, rest)?,
        },
        "pairings" => Command::Pairings {
            json: parse_json_flag(command, rest)?,
        },
        "count" => Command::Count,
        "reset-matches" => Command::ResetMatches,
        "reset-players" => Command::ResetPlayers,
        "export" => Command::Export,
        "import" => {
            let file = rest.first().ok_or("import requires a snapshot file")?;
            Command::Import(PathBuf::from(file))
        }
        other => {
            print_usage();
            return Err(format!("unknown command: {other}").into());
        }
    };

    Ok(Invocation {
        db,
        command: Some(command),
    })
}

fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let invocation = parse_args(args)?;
    let Some(command) = invocation.command else {
        print_usage();
        return Ok(());
    };
    let db_path = invocation
        .db
        .or_else(|| env::var("SWISS_DB").ok())
        .unwrap_or_else(|| DEFAULT_DB.to_string());

    log::info!("using database {db_path}");
    let mut tournament = Tournament::open(&db_path)?;

    match command {
        Command::Register(names) => {
            for name in &names {
                let id = tournament.register_player(name)?;
                println!("{id}\t{name}");
            }
        }
        Command::Report { winner, loser } => {
            let match_id = tournament.report_match(winner, loser)?;
            println!("match {match_id} recorded");
        }
        Command::Standings { json } => {
            let standings = tournament.compute_standings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                println!("{:>4}  {:<24} {:>4} {:>7}", "id", "name", "wins", "matches");
                for entry in &standings {
                    println!(
                        "{:>4}  {:<24} {:>4} {:>7}",
                        entry.id, entry.name, entry.wins, entry.matches
                    );
                }
            }
        }
        Command::Pairings { json } => {
            let pairings = tournament.generate_pairings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pairings)?);
            } else {
                for p in &pairings {
                    println!(
                        "{} ({}) vs {} ({})",
                        p.first.name, p.first.id, p.second.name, p.second.id
                    );
                }
            }
        }
        Command::Count => println!("{}", tournament.count_players()?),
        Command::ResetMatches => tournament.reset_matches()?,
        Command::ResetPlayers => tournament.reset_players()?,
        Command::Export => {
            let payload = encode_snapshot(&tournament.export_snapshot()?)?;
            println!("{}", String::from_utf8(payload)?);
        }
        Command::Import(file) => {
            let snapshot = decode_snapshot(&std::fs::read(&file)?)?;
            let mut store = tournament.into_store();
            store.import_snapshot(&snapshot)?;
            tournament = Tournament::new(store);
            println!(
                "imported {} players, {} match records",
                snapshot.players.len(),
                snapshot.records.len()
            );
        }
    }

    tournament.close()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
