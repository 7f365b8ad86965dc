//! Command-line interface for the retrosheet decipher
//!
//! Usage:
//!   retrosheet decipher `<path>` [--format csv|json] [--table plays] [--config `<file>`]
//!                                   - Decipher an event file, one table to stdout
//!   retrosheet decipher `<path>` --output-dir `<dir>`
//!                                   - Write every table into `<dir>`
//!   retrosheet parse `<play>` [--bases 13] [--outs 1]
//!                                   - Show the descriptor and outcome of one play
//!   retrosheet list-formats         - List all available output formats and tables
//!
//! Diagnostics go to stderr.

use clap::{Arg, ArgAction, ArgMatches, Command};
use retrosheet::config::{Loader, RetrosheetConfig};
use retrosheet::event::parser::Base;
use retrosheet::event::processor::{
    available_formats, available_tables, collect_diagnostics, decipher_file, process_file,
    write_tables, OutputFormat, ProcessingError, Table,
};
use retrosheet::event::Diagnostic;
use retrosheet::event::{parse, resolve, BaseState, DecipherError};

fn main() {
    let matches = Command::new("retrosheet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decipher Retrosheet play-by-play event files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("decipher")
                .about("Decipher an event file and print one row per play")
                .arg(
                    Arg::new("path")
                        .help("Path to the event file (.EVA / .EVN)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (csv or json); overrides the configuration"),
                )
                .arg(
                    Arg::new("table")
                        .long("table")
                        .short('t')
                        .help("Table to print (plays, info, starting, subs, comments, er)"),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .help("Write every table into this directory instead of stdout"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("sequential")
                        .long("sequential")
                        .action(ArgAction::SetTrue)
                        .help("Decipher games one at a time"),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a single play field and resolve it")
                .arg(
                    Arg::new("play")
                        .help("Play field, e.g. S8.3-H;2-H;1X3(8254)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("bases")
                        .long("bases")
                        .help("Occupied bases before the play, e.g. 13"),
                )
                .arg(
                    Arg::new("outs")
                        .long("outs")
                        .value_parser(clap::value_parser!(u8))
                        .help("Outs before the play"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List all available output formats and tables"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("decipher", decipher_matches)) => handle_decipher_command(decipher_matches),
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches),
        Some(("list-formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(matches: &ArgMatches) -> Result<RetrosheetConfig, ProcessingError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        // Validate before handing it to the config layer
        let format = OutputFormat::from_string(format)?;
        loader = loader.set_override("output.format", format.name())?;
    }
    if let Some(table) = matches.get_one::<String>("table") {
        let table = Table::from_string(table)?;
        loader = loader.set_override("output.table", table.name())?;
    }
    if matches.get_flag("sequential") {
        loader = loader.set_override("processing.parallel", false)?;
    }
    Ok(loader.build()?)
}

/// Handle the decipher command
fn handle_decipher_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("missing event file path")?;
    let config = load_config(matches)?;

    let diagnostics = match matches.get_one::<String>("output-dir") {
        Some(dir) => {
            let runs = decipher_file(path, &config)?;
            for written in write_tables(&runs, dir, config.output.format)? {
                println!("{}", written.display());
            }
            collect_diagnostics(&runs)
        }
        None => {
            let (output, diagnostics) = process_file(path, &config, config.output.format)?;
            print!("{}", output);
            diagnostics
        }
    };

    report_diagnostics(&diagnostics);
    Ok(())
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
    if !diagnostics.is_empty() {
        eprintln!("{} diagnostics", diagnostics.len());
    }
}

fn parse_bases(raw: &str, outs: u8) -> Result<BaseState, DecipherError> {
    let mut bases = BaseState::empty();
    for c in raw.chars() {
        let base = match c {
            '1' => Base::First,
            '2' => Base::Second,
            '3' => Base::Third,
            other => {
                return Err(DecipherError::Invariant(format!(
                    "'{}' is not a base (use 1, 2 or 3)",
                    other
                )))
            }
        };
        bases = bases.with_runner_on(base);
    }
    bases.with_outs(outs)
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let raw = matches
        .get_one::<String>("play")
        .ok_or("missing play field")?;
    let outs = matches.get_one::<u8>("outs").copied().unwrap_or(0);
    let before = parse_bases(
        matches.get_one::<String>("bases").map_or("", String::as_str),
        outs,
    )?;

    let descriptor = parse(raw)?;
    let resolution = resolve(&descriptor, &before);
    let report = serde_json::json!({
        "canonical": descriptor.render(),
        "descriptor": descriptor,
        "before": before,
        "outcome": resolution.outcome,
        "diagnostics": resolution
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Handle the list-formats command
fn handle_formats_command() {
    println!("Available formats:");
    for format in available_formats() {
        println!("  {:<6} {}", format.name(), format.description());
    }
    println!();
    println!("Available tables:");
    for table in available_tables() {
        println!("  {:<9} {}", table.name(), table.description());
    }
}
