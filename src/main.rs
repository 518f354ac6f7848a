//! Cellgraph - a spreadsheet engine driven from the command line

mod config;
mod error;
mod logger;

use anyhow::{Context, Result};
use cellgraph_core::{Spreadsheet, format_value};
use error::CliError;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.cgs)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <CELL=TEXT>     Set a cell (can be repeated, applied in order)");
    eprintln!("  -o, --output <FILE>       Save to this file instead of FILE");
    eprintln!("  --config <FILE>           Load configuration from TOML file");
    eprintln!("  -v, --verbose             Log edits and recalculation to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    edits: Vec<(String, String)>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    verbose: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options, CliError> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                options.help = true;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
            }
            "-s" | "--set" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--set"))?;
                let (cell, text) = value
                    .split_once('=')
                    .ok_or_else(|| CliError::InvalidAssignment(value.clone()))?;
                if cell.trim().is_empty() {
                    return Err(CliError::InvalidAssignment(value.clone()));
                }
                options.edits.push((cell.to_string(), text.to_string()));
            }
            "-o" | "--output" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--output"))?;
                options.output_file = Some(PathBuf::from(value));
            }
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--config"))?;
                options.config_file = Some(PathBuf::from(value));
            }
            arg if arg.starts_with('-') => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            arg => {
                if options.file_path.is_some() {
                    return Err(CliError::UnexpectedArgument(arg.to_string()));
                }
                options.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn run(options: Options) -> Result<()> {
    let (config, warnings) = config::load_config(options.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut sheet = match &options.file_path {
        Some(path) if path.exists() => {
            Spreadsheet::load_with_rules(path, config.names, &config.version)
                .with_context(|| format!("Failed to open {}", path.display()))?
        }
        _ => Spreadsheet::with_rules(config.names, config.version.clone()),
    };

    for (cell, text) in &options.edits {
        let order = sheet
            .set_contents(cell, text)
            .with_context(|| format!("Cannot set {} to {:?}", cell.trim(), text))?;
        log::info!("Recalculated {}", order.join(", "));
    }

    for name in sheet.nonempty_cell_names() {
        let entry = sheet.get_entry(&name)?;
        let value = sheet.get_value(&name)?;
        println!("{}\t{}\t{}", name, entry.replace('\n', "\\n"), format_value(&value));
    }

    let save_path = options
        .output_file
        .as_ref()
        .or(options.file_path.as_ref().filter(|_| sheet.changed()));
    if let Some(path) = save_path {
        sheet
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };
    if options.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    logger::init(options.verbose);

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("cellgraph")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_edits_in_order() {
        let options = parse_args(&args(&["-s", "A1=5", "--set", "B1==A1+1", "sheet.cgs"])).unwrap();
        assert_eq!(
            options.edits,
            vec![
                ("A1".to_string(), "5".to_string()),
                ("B1".to_string(), "=A1+1".to_string()),
            ]
        );
        assert_eq!(options.file_path, Some(PathBuf::from("sheet.cgs")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_args(&args(&["--set"])),
            Err(CliError::MissingValue("--set"))
        ));
        assert!(matches!(
            parse_args(&args(&["-s", "A1"])),
            Err(CliError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_args(&args(&["--bogus"])),
            Err(CliError::UnknownOption(_))
        ));
        assert!(matches!(
            parse_args(&args(&["a.cgs", "b.cgs"])),
            Err(CliError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn test_clearing_assignment_is_allowed() {
        let options = parse_args(&args(&["-s", "A1="])).unwrap();
        assert_eq!(options.edits, vec![("A1".to_string(), String::new())]);
    }
}
