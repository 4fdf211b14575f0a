//! teenyc CLI - Teeny Tiny to C translator

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use teenyc::errors::print_error;
use teenyc::{Config, Lexer};

#[derive(Parser)]
#[command(name = "teenyc", version, about = "Teeny Tiny to C translator")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a source file to C
    Compile {
        file: PathBuf,
        /// Output path (defaults to TEENY_OUTPUT or out.c)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Spaces per indentation level (defaults to TEENY_INDENT or 4)
        #[arg(long)]
        indent: Option<usize>,
    },
    /// Run every check without writing output
    Check { file: PathBuf },
    /// Dump the token stream
    Tokens { file: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            None
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compile {
            file,
            output,
            indent,
        } => {
            let Some(source) = read_source(&file) else {
                return ExitCode::FAILURE;
            };

            let mut config = Config::from_env();
            if let Some(output) = output {
                config = config.with_output(output);
            }
            if let Some(indent) = indent {
                config = config.with_indent_width(indent);
            }

            info!("compiling {}", file.display());
            match teenyc::compile_to_file(&source, &config) {
                Ok(path) => {
                    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    println!("Compiling completed: {} ({} bytes)", path.display(), size);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    print_error(&source, &file.to_string_lossy(), &e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Check { file } => {
            let Some(source) = read_source(&file) else {
                return ExitCode::FAILURE;
            };

            match teenyc::compile(&source, &Config::from_env()) {
                Ok(_) => {
                    println!("OK: {}", file.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    print_error(&source, &file.to_string_lossy(), &e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Tokens { file } => {
            let Some(source) = read_source(&file) else {
                return ExitCode::FAILURE;
            };

            for token in Lexer::new(&source) {
                match token {
                    Ok(token) => println!(
                        "{:<12} {:<16} {}..{}",
                        format!("{:?}", token.kind),
                        format!("{:?}", token.text),
                        token.span.start,
                        token.span.end
                    ),
                    Err(e) => {
                        print_error(&source, &file.to_string_lossy(), &e);
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
    }
}
