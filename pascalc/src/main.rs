mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter};
use pascal_core::{
    analyzer::prelude::analyze_from_stream,
    eval::prelude::{run, InterpreterConfig},
    utils::prelude::Error,
};

use cli::{
    print_analyzed, print_analyzing, print_error, print_failed,
    print_finished, print_globals, print_running, print_scopes
};

#[derive(Parser)]
#[command(version, about = "Interpreter for a teaching subset of Pascal")]
struct Args {
    /// Raise log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyzes and interprets a program, then prints its global variables
    Run {
        /// Path of source file
        path: PathBuf,
        /// Deepest allowed chain of nested procedure calls
        #[arg(long, default_value_t = InterpreterConfig::default().max_call_depth)]
        max_call_depth: usize,
        /// Print every frame and the procedure table after the run
        #[arg(short = 's', long, default_value_t = false)]
        print_scopes: bool,
    },
    /// Performs lexical, syntactical and semantical analysis
    Analyze {
        /// Path of source file
        path: PathBuf,
        /// Print the syntax tree
        #[arg(long, default_value_t = false)]
        print_ast: bool,
        /// Print the global frame and the procedure table
        #[arg(short = 's', long, default_value_t = false)]
        print_scopes: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
    /// Reads a source path per line and runs it
    Repl {
        #[arg(long, default_value_t = InterpreterConfig::default().max_call_depth)]
        max_call_depth: usize,
    },
}

fn init_logger(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();

    match verbose {
        0 => {},
        1 => { builder.filter_level(LevelFilter::Debug); },
        _ => { builder.filter_level(LevelFilter::Trace); },
    }

    builder.format_timestamp(None).init();
}

fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| {
        eprintln!();
        std::process::exit(130);
    });

    if let Err(err) = installed {
        debug!("no interrupt handler: {err}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match args.command {
        Command::Run { path, max_call_depth, print_scopes: scopes } => {
            print_running(&path.display().to_string());
            let start = Instant::now();

            match run(path, InterpreterConfig { max_call_depth }) {
                Ok(execution) => {
                    print_finished(Instant::now() - start);

                    if scopes {
                        print_scopes(&execution.scopes);
                    } else {
                        print_globals(&execution.scopes);
                    }
                },
                Err(err) => {
                    print_error(&err);
                    print_failed(Instant::now() - start);
                    return ExitCode::FAILURE;
                }
            }
        },
        Command::Analyze { path, print_ast, print_scopes: scopes } => {
            print_analyzing(&path.display().to_string());
            let start = Instant::now();

            match analyze_from_stream(path) {
                Ok(analyzed) => {
                    if print_ast {
                        print!("{}", analyzed.ast);
                    }
                    if scopes {
                        print_scopes(&analyzed.scopes);
                    }
                },
                Err(err) => {
                    print_error(&err);
                    return ExitCode::FAILURE;
                }
            };

            print_analyzed(Instant::now() - start);
        },
        Command::Rlpl => {
            install_interrupt_handler();
            return loop_exit_code(rlpl::start());
        },
        Command::Rppl => {
            install_interrupt_handler();
            return loop_exit_code(rppl::start());
        },
        Command::Repl { max_call_depth } => {
            install_interrupt_handler();
            return loop_exit_code(repl::start(InterpreterConfig { max_call_depth }));
        },
    };

    ExitCode::SUCCESS
}

/// Loops end cleanly on `.exit` or end of input. Any other way out is an
/// IO failure on the terminal.
fn loop_exit_code(result: std::io::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&Error::from(err));
            ExitCode::FAILURE
        }
    }
}
