use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};

use calyx::{Interpreter, Repl, ScriptHost};

#[derive(Parser)]
#[command(author, version, about = "Calyx scripting runtime and native bridge host")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Calyx script file
    Run { script: PathBuf },
    /// Start an interactive REPL session
    Repl,
    /// Evaluate a snippet of Calyx code
    Eval { source: String },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match args.command.unwrap_or(Command::Repl) {
        Command::Run { script } => run_script(&script),
        Command::Repl => {
            let mut repl = Repl::new();
            match repl.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Eval { source } => {
            let mut interpreter = Interpreter::new();
            match interpreter.eval_source(&source) {
                Ok(_) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Run one script through a fresh host. Interpreter construction and
/// script load failures are fatal; an evaluation failure has already
/// been reported by the host and leaves the exit code clean.
fn run_script(script: &Path) -> ExitCode {
    let mut host = match ScriptHost::create() {
        Ok(host) => host,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    match host.run_file(script) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
