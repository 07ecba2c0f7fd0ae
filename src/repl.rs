use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{CalyxError, Result},
    runtime::Interpreter,
    value::ValueKind,
};

/// Interactive shell over one persistent interpreter. Diagnostics are
/// reported per line without ending the session.
pub struct Repl {
    interpreter: Interpreter,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(trimmed);
                    match self.interpreter.eval_source(trimmed) {
                        Ok(value) => {
                            // Unit results stay silent so `print(...)`
                            // lines do not echo a second line.
                            if !matches!(&*value.0, ValueKind::Unit) {
                                println!("{value}");
                            }
                        }
                        Err(CalyxError::Diagnostic(diagnostic)) => {
                            eprintln!("{diagnostic}");
                        }
                        Err(other) => eprintln!("error: {other}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(readline_error(err)),
            }
        }
        Ok(())
    }
}

fn readline_error(err: ReadlineError) -> CalyxError {
    CalyxError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
}
