use std::{fs, path::Path};

use crate::{
    diagnostics::{CalyxError, Diagnostic, DiagnosticKind, Result},
    environment::Environment,
    registry,
    runtime::Interpreter,
};

/// Lifecycle states of a script host. A successfully constructed host
/// starts in `Ready`; `Uninitialized` names the phase before
/// [`ScriptHost::create`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Uninitialized,
    Ready,
    Running,
    Terminated,
}

/// How a submitted evaluation ended. A `Failed` run has already been
/// reported to standard error and is not a process-level failure.
#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    Failed(CalyxError),
}

/// Owns one interpreter and runs exactly one script through it.
pub struct ScriptHost {
    interpreter: Interpreter,
    state: HostState,
}

impl ScriptHost {
    /// Build an interpreter with the native bridge installed, then
    /// verify every expected binding resolves. A missing binding means
    /// the runtime was assembled wrong and the process cannot usefully
    /// continue.
    pub fn create() -> Result<Self> {
        let interpreter = Interpreter::new();
        for name in registry::BOUND_NAMES {
            if Environment::lookup(interpreter.globals(), name).is_none() {
                return Err(CalyxError::Init(format!(
                    "native binding `{name}` is missing from the global namespace"
                )));
            }
        }
        Ok(Self {
            interpreter,
            state: HostState::Ready,
        })
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    /// Read `path` whole and evaluate it.
    ///
    /// Success and evaluation failure both leave the host `Terminated`,
    /// and a second submission is rejected. A file that cannot be read
    /// was never submitted: the host stays `Ready` and the `Load` error
    /// propagates as fatal.
    pub fn run_file(&mut self, path: &Path) -> Result<RunOutcome> {
        if self.state != HostState::Ready {
            return Err(CalyxError::from(
                Diagnostic::new(
                    DiagnosticKind::Runtime,
                    "script host has already run its script",
                )
                .with_note("one host evaluates one script per process"),
            ));
        }
        let source = fs::read_to_string(path).map_err(|err| CalyxError::Load {
            path: path.to_path_buf(),
            source: err,
        })?;
        self.state = HostState::Running;
        let result = self.interpreter.eval_source(&source);
        self.state = HostState::Terminated;
        match result {
            Ok(_) => Ok(RunOutcome::Completed),
            Err(err) => {
                eprintln!("`{}` failed: {err}", path.display());
                Ok(RunOutcome::Failed(err))
            }
        }
    }
}
