use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    diagnostics::{CalyxError, Diagnostic, DiagnosticKind, SourceSpan},
    value::Value,
};

pub type EnvironmentRef = Rc<RefCell<Environment>>;

/// One lexical scope. Bindings keep insertion order, which fixes the
/// order startup checks and diagnostics observe the global namespace.
#[derive(Debug, Default)]
pub struct Environment {
    parent: Option<EnvironmentRef>,
    bindings: IndexMap<String, Binding>,
}

impl Environment {
    pub fn new() -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            parent: None,
            bindings: IndexMap::new(),
        }))
    }

    pub fn with_parent(parent: EnvironmentRef) -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            parent: Some(parent),
            bindings: IndexMap::new(),
        }))
    }

    /// Insert a binding into this scope, replacing any existing binding
    /// with the same name.
    pub fn define(&mut self, name: String, value: Value, mutable: bool) {
        self.bindings.insert(name, Binding { value, mutable });
    }

    /// Resolve `name` through the scope chain without raising.
    pub fn lookup(env: &EnvironmentRef, name: &str) -> Option<Value> {
        let mut scope = Rc::clone(env);
        loop {
            let parent = {
                let borrowed = scope.borrow();
                if let Some(binding) = borrowed.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                borrowed.parent.clone()
            };
            scope = parent?;
        }
    }

    /// Resolve `name` through the scope chain, raising an undefined
    /// variable diagnostic at `span` when nothing binds it.
    pub fn get(env: &EnvironmentRef, name: &str, span: SourceSpan) -> Result<Value, CalyxError> {
        Environment::lookup(env, name).ok_or_else(|| {
            CalyxError::from(
                Diagnostic::new(
                    DiagnosticKind::Runtime,
                    format!("undefined variable `{name}`"),
                )
                .with_span(span),
            )
        })
    }

    /// Overwrite the nearest binding of `name`. Immutable bindings and
    /// unbound names both raise.
    pub fn assign(
        env: &EnvironmentRef,
        name: &str,
        value: Value,
        span: SourceSpan,
    ) -> Result<(), CalyxError> {
        let mut scope = Rc::clone(env);
        loop {
            let parent = {
                let mut borrowed = scope.borrow_mut();
                if let Some(binding) = borrowed.bindings.get_mut(name) {
                    if !binding.mutable {
                        return Err(CalyxError::from(
                            Diagnostic::new(
                                DiagnosticKind::Runtime,
                                format!("cannot assign to immutable binding `{name}`"),
                            )
                            .with_span(span)
                            .with_note("function and native bindings are immutable"),
                        ));
                    }
                    binding.value = value;
                    return Ok(());
                }
                borrowed.parent.clone()
            };
            match parent {
                Some(next) => scope = next,
                None => {
                    return Err(CalyxError::from(
                        Diagnostic::new(
                            DiagnosticKind::Runtime,
                            format!("undefined variable `{name}`"),
                        )
                        .with_span(span),
                    ));
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}
