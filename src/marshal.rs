use crate::{
    diagnostics::{CalyxError, Diagnostic, DiagnosticKind, Result},
    value::{Arity, NativeFunction, Value, ValueKind},
};

/// The ordered arguments presented to a native function for one
/// invocation. The frame borrows the evaluated argument slice and is
/// read-only to the callback.
///
/// Preconditions are checked in a fixed order: the argument count is
/// validated against the declared arity by [`invoke`] before the
/// callback runs, and the typed accessors then convert arguments one
/// at a time, reporting the first violation without inspecting later
/// positions.
pub struct CallFrame<'a> {
    function: &'static str,
    args: &'a [Value],
}

impl<'a> CallFrame<'a> {
    pub fn new(function: &'static str, args: &'a [Value]) -> Self {
        Self { function, args }
    }

    /// Name of the function being invoked, as script code spells it.
    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Borrow argument `index` as a string slice, or raise a `Type`
    /// failure naming the 1-based position and the expected type.
    pub fn string_arg(&self, index: usize) -> Result<&'a str> {
        let value = self.arg(index)?;
        match &*value.0 {
            ValueKind::String(text) => Ok(text.as_str()),
            _ => Err(self.type_error(index, "String", value)),
        }
    }

    /// Convert argument `index` to its native integer representation.
    pub fn int_arg(&self, index: usize) -> Result<i64> {
        let value = self.arg(index)?;
        match &*value.0 {
            ValueKind::Int(n) => Ok(*n),
            _ => Err(self.type_error(index, "Int", value)),
        }
    }

    /// Render every argument in call order with its display form,
    /// joined by single spaces. Stringification is total, so this
    /// succeeds whatever the argument types.
    pub fn display_args(&self) -> String {
        let mut rendered = String::new();
        for (index, value) in self.args.iter().enumerate() {
            if index > 0 {
                rendered.push(' ');
            }
            rendered.push_str(&value.to_string());
        }
        rendered
    }

    fn arg(&self, index: usize) -> Result<&'a Value> {
        self.args.get(index).ok_or_else(|| {
            CalyxError::from(Diagnostic::new(
                DiagnosticKind::Arity,
                format!("`{}` has no argument {}", self.function, index + 1),
            ))
        })
    }

    fn type_error(&self, index: usize, expected: &str, found: &Value) -> CalyxError {
        CalyxError::from(Diagnostic::new(
            DiagnosticKind::Type,
            format!(
                "`{}` expected {} for argument {} but found {}",
                self.function,
                expected,
                index + 1,
                found.type_name()
            ),
        ))
    }
}

/// Validate a frame's argument count against a declared arity. Variadic
/// functions accept any count, including zero.
pub fn check_arity(frame: &CallFrame<'_>, arity: Arity) -> Result<()> {
    match arity {
        Arity::Fixed(expected) if frame.len() != expected => {
            Err(CalyxError::from(Diagnostic::new(
                DiagnosticKind::Arity,
                format!(
                    "`{}` expected {} arguments but received {}",
                    frame.function(),
                    expected,
                    frame.len()
                ),
            )))
        }
        _ => Ok(()),
    }
}

/// Dispatch one script call onto a native function.
///
/// Every script-to-native crossing goes through here. The arity check
/// runs before the callback sees the frame, so a fixed-arity callback
/// can rely on positions `0..n` existing.
pub fn invoke(function: &NativeFunction, args: &[Value]) -> Result<Value> {
    let frame = CallFrame::new(function.name, args);
    check_arity(&frame, function.arity)?;
    (function.callback)(&frame)
}
