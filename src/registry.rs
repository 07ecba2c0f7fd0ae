use std::io::{self, Write};

use crate::{
    diagnostics::Result,
    distance,
    environment::EnvironmentRef,
    marshal::CallFrame,
    value::{Arity, NativeCallback, NativeFunction, Value, ValueKind},
};

/// Names bound by [`install`], in registration order. The host checks
/// that each of these resolves after interpreter construction.
pub const BOUND_NAMES: [&str; 2] = ["calculateLevenshteinInC", "print"];

/// Install the native bridge functions into the global namespace.
/// Runs once at startup, before any script evaluates.
pub fn install(env: &EnvironmentRef) {
    register(env, "calculateLevenshteinInC", Arity::Fixed(2), native_levenshtein);
    register(env, "print", Arity::Variadic, native_print);
}

/// Bind `name` to a native function in the flat global namespace. The
/// binding is immutable from script code. Registering a name that is
/// already bound silently replaces the earlier binding, so callers are
/// expected to keep names unique.
pub fn register(env: &EnvironmentRef, name: &'static str, arity: Arity, callback: NativeCallback) {
    let function = Value::new(ValueKind::NativeFunction(NativeFunction {
        name,
        arity,
        callback,
    }));
    env.borrow_mut().define(name.to_string(), function, false);
}

/// Fixed-arity bridge to the edit-distance engine: both arguments must
/// be strings, and the distance returns to the script as an integer.
fn native_levenshtein(frame: &CallFrame<'_>) -> Result<Value> {
    let a = frame.string_arg(0)?;
    let b = frame.string_arg(1)?;
    Ok(Value::int(distance::levenshtein(a, b) as i64))
}

/// Variadic printer: the display form of every argument, space-joined,
/// one line, flushed immediately so output interleaves correctly with
/// anything else on the shared stream. Never raises; write errors are
/// dropped.
fn native_print(frame: &CallFrame<'_>) -> Result<Value> {
    let mut line = frame.display_args();
    line.push('\n');
    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(line.as_bytes());
    let _ = stdout.flush();
    Ok(Value::unit())
}
