use calyx::{
    diagnostics::{CalyxError, Diagnostic, DiagnosticKind},
    environment::Environment,
    marshal::{self, CallFrame},
    registry,
    runtime::Interpreter,
    value::{Arity, NativeFunction, Value, ValueKind},
};

fn format_pair(frame: &CallFrame<'_>) -> Result<Value, CalyxError> {
    let text = frame.string_arg(0)?;
    let count = frame.int_arg(1)?;
    Ok(Value::string(format!("{text}:{count}")))
}

fn join_args(frame: &CallFrame<'_>) -> Result<Value, CalyxError> {
    Ok(Value::string(frame.display_args()))
}

fn expect_diagnostic(err: CalyxError) -> Diagnostic {
    match err {
        CalyxError::Diagnostic(diagnostic) => diagnostic,
        other => panic!("expected diagnostic, found {other}"),
    }
}

#[test]
fn invoke_checks_arity_before_types() {
    let function = NativeFunction {
        name: "format_pair",
        arity: Arity::Fixed(2),
        callback: format_pair,
    };
    // The single argument is also the wrong type; the count failure
    // must win because it is checked first.
    let err = marshal::invoke(&function, &[Value::int(1)]).unwrap_err();
    let diagnostic = expect_diagnostic(err);
    assert_eq!(diagnostic.kind, DiagnosticKind::Arity);
    assert_eq!(
        diagnostic.message,
        "`format_pair` expected 2 arguments but received 1"
    );
}

#[test]
fn first_bad_argument_wins() {
    let function = NativeFunction {
        name: "format_pair",
        arity: Arity::Fixed(2),
        callback: format_pair,
    };
    let args = [Value::bool(true), Value::bool(false)];
    let err = marshal::invoke(&function, &args).unwrap_err();
    let diagnostic = expect_diagnostic(err);
    assert_eq!(diagnostic.kind, DiagnosticKind::Type);
    assert_eq!(
        diagnostic.message,
        "`format_pair` expected String for argument 1 but found Bool"
    );
}

#[test]
fn invoke_passes_arguments_in_order() {
    let function = NativeFunction {
        name: "format_pair",
        arity: Arity::Fixed(2),
        callback: format_pair,
    };
    let args = [Value::string("x"), Value::int(7)];
    let value = marshal::invoke(&function, &args).expect("invoke succeeds");
    match value.0.as_ref() {
        ValueKind::String(s) => assert_eq!(s, "x:7"),
        _ => panic!("expected String, found {}", value.type_name()),
    }
}

#[test]
fn int_accessor_converts_and_rejects() {
    let args = [Value::int(41), Value::float(1.5)];
    let frame = CallFrame::new("format_pair", &args);
    assert_eq!(frame.int_arg(0).expect("int converts"), 41);

    let err = frame.int_arg(1).unwrap_err();
    let diagnostic = expect_diagnostic(err);
    assert_eq!(
        diagnostic.message,
        "`format_pair` expected Int for argument 2 but found Float"
    );
}

#[test]
fn variadic_accepts_any_argument_count() {
    let function = NativeFunction {
        name: "join",
        arity: Arity::Variadic,
        callback: join_args,
    };
    for count in 0..4i64 {
        let args: Vec<Value> = (0..count).map(Value::int).collect();
        assert!(marshal::invoke(&function, &args).is_ok());
    }
}

#[test]
fn display_args_joins_with_single_spaces() {
    let native = Value::new(ValueKind::NativeFunction(NativeFunction {
        name: "format_pair",
        arity: Arity::Fixed(2),
        callback: format_pair,
    }));
    let args = [
        Value::int(1),
        Value::string("two"),
        Value::bool(true),
        Value::unit(),
        native,
    ];
    let frame = CallFrame::new("join", &args);
    assert_eq!(frame.display_args(), "1 two true unit <native fn format_pair>");

    let empty = CallFrame::new("join", &[]);
    assert_eq!(empty.display_args(), "");
}

#[test]
fn accessor_out_of_range_reports_arity() {
    let args = [Value::string("only")];
    let frame = CallFrame::new("format_pair", &args);
    let err = frame.string_arg(5).unwrap_err();
    let diagnostic = expect_diagnostic(err);
    assert_eq!(diagnostic.kind, DiagnosticKind::Arity);
    assert_eq!(diagnostic.message, "`format_pair` has no argument 6");
}

#[test]
fn frame_reports_its_shape() {
    let args = [Value::int(1), Value::int(2)];
    let frame = CallFrame::new("format_pair", &args);
    assert_eq!(frame.function(), "format_pair");
    assert_eq!(frame.len(), 2);
    assert!(!frame.is_empty());
    assert_eq!(frame.args().len(), 2);
}

#[test]
fn install_binds_expected_names() {
    let interpreter = Interpreter::new();
    for name in registry::BOUND_NAMES {
        assert!(
            Environment::lookup(interpreter.globals(), name).is_some(),
            "{name} should be bound"
        );
    }
}

#[test]
fn register_replaces_existing_binding() {
    let interpreter = Interpreter::new();
    registry::register(interpreter.globals(), "format_pair", Arity::Fixed(2), format_pair);
    registry::register(interpreter.globals(), "format_pair", Arity::Variadic, join_args);

    let value = Environment::lookup(interpreter.globals(), "format_pair").expect("format_pair is bound");
    match value.0.as_ref() {
        ValueKind::NativeFunction(function) => assert_eq!(function.arity, Arity::Variadic),
        _ => panic!("expected native function, found {}", value.type_name()),
    }
}

#[test]
fn installed_levenshtein_is_callable() {
    let interpreter = Interpreter::new();
    let value = Environment::lookup(interpreter.globals(), "calculateLevenshteinInC")
        .expect("binding exists");
    let function = match value.0.as_ref() {
        ValueKind::NativeFunction(function) => function.clone(),
        _ => panic!("expected native function, found {}", value.type_name()),
    };

    let args = [Value::string("kitten"), Value::string("sitting")];
    let result = marshal::invoke(&function, &args).expect("distance computes");
    match result.0.as_ref() {
        ValueKind::Int(n) => assert_eq!(*n, 3),
        _ => panic!("expected Int, found {}", result.type_name()),
    }

    let err = marshal::invoke(&function, &[Value::string("kitten")]).unwrap_err();
    assert_eq!(expect_diagnostic(err).kind, DiagnosticKind::Arity);
}
