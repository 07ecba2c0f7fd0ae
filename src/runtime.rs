use std::rc::Rc;

use crate::{
    ast::{BinaryOp, Expr, ExprKind, Literal, Program, Stmt, StmtKind, UnaryOp},
    diagnostics::{CalyxError, Diagnostic, DiagnosticKind, Result, SourceSpan},
    environment::{Environment, EnvironmentRef},
    marshal, parser, registry,
    value::{UserFunction, Value, ValueKind},
};

/// Tree-walking evaluator. One interpreter owns one global scope with
/// the native bridge bindings preinstalled.
pub struct Interpreter {
    env: EnvironmentRef,
}

impl Interpreter {
    pub fn new() -> Self {
        let env = Environment::new();
        registry::install(&env);
        Self { env }
    }

    /// The global scope. Between evaluations this is where top-level
    /// bindings and the native functions live.
    pub fn globals(&self) -> &EnvironmentRef {
        &self.env
    }

    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        let program = parser::parse_program(source).map_err(CalyxError::from)?;
        self.eval_program(program)
    }

    /// Evaluate top-level statements in the global scope. The script's
    /// value is the last expression statement, or unit if there is
    /// none; a top-level `return` ends evaluation early.
    pub fn eval_program(&mut self, program: Program) -> Result<Value> {
        match self.run_sequence(&program.items)? {
            FlowControl::Next => Ok(Value::unit()),
            FlowControl::NextValue(value) | FlowControl::Return(value) => Ok(value),
            FlowControl::Break => Err(CalyxError::from(Diagnostic::new(
                DiagnosticKind::Runtime,
                "`break` outside loop",
            ))),
            FlowControl::Continue => Err(CalyxError::from(Diagnostic::new(
                DiagnosticKind::Runtime,
                "`continue` outside loop",
            ))),
        }
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<FlowControl> {
        match &stmt.kind {
            StmtKind::VarDecl { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::unit(),
                };
                self.env.borrow_mut().define(name.clone(), value, true);
                Ok(FlowControl::Next)
            }
            StmtKind::Function { name, params, body } => {
                let function = UserFunction {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    env: Rc::clone(&self.env),
                };
                self.env.borrow_mut().define(
                    name.clone(),
                    Value::new(ValueKind::Function(function)),
                    false,
                );
                Ok(FlowControl::Next)
            }
            StmtKind::Expr(expr) => Ok(FlowControl::NextValue(self.evaluate(expr)?)),
            StmtKind::Block(statements) => self.execute_block(statements),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_branch)
                } else if let Some(branch) = else_branch {
                    self.execute_block(branch)
                } else {
                    Ok(FlowControl::Next)
                }
            }
            StmtKind::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute_block(body)? {
                        FlowControl::Next | FlowControl::NextValue(_) => {}
                        FlowControl::Continue => continue,
                        FlowControl::Break => break,
                        FlowControl::Return(value) => return Ok(FlowControl::Return(value)),
                    }
                }
                Ok(FlowControl::Next)
            }
            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::unit(),
                };
                Ok(FlowControl::Return(value))
            }
            StmtKind::Break => Ok(FlowControl::Break),
            StmtKind::Continue => Ok(FlowControl::Continue),
        }
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> Result<FlowControl> {
        let prev = Rc::clone(&self.env);
        self.env = Environment::with_parent(Rc::clone(&prev));
        let result = self.run_sequence(statements);
        self.env = prev;
        result
    }

    /// Run statements in the current scope, tracking the value of the
    /// last expression statement. Anything other than ordinary forward
    /// flow propagates to the caller immediately.
    fn run_sequence(&mut self, statements: &[Stmt]) -> Result<FlowControl> {
        let mut last_value: Option<Value> = None;
        for stmt in statements {
            match self.execute_statement(stmt)? {
                FlowControl::Next => {}
                FlowControl::NextValue(value) => last_value = Some(value),
                other => return Ok(other),
            }
        }
        Ok(match last_value {
            Some(value) => FlowControl::NextValue(value),
            None => FlowControl::Next,
        })
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(self.literal(literal)),
            ExprKind::Variable(name) => Environment::get(&self.env, name, expr.span),
            ExprKind::Binary { op, left, right } => {
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                self.binary(*op, left_value, right_value, expr.span)
            }
            ExprKind::Unary { op, expr: operand } => {
                let value = self.evaluate(operand)?;
                self.unary(*op, value, expr.span)
            }
            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                Environment::assign(&self.env, name, value.clone(), expr.span)?;
                Ok(value)
            }
            ExprKind::Call { callee, args } => {
                let callee_value = self.evaluate(callee)?;
                let mut eval_args = Vec::with_capacity(args.len());
                for arg in args {
                    eval_args.push(self.evaluate(arg)?);
                }
                self.call(callee_value, eval_args, expr.span)
            }
            ExprKind::Group(inner) => self.evaluate(inner),
        }
    }

    fn literal(&self, literal: &Literal) -> Value {
        match literal {
            Literal::Int(n) => Value::int(*n),
            Literal::Float(n) => Value::float(*n),
            Literal::Bool(b) => Value::bool(*b),
            Literal::String(s) => Value::string(s.clone()),
            Literal::None => Value::unit(),
        }
    }

    fn binary(&self, op: BinaryOp, left: Value, right: Value, span: SourceSpan) -> Result<Value> {
        use BinaryOp::*;
        match op {
            Add => {
                // `+` concatenates when both operands are strings and
                // is numeric otherwise; there is no implicit coercion.
                if let (ValueKind::String(a), ValueKind::String(b)) = (&*left.0, &*right.0) {
                    return Ok(Value::string(format!("{a}{b}")));
                }
                self.numeric(left, right, span, |a, b| a + b)
            }
            Sub => self.numeric(left, right, span, |a, b| a - b),
            Mul => self.numeric(left, right, span, |a, b| a * b),
            Div => self.numeric(left, right, span, |a, b| a / b),
            Mod => self.numeric(left, right, span, |a, b| a % b),
            Equal => Ok(Value::bool(self.equal(&left, &right))),
            NotEqual => Ok(Value::bool(!self.equal(&left, &right))),
            Less => self.comparison(left, right, span, |a, b| a < b),
            LessEqual => self.comparison(left, right, span, |a, b| a <= b),
            Greater => self.comparison(left, right, span, |a, b| a > b),
            GreaterEqual => self.comparison(left, right, span, |a, b| a >= b),
            And => Ok(Value::bool(left.is_truthy() && right.is_truthy())),
            Or => Ok(Value::bool(left.is_truthy() || right.is_truthy())),
        }
    }

    fn unary(&self, op: UnaryOp, value: Value, span: SourceSpan) -> Result<Value> {
        match op {
            UnaryOp::Negate => match &*value.0 {
                // i64::MIN has no positive counterpart, so negation
                // clamps there instead of overflowing.
                ValueKind::Int(n) => Ok(Value::int(n.saturating_neg())),
                ValueKind::Float(n) => Ok(Value::float(-n)),
                _ => Err(CalyxError::from(
                    Diagnostic::new(DiagnosticKind::Runtime, "unary `-` expects numeric value")
                        .with_span(span),
                )),
            },
            UnaryOp::Not => Ok(Value::bool(!value.is_truthy())),
        }
    }

    fn call(&mut self, callee: Value, args: Vec<Value>, span: SourceSpan) -> Result<Value> {
        match &*callee.0 {
            ValueKind::NativeFunction(function) => marshal::invoke(function, &args),
            ValueKind::Function(function) => self.call_user(function, args),
            _ => Err(CalyxError::from(
                Diagnostic::new(DiagnosticKind::Runtime, "value is not callable").with_span(span),
            )),
        }
    }

    fn call_user(&mut self, function: &UserFunction, args: Vec<Value>) -> Result<Value> {
        if args.len() != function.params.len() {
            return Err(CalyxError::from(Diagnostic::new(
                DiagnosticKind::Runtime,
                format!(
                    "`{}` expected {} arguments but received {}",
                    function.name,
                    function.params.len(),
                    args.len()
                ),
            )));
        }
        let call_env = Environment::with_parent(Rc::clone(&function.env));
        for (name, value) in function.params.iter().zip(args) {
            call_env.borrow_mut().define(name.clone(), value, true);
        }
        let prev = Rc::clone(&self.env);
        self.env = call_env;
        let flow = self.run_sequence(&function.body);
        self.env = prev;
        match flow? {
            FlowControl::Next => Ok(Value::unit()),
            FlowControl::NextValue(value) | FlowControl::Return(value) => Ok(value),
            FlowControl::Break | FlowControl::Continue => Err(CalyxError::from(Diagnostic::new(
                DiagnosticKind::Runtime,
                "loop control cannot escape a function",
            ))),
        }
    }

    fn numeric<F>(&self, left: Value, right: Value, span: SourceSpan, func: F) -> Result<Value>
    where
        F: Fn(f64, f64) -> f64,
    {
        let left_num = self.number(&left, span)?;
        let right_num = self.number(&right, span)?;
        let result = func(left_num, right_num);
        if left.is_int() && right.is_int() && result.fract() == 0.0 {
            Ok(Value::int(result as i64))
        } else {
            Ok(Value::float(result))
        }
    }

    fn comparison<F>(&self, left: Value, right: Value, span: SourceSpan, cmp: F) -> Result<Value>
    where
        F: Fn(f64, f64) -> bool,
    {
        let left_num = self.number(&left, span)?;
        let right_num = self.number(&right, span)?;
        Ok(Value::bool(cmp(left_num, right_num)))
    }

    fn number(&self, value: &Value, span: SourceSpan) -> Result<f64> {
        match &*value.0 {
            ValueKind::Int(n) => Ok(*n as f64),
            ValueKind::Float(n) => Ok(*n),
            _ => Err(CalyxError::from(
                Diagnostic::new(
                    DiagnosticKind::Runtime,
                    format!("expected numeric value, found {}", value.type_name()),
                )
                .with_span(span),
            )),
        }
    }

    fn equal(&self, left: &Value, right: &Value) -> bool {
        match (&*left.0, &*right.0) {
            (ValueKind::Unit, ValueKind::Unit) => true,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::Int(a), ValueKind::Int(b)) => a == b,
            (ValueKind::Float(a), ValueKind::Float(b)) => (*a - *b).abs() < f64::EPSILON,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            _ => false,
        }
    }
}

enum FlowControl {
    Next,
    NextValue(Value),
    Return(Value),
    Break,
    Continue,
}
