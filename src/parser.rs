use crate::{
    ast::{BinaryOp, Expr, ExprKind, Literal, Program, Stmt, StmtKind, UnaryOp},
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    lexer::{Keyword, Lexer, Token, TokenKind},
};

/// Parse a whole script into its statement list.
pub fn parse_program(source: &str) -> Result<Program, Diagnostic> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

/// Binary operators from loosest to tightest binding. Each row is one
/// precedence level; every level is left-associative.
const BINARY_LEVELS: &[&[(TokenKind, BinaryOp)]] = &[
    &[(TokenKind::DoublePipe, BinaryOp::Or)],
    &[(TokenKind::DoubleAmpersand, BinaryOp::And)],
    &[
        (TokenKind::EqualEqual, BinaryOp::Equal),
        (TokenKind::BangEqual, BinaryOp::NotEqual),
    ],
    &[
        (TokenKind::LessEqual, BinaryOp::LessEqual),
        (TokenKind::GreaterEqual, BinaryOp::GreaterEqual),
        (TokenKind::Less, BinaryOp::Less),
        (TokenKind::Greater, BinaryOp::Greater),
    ],
    &[
        (TokenKind::Plus, BinaryOp::Add),
        (TokenKind::Minus, BinaryOp::Sub),
    ],
    &[
        (TokenKind::Star, BinaryOp::Mul),
        (TokenKind::Slash, BinaryOp::Div),
        (TokenKind::Percent, BinaryOp::Mod),
    ],
];

struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    fn parse_program(&mut self) -> Result<Program, Diagnostic> {
        let mut items = Vec::new();
        while !self.check(TokenKind::Eof) {
            items.push(self.parse_statement()?);
        }
        Ok(Program { items })
    }

    fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        match self.peek().map(|token| token.kind) {
            Some(TokenKind::Keyword(Keyword::Var)) => self.parse_var_decl(),
            Some(TokenKind::Keyword(Keyword::Fn)) => self.parse_function(),
            Some(TokenKind::Keyword(Keyword::If)) => self.parse_if(),
            Some(TokenKind::Keyword(Keyword::While)) => self.parse_while(),
            Some(TokenKind::Keyword(Keyword::Return)) => self.parse_return(),
            Some(TokenKind::Keyword(Keyword::Break)) => self.parse_break(),
            Some(TokenKind::Keyword(Keyword::Continue)) => self.parse_continue(),
            Some(TokenKind::LBrace) => {
                let (items, span) = self.parse_block()?;
                Ok(Stmt {
                    kind: StmtKind::Block(items),
                    span,
                })
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> Result<(Vec<Stmt>, SourceSpan), Diagnostic> {
        let lbrace = self.consume(TokenKind::LBrace, "expected `{` to start block")?;
        let start = lbrace.span.start;
        let mut items = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            items.push(self.parse_statement()?);
        }
        let rbrace = self.consume(TokenKind::RBrace, "expected `}` to close block")?;
        Ok((items, SourceSpan::new(start, rbrace.span.end)))
    }

    fn parse_var_decl(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::Var)?.span.start;
        let name_token = self.consume_identifier("expected variable name")?;
        let initializer = if self.matches(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume_optional_semicolon();
        let end = initializer
            .as_ref()
            .map(|expr| expr.span.end)
            .unwrap_or(name_token.span.end);
        Ok(Stmt {
            kind: StmtKind::VarDecl {
                name: name_token.lexeme,
                initializer,
            },
            span: SourceSpan::new(start, end),
        })
    }

    fn parse_function(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::Fn)?.span.start;
        let name_token = self.consume_identifier("expected function name")?;
        self.consume(TokenKind::LParen, "expected `(` after function name")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.consume_identifier("expected parameter name")?;
                params.push(param.lexeme);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "expected `)` after parameters")?;
        let (body, body_span) = self.parse_block()?;
        Ok(Stmt {
            span: SourceSpan::new(start, body_span.end),
            kind: StmtKind::Function {
                name: name_token.lexeme,
                params,
                body,
            },
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::If)?.span.start;
        let condition = self.parse_expression()?;
        let (then_branch, then_span) = self.parse_block()?;
        let mut end = then_span.end;
        let else_branch = if self.matches_keyword(Keyword::Else) {
            if self.check(TokenKind::Keyword(Keyword::If)) {
                let chained = self.parse_if()?;
                end = chained.span.end;
                Some(vec![chained])
            } else {
                let (branch, branch_span) = self.parse_block()?;
                end = branch_span.end;
                Some(branch)
            }
        } else {
            None
        };
        Ok(Stmt {
            span: SourceSpan::new(start, end),
            kind: StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::While)?.span.start;
        let condition = self.parse_expression()?;
        let (body, body_span) = self.parse_block()?;
        Ok(Stmt {
            span: SourceSpan::new(start, body_span.end),
            kind: StmtKind::While { condition, body },
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, Diagnostic> {
        let token = self.consume_keyword(Keyword::Return)?;
        let expr = if self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RBrace)
            || self.check(TokenKind::Eof)
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_optional_semicolon();
        let end = expr.as_ref().map(|e| e.span.end).unwrap_or(token.span.end);
        Ok(Stmt {
            span: SourceSpan::new(token.span.start, end),
            kind: StmtKind::Return(expr),
        })
    }

    fn parse_break(&mut self) -> Result<Stmt, Diagnostic> {
        let token = self.consume_keyword(Keyword::Break)?;
        self.consume_optional_semicolon();
        Ok(Stmt {
            span: token.span,
            kind: StmtKind::Break,
        })
    }

    fn parse_continue(&mut self) -> Result<Stmt, Diagnostic> {
        let token = self.consume_keyword(Keyword::Continue)?;
        self.consume_optional_semicolon();
        Ok(Stmt {
            span: token.span,
            kind: StmtKind::Continue,
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, Diagnostic> {
        let expr = self.parse_expression()?;
        self.consume_optional_semicolon();
        Ok(Stmt {
            span: expr.span,
            kind: StmtKind::Expr(expr),
        })
    }

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, Diagnostic> {
        let expr = self.parse_binary(0)?;
        if !self.matches(TokenKind::Assign) {
            return Ok(expr);
        }
        let equals = self.previous().span;
        let value = self.parse_assignment()?;
        let start = expr.span.start;
        match expr.kind {
            ExprKind::Variable(name) => {
                let end = value.span.end;
                Ok(Expr {
                    span: SourceSpan::new(start, end),
                    kind: ExprKind::Assign {
                        name,
                        value: Box::new(value),
                    },
                })
            }
            _ => Err(
                Diagnostic::new(DiagnosticKind::Parser, "invalid assignment target")
                    .with_span(equals),
            ),
        }
    }

    fn parse_binary(&mut self, level: usize) -> Result<Expr, Diagnostic> {
        let operators = match BINARY_LEVELS.get(level) {
            Some(operators) => *operators,
            None => return self.parse_unary(),
        };
        let mut expr = self.parse_binary(level + 1)?;
        loop {
            let mut matched = None;
            for &(kind, op) in operators {
                if self.matches(kind) {
                    matched = Some(op);
                    break;
                }
            }
            let op = match matched {
                Some(op) => op,
                None => break,
            };
            let right = self.parse_binary(level + 1)?;
            expr = Expr {
                span: SourceSpan::new(expr.span.start, right.span.end),
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = if self.matches(TokenKind::Minus) {
            Some(UnaryOp::Negate)
        } else if self.matches(TokenKind::Bang) {
            Some(UnaryOp::Not)
        } else {
            None
        };
        match op {
            Some(op) => {
                let start = self.previous().span.start;
                let operand = self.parse_unary()?;
                Ok(Expr {
                    span: SourceSpan::new(start, operand.span.end),
                    kind: ExprKind::Unary {
                        op,
                        expr: Box::new(operand),
                    },
                })
            }
            None => self.parse_call(),
        }
    }

    fn parse_call(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_primary()?;
        while self.matches(TokenKind::LParen) {
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    args.push(self.parse_expression()?);
                    if !self.matches(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let rparen = self.consume(TokenKind::RParen, "expected `)` after arguments")?;
            expr = Expr {
                span: SourceSpan::new(expr.span.start, rparen.span.end),
                kind: ExprKind::Call {
                    callee: Box::new(expr),
                    args,
                },
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.error_eof("unexpected end of expression")),
        };
        match token.kind {
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(literal_expr(Literal::Bool(true), token.span))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(literal_expr(Literal::Bool(false), token.span))
            }
            TokenKind::Keyword(Keyword::None) => {
                self.advance();
                Ok(literal_expr(Literal::None, token.span))
            }
            TokenKind::Number => {
                self.advance();
                Ok(literal_expr(number_literal(&token.lexeme), token.span))
            }
            TokenKind::String => {
                self.advance();
                Ok(literal_expr(Literal::String(token.lexeme), token.span))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr {
                    span: token.span,
                    kind: ExprKind::Variable(token.lexeme),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let rparen = self.consume(TokenKind::RParen, "expected `)` after expression")?;
                Ok(Expr {
                    span: SourceSpan::new(token.span.start, rparen.span.end),
                    kind: ExprKind::Group(Box::new(inner)),
                })
            }
            _ => Err(self.error(&token, "unexpected token in expression")),
        }
    }

    fn consume_optional_semicolon(&mut self) {
        let _ = self.matches(TokenKind::Semicolon);
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn matches_keyword(&mut self, keyword: Keyword) -> bool {
        self.matches(TokenKind::Keyword(keyword))
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self
                .peek()
                .map(|token| self.error(token, message))
                .unwrap_or_else(|| self.error_eof(message)))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token, Diagnostic> {
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Keyword(keyword) {
                Ok(self.advance())
            } else {
                Err(self.error(token, &format!("expected keyword `{keyword:?}`")))
            }
        } else {
            Err(self.error_eof("unexpected end of input"))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<Token, Diagnostic> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            Err(self
                .peek()
                .map(|token| self.error(token, message))
                .unwrap_or_else(|| self.error_eof(message)))
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().map(|token| token.kind == kind).unwrap_or(false)
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Eof) | None)
    }

    fn error(&self, token: &Token, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Parser, message.to_string()).with_span(token.span)
    }

    fn error_eof(&self, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Parser, message.to_string())
    }
}

fn literal_expr(literal: Literal, span: SourceSpan) -> Expr {
    Expr {
        span,
        kind: ExprKind::Literal(literal),
    }
}

fn number_literal(lexeme: &str) -> Literal {
    let digits = lexeme.replace('_', "");
    if digits.contains(['.', 'e', 'E']) {
        Literal::Float(digits.parse().unwrap_or(0.0))
    } else {
        Literal::Int(digits.parse().unwrap_or(0))
    }
}
