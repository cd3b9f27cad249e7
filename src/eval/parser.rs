//! Parser for the lazyrepo script language
//!
//! Recursive-descent parser producing the AST consumed by the interpreter.
//!
//! Grammar sketch:
//!
//! ```text
//! program  := item*
//! item     := "let" IDENT "=" expr ";"
//!           | "fn" IDENT "(" params ")" block
//! block    := "{" stmt* expr? "}"
//! stmt     := "let" IDENT "=" expr ";" | expr ";"
//! expr     := or
//! or       := and ( "||" and )*
//! and      := equality ( "&&" equality )*
//! equality := ordering ( ("==" | "!=") ordering )*
//! ordering := term ( ("<" | "<=" | ">" | ">=") term )*
//! term     := factor ( ("+" | "-") factor )*
//! factor   := unary ( ("*" | "/" | "%") unary )*
//! unary    := ("-" | "!") unary | primary
//! primary  := INT | STRING | "true" | "false" | IDENT | IDENT "(" args ")"
//!           | "(" expr ")" | "if" expr block "else" block | block
//! ```

use crate::eval::lexer::{Token, TokenKind};
use crate::eval::EvalError;

/// A parsed module: the sequence of top-level items
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level item
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `let name = expr;`
    Let { name: String, value: Expr },
    /// `fn name(params) { ... }`
    Function(FunctionDef),
}

/// A named function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// A brace-delimited block; its value is the tail expression, or unit
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub tail: Option<Box<Expr>>,
}

/// Statement inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let { name: String, value: Expr },
    Expr(Expr),
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Str(String),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
        line: u32,
    },
    If {
        cond: Box<Expr>,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    Block(Block),
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Parse a token stream into a [`Program`]
pub fn parse(tokens: Vec<Token>) -> Result<Program, EvalError> {
    let mut parser = Parser { tokens, pos: 0 };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // Lexer guarantees a trailing Eof token
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, EvalError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(EvalError::Syntax {
                line: found.line,
                message: format!(
                    "expected {}, found {}",
                    kind.describe(),
                    found.kind.describe()
                ),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, EvalError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            other => Err(EvalError::Syntax {
                line: token.line,
                message: format!("expected identifier, found {}", other.describe()),
            }),
        }
    }

    fn program(&mut self) -> Result<Program, EvalError> {
        let mut items = Vec::new();
        while !self.check(&TokenKind::Eof) {
            items.push(self.item()?);
        }
        Ok(Program { items })
    }

    fn item(&mut self) -> Result<Item, EvalError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Let => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(Item::Let { name, value })
            }
            TokenKind::Fn => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&TokenKind::LParen)?;
                let mut params = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        params.push(self.expect_ident()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen)?;
                let body = self.block()?;
                Ok(Item::Function(FunctionDef { name, params, body }))
            }
            other => Err(EvalError::Syntax {
                line: token.line,
                message: format!("expected 'let' or 'fn', found {}", other.describe()),
            }),
        }
    }

    fn block(&mut self) -> Result<Block, EvalError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        let mut tail = None;

        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Let) {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.expr()?;
                self.expect(&TokenKind::Semi)?;
                stmts.push(Stmt::Let { name, value });
            } else {
                let expr = self.expr()?;
                if self.eat(&TokenKind::Semi) {
                    stmts.push(Stmt::Expr(expr));
                } else {
                    tail = Some(Box::new(expr));
                    break;
                }
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Block { stmts, tail })
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.and_expr()?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.and_expr()?;
            lhs = Expr::Binary {
                op: BinOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.equality()?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.equality()?;
            lhs = Expr::Binary {
                op: BinOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.ordering()?;
        loop {
            let op = if self.eat(&TokenKind::EqEq) {
                BinOp::Eq
            } else if self.eat(&TokenKind::NotEq) {
                BinOp::Ne
            } else {
                break;
            };
            let rhs = self.ordering()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn ordering(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = if self.eat(&TokenKind::Lt) {
                BinOp::Lt
            } else if self.eat(&TokenKind::Le) {
                BinOp::Le
            } else if self.eat(&TokenKind::Gt) {
                BinOp::Gt
            } else if self.eat(&TokenKind::Ge) {
                BinOp::Ge
            } else {
                break;
            };
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.factor()?;
        loop {
            let op = if self.eat(&TokenKind::Plus) {
                BinOp::Add
            } else if self.eat(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat(&TokenKind::Star) {
                BinOp::Mul
            } else if self.eat(&TokenKind::Slash) {
                BinOp::Div
            } else if self.eat(&TokenKind::Percent) {
                BinOp::Rem
            } else {
                break;
            };
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        let op = if self.eat(&TokenKind::Minus) {
            Some(UnaryOp::Neg)
        } else if self.eat(&TokenKind::Bang) {
            Some(UnaryOp::Not)
        } else {
            None
        };

        if let Some(op) = op {
            let operand = self.unary()?;
            Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            })
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(n) => Ok(Expr::Int(n)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::True => Ok(Expr::Bool(true)),
            TokenKind::False => Ok(Expr::Bool(false)),
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.expr()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(&TokenKind::RParen)?;
                    Ok(Expr::Call {
                        callee: name,
                        args,
                        line: token.line,
                    })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            TokenKind::LParen => {
                let expr = self.expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::If => {
                let cond = self.expr()?;
                let then_branch = self.block()?;
                let else_branch = if self.eat(&TokenKind::Else) {
                    Some(self.block()?)
                } else {
                    None
                };
                Ok(Expr::If {
                    cond: Box::new(cond),
                    then_branch,
                    else_branch,
                })
            }
            TokenKind::LBrace => {
                // Re-enter block parsing; the brace is already consumed
                self.pos -= 1;
                Ok(Expr::Block(self.block()?))
            }
            other => Err(EvalError::Syntax {
                line: token.line,
                message: format!("expected expression, found {}", other.describe()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::lexer::tokenize;

    fn parse_source(source: &str) -> Result<Program, EvalError> {
        parse(tokenize(source)?)
    }

    #[test]
    fn test_parse_let_item() {
        let program = parse_source("let x = 1 + 2;").expect("parse failed");
        assert_eq!(program.items.len(), 1);
        match &program.items[0] {
            Item::Let { name, value } => {
                assert_eq!(name, "x");
                assert!(matches!(value, Expr::Binary { op: BinOp::Add, .. }));
            }
            item => panic!("Expected let item, got: {item:?}"),
        }
    }

    #[test]
    fn test_parse_function_item() {
        let program = parse_source("fn add(a, b) { a + b }").expect("parse failed");
        match &program.items[0] {
            Item::Function(def) => {
                assert_eq!(def.name, "add");
                assert_eq!(def.params, vec!["a", "b"]);
                assert!(def.body.tail.is_some());
                assert!(def.body.stmts.is_empty());
            }
            item => panic!("Expected function item, got: {item:?}"),
        }
    }

    #[test]
    fn test_parse_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let program = parse_source("let x = 1 + 2 * 3;").expect("parse failed");
        let Item::Let { value, .. } = &program.items[0] else {
            panic!("Expected let item");
        };
        let Expr::Binary { op, rhs, .. } = value else {
            panic!("Expected binary expression");
        };
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(**rhs, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_parse_parenthesized_grouping() {
        // (1 + 2) * 3 parses as (1 + 2) * 3
        let program = parse_source("let x = (1 + 2) * 3;").expect("parse failed");
        let Item::Let { value, .. } = &program.items[0] else {
            panic!("Expected let item");
        };
        assert!(matches!(value, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_parse_if_else() {
        let program =
            parse_source("fn max(a, b) { if a > b { a } else { b } }").expect("parse failed");
        let Item::Function(def) = &program.items[0] else {
            panic!("Expected function item");
        };
        assert!(matches!(
            def.body.tail.as_deref(),
            Some(Expr::If {
                else_branch: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn test_parse_block_with_locals() {
        let program =
            parse_source("fn f(x) { let y = x * 2; y + 1 }").expect("parse failed");
        let Item::Function(def) = &program.items[0] else {
            panic!("Expected function item");
        };
        assert_eq!(def.body.stmts.len(), 1);
        assert!(def.body.tail.is_some());
    }

    #[test]
    fn test_parse_call_arguments() {
        let program = parse_source("let x = add(1, 2 * 3);").expect("parse failed");
        let Item::Let { value, .. } = &program.items[0] else {
            panic!("Expected let item");
        };
        let Expr::Call { callee, args, .. } = value else {
            panic!("Expected call expression");
        };
        assert_eq!(callee, "add");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_parse_missing_semicolon() {
        let err = parse_source("let x = 1").expect_err("should fail");
        assert!(matches!(err, EvalError::Syntax { .. }));
    }

    #[test]
    fn test_parse_unexpected_top_level() {
        let err = parse_source("1 + 2;").expect_err("should fail");
        match err {
            EvalError::Syntax { message, .. } => {
                assert!(message.contains("expected 'let' or 'fn'"));
            }
            e => panic!("Expected syntax error, got: {e:?}"),
        }
    }

    #[test]
    fn test_parse_empty_program() {
        let program = parse_source("").expect("parse failed");
        assert!(program.items.is_empty());
    }

    #[test]
    fn test_parse_unclosed_block() {
        let err = parse_source("fn f() { 1 + 2").expect_err("should fail");
        assert!(matches!(err, EvalError::Syntax { .. }));
    }
}
