//! Syntax analysis.
//! Generates an abstract syntax tree based on a vector of tokens.
// Copyright (c) Alexander Koch 2017
use std::iter::Peekable;
use errors::{Error, ErrorKind};
use token::{Token, TokenType, Position};

pub mod ast;
pub type ParsingResult<T> = ::std::result::Result<T, Error>;

/// Statically checks a token sequence before any parsing takes place.
/// Every finding is returned, not just the first one.
pub fn check(tokens: &[Token]) -> Vec<Error> {
    let mut errors = Vec::new();

    for token in tokens {
        if token.typ == TokenType::Illegal {
            let msg = format!(
                "The token `{}` is not a variable, integer, unary or binary operator",
                token.value
            );
            errors.push(Error::new(ErrorKind::IllegalValue, &msg).at(token.position));
        }
    }

    for pair in tokens.windows(2) {
        let (marker, next) = (&pair[0], &pair[1]);
        match marker.typ {
            TokenType::Assignment if next.typ != TokenType::Identifier => {
                let msg = format!(
                    "A variable must follow `{}`, found `{}`",
                    marker.value, next.value
                );
                errors.push(Error::new(ErrorKind::IllegalValue, &msg).at(next.position));
            }
            TokenType::Print if !next.typ.begins_expression() => {
                let msg = format!(
                    "An expression must follow `{}`, found `{}`",
                    marker.value, next.value
                );
                errors.push(Error::new(ErrorKind::IllegalValue, &msg).at(next.position));
            }
            _ => {}
        }
    }

    if let Some(last) = tokens.last() {
        let msg = match last.typ {
            TokenType::Assignment => Some(format!("`{}` requires a variable to follow", last.value)),
            TokenType::Print => Some(format!("`{}` requires an expression to follow", last.value)),
            _ => None,
        };
        if let Some(msg) = msg {
            errors.push(Error::new(ErrorKind::PrematureEnd, &msg).at(last.position));
        }
    }

    errors
}

pub struct Parser<T: Iterator<Item = Token>> {
    tokens: Peekable<T>,
    current: Token,
}

impl<T: Iterator<Item = Token>> Parser<T> {
    /// Creates a new parser based on an iterator of tokens.
    pub fn new(it: T) -> Parser<T> {
        let mut peek = it.peekable();
        let start = peek.next().unwrap_or_else(Token::eof);
        Parser {
            tokens: peek,
            current: start,
        }
    }

    /// Generates an error object at the current token.
    fn err(&self, kind: ErrorKind, message: &str) -> Error {
        let err = Error::new(kind, message);
        if self.current.typ == TokenType::Eof {
            err
        } else {
            err.at(self.current.position)
        }
    }

    /// Builds the error for a token no production accepts.
    fn unexpected(&self, expected: &str) -> Error {
        if self.current.typ == TokenType::Eof {
            let msg = format!("Tokens ended while parsing {}", expected);
            self.err(ErrorKind::PrematureEnd, &msg)
        } else {
            let msg = format!(
                "Unexpected token `{}` while parsing {}",
                self.current.value, expected
            );
            self.err(ErrorKind::IllegalValue, &msg)
        }
    }

    /// 'Bumps' the parser to read the next token.
    /// If there is no token, Token EOF is returned.
    fn bump(&mut self) {
        self.current = self.tokens.next().unwrap_or_else(Token::eof);
    }

    /// Takes the value of the current token and moves on.
    fn take(&mut self) -> String {
        let value = ::std::mem::replace(&mut self.current.value, String::new());
        self.bump();
        value
    }

    pub fn parse_expression(&mut self) -> ParsingResult<ast::Expression> {
        trace!("Parsing: expression {}", self.current);
        match self.current.typ {
            TokenType::Constant => {
                let value = match self.current.value.parse::<i32>() {
                    Ok(v) => v,
                    Err(_) => return Err(self.unexpected("an integer")),
                };
                self.bump();
                Ok(ast::Expression::Constant(value))
            }
            TokenType::Identifier => Ok(ast::Expression::Variable(self.take())),
            TokenType::UnaryOperator => {
                let op = match ast::UnaryOperator::from_symbol(&self.current.value) {
                    Some(op) => op,
                    None => return Err(self.unexpected("a unary operator")),
                };
                self.bump();
                let operand = self.parse_expression()?;
                Ok(ast::Expression::Unary(op, Box::new(operand)))
            }
            TokenType::BinaryOperator => {
                let op = match ast::BinaryOperator::from_symbol(&self.current.value) {
                    Some(op) => op,
                    None => return Err(self.unexpected("a binary operator")),
                };
                self.bump();
                let left = self.parse_expression()?;
                let right = self.parse_expression()?;
                Ok(ast::Expression::Binary(op, Box::new(left), Box::new(right)))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    pub fn parse_assignment(&mut self) -> ParsingResult<ast::Action> {
        trace!("Parsing: assignment");
        let position = self.current.position;
        self.bump();

        if self.current.typ != TokenType::Identifier {
            return Err(self.unexpected("the target of an assignment"));
        }
        let ident = self.take();
        let expr = self.parse_expression()?;

        Ok(ast::Action {
            position: position,
            kind: ast::ActionKind::Assignment(ident, expr),
        })
    }

    pub fn parse_print(&mut self) -> ParsingResult<ast::Action> {
        trace!("Parsing: print");
        let position = self.current.position;
        self.bump();
        let expr = self.parse_expression()?;

        Ok(ast::Action {
            position: position,
            kind: ast::ActionKind::Print(expr),
        })
    }

    pub fn parse_action(&mut self) -> ParsingResult<ast::Action> {
        match self.current.typ {
            TokenType::Assignment => self.parse_assignment(),
            TokenType::Print => self.parse_print(),
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// Parses every remaining statement into one sequence.
    pub fn parse_program(&mut self) -> ParsingResult<ast::Action> {
        trace!("Parsing: program");
        let position = if self.current.typ == TokenType::Eof {
            Position::new(1, 1)
        } else {
            self.current.position
        };

        let mut actions = Vec::new();
        while self.current.typ != TokenType::Eof {
            actions.push(self.parse_action()?);
        }

        Ok(ast::Action {
            position: position,
            kind: ast::ActionKind::Sequence(actions),
        })
    }
}

/// Runs the static checks, then builds the tree.
/// No tree is built when the checks find anything.
pub fn parse(tokens: Vec<Token>) -> Result<ast::Action, Vec<Error>> {
    let errors = check(&tokens);
    if !errors.is_empty() {
        debug!("Static check found {} error(s)", errors.len());
        return Err(errors);
    }

    let mut parser = Parser::new(tokens.into_iter());
    parser.parse_program().map_err(|e| vec![e])
}
