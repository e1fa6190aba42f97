//! Token classification.
//! Turns whitespace-delimited words into typed tokens.
// Copyright (C) 2018 Alexander Koch
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

pub const ASSIGNMENT: &'static str = ":=";
pub const PRINT: &'static str = "@";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TokenType {
    Eof,
    Constant,
    Identifier,
    BinaryOperator,
    UnaryOperator,
    Assignment,
    Print,
    Illegal,
}

impl TokenType {
    /// Tests if a token of this type may start an expression.
    pub fn begins_expression(&self) -> bool {
        match *self {
            TokenType::Constant
            | TokenType::Identifier
            | TokenType::BinaryOperator
            | TokenType::UnaryOperator => true,
            _ => false,
        }
    }
}

/// Location of a token.
/// The column counts tokens on the line, not characters.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct Position {
    pub line: i32,
    pub column: i32,
}

impl Position {
    pub fn new(line: i32, column: i32) -> Position {
        Position {
            line: line,
            column: column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct Token {
    pub typ: TokenType,
    pub value: String,
    pub position: Position,
}

impl Token {
    /// Creates a classified token from a single word.
    pub fn new(value: &str, position: Position) -> Token {
        Token {
            typ: classify(value),
            value: value.to_owned(),
            position: position,
        }
    }

    /// The end marker handed out once the token sequence is exhausted.
    pub fn eof() -> Token {
        Token {
            typ: TokenType::Eof,
            value: String::new(),
            position: Position::new(-1, -1),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Token ({:?}, {:?})", self.typ, self.value)
    }
}

/// An integer literal is anything `i32` accepts, including a leading sign.
pub fn is_constant(value: &str) -> bool {
    value.parse::<i32>().is_ok()
}

/// Identifiers start with a letter, the rest is free.
pub fn is_identifier(value: &str) -> bool {
    value
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
}

pub fn is_unary_operator(value: &str) -> bool {
    match value {
        "_" | "#" => true,
        _ => false,
    }
}

pub fn is_binary_operator(value: &str) -> bool {
    match value {
        "+" | "-" | "*" | "/" => true,
        _ => false,
    }
}

/// Determines the token type of a word.
/// The order matters: `-5` is a constant, `-` an operator.
pub fn classify(value: &str) -> TokenType {
    if is_constant(value) {
        TokenType::Constant
    } else if is_identifier(value) {
        TokenType::Identifier
    } else if is_unary_operator(value) {
        TokenType::UnaryOperator
    } else if is_binary_operator(value) {
        TokenType::BinaryOperator
    } else if value == ASSIGNMENT {
        TokenType::Assignment
    } else if value == PRINT {
        TokenType::Print
    } else {
        TokenType::Illegal
    }
}

/// Classifies an already split word list.
/// Every word is placed on line 1.
pub fn from_words<I, S>(words: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| Token::new(w.as_ref(), Position::new(1, i as i32 + 1)))
        .collect()
}

/// Splits a program text on whitespace and classifies every word.
pub fn scan(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (line, text) in src.lines().enumerate() {
        for (column, word) in text.split_whitespace().enumerate() {
            let position = Position::new(line as i32 + 1, column as i32 + 1);
            tokens.push(Token::new(word, position));
        }
    }
    tokens
}
