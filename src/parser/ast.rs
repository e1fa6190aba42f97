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
use errors::{Error, ErrorKind};
use token::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<BinaryOperator> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match *self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }

    /// Computes `left op right` with wrapping 32-bit arithmetic.
    pub fn apply(&self, left: i32, right: i32) -> Result<i32, Error> {
        match *self {
            BinaryOperator::Add => Ok(left.wrapping_add(right)),
            BinaryOperator::Subtract => Ok(left.wrapping_sub(right)),
            BinaryOperator::Multiply => Ok(left.wrapping_mul(right)),
            BinaryOperator::Divide => {
                if right == 0 {
                    let msg = format!("Cannot divide by zero: {} / {}", left, right);
                    Err(Error::new(ErrorKind::DivideByZero, &msg))
                } else {
                    Ok(left.wrapping_div(right))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    SquareRoot,
}

impl UnaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<UnaryOperator> {
        match symbol {
            "_" => Some(UnaryOperator::Negate),
            "#" => Some(UnaryOperator::SquareRoot),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match *self {
            UnaryOperator::Negate => "_",
            UnaryOperator::SquareRoot => "#",
        }
    }

    /// Square roots are taken on `f64` and truncated toward zero.
    /// Negative operands are not rejected: the NaN they produce casts to 0.
    pub fn apply(&self, operand: i32) -> i32 {
        match *self {
            UnaryOperator::Negate => operand.wrapping_neg(),
            UnaryOperator::SquareRoot => f64::from(operand).sqrt() as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(i32),
    Variable(String),
    Unary(UnaryOperator, Box<Expression>),
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Variable(ref name) => write!(f, "{}", name),
            Expression::Unary(ref op, ref operand) => write!(f, "{}{}", op.symbol(), operand),
            Expression::Binary(ref op, ref left, ref right) => {
                write!(f, "( {} {} {} )", left, op.symbol(), right)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub position: Position,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    // p1 p2 ... pn
    Sequence(Vec<Action>),

    // := ident expr
    Assignment(String, Expression),

    // @ expr
    Print(Expression),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ActionKind::Sequence(ref actions) => {
                for (i, action) in actions.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", action)?;
                }
                Ok(())
            }
            ActionKind::Assignment(ref ident, ref expr) => write!(f, "{} := {}", ident, expr),
            ActionKind::Print(ref expr) => write!(f, "Print {}", expr),
        }
    }
}
