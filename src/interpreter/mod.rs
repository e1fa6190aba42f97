//! Tree-walking interpreter.
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

use std::io::Write;
use errors::Error;
use parser::ast;
use table::SymbolTable;

pub type InterpretResult<T> = ::std::result::Result<T, Error>;

/// Prefix of every value printed by the interpreter.
pub const PRINT_MARKER: &'static str = "===";

pub struct Interpreter<W: Write> {
    table: SymbolTable,
    out: W,
}

/// Computes the value of an expression.
pub fn evaluate(expr: &ast::Expression, table: &SymbolTable) -> InterpretResult<i32> {
    match *expr {
        ast::Expression::Constant(value) => Ok(value),
        ast::Expression::Variable(ref name) => table.load(name),
        ast::Expression::Unary(ref op, ref operand) => {
            let value = evaluate(operand, table)?;
            Ok(op.apply(value))
        }
        ast::Expression::Binary(ref op, ref left, ref right) => {
            let left = evaluate(left, table)?;
            let right = evaluate(right, table)?;
            op.apply(left, right)
        }
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Interpreter<W> {
        Interpreter {
            table: SymbolTable::new(),
            out: out,
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs a whole program on an empty symbol table.
    pub fn interpret(&mut self, program: &ast::Action) -> InterpretResult<()> {
        self.table.clear();
        self.execute(program)
    }

    /// Executes one action, faults are tagged with its position.
    pub fn execute(&mut self, action: &ast::Action) -> InterpretResult<()> {
        match action.kind {
            ast::ActionKind::Sequence(ref actions) => {
                for action in actions {
                    self.execute(action)?;
                }
                Ok(())
            }
            ast::ActionKind::Assignment(ref ident, ref expr) => {
                let value = evaluate(expr, &self.table).map_err(|e| e.at(action.position))?;
                trace!("Interpreter: {} = {}", ident, value);
                self.table.store(ident, value);
                Ok(())
            }
            ast::ActionKind::Print(ref expr) => {
                let value = evaluate(expr, &self.table).map_err(|e| e.at(action.position))?;
                writeln!(self.out, "{} {}", PRINT_MARKER, value)?;
                Ok(())
            }
        }
    }
}
