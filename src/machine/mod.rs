//! Stack machine.
//! Runs a linear instruction sequence against a value stack and a
//! symbol table.
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
use std::io::Write;
use errors::{Error, ErrorKind};
use parser::ast::{BinaryOperator, UnaryOperator};
use table::SymbolTable;

pub type MachineResult<T> = ::std::result::Result<T, Error>;

/// Prefix of every value printed by the machine.
pub const PRINT_MARKER: &'static str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Push(i32),
    Load(String),
    Store(String),
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,
    SquareRoot,
    Print,
}

impl From<BinaryOperator> for Instruction {
    fn from(op: BinaryOperator) -> Instruction {
        match op {
            BinaryOperator::Add => Instruction::Add,
            BinaryOperator::Subtract => Instruction::Subtract,
            BinaryOperator::Multiply => Instruction::Multiply,
            BinaryOperator::Divide => Instruction::Divide,
        }
    }
}

impl From<UnaryOperator> for Instruction {
    fn from(op: UnaryOperator) -> Instruction {
        match op {
            UnaryOperator::Negate => Instruction::Negate,
            UnaryOperator::SquareRoot => Instruction::SquareRoot,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::Push(value) => write!(f, "PUSH {}", value),
            Instruction::Load(ref name) => write!(f, "LOAD {}", name),
            Instruction::Store(ref name) => write!(f, "STORE {}", name),
            Instruction::Add => write!(f, "ADD"),
            Instruction::Subtract => write!(f, "SUB"),
            Instruction::Multiply => write!(f, "MUL"),
            Instruction::Divide => write!(f, "DIV"),
            Instruction::Negate => write!(f, "NEG"),
            Instruction::SquareRoot => write!(f, "SQRT"),
            Instruction::Print => write!(f, "PRINT"),
        }
    }
}

/// One instruction per line.
pub struct Listing<'a>(pub &'a [Instruction]);

impl<'a> fmt::Display for Listing<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, instruction) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// Machine state left over after a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub stack_depth: usize,
    pub table: SymbolTable,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Machine: execution ended with {} items left on the stack.",
            self.stack_depth
        )?;
        write!(f, "{}", self.table)
    }
}

pub struct Machine<W: Write> {
    stack: Vec<i32>,
    table: SymbolTable,
    out: W,
}

impl<W: Write> Machine<W> {
    /// Creates a machine printing to `out`.
    pub fn new(out: W) -> Machine<W> {
        Machine {
            stack: Vec::new(),
            table: SymbolTable::new(),
            out: out,
        }
    }

    /// Variables bound so far, also after a failed run.
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn stack(&self) -> &[i32] {
        &self.stack
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.table.clear();
    }

    fn pop(&mut self, instruction: &Instruction) -> MachineResult<i32> {
        match self.stack.pop() {
            Some(v) => Ok(v),
            None => {
                let msg = format!("`{}` found an empty stack", instruction);
                Err(Error::new(ErrorKind::StackUnderflow, &msg))
            }
        }
    }

    fn binary(&mut self, instruction: &Instruction, op: BinaryOperator) -> MachineResult<()> {
        let right = self.pop(instruction)?;
        let left = self.pop(instruction)?;
        let result = op.apply(left, right)?;
        self.stack.push(result);
        Ok(())
    }

    fn unary(&mut self, instruction: &Instruction, op: UnaryOperator) -> MachineResult<()> {
        let operand = self.pop(instruction)?;
        self.stack.push(op.apply(operand));
        Ok(())
    }

    /// Executes a single instruction against the current state.
    pub fn step(&mut self, instruction: &Instruction) -> MachineResult<()> {
        trace!("Machine: {} {:?}", instruction, self.stack);
        match *instruction {
            Instruction::Push(value) => {
                self.stack.push(value);
                Ok(())
            }
            Instruction::Load(ref name) => {
                let value = self.table.load(name)?;
                self.stack.push(value);
                Ok(())
            }
            Instruction::Store(ref name) => {
                let value = self.pop(instruction)?;
                self.table.store(name, value);
                Ok(())
            }
            Instruction::Add => self.binary(instruction, BinaryOperator::Add),
            Instruction::Subtract => self.binary(instruction, BinaryOperator::Subtract),
            Instruction::Multiply => self.binary(instruction, BinaryOperator::Multiply),
            Instruction::Divide => self.binary(instruction, BinaryOperator::Divide),
            Instruction::Negate => self.unary(instruction, UnaryOperator::Negate),
            Instruction::SquareRoot => self.unary(instruction, UnaryOperator::SquareRoot),
            Instruction::Print => {
                let value = self.pop(instruction)?;
                writeln!(self.out, "{} {}", PRINT_MARKER, value)?;
                Ok(())
            }
        }
    }

    /// Runs a program from a pristine state and reports what is left.
    /// The first fault stops the run.
    pub fn execute(&mut self, program: &[Instruction]) -> MachineResult<Report> {
        self.reset();
        debug!("Machine: executing {} instructions", program.len());
        for instruction in program {
            self.step(instruction)?;
        }

        Ok(Report {
            stack_depth: self.stack.len(),
            table: self.table.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: &[Instruction]) -> (MachineResult<Report>, Machine<Vec<u8>>) {
        let mut machine = Machine::new(Vec::new());
        let result = machine.execute(program);
        (result, machine)
    }

    fn output(machine: Machine<Vec<u8>>) -> String {
        String::from_utf8(machine.into_output()).unwrap()
    }

    #[test]
    fn test_store_and_print() {
        let program = vec![
            Instruction::Push(3),
            Instruction::Push(4),
            Instruction::Add,
            Instruction::Store("x".into()),
            Instruction::Load("x".into()),
            Instruction::Print,
        ];
        let (result, machine) = run(&program);
        let report = result.unwrap();
        assert_eq!(report.stack_depth, 0);
        assert_eq!(report.table.get("x"), Some(7));
        assert_eq!(output(machine), "*** 7\n");
    }

    #[test]
    fn test_operand_order() {
        let program = vec![
            Instruction::Push(10),
            Instruction::Push(4),
            Instruction::Subtract,
            Instruction::Push(3),
            Instruction::Divide,
        ];
        let (result, machine) = run(&program);
        assert_eq!(result.unwrap().stack_depth, 1);
        assert_eq!(machine.stack(), &[2]);
    }

    #[test]
    fn test_divide_by_zero() {
        let program = vec![
            Instruction::Push(10),
            Instruction::Push(0),
            Instruction::Divide,
            Instruction::Store("y".into()),
        ];
        let (result, machine) = run(&program);
        assert_eq!(result.unwrap_err().kind, ErrorKind::DivideByZero);
        assert_eq!(machine.table().get("y"), None);
        assert!(machine.stack().is_empty());
    }

    #[test]
    fn test_uninitialized() {
        let (result, _) = run(&[Instruction::Load("z".into()), Instruction::Print]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Uninitialized);
        assert!(err.message.contains("z"));
    }

    #[test]
    fn test_underflow() {
        let (result, _) = run(&[Instruction::Push(1), Instruction::Add]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::StackUnderflow);
    }

    #[test]
    fn test_unary() {
        let program = vec![
            Instruction::Push(4),
            Instruction::Negate,
            Instruction::SquareRoot,
            Instruction::Store("v".into()),
            Instruction::Push(26),
            Instruction::SquareRoot,
            Instruction::Negate,
            Instruction::Store("w".into()),
        ];
        let (result, _) = run(&program);
        let table = result.unwrap().table;
        assert_eq!(table.get("v"), Some(0));
        assert_eq!(table.get("w"), Some(-5));
    }

    #[test]
    fn test_runs_are_independent() {
        let mut machine = Machine::new(Vec::new());
        let first = machine.execute(&[Instruction::Push(1), Instruction::Store("a".into())]);
        assert!(first.is_ok());

        let second = machine.execute(&[Instruction::Push(2)]).unwrap();
        assert_eq!(second.stack_depth, 1);
        assert!(second.table.is_empty());

        let third = machine.execute(&[Instruction::Load("a".into())]);
        assert_eq!(third.unwrap_err().kind, ErrorKind::Uninitialized);
    }

    #[test]
    fn test_listing() {
        let program = vec![
            Instruction::Push(-3),
            Instruction::Load("x".into()),
            Instruction::Multiply,
            Instruction::SquareRoot,
            Instruction::Store("y".into()),
        ];
        assert_eq!(
            format!("{}", Listing(&program)),
            "PUSH -3\nLOAD x\nMUL\nSQRT\nSTORE y"
        );
    }

    #[test]
    fn test_report() {
        let (result, _) = run(&[Instruction::Push(5), Instruction::Store("n".into())]);
        assert_eq!(
            format!("{}", result.unwrap()),
            "Machine: execution ended with 0 items left on the stack.\nSymbol table:\n   n = 5"
        );
    }
}
