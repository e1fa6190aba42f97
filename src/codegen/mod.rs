//! Stack machine code generation
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

use machine::Instruction;
use parser::ast;

/// Lowers a tree into machine instructions, operands before operators.
#[derive(Debug, Clone, Default)]
pub struct Codegen {
    instructions: Vec<Instruction>,
}

impl Codegen {
    pub fn new() -> Codegen {
        Codegen {
            instructions: Vec::new(),
        }
    }

    /// Emits the instructions for a whole program.
    /// Emission never fails and never evaluates anything.
    pub fn compile(&mut self, program: &ast::Action) -> Vec<Instruction> {
        self.instructions.clear();
        self.codegen_action(program);
        debug!("Codegen: emitted {} instructions", self.instructions.len());
        ::std::mem::replace(&mut self.instructions, Vec::new())
    }

    fn codegen_action(&mut self, action: &ast::Action) {
        match action.kind {
            ast::ActionKind::Sequence(ref actions) => {
                for action in actions {
                    self.codegen_action(action);
                }
            }
            ast::ActionKind::Assignment(ref ident, ref expr) => {
                trace!("Codegen: assignment");
                self.codegen_expression(expr);
                self.instructions.push(Instruction::Store(ident.to_owned()));
            }
            ast::ActionKind::Print(ref expr) => {
                trace!("Codegen: print");
                self.codegen_expression(expr);
                self.instructions.push(Instruction::Print);
            }
        }
    }

    fn codegen_expression(&mut self, expr: &ast::Expression) {
        match *expr {
            ast::Expression::Constant(value) => self.instructions.push(Instruction::Push(value)),
            ast::Expression::Variable(ref name) => {
                self.instructions.push(Instruction::Load(name.to_owned()))
            }
            ast::Expression::Unary(op, ref operand) => {
                self.codegen_expression(operand);
                self.instructions.push(Instruction::from(op));
            }
            ast::Expression::Binary(op, ref left, ref right) => {
                self.codegen_expression(left);
                self.codegen_expression(right);
                self.instructions.push(Instruction::from(op));
            }
        }
    }
}
