//! Variable storage shared by the interpreter and the stack machine.
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

use std::collections::BTreeMap;
use std::fmt;
use errors::{Error, ErrorKind};

/// Maps variable names to their values, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    values: BTreeMap<String, i32>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            values: BTreeMap::new(),
        }
    }

    /// Looks up a variable.
    /// Unknown names are an error, never an implicit zero.
    pub fn load(&self, name: &str) -> Result<i32, Error> {
        match self.values.get(name) {
            Some(v) => Ok(*v),
            None => {
                let msg = format!("{} has not been initialized", name);
                Err(Error::new(ErrorKind::Uninitialized, &msg))
            }
        }
    }

    pub fn store(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.values.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Symbol table:")?;
        for (name, value) in &self.values {
            write!(f, "\n   {} = {}", name, value)?;
        }
        Ok(())
    }
}
