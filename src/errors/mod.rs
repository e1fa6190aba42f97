//! Error taxonomy and the central reporting sink.
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
use std::io;
use token::Position;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ErrorKind {
    /// A malformed or out-of-grammar token.
    IllegalValue,
    /// The tokens ran out in the middle of a statement.
    PrematureEnd,
    /// Read of a variable that was never assigned.
    Uninitialized,
    DivideByZero,
    /// An instruction popped more values than were pushed.
    StackUnderflow,
    /// Writing to an output channel failed.
    Output,
}

impl ErrorKind {
    /// Checked errors are found in the tokens, before anything runs.
    pub fn is_checked(&self) -> bool {
        match *self {
            ErrorKind::IllegalValue | ErrorKind::PrematureEnd => true,
            _ => false,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            ErrorKind::IllegalValue => "Illegal value",
            ErrorKind::PrematureEnd => "Premature end",
            ErrorKind::Uninitialized => "Uninitialized",
            ErrorKind::DivideByZero => "Divide by zero",
            ErrorKind::StackUnderflow => "Stack underflow",
            ErrorKind::Output => "Output",
        };
        write!(f, "{}", name)
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<Position>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: &str) -> Error {
        Error {
            kind: kind,
            message: message.into(),
            position: None,
        }
    }

    /// Attaches a position unless the error already carries one.
    pub fn at(mut self, position: Position) -> Error {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.position {
            Some(ref position) => write!(f, "{}: {}: {}", position, self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(ErrorKind::Output, &err.to_string())
    }
}

/// What the driver does after a fault was reported.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Flow {
    Continue,
    Abort,
}

/// Receives every fault raised by any stage of the pipeline.
pub trait Reporter {
    fn report(&mut self, error: &Error) -> Flow;
}

/// Logs every fault and echoes it on stderr.
pub struct LogReporter {
    pub source: String,
}

impl LogReporter {
    pub fn new(source: &str) -> LogReporter {
        LogReporter {
            source: source.into(),
        }
    }
}

impl Reporter for LogReporter {
    fn report(&mut self, error: &Error) -> Flow {
        if error.kind.is_checked() {
            error!("Rejected {}: {:?}", self.source, error.kind);
        } else {
            error!("Fault while running {}: {:?}", self.source, error.kind);
        }
        eprintln!("{}:{}", self.source, error);
        Flow::Continue
    }
}

/// Keeps every reported fault.
pub struct Collector {
    pub errors: Vec<Error>,
    flow: Flow,
}

impl Collector {
    pub fn new(flow: Flow) -> Collector {
        Collector {
            errors: Vec::new(),
            flow: flow,
        }
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(|e| e.kind).collect()
    }
}

impl Reporter for Collector {
    fn report(&mut self, error: &Error) -> Flow {
        debug!("Collected: {}", error);
        self.errors.push(error.clone());
        self.flow
    }
}
