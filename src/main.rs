//! Dendron interpreter and compiler
// Copyright (c) Alexander Koch 2018
#[macro_use]
extern crate log;
extern crate env_logger;
extern crate clap;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

use std::fs;
use std::io::{self, Write};
use std::process;
use clap::{Arg, App};

pub mod token;
pub mod errors;
pub mod table;
pub mod parser;
pub mod interpreter;
pub mod codegen;
pub mod machine;
use errors::{Error, Flow, LogReporter, Reporter};
use parser::ast;
use token::Token;
use interpreter::Interpreter;
use codegen::Codegen;
use machine::{Listing, Machine};

/// Which execution strategies a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interpret,
    Compile,
    Both,
}

impl Mode {
    pub fn from_name(name: &str) -> Option<Mode> {
        match name {
            "interpret" => Some(Mode::Interpret),
            "compile" => Some(Mode::Compile),
            "both" => Some(Mode::Both),
            _ => None,
        }
    }

    fn interprets(&self) -> bool {
        *self != Mode::Compile
    }

    fn compiles(&self) -> bool {
        *self != Mode::Interpret
    }
}

#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub prelude: Option<ast::Action>,
    pub mode: Mode,
    pub quiet: bool,
}

impl Default for ProgramConfig {
    fn default() -> ProgramConfig {
        ProgramConfig {
            prelude: None,
            mode: Mode::Both,
            quiet: false,
        }
    }
}

/// Parses a token sequence, handing every diagnostic to the reporter.
pub fn generate_ast<R: Reporter>(tokens: Vec<Token>, reporter: &mut R) -> Option<ast::Action> {
    debug!("{} tokens", tokens.len());
    match parser::parse(tokens) {
        Ok(program) => {
            debug!("{:?}", program);
            Some(program)
        }
        Err(errors) => {
            for err in &errors {
                if reporter.report(err) == Flow::Abort {
                    break;
                }
            }
            None
        }
    }
}

/// Runs the prelude statements ahead of the program.
fn chain(prelude: ast::Action, program: ast::Action) -> ast::Action {
    let position = program.position;
    let mut actions = Vec::new();
    for part in vec![prelude, program] {
        match part.kind {
            ast::ActionKind::Sequence(inner) => actions.extend(inner),
            _ => actions.push(part),
        }
    }
    ast::Action {
        position: position,
        kind: ast::ActionKind::Sequence(actions),
    }
}

/// Parses and runs a program with the configured strategies.
/// Returns how many stages failed; a rejected program counts once.
pub fn evaluate<R: Reporter, W: Write>(
    tokens: Vec<Token>,
    config: &ProgramConfig,
    reporter: &mut R,
    out: &mut W,
) -> Result<usize, Error> {
    let program = match generate_ast(tokens, reporter) {
        Some(p) => p,
        None => return Ok(1),
    };
    let program = match config.prelude {
        Some(ref prelude) => chain(prelude.clone(), program),
        None => program,
    };

    if !config.quiet {
        writeln!(out, "The Program, with expressions in infix notation:")?;
        writeln!(out, "{}", program)?;
        writeln!(out)?;
    }

    let mut faults = 0;
    if config.mode.interprets() {
        writeln!(out, "Interpreting the parse tree...")?;
        let mut interpreter = Interpreter::new(&mut *out);
        match interpreter.interpret(&program) {
            Ok(()) => {
                let table = interpreter.table().clone();
                let out = interpreter.into_output();
                writeln!(out, "Interpretation complete.")?;
                writeln!(out, "{}", table)?;
                writeln!(out)?;
            }
            Err(e) => {
                faults += 1;
                if reporter.report(&e) == Flow::Abort {
                    return Ok(faults);
                }
            }
        }
    }

    if config.mode.compiles() {
        let instructions = Codegen::new().compile(&program);
        if !config.quiet {
            writeln!(out, "Compiled code:")?;
            writeln!(out, "{}", Listing(&instructions))?;
            writeln!(out)?;
        }

        writeln!(out, "Executing compiled code...")?;
        let mut machine = Machine::new(&mut *out);
        match machine.execute(&instructions) {
            Ok(report) => {
                let out = machine.into_output();
                writeln!(out, "{}", report)?;
            }
            Err(e) => {
                faults += 1;
                reporter.report(&e);
            }
        }
    }

    Ok(faults)
}

fn main() {
    env_logger::init();

    let matches = App::new("dendron")
        .version(VERSION.unwrap_or("Unknown"))
        .author("Alexander Koch <kochalexander@gmx.net>")
        .about("Interprets and compiles Dendron programs")
        .arg(Arg::with_name("FILE")
            .help("Sets the input file to use")
            .required(true))
        .arg(Arg::with_name("input")
            .help("Sets up a start-up program")
            .required(false)
            .value_name("INPUT")
            .takes_value(true)
            .short("i")
            .long("input"))
        .arg(Arg::with_name("mode")
            .help("Selects the execution strategies (default is both)")
            .required(false)
            .value_name("MODE")
            .takes_value(true)
            .possible_values(&["interpret", "compile", "both"])
            .short("m")
            .long("mode"))
        .arg(Arg::with_name("quiet")
            .help("Skips the infix listing and the compiled code")
            .short("q")
            .long("quiet"))
        .get_matches();

    let file = matches.value_of("FILE").unwrap_or_default();
    let mut reporter = LogReporter::new(file);

    let prelude = match matches.value_of("input") {
        Some(x) => match generate_ast(token::scan(x), &mut reporter) {
            Some(p) => Some(p),
            None => process::exit(1),
        },
        None => None,
    };

    let config = ProgramConfig {
        prelude: prelude,
        mode: matches
            .value_of("mode")
            .and_then(Mode::from_name)
            .unwrap_or(Mode::Both),
        quiet: matches.is_present("quiet"),
    };

    debug!("Reading {}...", file);
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", file, e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match evaluate(token::scan(&content), &config, &mut reporter, &mut out) {
        Ok(0) => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            reporter.report(&e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::{Collector, ErrorKind};
    use machine::Instruction;
    use table::SymbolTable;
    use token::from_words;

    fn words(input: &str) -> Vec<Token> {
        from_words(input.split_whitespace())
    }

    fn run(input: &str, config: &ProgramConfig, flow: Flow) -> (usize, Collector, String) {
        let mut sink = Collector::new(flow);
        let mut out = Vec::new();
        let faults = evaluate(words(input), config, &mut sink, &mut out).unwrap();
        (faults, sink, String::from_utf8(out).unwrap())
    }

    fn interpreted(input: &str) -> Result<SymbolTable, Error> {
        let program = generate_ast(words(input), &mut Collector::new(Flow::Continue)).unwrap();
        let mut interpreter = Interpreter::new(Vec::new());
        interpreter.interpret(&program)?;
        Ok(interpreter.table().clone())
    }

    fn executed(input: &str) -> Result<SymbolTable, Error> {
        let program = generate_ast(words(input), &mut Collector::new(Flow::Continue)).unwrap();
        let instructions = Codegen::new().compile(&program);
        let mut machine = Machine::new(Vec::new());
        machine.execute(&instructions).map(|report| report.table)
    }

    #[test]
    fn test_both_strategies() {
        let (faults, sink, out) = run(":= x + 3 4 @ x", &ProgramConfig::default(), Flow::Continue);
        assert_eq!(faults, 0);
        assert!(sink.errors.is_empty());
        assert_eq!(
            out,
            "The Program, with expressions in infix notation:\n\
             x := ( 3 + 4 )\n\
             Print x\n\
             \n\
             Interpreting the parse tree...\n\
             === 7\n\
             Interpretation complete.\n\
             Symbol table:\n   x = 7\n\
             \n\
             Compiled code:\n\
             PUSH 3\nPUSH 4\nADD\nSTORE x\nLOAD x\nPRINT\n\
             \n\
             Executing compiled code...\n\
             *** 7\n\
             Machine: execution ended with 0 items left on the stack.\n\
             Symbol table:\n   x = 7\n"
        );
    }

    #[test]
    fn test_listing_matches_example() {
        let program = generate_ast(words(":= x + 3 4 @ x"), &mut Collector::new(Flow::Continue)).unwrap();
        assert_eq!(
            Codegen::new().compile(&program),
            vec![
                Instruction::Push(3),
                Instruction::Push(4),
                Instruction::Add,
                Instruction::Store("x".into()),
                Instruction::Load("x".into()),
                Instruction::Print,
            ]
        );
    }

    #[test]
    fn test_equivalence() {
        let programs = vec![
            ":= x + 3 4 @ x",
            ":= w _ 5",
            ":= a 17 := b 5 := q / a b := r - a * q b := s # * a a",
            ":= v # _ 4",
            ":= n -2147483648 := m _ n := d / n -1 := p * 65536 65536",
            ":= t 1 := t + t t := t * t t := u - 0 t @ u",
            ":= big 2147483647 := wrap + big 1 := root # big",
        ];
        for program in programs {
            let tree = interpreted(program).unwrap();
            let machine = executed(program).unwrap();
            assert!(!tree.is_empty());
            assert_eq!(tree, machine, "tables differ for `{}`", program);
        }
    }

    #[test]
    fn test_negate() {
        assert_eq!(interpreted(":= w _ 5").unwrap().get("w"), Some(-5));
        assert_eq!(executed(":= w _ 5").unwrap().get("w"), Some(-5));
    }

    #[test]
    fn test_negative_square_root() {
        let tree = interpreted(":= v # _ 4").unwrap();
        let machine = executed(":= v # _ 4").unwrap();
        assert_eq!(tree.get("v"), machine.get("v"));
        assert_eq!(tree.get("v"), Some(0));
    }

    #[test]
    fn test_divide_by_zero() {
        let err = interpreted(":= y / 10 0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivideByZero);
        let err = executed(":= y / 10 0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivideByZero);

        let (faults, sink, out) = run(":= y / 10 0", &ProgramConfig::default(), Flow::Continue);
        assert_eq!(faults, 2);
        assert_eq!(sink.kinds(), vec![ErrorKind::DivideByZero, ErrorKind::DivideByZero]);
        assert!(!out.contains("y ="));
    }

    #[test]
    fn test_uninitialized() {
        assert_eq!(interpreted("@ z").unwrap_err().kind, ErrorKind::Uninitialized);
        assert_eq!(executed("@ z").unwrap_err().kind, ErrorKind::Uninitialized);
    }

    #[test]
    fn test_abort_skips_compilation() {
        let (faults, sink, out) = run("@ z", &ProgramConfig::default(), Flow::Abort);
        assert_eq!(faults, 1);
        assert_eq!(sink.kinds(), vec![ErrorKind::Uninitialized]);
        assert!(!out.contains("Compiled code:"));
    }

    #[test]
    fn test_premature_assignment() {
        let (faults, sink, out) = run(":=", &ProgramConfig::default(), Flow::Continue);
        assert_eq!(faults, 1);
        assert_eq!(sink.kinds(), vec![ErrorKind::PrematureEnd]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_static_errors_abort() {
        let mut sink = Collector::new(Flow::Abort);
        assert!(generate_ast(words(":= 1 2 % @"), &mut sink).is_none());
        assert_eq!(sink.errors.len(), 1);

        let mut sink = Collector::new(Flow::Continue);
        assert!(generate_ast(words(":= 1 2 % @"), &mut sink).is_none());
        assert_eq!(
            sink.kinds(),
            vec![ErrorKind::IllegalValue, ErrorKind::IllegalValue, ErrorKind::PrematureEnd]
        );
    }

    #[test]
    fn test_prelude() {
        let prelude = generate_ast(words(":= x 5"), &mut Collector::new(Flow::Abort));
        let config = ProgramConfig {
            prelude: prelude,
            mode: Mode::Compile,
            quiet: true,
        };
        let (faults, _, out) = run("@ * x 2", &config, Flow::Abort);
        assert_eq!(faults, 0);
        assert_eq!(
            out,
            "Executing compiled code...\n\
             *** 10\n\
             Machine: execution ended with 0 items left on the stack.\n\
             Symbol table:\n   x = 5\n"
        );
    }

    #[test]
    fn test_interpret_only() {
        let config = ProgramConfig {
            prelude: None,
            mode: Mode::Interpret,
            quiet: true,
        };
        let (faults, _, out) = run("@ # 81", &config, Flow::Abort);
        assert_eq!(faults, 0);
        assert_eq!(
            out,
            "Interpreting the parse tree...\n=== 9\nInterpretation complete.\nSymbol table:\n\n"
        );
    }

    #[test]
    fn test_modes() {
        assert_eq!(Mode::from_name("compile"), Some(Mode::Compile));
        assert_eq!(Mode::from_name("jit"), None);
        assert!(Mode::Both.interprets() && Mode::Both.compiles());
        assert!(!Mode::Interpret.compiles());
    }
}
