mod common;
mod repl;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Once;

use clap::{Parser, Subcommand};
use ifj_bytecode::Program;
use ifj_compiler::Compiler;
use ifj_lexer::Scanner;
use ifj_syntax::error::{Error, ErrorKind};
use ifj_syntax::token::TokenList;
use ifj_vm::Vm;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::common::{paint, render_error, render_errors};

/// Scanner and expression compiler for IFJ18 scripts.
#[derive(Debug, Parser)]
#[command(name = "ifjc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tokens of a source file
    Tokens { file: PathBuf },
    /// Compile a source file to IFJcode18
    Compile {
        file: PathBuf,
        /// Write the program here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Treat NAME as an already declared variable
        #[arg(long = "declare", value_name = "NAME")]
        declare: Vec<String>,
    },
    /// Compile a source file and execute it
    Run { file: PathBuf },
    /// Evaluate lines interactively
    Repl,
}

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn fail_plain(msg: &str, code: i32) -> ! {
    eprintln!(
        "{}: {}",
        paint("error", |s| s.red().bold().to_string()),
        paint(msg, |s| s.red().to_string())
    );
    process::exit(code);
}

fn fail(source: &str, err: &Error) -> ! {
    render_error(source, err);
    process::exit(err.code());
}

fn read_source(path: &Path) -> String {
    if !path.exists() {
        fail_plain(&format!("File not found: {}", path.display()), ErrorKind::Io.code());
    }
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => fail_plain(
            &format!("Failed to read {}: {}", path.display(), e),
            ErrorKind::Io.code(),
        ),
    }
}

fn scan(source: &str) -> TokenList {
    match Scanner::new(source).tokenize() {
        Ok(tokens) => tokens,
        Err(errors) => {
            render_errors(source, &errors);
            let code = errors.first().map_or(ErrorKind::Lexical.code(), Error::code);
            process::exit(code);
        }
    }
}

fn compile(source: &str, compiler: &mut Compiler) -> Program {
    let tokens = scan(source);
    match compiler.compile(&tokens) {
        Ok(program) => program,
        Err(e) => fail(source, &e),
    }
}

fn print_tokens(file: &Path) {
    debug!(file = %file.display(), "listing tokens");
    let source = read_source(file);
    for token in &scan(&source) {
        println!("{}:{}  {}", token.line, token.col, token.kind);
    }
}

fn compile_file(file: &Path, output: Option<&Path>, declare: Vec<String>) {
    debug!(file = %file.display(), declared = declare.len(), "compiling file");
    let source = read_source(file);
    let program = compile(&source, &mut Compiler::with_declared(declare));
    match output {
        Some(out) => {
            if let Err(e) = fs::write(out, program.to_string()) {
                fail_plain(
                    &format!("Failed to write {}: {}", out.display(), e),
                    ErrorKind::Io.code(),
                );
            }
        }
        None => print!("{}", program),
    }
    debug!(instructions = program.len(), "compiled");
}

fn run_file(file: &Path) {
    debug!(file = %file.display(), "running file");
    let source = read_source(file);
    let program = compile(&source, &mut Compiler::new());
    let mut vm = Vm::stdout();
    if let Err(e) = vm.run(&program) {
        let _ = io::stdout().flush();
        fail(&source, &e);
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Tokens { file }) => print_tokens(&file),
        Some(Command::Compile { file, output, declare }) => compile_file(&file, output.as_deref(), declare),
        Some(Command::Run { file }) => run_file(&file),
        Some(Command::Repl) | None => repl::start_repl(),
    }
}
