use std::io::{self, Stdout, Write};

use ifj_bytecode::Var;
use ifj_compiler::Compiler;
use ifj_syntax::error::Result;
use ifj_vm::display::display_value;
use ifj_vm::Vm;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::common::{paint, render_error};

struct Session {
    compiler: Compiler,
    vm: Vm<Stdout>,
}

impl Session {
    fn new() -> Result<Self> {
        let mut compiler = Compiler::new();
        let mut vm = Vm::stdout();
        // Set up frames and scratch variables before any user input.
        let prologue = compiler.compile_source("")?;
        vm.run(&prologue)?;
        Ok(Self { compiler, vm })
    }

    /// Compile and run one line. The symbol table only changes when the line
    /// ran to completion.
    fn eval(&mut self, line: &str) -> Result<()> {
        let snapshot = self.compiler.clone();
        let program = self.compiler.compile_source(line)?;
        if let Err(e) = self.vm.run(&program) {
            self.compiler = snapshot;
            let _ = io::stdout().flush();
            return Err(e);
        }
        Ok(())
    }

    fn print_vars(&self) {
        let mut any = false;
        for name in self.compiler.declared() {
            any = true;
            let value = match self.vm.variable(&Var::local(name)) {
                Some(v) => format!("{} ({})", display_value(v), v.type_name()),
                None => "<unset>".to_string(),
            };
            println!(
                "{} = {}",
                paint(name, |s| s.yellow().to_string()),
                paint(&value, |s| s.bright_blue().to_string())
            );
        }
        if !any {
            println!("{}", paint("<no vars>", |s| s.dimmed().to_string()));
        }
    }
}

fn print_help() {
    println!("{}", paint("Commands:", |s| s.bold().to_string()));
    for (cmd, what) in [
        (":help", "Show this help"),
        (":quit", "Exit the REPL"),
        (":vars", "List variables and their values"),
        (":reset", "Forget all variables"),
    ] {
        println!("  {}  {}", paint(cmd, |s| s.yellow().to_string()), what);
    }
    println!("Each line is an expression, printed when evaluated, or an assignment 'name = expression'.");
}

pub fn start_repl() {
    debug!("starting repl");
    println!("{}", paint("IFJ18 REPL. Type :help for help, :quit to exit.", |s| s.bold().green().to_string()));

    let mut session = match Session::new() {
        Ok(s) => s,
        Err(e) => {
            render_error("", &e);
            return;
        }
    };

    loop {
        print!("{}", paint("ifj> ", |s| s.cyan().to_string()));
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                println!("\nGoodbye.");
                break;
            }
            Ok(_) => {}
            Err(_) => {
                println!("<input error>");
                break;
            }
        }
        let trimmed = line.trim_end();

        if trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => print_help(),
                ":vars" => session.print_vars(),
                ":reset" => match Session::new() {
                    Ok(fresh) => {
                        session = fresh;
                        println!("{}", paint("State reset.", |s| s.yellow().to_string()));
                    }
                    Err(e) => render_error("", &e),
                },
                _ => println!("{}", paint("Unknown command. Type :help.", |s| s.red().to_string())),
            }
            continue;
        }

        debug!(line = trimmed, "evaluating");
        if let Err(e) = session.eval(trimmed) {
            render_error(trimmed, &e);
        }
    }
}
