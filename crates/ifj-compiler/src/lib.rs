//! IFJ18 compiler driver: scripts of expression lines -> IFJcode18.
//!
//! Every line of a script is either `name = expression`, which stores the
//! value in a local variable, or a bare expression, whose value is written to
//! standard output followed by a newline. Empty lines are skipped.

mod builder;
pub mod compiler;

pub use builder::{TMP, TMP2};
pub use compiler::Compiler;

use ifj_bytecode::Program;
use ifj_syntax::error::Result;

/// Compile a complete script with a fresh [`Compiler`].
pub fn compile_source(source: &str) -> Result<Program> {
    Compiler::new().compile_source(source)
}
