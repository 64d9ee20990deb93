//! Fixed instruction sequences around compiled expressions.

use ifj_bytecode::{Instruction, Operand, Var};
use ifj_parser::CodeSink;

/// Scratch variable used by conversions and discarded comparison operands.
pub const TMP: &str = "$tmp";
/// Second scratch variable, needed by string concatenation.
pub const TMP2: &str = "$tmp2";

/// Scratch globals, the local frame that holds script variables, and an
/// empty data stack.
pub(crate) fn prologue<C: CodeSink + ?Sized>(sink: &mut C) {
    sink.emit(Instruction::DefVar(Var::global(TMP)));
    sink.emit(Instruction::DefVar(Var::global(TMP2)));
    sink.emit(Instruction::CreateFrame);
    sink.emit(Instruction::PushFrame);
    sink.emit(Instruction::Clears);
}

/// Store the expression result in `name`, defining it first if needed.
pub(crate) fn assign<C: CodeSink + ?Sized>(sink: &mut C, name: &str, define: bool) {
    let var = Var::local(name);
    if define {
        sink.emit(Instruction::DefVar(var.clone()));
    }
    sink.emit(Instruction::Pops(var));
}

/// Print the expression result followed by a newline.
pub(crate) fn print_result<C: CodeSink + ?Sized>(sink: &mut C) {
    let tmp = Var::global(TMP);
    sink.emit(Instruction::Pops(tmp.clone()));
    sink.emit(Instruction::Write(Operand::Var(tmp)));
    sink.emit(Instruction::Write(Operand::Str("\n".to_string())));
}
