//! Instruction set emitted by the IFJ18 expression compiler.

use std::fmt;

use crate::operand::{Operand, Var};

/// Labels of the runtime check routines expressions call when operand types
/// are only known at run time.
pub mod routine {
    /// Adds numbers (promoting a mixed pair) or concatenates strings.
    pub const CHECK_IF_ADD: &str = "$checkIfAdd";
    /// Requires two numbers; promotes a mixed pair to float.
    pub const CHECK_IF_NUM: &str = "$checkIfNum";
    /// Requires two numbers or two strings.
    pub const CHECK_IF_LT_GT: &str = "$checkIfLtGt";
    /// Promotes numbers; makes other type mismatches compare unequal.
    pub const CHECK_IF_EQL: &str = "$checkIfEql";
    /// Requires two booleans.
    pub const CHECK_IF_BOOL: &str = "$checkIfBool";
    /// Divides two numbers of one type.
    pub const DECIDE_DIV_OP: &str = "$decideDivOp";

    pub const ALL: [&str; 6] = [
        CHECK_IF_ADD,
        CHECK_IF_NUM,
        CHECK_IF_LT_GT,
        CHECK_IF_EQL,
        CHECK_IF_BOOL,
        DECIDE_DIV_OP,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // Frames and variables
    DefVar(Var),
    CreateFrame,
    PushFrame,

    // Data stack
    Clears,
    Pushs(Operand),
    Pops(Var),

    // Arithmetic
    Adds,
    Subs,
    Muls,
    Divs,
    IDivs,
    Int2Floats,

    // Relational
    Lts,
    Gts,
    Eqs,

    // Boolean
    Ands,
    Ors,
    Nots,

    // Strings
    Concat(Var, Operand, Operand),

    // Calls and output
    Call(String),
    Write(Operand),
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::DefVar(_) => "DEFVAR",
            Instruction::CreateFrame => "CREATEFRAME",
            Instruction::PushFrame => "PUSHFRAME",
            Instruction::Clears => "CLEARS",
            Instruction::Pushs(_) => "PUSHS",
            Instruction::Pops(_) => "POPS",
            Instruction::Adds => "ADDS",
            Instruction::Subs => "SUBS",
            Instruction::Muls => "MULS",
            Instruction::Divs => "DIVS",
            Instruction::IDivs => "IDIVS",
            Instruction::Int2Floats => "INT2FLOATS",
            Instruction::Lts => "LTS",
            Instruction::Gts => "GTS",
            Instruction::Eqs => "EQS",
            Instruction::Ands => "ANDS",
            Instruction::Ors => "ORS",
            Instruction::Nots => "NOTS",
            Instruction::Concat(..) => "CONCAT",
            Instruction::Call(_) => "CALL",
            Instruction::Write(_) => "WRITE",
        }
    }

    pub fn call(label: &str) -> Self {
        Instruction::Call(label.to_string())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())?;
        match self {
            Instruction::DefVar(v) | Instruction::Pops(v) => write!(f, " {}", v),
            Instruction::Pushs(op) | Instruction::Write(op) => write!(f, " {}", op),
            Instruction::Concat(dst, a, b) => write!(f, " {} {} {}", dst, a, b),
            Instruction::Call(label) => write!(f, " {}", label),
            _ => Ok(()),
        }
    }
}
