//! IFJcode18 intermediate representation.
//!
//! This crate defines the stack-machine instructions the expression parser
//! emits, the operands they take, a program container that prints as
//! IFJcode18 text, and helpers that turn scanned literal lexemes into
//! operands.

pub mod instruction;
pub mod literal;
pub mod operand;
pub mod program;

pub use instruction::{routine, Instruction};
pub use literal::{float_operand, hex_float, int_operand, operand_for, string_operand};
pub use operand::{Frame, Operand, Var};
pub use program::Program;
