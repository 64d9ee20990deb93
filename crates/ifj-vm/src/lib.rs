//! IFJ18 VM: executes IFJcode18 programs.
//!
//! The machine keeps a data stack, a global frame, a stack of local frames and
//! an optional temporary frame. The runtime check routines compiled
//! expressions call are built in.

pub mod display;
mod routines;
pub mod value;
pub mod vm;

pub use value::Value;
pub use vm::Vm;

/// Runtime error codes of IFJcode18.
pub mod codes {
    /// Undefined label or variable redefinition.
    pub const SEMANTIC: u8 = 52;
    /// Wrong operand types.
    pub const OPERAND_TYPE: u8 = 53;
    /// Access to a variable that does not exist.
    pub const UNDEFINED_VARIABLE: u8 = 54;
    /// The frame does not exist.
    pub const MISSING_FRAME: u8 = 55;
    /// Empty data stack or uninitialized variable.
    pub const MISSING_VALUE: u8 = 56;
    /// Division by zero.
    pub const ZERO_DIVISION: u8 = 57;
}
