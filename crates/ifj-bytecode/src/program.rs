//! Program container for IFJcode18.

use std::fmt;

use crate::instruction::Instruction;

/// Header line every IFJcode18 program starts with.
pub const HEADER: &str = ".IFJcode18";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub code: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.code.iter()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(code: Vec<Instruction>) -> Self {
        Self { code }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", HEADER)?;
        for instruction in &self.code {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
