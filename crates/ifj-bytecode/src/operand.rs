//! Operands of IFJcode18 instructions.

use std::fmt;

use crate::literal::hex_float;

/// Variable frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Global frame, `GF`
    Global,
    /// Top of the local frame stack, `LF`
    Local,
    /// Temporary frame, `TF`
    Temporary,
}

impl Frame {
    pub fn prefix(self) -> &'static str {
        match self {
            Frame::Global => "GF",
            Frame::Local => "LF",
            Frame::Temporary => "TF",
        }
    }
}

/// A variable reference such as `LF@count`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var {
    pub frame: Frame,
    pub name: String,
}

impl Var {
    pub fn new(frame: Frame, name: impl Into<String>) -> Self {
        Self {
            frame,
            name: name.into(),
        }
    }

    pub fn global(name: impl Into<String>) -> Self {
        Self::new(Frame::Global, name)
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self::new(Frame::Local, name)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame.prefix(), self.name)
    }
}

/// A constant or a variable operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    /// Decoded string value; escaped again when printed.
    Str(String),
    Var(Var),
}

impl From<Var> for Operand {
    fn from(var: Var) -> Self {
        Operand::Var(var)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(n) => write!(f, "int@{}", n),
            Operand::Float(x) => write!(f, "float@{}", hex_float(*x)),
            Operand::Bool(b) => write!(f, "bool@{}", b),
            Operand::Nil => f.write_str("nil@nil"),
            Operand::Str(s) => {
                f.write_str("string@")?;
                for c in s.chars() {
                    match c {
                        '\0'..=' ' | '#' | '\\' => write!(f, "\\{:03}", u32::from(c))?,
                        c => write!(f, "{}", c)?,
                    }
                }
                Ok(())
            }
            Operand::Var(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Operand::Int(-7).to_string(), "int@-7");
        assert_eq!(Operand::Bool(true).to_string(), "bool@true");
        assert_eq!(Operand::Nil.to_string(), "nil@nil");
        assert_eq!(Operand::Float(1.5).to_string(), "float@0x1.8p+0");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            Operand::Str("a b\n#\\c".into()).to_string(),
            "string@a\\032b\\010\\035\\092c"
        );
        assert_eq!(Operand::Str(String::new()).to_string(), "string@");
    }

    #[test]
    fn test_variables() {
        assert_eq!(Operand::from(Var::local("x")).to_string(), "LF@x");
        assert_eq!(Var::global("$tmp").to_string(), "GF@$tmp");
        assert_eq!(Var::new(Frame::Temporary, "t").to_string(), "TF@t");
    }
}
