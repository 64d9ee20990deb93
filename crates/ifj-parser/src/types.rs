//! Inferred expression types and binary operand resolution.

use std::fmt;

use ifj_syntax::token::TokenKind;

/// Static type of an expression as far as the compiler can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    String,
    Bool,
    Nil,
    /// Decided at run time, typically a variable.
    Unknown,
}

impl ValueType {
    /// Type of a value token; identifiers are `Unknown`.
    pub fn of_value(kind: &TokenKind) -> Option<ValueType> {
        let t = match kind {
            TokenKind::Integer(_) => ValueType::Int,
            TokenKind::Float(_) => ValueType::Float,
            TokenKind::String(_) => ValueType::String,
            TokenKind::True | TokenKind::False => ValueType::Bool,
            TokenKind::Nil => ValueType::Nil,
            TokenKind::Ident(_) => ValueType::Unknown,
            _ => return None,
        };
        Some(t)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Nil => "nil",
            ValueType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Outcome of matching the two operand types of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both operands have this type.
    Same(ValueType),
    /// Int on the left, float on the right: convert the left operand.
    PromoteLeft,
    /// Float on the left, int on the right: convert the right operand.
    PromoteRight,
    /// At least one side is only known at run time.
    Deferred(ValueType),
    Incompatible,
}

impl Resolution {
    /// Type the operator sees, if the operands are compatible.
    pub fn operand_type(self) -> Option<ValueType> {
        match self {
            Resolution::Same(t) | Resolution::Deferred(t) => Some(t),
            Resolution::PromoteLeft | Resolution::PromoteRight => Some(ValueType::Float),
            Resolution::Incompatible => None,
        }
    }
}

/// Resolve operands with int to float promotion.
pub fn resolve(left: ValueType, right: ValueType) -> Resolution {
    use ValueType::*;

    match (left, right) {
        (Unknown, Unknown) => Resolution::Deferred(Unknown),
        (Unknown, t) | (t, Unknown) => Resolution::Deferred(t),
        (l, r) if l == r => Resolution::Same(l),
        (Int, Float) => Resolution::PromoteLeft,
        (Float, Int) => Resolution::PromoteRight,
        _ => Resolution::Incompatible,
    }
}

/// Resolve operands of an equality test, where no promotion happens.
pub fn resolve_strict(left: ValueType, right: ValueType) -> Resolution {
    match resolve(left, right) {
        Resolution::PromoteLeft | Resolution::PromoteRight => Resolution::Incompatible,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValueType::*;

    #[test]
    fn test_resolution() {
        assert_eq!(resolve(Int, Int), Resolution::Same(Int));
        assert_eq!(resolve(Int, Float), Resolution::PromoteLeft);
        assert_eq!(resolve(Float, Int), Resolution::PromoteRight);
        assert_eq!(resolve(Unknown, String), Resolution::Deferred(String));
        assert_eq!(resolve(Bool, Unknown), Resolution::Deferred(Bool));
        assert_eq!(resolve(Unknown, Unknown), Resolution::Deferred(Unknown));
        assert_eq!(resolve(String, Int), Resolution::Incompatible);
        assert_eq!(resolve(Nil, Bool), Resolution::Incompatible);
    }

    #[test]
    fn test_strict_resolution_never_promotes() {
        assert_eq!(resolve_strict(Int, Float), Resolution::Incompatible);
        assert_eq!(resolve_strict(Float, Float), Resolution::Same(Float));
        assert_eq!(resolve_strict(Unknown, Int), Resolution::Deferred(Int));
    }

    #[test]
    fn test_operand_type() {
        assert_eq!(Resolution::PromoteLeft.operand_type(), Some(Float));
        assert_eq!(Resolution::Deferred(Unknown).operand_type(), Some(Unknown));
        assert_eq!(Resolution::Incompatible.operand_type(), None);
    }

    #[test]
    fn test_value_types() {
        assert_eq!(ValueType::of_value(&TokenKind::Float("1.0".into())), Some(Float));
        assert_eq!(ValueType::of_value(&TokenKind::False), Some(Bool));
        assert_eq!(ValueType::of_value(&TokenKind::Add), None);
    }
}
