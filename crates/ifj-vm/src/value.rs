//! Runtime values of the IFJcode18 machine.

use ifj_bytecode::Operand;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Str(_) => "string",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn same_type(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Constant operands only; variables are resolved by the machine.
    pub fn from_constant(operand: &Operand) -> Option<Value> {
        let v = match operand {
            Operand::Int(n) => Value::Int(*n),
            Operand::Float(x) => Value::Float(*x),
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Nil => Value::Nil,
            Operand::Str(s) => Value::Str(s.clone()),
            Operand::Var(_) => return None,
        };
        Some(v)
    }
}

/// Convert the int of a mixed int/float pair to float.
pub fn promote(a: Value, b: Value) -> (Value, Value) {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) => (Value::Float(x as f64), Value::Float(y)),
        (Value::Float(x), Value::Int(y)) => (Value::Float(x), Value::Float(y as f64)),
        pair => pair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifj_bytecode::Var;

    #[test]
    fn test_promote_only_mixed_numbers() {
        assert_eq!(
            promote(Value::Int(1), Value::Float(0.5)),
            (Value::Float(1.0), Value::Float(0.5))
        );
        assert_eq!(promote(Value::Int(1), Value::Int(2)), (Value::Int(1), Value::Int(2)));
        assert_eq!(
            promote(Value::Int(1), Value::Str("a".into())),
            (Value::Int(1), Value::Str("a".into()))
        );
    }

    #[test]
    fn test_constants() {
        assert_eq!(Value::from_constant(&Operand::Nil), Some(Value::Nil));
        assert_eq!(Value::from_constant(&Operand::Var(Var::local("x"))), None);
        assert!(Value::Int(1).same_type(&Value::Int(7)));
        assert!(!Value::Int(1).same_type(&Value::Float(1.0)));
    }
}
