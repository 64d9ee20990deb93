//! Text form of values printed by `WRITE`.

use ifj_bytecode::hex_float;

use crate::value::Value;

pub fn display_value(v: &Value) -> String {
    match v {
        Value::Int(n) => n.to_string(),
        Value::Float(x) => hex_float(*x),
        Value::Bool(b) => b.to_string(),
        Value::Nil => String::new(),
        Value::Str(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_forms() {
        assert_eq!(display_value(&Value::Int(-3)), "-3");
        assert_eq!(display_value(&Value::Float(2.0)), "0x1p+1");
        assert_eq!(display_value(&Value::Bool(false)), "false");
        assert_eq!(display_value(&Value::Nil), "");
        assert_eq!(display_value(&Value::Str("a b".into())), "a b");
    }
}
