//! Runtime type checks that compiled expressions `CALL`.
//!
//! Each routine inspects the two topmost stack values (left operand below
//! right). Checking routines leave the pair on the stack, possibly converted;
//! `$checkIfAdd` and `$decideDivOp` replace it with the result.

use std::io::Write;

use ifj_bytecode::{routine, Instruction};
use ifj_syntax::error::Result;
use tracing::trace;

use crate::codes;
use crate::value::{promote, Value};
use crate::vm::{divide_floats, divide_ints, runtime, type_error, Vm};

impl<W: Write> Vm<W> {
    pub(crate) fn call_routine(&mut self, label: &str) -> Result<()> {
        trace!(label, "runtime routine");
        match label {
            routine::CHECK_IF_ADD => self.check_if_add(),
            routine::CHECK_IF_NUM => self.check_if_num(),
            routine::CHECK_IF_LT_GT => self.check_if_lt_gt(),
            routine::CHECK_IF_EQL => self.check_if_eql(),
            routine::CHECK_IF_BOOL => self.check_if_bool(),
            routine::DECIDE_DIV_OP => self.decide_div_op(),
            other => Err(runtime(
                codes::SEMANTIC,
                format!("CALL to undefined label {}", other),
            )),
        }
    }

    fn check_if_add(&mut self) -> Result<()> {
        let (a, b) = self.pop_pair()?;
        let sum = match promote(a, b) {
            (Value::Int(x), Value::Int(y)) => Value::Int(x.wrapping_add(y)),
            (Value::Float(x), Value::Float(y)) => Value::Float(x + y),
            (Value::Str(x), Value::Str(y)) => Value::Str(x + &y),
            (a, b) => return Err(type_error(&Instruction::call(routine::CHECK_IF_ADD), &a, &b)),
        };
        self.stack.push(sum);
        Ok(())
    }

    fn check_if_num(&mut self) -> Result<()> {
        let (a, b) = self.pop_pair()?;
        if !(a.is_number() && b.is_number()) {
            return Err(type_error(&Instruction::call(routine::CHECK_IF_NUM), &a, &b));
        }
        let (a, b) = promote(a, b);
        self.stack.push(a);
        self.stack.push(b);
        Ok(())
    }

    fn check_if_lt_gt(&mut self) -> Result<()> {
        let (a, b) = self.pop_pair()?;
        let comparable = (a.is_number() && b.is_number())
            || matches!((&a, &b), (Value::Str(_), Value::Str(_)));
        if !comparable {
            return Err(type_error(&Instruction::call(routine::CHECK_IF_LT_GT), &a, &b));
        }
        let (a, b) = promote(a, b);
        self.stack.push(a);
        self.stack.push(b);
        Ok(())
    }

    fn check_if_eql(&mut self) -> Result<()> {
        let (a, b) = self.pop_pair()?;
        let (a, b) = if a.is_number() && b.is_number() {
            promote(a, b)
        } else if a.same_type(&b) || a == Value::Nil || b == Value::Nil {
            (a, b)
        } else {
            (Value::Bool(false), Value::Bool(true))
        };
        self.stack.push(a);
        self.stack.push(b);
        Ok(())
    }

    fn check_if_bool(&mut self) -> Result<()> {
        match self.stack.as_slice() {
            [.., Value::Bool(_), Value::Bool(_)] => Ok(()),
            [.., a, b] => Err(type_error(&Instruction::call(routine::CHECK_IF_BOOL), a, b)),
            _ => Err(runtime(codes::MISSING_VALUE, "Data stack holds fewer than two values")),
        }
    }

    fn decide_div_op(&mut self) -> Result<()> {
        let (a, b) = self.pop_pair()?;
        let call = Instruction::call(routine::DECIDE_DIV_OP);
        let quotient = divide_ints(&a, &b)
            .or_else(|| divide_floats(&a, &b))
            .ok_or_else(|| type_error(&call, &a, &b))??;
        self.stack.push(quotient);
        Ok(())
    }
}
