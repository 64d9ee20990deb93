//! IFJcode18 machine core.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{self, Write};

use ifj_bytecode::{Frame, Instruction, Operand, Program, Var};
use ifj_syntax::error::{Error, ErrorKind, Result};
use tracing::{debug, trace};

use crate::codes;
use crate::display::display_value;
use crate::value::Value;

/// Variables of one frame; `None` until the first assignment.
type Scope = HashMap<String, Option<Value>>;

pub(crate) fn runtime(code: u8, msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::Runtime(code), msg)
}

pub struct Vm<W: Write> {
    pub(crate) stack: Vec<Value>,
    globals: Scope,
    locals: Vec<Scope>,
    temporary: Option<Scope>,
    out: W,
    executed: usize,
}

impl Vm<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Vm<W> {
    pub fn new(out: W) -> Self {
        Self {
            stack: Vec::new(),
            globals: Scope::new(),
            locals: Vec::new(),
            temporary: None,
            out,
            executed: 0,
        }
    }

    /// Execute every instruction of `program` in order.
    ///
    /// Machine state survives between runs, so a program may continue where
    /// a previous one stopped.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        debug!(instructions = program.len(), "vm run");
        for (ip, instruction) in program.iter().enumerate() {
            trace!(ip, %instruction, depth = self.stack.len(), "exec");
            self.execute(instruction)?;
            self.executed += 1;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Current value of an initialized variable.
    pub fn variable(&self, var: &Var) -> Option<&Value> {
        self.scope(var.frame)
            .ok()
            .and_then(|scope| scope.get(&var.name))
            .and_then(Option::as_ref)
    }

    /// Number of instructions executed so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn execute(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction {
            Instruction::DefVar(var) => {
                let scope = self.scope_mut(var.frame)?;
                if scope.contains_key(&var.name) {
                    return Err(runtime(
                        codes::SEMANTIC,
                        format!("Variable {} is already defined", var),
                    ));
                }
                scope.insert(var.name.clone(), None);
            }
            Instruction::CreateFrame => self.temporary = Some(Scope::new()),
            Instruction::PushFrame => {
                let frame = self
                    .temporary
                    .take()
                    .ok_or_else(|| runtime(codes::MISSING_FRAME, "PUSHFRAME without a temporary frame"))?;
                self.locals.push(frame);
            }
            Instruction::Clears => self.stack.clear(),
            Instruction::Pushs(operand) => {
                let value = self.operand(operand)?;
                self.stack.push(value);
            }
            Instruction::Pops(var) => {
                let value = self.pop()?;
                self.store(var, value)?;
            }
            Instruction::Adds | Instruction::Subs | Instruction::Muls => {
                let (a, b) = self.pop_pair()?;
                let value = match (a, b) {
                    (Value::Int(x), Value::Int(y)) => Value::Int(match instruction {
                        Instruction::Adds => x.wrapping_add(y),
                        Instruction::Subs => x.wrapping_sub(y),
                        _ => x.wrapping_mul(y),
                    }),
                    (Value::Float(x), Value::Float(y)) => Value::Float(match instruction {
                        Instruction::Adds => x + y,
                        Instruction::Subs => x - y,
                        _ => x * y,
                    }),
                    (a, b) => return Err(type_error(instruction, &a, &b)),
                };
                self.stack.push(value);
            }
            Instruction::Divs => {
                let (a, b) = self.pop_pair()?;
                let value = divide_floats(&a, &b).ok_or_else(|| type_error(instruction, &a, &b))??;
                self.stack.push(value);
            }
            Instruction::IDivs => {
                let (a, b) = self.pop_pair()?;
                let value = divide_ints(&a, &b).ok_or_else(|| type_error(instruction, &a, &b))??;
                self.stack.push(value);
            }
            Instruction::Int2Floats => match self.pop()? {
                Value::Int(n) => self.stack.push(Value::Float(n as f64)),
                other => {
                    return Err(runtime(
                        codes::OPERAND_TYPE,
                        format!("INT2FLOATS expects int, got {}", other.type_name()),
                    ))
                }
            },
            Instruction::Lts | Instruction::Gts => {
                let (a, b) = self.pop_pair()?;
                let ordering = compare(&a, &b).ok_or_else(|| type_error(instruction, &a, &b))?;
                let wanted = if *instruction == Instruction::Lts {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
                self.stack.push(Value::Bool(ordering == wanted));
            }
            Instruction::Eqs => {
                let (a, b) = self.pop_pair()?;
                if !(a.same_type(&b) || a == Value::Nil || b == Value::Nil) {
                    return Err(type_error(instruction, &a, &b));
                }
                self.stack.push(Value::Bool(a == b));
            }
            Instruction::Ands | Instruction::Ors => {
                let (a, b) = self.pop_pair()?;
                match (a, b) {
                    (Value::Bool(x), Value::Bool(y)) => self.stack.push(Value::Bool(
                        if *instruction == Instruction::Ands { x && y } else { x || y },
                    )),
                    (a, b) => return Err(type_error(instruction, &a, &b)),
                }
            }
            Instruction::Nots => match self.pop()? {
                Value::Bool(b) => self.stack.push(Value::Bool(!b)),
                other => {
                    return Err(runtime(
                        codes::OPERAND_TYPE,
                        format!("NOTS expects bool, got {}", other.type_name()),
                    ))
                }
            },
            Instruction::Concat(dst, a, b) => {
                let (a, b) = (self.operand(a)?, self.operand(b)?);
                match (a, b) {
                    (Value::Str(x), Value::Str(y)) => self.store(dst, Value::Str(x + &y))?,
                    (a, b) => return Err(type_error(instruction, &a, &b)),
                }
            }
            Instruction::Call(label) => self.call_routine(label)?,
            Instruction::Write(operand) => {
                let value = self.operand(operand)?;
                write!(self.out, "{}", display_value(&value))?;
            }
        }
        Ok(())
    }

    fn scope(&self, frame: Frame) -> Result<&Scope> {
        match frame {
            Frame::Global => Ok(&self.globals),
            Frame::Local => self
                .locals
                .last()
                .ok_or_else(|| runtime(codes::MISSING_FRAME, "Local frame stack is empty")),
            Frame::Temporary => self
                .temporary
                .as_ref()
                .ok_or_else(|| runtime(codes::MISSING_FRAME, "Temporary frame is not defined")),
        }
    }

    fn scope_mut(&mut self, frame: Frame) -> Result<&mut Scope> {
        match frame {
            Frame::Global => Ok(&mut self.globals),
            Frame::Local => self
                .locals
                .last_mut()
                .ok_or_else(|| runtime(codes::MISSING_FRAME, "Local frame stack is empty")),
            Frame::Temporary => self
                .temporary
                .as_mut()
                .ok_or_else(|| runtime(codes::MISSING_FRAME, "Temporary frame is not defined")),
        }
    }

    fn operand(&self, operand: &Operand) -> Result<Value> {
        match operand {
            Operand::Var(var) => match self.scope(var.frame)?.get(&var.name) {
                Some(Some(value)) => Ok(value.clone()),
                Some(None) => Err(runtime(
                    codes::MISSING_VALUE,
                    format!("Variable {} is not initialized", var),
                )),
                None => Err(runtime(
                    codes::UNDEFINED_VARIABLE,
                    format!("Variable {} is not defined", var),
                )),
            },
            constant => Value::from_constant(constant)
                .ok_or_else(|| Error::new(ErrorKind::Internal, "Constant operand expected")),
        }
    }

    fn store(&mut self, var: &Var, value: Value) -> Result<()> {
        match self.scope_mut(var.frame)?.get_mut(&var.name) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(runtime(
                codes::UNDEFINED_VARIABLE,
                format!("Variable {} is not defined", var),
            )),
        }
    }

    pub(crate) fn pop(&mut self) -> Result<Value> {
        self.stack
            .pop()
            .ok_or_else(|| runtime(codes::MISSING_VALUE, "Data stack is empty"))
    }

    /// Pop the right operand, then the left one.
    pub(crate) fn pop_pair(&mut self) -> Result<(Value, Value)> {
        let b = self.pop()?;
        let a = self.pop()?;
        Ok((a, b))
    }
}

pub(crate) fn type_error(instruction: &Instruction, a: &Value, b: &Value) -> Error {
    runtime(
        codes::OPERAND_TYPE,
        format!(
            "{} cannot operate on {} and {}",
            instruction.mnemonic(),
            a.type_name(),
            b.type_name()
        ),
    )
}

/// `None` when the operands are not two floats.
pub(crate) fn divide_floats(a: &Value, b: &Value) -> Option<Result<Value>> {
    match (a, b) {
        (Value::Float(_), Value::Float(y)) if *y == 0.0 => {
            Some(Err(runtime(codes::ZERO_DIVISION, "Division by zero")))
        }
        (Value::Float(x), Value::Float(y)) => Some(Ok(Value::Float(x / y))),
        _ => None,
    }
}

/// `None` when the operands are not two ints.
pub(crate) fn divide_ints(a: &Value, b: &Value) -> Option<Result<Value>> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Some(Err(runtime(codes::ZERO_DIVISION, "Division by zero"))),
        (Value::Int(x), Value::Int(y)) => Some(Ok(Value::Int(x.wrapping_div(*y)))),
        _ => None,
    }
}

/// Ordering of two non-nil values of one type.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifj_bytecode::routine;

    fn run(code: Vec<Instruction>) -> (Result<()>, Vm<Vec<u8>>) {
        let mut vm = Vm::new(Vec::new());
        let result = vm.run(&Program::from(code));
        (result, vm)
    }

    fn top(code: Vec<Instruction>) -> Value {
        let (result, vm) = run(code);
        result.unwrap();
        vm.stack().last().cloned().unwrap()
    }

    fn runtime_code(code: Vec<Instruction>) -> i32 {
        run(code).0.unwrap_err().code()
    }

    fn push(v: Operand) -> Instruction {
        Instruction::Pushs(v)
    }

    #[test]
    fn test_vm_arithmetic_operations() {
        use Operand::Int;
        let cases = vec![
            (Instruction::Adds, Value::Int(13)),
            (Instruction::Subs, Value::Int(7)),
            (Instruction::Muls, Value::Int(30)),
            (Instruction::IDivs, Value::Int(3)),
        ];
        for (op, expected) in cases {
            assert_eq!(top(vec![push(Int(10)), push(Int(3)), op]), expected);
        }
        assert_eq!(
            top(vec![push(Operand::Float(1.0)), push(Operand::Float(4.0)), Instruction::Divs]),
            Value::Float(0.25)
        );
    }

    #[test]
    fn test_vm_integer_arithmetic_wraps() {
        assert_eq!(
            top(vec![push(Operand::Int(i64::MAX)), push(Operand::Int(1)), Instruction::Adds]),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_vm_mixed_arithmetic_is_a_type_error() {
        assert_eq!(
            runtime_code(vec![push(Operand::Int(1)), push(Operand::Float(1.0)), Instruction::Adds]),
            53
        );
    }

    #[test]
    fn test_vm_comparison_operations() {
        use Operand::Int;
        assert_eq!(top(vec![push(Int(5)), push(Int(3)), Instruction::Lts]), Value::Bool(false));
        assert_eq!(top(vec![push(Int(3)), push(Int(5)), Instruction::Lts]), Value::Bool(true));
        assert_eq!(top(vec![push(Int(5)), push(Int(3)), Instruction::Gts]), Value::Bool(true));
        assert_eq!(top(vec![push(Int(5)), push(Int(5)), Instruction::Eqs]), Value::Bool(true));
        assert_eq!(
            top(vec![push(Operand::Nil), push(Int(5)), Instruction::Eqs]),
            Value::Bool(false)
        );
        assert_eq!(
            top(vec![
                push(Operand::Str("abc".into())),
                push(Operand::Str("abd".into())),
                Instruction::Lts
            ]),
            Value::Bool(true)
        );
        assert_eq!(runtime_code(vec![push(Int(1)), push(Operand::Bool(true)), Instruction::Eqs]), 53);
        assert_eq!(runtime_code(vec![push(Operand::Nil), push(Operand::Nil), Instruction::Lts]), 53);
    }

    #[test]
    fn test_vm_boolean_operations() {
        let t = || push(Operand::Bool(true));
        let f = || push(Operand::Bool(false));
        assert_eq!(top(vec![t(), Instruction::Nots]), Value::Bool(false));
        assert_eq!(top(vec![t(), f(), Instruction::Ands]), Value::Bool(false));
        assert_eq!(top(vec![t(), f(), Instruction::Ors]), Value::Bool(true));
    }

    #[test]
    fn test_vm_frames_and_variables() {
        let x = Var::local("x");
        let (result, vm) = run(vec![
            Instruction::CreateFrame,
            Instruction::PushFrame,
            Instruction::DefVar(x.clone()),
            push(Operand::Str("test".into())),
            Instruction::Pops(x.clone()),
            push(Operand::Var(x.clone())),
        ]);
        result.unwrap();
        assert_eq!(vm.stack(), &[Value::Str("test".into())]);
        assert_eq!(vm.variable(&x), Some(&Value::Str("test".into())));
    }

    #[test]
    fn test_vm_variable_errors() {
        let g = Var::global("g");
        assert_eq!(runtime_code(vec![push(Operand::Var(g.clone()))]), 54);
        assert_eq!(
            runtime_code(vec![Instruction::DefVar(g.clone()), push(Operand::Var(g.clone()))]),
            56
        );
        assert_eq!(
            runtime_code(vec![Instruction::DefVar(g.clone()), Instruction::DefVar(g)]),
            52
        );
        assert_eq!(runtime_code(vec![Instruction::DefVar(Var::local("l"))]), 55);
        assert_eq!(runtime_code(vec![Instruction::PushFrame]), 55);
    }

    #[test]
    fn test_vm_division_by_zero() {
        assert_eq!(
            runtime_code(vec![push(Operand::Int(10)), push(Operand::Int(0)), Instruction::IDivs]),
            57
        );
        assert_eq!(
            runtime_code(vec![push(Operand::Float(1.0)), push(Operand::Float(0.0)), Instruction::Divs]),
            57
        );
    }

    #[test]
    fn test_vm_stack_underflow() {
        let (result, _) = run(vec![push(Operand::Int(5)), Instruction::Adds]);
        let err = result.unwrap_err();
        assert_eq!(err.code(), 56);
        assert!(err.msg.contains("stack is empty"));
    }

    #[test]
    fn test_vm_concat_and_write() {
        let tmp = Var::global("$tmp");
        let (result, vm) = run(vec![
            Instruction::DefVar(tmp.clone()),
            push(Operand::Str("Hello, ".into())),
            Instruction::Pops(tmp.clone()),
            Instruction::Concat(
                tmp.clone(),
                Operand::Var(tmp.clone()),
                Operand::Str("World!".into()),
            ),
            Instruction::Write(Operand::Var(tmp)),
            Instruction::Write(Operand::Str("\n".into())),
            Instruction::Write(Operand::Float(0.5)),
            Instruction::Write(Operand::Nil),
        ]);
        result.unwrap();
        assert_eq!(
            String::from_utf8(vm.into_output()).unwrap(),
            "Hello, World!\n0x1p-1"
        );
    }

    #[test]
    fn test_vm_int2floats() {
        assert_eq!(
            top(vec![push(Operand::Int(3)), Instruction::Int2Floats]),
            Value::Float(3.0)
        );
        assert_eq!(
            runtime_code(vec![push(Operand::Nil), Instruction::Int2Floats]),
            53
        );
    }

    #[test]
    fn test_vm_unknown_label() {
        assert_eq!(runtime_code(vec![Instruction::call("$nowhere")]), 52);
        assert!(routine::ALL.contains(&"$checkIfAdd"));
    }
}
