//! Operator-precedence shift-reduce parser for expressions.
//!
//! The parser walks the token cursor once. Each step compares the terminal
//! nearest to the top of the working stack with the lookahead token through
//! [`relation`]; reductions type-check their operands and emit IFJcode18
//! instructions into the [`CodeSink`] immediately.

use ifj_bytecode::{operand_for, routine, Instruction, Operand, Var};
use ifj_syntax::error::{Error, ErrorKind, Result};
use ifj_syntax::token::{Token, TokenCursor, TokenKind};
use tracing::{debug, trace};

use crate::emit::CodeSink;
use crate::precedence::{relation, EClass, Relation};
use crate::stack::{ParseStack, StackItem};
use crate::symbols::SymbolLookup;
use crate::types::{resolve, resolve_strict, Resolution, ValueType};

const TMP: &str = "$tmp";
const TMP2: &str = "$tmp2";

/// Parse one expression starting at the cursor.
///
/// On success the cursor rests on the first token after the expression and
/// the inferred type is returned. Instructions emitted before an error stay
/// in the sink.
pub fn parse_expression<'t, S, C>(
    cursor: &mut TokenCursor<'t>,
    symbols: &S,
    sink: &mut C,
) -> Result<ValueType>
where
    S: SymbolLookup + ?Sized,
    C: CodeSink + ?Sized,
{
    ExprParser::new(symbols, sink).run(cursor)
}

struct ExprParser<'t, 'a, S: ?Sized, C: ?Sized> {
    stack: ParseStack<'t>,
    symbols: &'a S,
    sink: &'a mut C,
}

impl<'t, 'a, S, C> ExprParser<'t, 'a, S, C>
where
    S: SymbolLookup + ?Sized,
    C: CodeSink + ?Sized,
{
    fn new(symbols: &'a S, sink: &'a mut C) -> Self {
        Self {
            stack: ParseStack::new(),
            symbols,
            sink,
        }
    }

    fn run(mut self, cursor: &mut TokenCursor<'t>) -> Result<ValueType> {
        loop {
            let Some(look) = cursor.current() else {
                return Err(Error::new(ErrorKind::Internal, "Expression parser got no tokens"));
            };
            let terminal = self.stack.find_terminal();
            let stack_class = terminal.map_or(EClass::EndMarker, |(_, t)| EClass::of(&t.kind));
            let look_class = EClass::of(&look.kind);

            match relation(stack_class, look_class) {
                Relation::Open => {
                    trace!(token = %look.kind, stack = %self.stack.dump(), "shift");
                    self.stack.insert_open(terminal.map(|(i, _)| i));
                    self.stack.push(StackItem::Terminal(look));
                    cursor.advance();
                }
                Relation::Equal => {
                    trace!(token = %look.kind, stack = %self.stack.dump(), "shift");
                    self.stack.push(StackItem::Terminal(look));
                    cursor.advance();
                }
                Relation::Close => {
                    trace!(stack = %self.stack.dump(), "reduce");
                    self.reduce(look)?;
                }
                Relation::Empty => {
                    if stack_class == EClass::EndMarker && look_class == EClass::EndMarker {
                        return match self.stack.result() {
                            Some(t) => {
                                debug!(result = %t, line = look.line, "expression parsed");
                                Ok(t)
                            }
                            None if self.stack.is_empty() => Err(at(
                                ErrorKind::Syntax,
                                look,
                                "Expression cannot be empty",
                            )),
                            None => Err(at(
                                ErrorKind::Internal,
                                look,
                                format!("Unreduced expression stack {}", self.stack.dump()),
                            )),
                        };
                    }
                    let msg = match terminal {
                        None => format!("Expression cannot start with {}", look.kind.name()),
                        Some((_, t)) => format!(
                            "{} in expression cannot be followed with {}",
                            t.kind.name(),
                            look.kind.name()
                        ),
                    };
                    return Err(at(ErrorKind::Syntax, look, msg));
                }
            }
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        trace!(%instruction, "emit");
        self.sink.emit(instruction);
    }

    fn call(&mut self, label: &str) {
        self.emit(Instruction::call(label));
    }

    /// Reduce the handle on top of the stack. `look` only positions errors
    /// about a missing operand.
    fn reduce(&mut self, look: &Token) -> Result<()> {
        match self.stack.pop() {
            Some(StackItem::Terminal(t)) => match EClass::of(&t.kind) {
                EClass::RightBracket => self.reduce_brackets(t),
                EClass::Value => self.reduce_value(t),
                class if class.is_operator() => Err(at(
                    ErrorKind::Syntax,
                    look,
                    format!("{} in expression cannot be followed with {}", t.kind.name(), look.kind.name()),
                )),
                _ => Err(at(
                    ErrorKind::Internal,
                    t,
                    format!("{} cannot be reduced", t.kind.name()),
                )),
            },
            Some(StackItem::NonTerminal(right)) => self.reduce_operator(right),
            Some(StackItem::Open) | None => Err(Error::new(
                ErrorKind::Internal,
                format!("Nothing to reduce in {}", self.stack.dump()),
            )),
        }
    }

    /// `( E )` becomes `E`.
    fn reduce_brackets(&mut self, rb: &'t Token) -> Result<()> {
        let inner = match self.stack.pop() {
            Some(StackItem::NonTerminal(t)) => t,
            _ => return Err(at(ErrorKind::Syntax, rb, "Brackets must enclose an expression")),
        };
        match (self.stack.pop(), self.stack.pop()) {
            (Some(StackItem::Terminal(lb)), Some(StackItem::Open))
                if lb.kind == TokenKind::LBracket => {}
            _ => {
                return Err(at(
                    ErrorKind::Internal,
                    rb,
                    format!("Unmatched RBRCKT in {}", self.stack.dump()),
                ))
            }
        }
        self.stack.push(StackItem::NonTerminal(inner));
        Ok(())
    }

    /// A literal or variable becomes `E` of its type and is pushed at run time.
    fn reduce_value(&mut self, token: &'t Token) -> Result<()> {
        let value_type = ValueType::of_value(&token.kind)
            .ok_or_else(|| at(ErrorKind::Internal, token, "Value token expected"))?;

        let operand = match &token.kind {
            TokenKind::Ident(name) => {
                if !self.symbols.is_declared(name) {
                    return Err(at(
                        ErrorKind::Undeclared,
                        token,
                        format!("Undeclared identifier '{}'", name),
                    ));
                }
                Operand::Var(Var::local(name.as_str()))
            }
            kind => operand_for(kind).map_err(|e| at(e.kind, token, e.msg))?,
        };
        self.emit(Instruction::Pushs(operand));

        match self.stack.pop() {
            Some(StackItem::Open) => {}
            _ => {
                return Err(at(
                    ErrorKind::Internal,
                    token,
                    "Value is not preceded by an open marker",
                ))
            }
        }
        self.stack.push(StackItem::NonTerminal(value_type));
        Ok(())
    }

    /// `< op E` or `< E op E` becomes `E`.
    fn reduce_operator(&mut self, right: ValueType) -> Result<()> {
        let op = match self.stack.pop() {
            Some(StackItem::Terminal(t)) if EClass::of(&t.kind).is_operator() => t,
            _ => {
                return Err(Error::new(
                    ErrorKind::Internal,
                    format!("Operator expected before operand in {}", self.stack.dump()),
                ))
            }
        };

        let result = match self.stack.pop() {
            Some(StackItem::Open) => self.unary(op, right)?,
            Some(StackItem::NonTerminal(left)) => {
                match self.stack.pop() {
                    Some(StackItem::Open) => {}
                    _ => {
                        return Err(at(
                            ErrorKind::Internal,
                            op,
                            format!("Left operand of {} is not a handle", op.kind.name()),
                        ))
                    }
                }
                self.binary(op, left, right)?
            }
            _ => {
                return Err(at(
                    ErrorKind::Internal,
                    op,
                    format!("Malformed operands of {}", op.kind.name()),
                ))
            }
        };

        trace!(op = op.kind.name(), %result, "reduced operator");
        self.stack.push(StackItem::NonTerminal(result));
        Ok(())
    }

    fn unary(&mut self, op: &Token, operand: ValueType) -> Result<ValueType> {
        if op.kind != TokenKind::Not {
            return Err(at(
                ErrorKind::Semantic,
                op,
                format!("Operator {} requires two operands", op.kind.name()),
            ));
        }
        match operand {
            ValueType::Unknown => {
                self.emit(Instruction::Pushs(Operand::Bool(false)));
                self.call(routine::CHECK_IF_BOOL);
                self.emit(Instruction::Pops(Var::global(TMP)));
            }
            ValueType::Bool => {}
            other => {
                return Err(at(
                    ErrorKind::Semantic,
                    op,
                    format!("Operator NOT cannot be applied to {}", other),
                ))
            }
        }
        self.emit(Instruction::Nots);
        Ok(ValueType::Bool)
    }

    fn binary(&mut self, op: &Token, left: ValueType, right: ValueType) -> Result<ValueType> {
        let mismatch = || {
            at(
                ErrorKind::Semantic,
                op,
                format!(
                    "Operator {} cannot be applied to {} and {}",
                    op.kind.name(),
                    left,
                    right
                ),
            )
        };

        if matches!(op.kind, TokenKind::Eql | TokenKind::Neq) {
            self.equality(op, resolve_strict(left, right));
            return Ok(ValueType::Bool);
        }

        let resolution = resolve(left, right);
        let deferred = matches!(resolution, Resolution::Deferred(_));

        // Conversions and runtime checks precede operand validation.
        self.promote(resolution);
        if deferred {
            if let Some(label) = check_routine(&op.kind) {
                self.call(label);
            }
        }

        let operand_type = resolution.operand_type().ok_or_else(mismatch)?;

        let allowed = match op.kind {
            TokenKind::Add => matches!(
                operand_type,
                ValueType::Int | ValueType::Float | ValueType::String | ValueType::Unknown
            ),
            TokenKind::Sub | TokenKind::Mul | TokenKind::Div => matches!(
                operand_type,
                ValueType::Int | ValueType::Float | ValueType::Unknown
            ),
            TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => matches!(
                operand_type,
                ValueType::Int | ValueType::Float | ValueType::String | ValueType::Unknown
            ),
            TokenKind::And | TokenKind::Or => {
                matches!(operand_type, ValueType::Bool | ValueType::Unknown)
            }
            // `not` has no left operand
            _ => false,
        };
        if !allowed {
            return Err(mismatch());
        }

        let result = match op.kind {
            TokenKind::Add => {
                // `$checkIfAdd` leaves the sum itself
                if !deferred {
                    if operand_type == ValueType::String {
                        self.concat();
                    } else {
                        self.emit(Instruction::Adds);
                    }
                }
                operand_type
            }
            TokenKind::Sub | TokenKind::Mul => {
                self.emit(if op.kind == TokenKind::Sub {
                    Instruction::Subs
                } else {
                    Instruction::Muls
                });
                operand_type
            }
            TokenKind::Div => {
                if deferred {
                    self.call(routine::DECIDE_DIV_OP);
                } else if operand_type == ValueType::Float {
                    self.emit(Instruction::Divs);
                } else {
                    self.emit(Instruction::IDivs);
                }
                operand_type
            }
            TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => {
                match op.kind {
                    TokenKind::Lt => self.emit(Instruction::Lts),
                    TokenKind::Gt => self.emit(Instruction::Gts),
                    TokenKind::Lte => {
                        self.emit(Instruction::Gts);
                        self.emit(Instruction::Nots);
                    }
                    _ => {
                        self.emit(Instruction::Lts);
                        self.emit(Instruction::Nots);
                    }
                }
                ValueType::Bool
            }
            _ => {
                self.emit(if op.kind == TokenKind::And {
                    Instruction::Ands
                } else {
                    Instruction::Ors
                });
                ValueType::Bool
            }
        };
        Ok(result)
    }

    fn equality(&mut self, op: &Token, resolution: Resolution) {
        match resolution {
            Resolution::Deferred(_) => {
                self.call(routine::CHECK_IF_EQL);
                self.emit(Instruction::Eqs);
            }
            Resolution::Incompatible => {
                self.emit(Instruction::Pops(Var::global(TMP)));
                self.emit(Instruction::Pops(Var::global(TMP)));
                self.emit(Instruction::Pushs(Operand::Bool(false)));
            }
            _ => self.emit(Instruction::Eqs),
        }
        if op.kind == TokenKind::Neq {
            self.emit(Instruction::Nots);
        }
    }

    /// Convert the int side of a mixed int/float pair.
    fn promote(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::PromoteLeft => {
                self.emit(Instruction::Pops(Var::global(TMP)));
                self.emit(Instruction::Int2Floats);
                self.emit(Instruction::Pushs(Operand::Var(Var::global(TMP))));
            }
            Resolution::PromoteRight => self.emit(Instruction::Int2Floats),
            _ => {}
        }
    }

    fn concat(&mut self) {
        let tmp = Var::global(TMP);
        let tmp2 = Var::global(TMP2);
        self.emit(Instruction::Pops(tmp2.clone()));
        self.emit(Instruction::Pops(tmp.clone()));
        self.emit(Instruction::Concat(
            tmp.clone(),
            Operand::Var(tmp.clone()),
            Operand::Var(tmp2),
        ));
        self.emit(Instruction::Pushs(Operand::Var(tmp)));
    }
}

/// Runtime check a binary operator needs when an operand type is unknown.
fn check_routine(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Add => Some(routine::CHECK_IF_ADD),
        TokenKind::Sub | TokenKind::Mul | TokenKind::Div => Some(routine::CHECK_IF_NUM),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => Some(routine::CHECK_IF_LT_GT),
        TokenKind::And | TokenKind::Or => Some(routine::CHECK_IF_BOOL),
        _ => None,
    }
}

fn at(kind: ErrorKind, token: &Token, msg: impl Into<String>) -> Error {
    Error::with_span(kind, msg, token.line, token.col)
}
