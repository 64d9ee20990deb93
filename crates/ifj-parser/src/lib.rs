//! Expression parsing for IFJ18.
//!
//! [`parse_expression`] consumes one expression from a token cursor, checks
//! operand types and writes IFJcode18 stack instructions to a [`CodeSink`]
//! while it reduces.

pub mod emit;
pub mod parser;
pub mod precedence;
pub mod stack;
pub mod symbols;
pub mod types;

pub use emit::{CodeSink, WriterSink};
pub use parser::parse_expression;
pub use precedence::{relation, EClass, Relation};
pub use symbols::SymbolLookup;
pub use types::ValueType;

#[cfg(test)]
mod tests {
    use super::*;
    use ifj_bytecode::{routine, Instruction, Operand, Var};
    use ifj_lexer::Scanner;
    use ifj_syntax::error::{Error, ErrorKind};
    use ifj_syntax::token::TokenKind;
    use pretty_assertions::assert_eq;

    use Instruction::*;

    fn compile_with(input: &str, declared: &[&str]) -> (Result<ValueType, Error>, Vec<Instruction>) {
        let mut scanner = Scanner::new(input);
        let tokens = scanner.tokenize().expect("Lexing should succeed");
        let mut cursor = tokens.cursor();
        let mut code: Vec<Instruction> = Vec::new();
        let result = parse_expression(&mut cursor, declared, &mut code);
        (result, code)
    }

    fn compile(input: &str) -> Vec<Instruction> {
        let (result, code) = compile_with(input, &[]);
        result.expect("Parsing should succeed");
        code
    }

    fn error_kind(input: &str) -> ErrorKind {
        compile_with(input, &[]).0.expect_err("Parsing should fail").kind
    }

    fn int(n: i64) -> Instruction {
        Pushs(Operand::Int(n))
    }

    fn tmp() -> Var {
        Var::global("$tmp")
    }

    #[test]
    fn test_precedence_of_arithmetic() {
        assert_eq!(compile("1 + 2 * 3"), vec![int(1), int(2), int(3), Muls, Adds]);
        assert_eq!(compile("1 * 2 + 3"), vec![int(1), int(2), Muls, int(3), Adds]);
        assert_eq!(compile("1 - 2 - 3"), vec![int(1), int(2), Subs, int(3), Subs]);
    }

    #[test]
    fn test_brackets_override_precedence() {
        assert_eq!(compile("(1 + 2) * 3"), vec![int(1), int(2), Adds, int(3), Muls]);
        assert_eq!(compile("((7))"), vec![int(7)]);
    }

    #[test]
    fn test_result_types() {
        assert_eq!(compile_with("1 + 2", &[]).0, Ok(ValueType::Int));
        assert_eq!(compile_with("1 + 2.0", &[]).0, Ok(ValueType::Float));
        assert_eq!(compile_with("\"a\" + \"b\"", &[]).0, Ok(ValueType::String));
        assert_eq!(compile_with("1 < 2", &[]).0, Ok(ValueType::Bool));
        assert_eq!(compile_with("x * 2", &["x"]).0, Ok(ValueType::Int));
        assert_eq!(compile_with("x * y", &["x", "y"]).0, Ok(ValueType::Unknown));
        assert_eq!(compile_with("nil", &[]).0, Ok(ValueType::Nil));
    }

    #[test]
    fn test_cursor_stops_after_expression() {
        let tokens = Scanner::new("1 + 2, 3").tokenize().unwrap();
        let mut cursor = tokens.cursor();
        let mut code: Vec<Instruction> = Vec::new();
        parse_expression(&mut cursor, &[] as &[&str], &mut code).unwrap();
        assert_eq!(cursor.current().map(|t| &t.kind), Some(&TokenKind::Comma));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_int_float_promotion() {
        assert_eq!(
            compile("1 + 2.5"),
            vec![
                int(1),
                Pushs(Operand::Float(2.5)),
                Pops(tmp()),
                Int2Floats,
                Pushs(Operand::Var(tmp())),
                Adds,
            ]
        );
        assert_eq!(
            compile("2.5 * 2"),
            vec![Pushs(Operand::Float(2.5)), int(2), Int2Floats, Muls]
        );
    }

    #[test]
    fn test_division_by_operand_type() {
        assert_eq!(compile("7 / 2"), vec![int(7), int(2), IDivs]);
        assert_eq!(
            compile("7.0 / 2.0"),
            vec![Pushs(Operand::Float(7.0)), Pushs(Operand::Float(2.0)), Divs]
        );
        let (result, code) = compile_with("a / 2", &["a"]);
        assert_eq!(result, Ok(ValueType::Int));
        assert_eq!(
            code,
            vec![
                Pushs(Operand::Var(Var::local("a"))),
                int(2),
                Instruction::call(routine::CHECK_IF_NUM),
                Instruction::call(routine::DECIDE_DIV_OP),
            ]
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            compile("\"a\" + \"b\""),
            vec![
                Pushs(Operand::Str("a".into())),
                Pushs(Operand::Str("b".into())),
                Pops(Var::global("$tmp2")),
                Pops(tmp()),
                Concat(tmp(), Operand::Var(tmp()), Operand::Var(Var::global("$tmp2"))),
                Pushs(Operand::Var(tmp())),
            ]
        );
    }

    #[test]
    fn test_unknown_addition_is_checked_at_runtime() {
        let (result, code) = compile_with("x + 1", &["x"]);
        assert_eq!(result, Ok(ValueType::Int));
        assert_eq!(
            code,
            vec![
                Pushs(Operand::Var(Var::local("x"))),
                int(1),
                Instruction::call(routine::CHECK_IF_ADD),
            ]
        );
    }

    #[test]
    fn test_relational_operators() {
        assert_eq!(compile("1 < 2"), vec![int(1), int(2), Lts]);
        assert_eq!(compile("1 > 2"), vec![int(1), int(2), Gts]);
        assert_eq!(compile("1 <= 2"), vec![int(1), int(2), Gts, Nots]);
        assert_eq!(compile("1 >= 2"), vec![int(1), int(2), Lts, Nots]);
        assert_eq!(
            compile("\"a\" < \"b\""),
            vec![Pushs(Operand::Str("a".into())), Pushs(Operand::Str("b".into())), Lts]
        );
    }

    #[test]
    fn test_equality_without_promotion() {
        assert_eq!(
            compile("1 == 1.0"),
            vec![
                int(1),
                Pushs(Operand::Float(1.0)),
                Pops(tmp()),
                Pops(tmp()),
                Pushs(Operand::Bool(false)),
            ]
        );
        assert_eq!(compile("1 != 2"), vec![int(1), int(2), Eqs, Nots]);
        assert_eq!(compile("nil == nil"), vec![Pushs(Operand::Nil), Pushs(Operand::Nil), Eqs]);
        let (_, code) = compile_with("x == \"s\"", &["x"]);
        assert_eq!(
            &code[2..],
            &[Instruction::call(routine::CHECK_IF_EQL), Eqs]
        );
    }

    #[test]
    fn test_relational_binds_tighter_than_equality() {
        assert_eq!(
            compile("1 < 2 == true"),
            vec![int(1), int(2), Lts, Pushs(Operand::Bool(true)), Eqs]
        );
    }

    #[test]
    fn test_boolean_operators() {
        assert_eq!(
            compile("not true and false"),
            vec![Pushs(Operand::Bool(true)), Nots, Pushs(Operand::Bool(false)), Ands]
        );
        assert_eq!(
            compile("true || false"),
            vec![Pushs(Operand::Bool(true)), Pushs(Operand::Bool(false)), Ors]
        );
        assert_eq!(
            compile("!(1 < 2)"),
            vec![int(1), int(2), Lts, Nots]
        );
    }

    #[test]
    fn test_not_of_unknown_is_checked() {
        let (result, code) = compile_with("not flag", &["flag"]);
        assert_eq!(result, Ok(ValueType::Bool));
        assert_eq!(
            code,
            vec![
                Pushs(Operand::Var(Var::local("flag"))),
                Pushs(Operand::Bool(false)),
                Instruction::call(routine::CHECK_IF_BOOL),
                Pops(tmp()),
                Nots,
            ]
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(error_kind("(1 + 2"), ErrorKind::Syntax);
        assert_eq!(error_kind("1 +"), ErrorKind::Syntax);
        assert_eq!(error_kind("()"), ErrorKind::Syntax);
        assert_eq!(error_kind("1 2"), ErrorKind::Syntax);
        assert_eq!(error_kind(")"), ErrorKind::Syntax);
        assert_eq!(error_kind("1 < 2 < 3"), ErrorKind::Syntax);
        assert_eq!(error_kind("1 + not true"), ErrorKind::Syntax);
    }

    #[test]
    fn test_empty_expression() {
        let (result, code) = compile_with("\n", &[]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.msg, "Expression cannot be empty");
        assert!(code.is_empty());
    }

    #[test]
    fn test_syntax_error_messages() {
        let err = compile_with("(1 + 2", &[]).0.unwrap_err();
        assert_eq!(err.to_string(), "LBRCKT in expression cannot be followed with EOF at 1:7");

        let err = compile_with(")", &[]).0.unwrap_err();
        assert_eq!(err.msg, "Expression cannot start with RBRCKT");
    }

    #[test]
    fn test_semantic_errors() {
        assert_eq!(error_kind("\"a\" - 1"), ErrorKind::Semantic);
        assert_eq!(error_kind("true + 1"), ErrorKind::Semantic);
        assert_eq!(error_kind("1 and true"), ErrorKind::Semantic);
        assert_eq!(error_kind("not 1"), ErrorKind::Semantic);
        assert_eq!(error_kind("- 1"), ErrorKind::Semantic);
        assert_eq!(error_kind("nil < nil"), ErrorKind::Semantic);
        assert_eq!(error_kind("\"a\" / \"b\""), ErrorKind::Semantic);
    }

    #[test]
    fn test_undeclared_identifier() {
        let (result, code) = compile_with("undeclaredVar + 1", &[]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Undeclared);
        assert_eq!(err.code(), 3);
        assert_eq!((err.line, err.col), (Some(1), Some(1)));
        assert!(code.is_empty());
    }

    #[test]
    fn test_emission_is_not_rolled_back() {
        let (result, code) = compile_with("1 + 2 - \"s\"", &[]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Semantic);
        assert_eq!(
            code,
            vec![int(1), int(2), Adds, Pushs(Operand::Str("s".into()))]
        );
    }

    #[test]
    fn test_checks_precede_type_errors() {
        let (result, code) = compile_with("x + true", &["x"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Semantic);
        assert_eq!(
            code,
            vec![
                Pushs(Operand::Var(Var::local("x"))),
                Pushs(Operand::Bool(true)),
                Instruction::call(routine::CHECK_IF_ADD),
            ]
        );

        let (result, code) = compile_with("flag and 1.5", &["flag"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Semantic);
        assert_eq!(code.last(), Some(&Instruction::call(routine::CHECK_IF_BOOL)));

        let (result, code) = compile_with("1 < true", &[]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Semantic);
        assert_eq!(code, vec![int(1), Pushs(Operand::Bool(true))]);
    }

    #[test]
    fn test_scanned_literals_become_operands() {
        let cases = [
            ("42", ValueType::Int, Operand::Int(42)),
            ("017", ValueType::Int, Operand::Int(15)),
            ("0b101", ValueType::Int, Operand::Int(5)),
            ("0x1fA", ValueType::Int, Operand::Int(506)),
            ("3.25E-2", ValueType::Float, Operand::Float(0.0325)),
            ("2e3", ValueType::Float, Operand::Float(2000.0)),
            ("1.5e+1", ValueType::Float, Operand::Float(15.0)),
            (
                r#""q\"x\" n\nt\ts\sb\\""#,
                ValueType::String,
                Operand::Str("q\"x\" n\nt\ts b\\".into()),
            ),
            (r#""\x41\x4a-\x4""#, ValueType::String, Operand::Str("AJ-\u{4}".into())),
            ("\"\"", ValueType::String, Operand::Str(String::new())),
            ("true", ValueType::Bool, Operand::Bool(true)),
            ("false", ValueType::Bool, Operand::Bool(false)),
            ("nil", ValueType::Nil, Operand::Nil),
        ];
        for (source, value_type, operand) in cases {
            let (result, code) = compile_with(source, &[]);
            assert_eq!(result, Ok(value_type), "type of {}", source);
            assert_eq!(code, vec![Pushs(operand)], "operand of {}", source);
        }
    }

    #[test]
    fn test_integer_overflow_is_semantic() {
        assert_eq!(error_kind("9223372036854775808"), ErrorKind::Semantic);
        assert_eq!(compile("9223372036854775807"), vec![int(i64::MAX)]);
    }

    #[test]
    fn test_writer_sink_streams_text() {
        let tokens = Scanner::new("2 * x").tokenize().unwrap();
        let mut cursor = tokens.cursor();
        let mut sink = WriterSink::new(Vec::new());
        let symbols: std::collections::HashSet<String> = ["x".to_string()].into_iter().collect();
        parse_expression(&mut cursor, &symbols, &mut sink).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(text, "PUSHS int@2\nPUSHS LF@x\nCALL $checkIfNum\nMULS\n");
    }
}
