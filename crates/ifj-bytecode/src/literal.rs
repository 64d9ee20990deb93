//! Conversion of scanned literal lexemes into operands.
//!
//! Tokens keep their lexemes exactly as written: integers in their source
//! base and strings with quotes and escapes. The helpers here decode them.

use ifj_syntax::error::{error, ErrorKind, Result};
use ifj_syntax::token::TokenKind;

use crate::operand::Operand;

/// Integer lexeme in decimal, octal (`017`), binary (`0b101`) or hexadecimal
/// (`0x1f`) notation.
pub fn int_operand(lexeme: &str) -> Result<Operand> {
    let (digits, radix) = if let Some(rest) = lexeme.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = lexeme.strip_prefix("0x") {
        (rest, 16)
    } else if lexeme.len() > 1 && lexeme.starts_with('0') {
        (&lexeme[1..], 8)
    } else {
        (lexeme, 10)
    };
    match i64::from_str_radix(digits, radix) {
        Ok(n) => Ok(Operand::Int(n)),
        Err(_) => error(
            ErrorKind::Semantic,
            format!("Integer literal {} does not fit in 64 bits", lexeme),
        ),
    }
}

pub fn float_operand(lexeme: &str) -> Result<Operand> {
    match lexeme.parse::<f64>() {
        Ok(x) => Ok(Operand::Float(x)),
        Err(_) => error(ErrorKind::Lexical, format!("Malformed float literal {}", lexeme)),
    }
}

/// Decode a string lexeme, quotes included, into its value.
pub fn string_operand(lexeme: &str) -> Result<Operand> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'));
    let Some(inner) = inner else {
        return error(ErrorKind::Lexical, format!("Malformed string literal {}", lexeme));
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let Some(high) = chars.next().and_then(|h| h.to_digit(16)) else {
                    return error(ErrorKind::Lexical, "Expected a-f or digit after 'x'");
                };
                let mut code = high;
                if let Some(low) = chars.peek().and_then(|l| l.to_digit(16)) {
                    chars.next();
                    code = code * 16 + low;
                }
                // at most 0xff, always a valid scalar value
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            other => {
                return error(
                    ErrorKind::Lexical,
                    format!("Invalid escape sequence \\{}", other.map(String::from).unwrap_or_default()),
                )
            }
        }
    }
    Ok(Operand::Str(out))
}

/// Operand for a literal token kind; identifiers are not literals.
pub fn operand_for(kind: &TokenKind) -> Result<Operand> {
    match kind {
        TokenKind::Integer(s) => int_operand(s),
        TokenKind::Float(s) => float_operand(s),
        TokenKind::String(s) => string_operand(s),
        TokenKind::True => Ok(Operand::Bool(true)),
        TokenKind::False => Ok(Operand::Bool(false)),
        TokenKind::Nil => Ok(Operand::Nil),
        other => error(ErrorKind::Internal, format!("{} is not a literal", other.name())),
    }
}

/// Format like C's `printf("%a")`: `0x1.8p+0` for 1.5.
pub fn hex_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    let bits = x.to_bits();
    let sign = if bits >> 63 == 1 { "-" } else { "" };
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let mantissa = bits & ((1u64 << 52) - 1);

    let (lead, exp) = match (biased, mantissa) {
        (0, 0) => (0, 0),
        (0, _) => (0, -1022),
        _ => (1, biased - 1023),
    };

    let mut frac = format!("{:013x}", mantissa);
    while frac.ends_with('0') {
        frac.pop();
    }
    let dot = if frac.is_empty() { "" } else { "." };
    let exp_sign = if exp >= 0 { "+" } else { "" };
    format!("{}0x{}{}{}p{}{}", sign, lead, dot, frac, exp_sign, exp)
}
