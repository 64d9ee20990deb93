//! Transition table of the scanner's finite-state machine.
//!
//! Each call to [`step`] looks at one lookahead character (`None` is end of
//! input) and either moves to another state, which consumes the character,
//! or finishes the current lexeme without consuming it.

use ifj_syntax::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Start,
    LBracket,
    RBracket,
    Comma,
    Eol,
    Eof,
    Space,
    // operators
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Gte,
    Lt,
    Lte,
    Eql,
    Not,
    Neq,
    And,
    And2,
    Or,
    Or2,
    Assign,
    // identifiers
    Ident,
    IdentFn,
    // strings
    Str,
    StrEscape,
    StrHex,
    StrEnd,
    // numbers
    Int0,
    Oct,
    Bin,
    Bin2,
    Hex,
    Hex2,
    Int,
    Dble,
    Dble2,
    Exp,
    ExpSign,
    Exp3,
    // comments
    LineComment,
    BlockOpen,
    BlockB,
    BlockBe,
    BlockBeg,
    BlockBegi,
    BlockBegin,
    BlockBody,
    BlockLine,
    BlockEq,
    BlockEqE,
    BlockEqEn,
    BlockEnd,
    BlockTrail,
}

/// Token class decided by an accepting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accept {
    Fixed(Fixed),
    Ident,
    Integer,
    Float,
    Str,
}

/// Payload-free kinds, kept `Copy` so the table stays a plain function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fixed {
    LBracket,
    RBracket,
    Comma,
    Eol,
    Eof,
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Gte,
    Lt,
    Lte,
    Eql,
    Neq,
    Not,
    And,
    Or,
    Assign,
}

impl Accept {
    /// Build the token kind; `lexeme` is only kept for literal and identifier
    /// classes.
    pub(crate) fn into_kind(self, lexeme: String) -> TokenKind {
        match self {
            Accept::Ident => TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Ident(lexeme)),
            Accept::Integer => TokenKind::Integer(lexeme),
            Accept::Float => TokenKind::Float(lexeme),
            Accept::Str => TokenKind::String(lexeme),
            Accept::Fixed(f) => match f {
                Fixed::LBracket => TokenKind::LBracket,
                Fixed::RBracket => TokenKind::RBracket,
                Fixed::Comma => TokenKind::Comma,
                Fixed::Eol => TokenKind::Eol,
                Fixed::Eof => TokenKind::Eof,
                Fixed::Add => TokenKind::Add,
                Fixed::Sub => TokenKind::Sub,
                Fixed::Mul => TokenKind::Mul,
                Fixed::Div => TokenKind::Div,
                Fixed::Gt => TokenKind::Gt,
                Fixed::Gte => TokenKind::Gte,
                Fixed::Lt => TokenKind::Lt,
                Fixed::Lte => TokenKind::Lte,
                Fixed::Eql => TokenKind::Eql,
                Fixed::Neq => TokenKind::Neq,
                Fixed::Not => TokenKind::Not,
                Fixed::And => TokenKind::And,
                Fixed::Or => TokenKind::Or,
                Fixed::Assign => TokenKind::Assign,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Consume the character and continue in the given state.
    Goto(State),
    /// The lexeme is complete; the character starts the next one.
    Accept(Accept),
    /// Whitespace or a comment ended; nothing to emit.
    Halt,
    /// No transition for this character.
    Reject,
}

fn is_space(c: char) -> bool {
    // C `isspace` set
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

fn is_digit(c: Option<char>) -> bool {
    c.map_or(false, |c| c.is_ascii_digit())
}

fn is_hex(c: Option<char>) -> bool {
    c.map_or(false, |c| c.is_ascii_hexdigit())
}

fn is_octal(c: Option<char>) -> bool {
    matches!(c, Some('0'..='7'))
}

fn is_binary(c: Option<char>) -> bool {
    matches!(c, Some('0' | '1'))
}

fn fixed(f: Fixed) -> Step {
    Step::Accept(Accept::Fixed(f))
}

/// Inside a block comment body: newline restarts the line check, end of input
/// is an error, anything else is comment text.
fn block_fallback(c: Option<char>) -> Step {
    match c {
        Some('\n') => Step::Goto(State::BlockLine),
        None => Step::Reject,
        Some(_) => Step::Goto(State::BlockBody),
    }
}

pub(crate) fn step(state: State, c: Option<char>) -> Step {
    use State as S;

    match state {
        S::Start => match c {
            None => Step::Goto(S::Eof),
            Some(ch) => match ch {
                '!' => Step::Goto(S::Not),
                '&' => Step::Goto(S::And),
                '|' => Step::Goto(S::Or),
                '>' => Step::Goto(S::Gt),
                '<' => Step::Goto(S::Lt),
                '=' => Step::Goto(S::Assign),
                '+' => Step::Goto(S::Add),
                '-' => Step::Goto(S::Sub),
                '*' => Step::Goto(S::Mul),
                '/' => Step::Goto(S::Div),
                '#' => Step::Goto(S::LineComment),
                '(' => Step::Goto(S::LBracket),
                ')' => Step::Goto(S::RBracket),
                '"' => Step::Goto(S::Str),
                '0' => Step::Goto(S::Int0),
                ',' => Step::Goto(S::Comma),
                '\n' => Step::Goto(S::Eol),
                '1'..='9' => Step::Goto(S::Int),
                'a'..='z' | '_' => Step::Goto(S::Ident),
                ch if is_space(ch) => Step::Goto(S::Space),
                _ => Step::Reject,
            },
        },
        S::LBracket => fixed(Fixed::LBracket),
        S::RBracket => fixed(Fixed::RBracket),
        S::Comma => fixed(Fixed::Comma),
        S::Eol => match c {
            Some('=') => Step::Goto(S::BlockOpen),
            _ => fixed(Fixed::Eol),
        },
        S::Eof => fixed(Fixed::Eof),
        S::Space => match c {
            Some(ch) if is_space(ch) && ch != '\n' => Step::Goto(S::Space),
            _ => Step::Halt,
        },

        S::Add => fixed(Fixed::Add),
        S::Sub => fixed(Fixed::Sub),
        S::Mul => fixed(Fixed::Mul),
        S::Div => fixed(Fixed::Div),
        S::Gt => match c {
            Some('=') => Step::Goto(S::Gte),
            _ => fixed(Fixed::Gt),
        },
        S::Gte => fixed(Fixed::Gte),
        S::Lt => match c {
            Some('=') => Step::Goto(S::Lte),
            _ => fixed(Fixed::Lt),
        },
        S::Lte => fixed(Fixed::Lte),
        S::Eql => fixed(Fixed::Eql),
        S::Not => match c {
            Some('=') => Step::Goto(S::Neq),
            _ => fixed(Fixed::Not),
        },
        S::Neq => fixed(Fixed::Neq),
        S::And => match c {
            Some('&') => Step::Goto(S::And2),
            _ => Step::Reject,
        },
        S::And2 => fixed(Fixed::And),
        S::Or => match c {
            Some('|') => Step::Goto(S::Or2),
            _ => Step::Reject,
        },
        S::Or2 => fixed(Fixed::Or),
        S::Assign => match c {
            Some('=') => Step::Goto(S::Eql),
            _ => fixed(Fixed::Assign),
        },

        S::Ident => match c {
            Some('?' | '!') => Step::Goto(S::IdentFn),
            Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => Step::Goto(S::Ident),
            _ => Step::Accept(Accept::Ident),
        },
        S::IdentFn => Step::Accept(Accept::Ident),

        S::Str => match c {
            Some('\\') => Step::Goto(S::StrEscape),
            Some('"') => Step::Goto(S::StrEnd),
            Some(ch) if ch >= ' ' => Step::Goto(S::Str),
            _ => Step::Reject,
        },
        S::StrEscape => match c {
            Some('x') => Step::Goto(S::StrHex),
            Some('"' | 'n' | 't' | 's' | '\\') => Step::Goto(S::Str),
            _ => Step::Reject,
        },
        S::StrHex => {
            if is_hex(c) {
                Step::Goto(S::Str)
            } else {
                Step::Reject
            }
        }
        S::StrEnd => Step::Accept(Accept::Str),

        S::Int0 => match c {
            Some('e' | 'E') => Step::Goto(S::Exp),
            Some('.') => Step::Goto(S::Dble),
            Some('b') => Step::Goto(S::Bin),
            Some('x') => Step::Goto(S::Hex),
            _ if is_octal(c) => Step::Goto(S::Oct),
            _ if !is_digit(c) => Step::Accept(Accept::Integer),
            _ => Step::Reject,
        },
        S::Oct => {
            if is_octal(c) {
                Step::Goto(S::Oct)
            } else if !is_digit(c) {
                Step::Accept(Accept::Integer)
            } else {
                Step::Reject
            }
        }
        S::Bin => {
            if is_binary(c) {
                Step::Goto(S::Bin2)
            } else {
                Step::Reject
            }
        }
        S::Bin2 => {
            if is_binary(c) {
                Step::Goto(S::Bin2)
            } else if !is_digit(c) {
                Step::Accept(Accept::Integer)
            } else {
                Step::Reject
            }
        }
        S::Hex => {
            if is_hex(c) {
                Step::Goto(S::Hex2)
            } else {
                Step::Reject
            }
        }
        S::Hex2 => {
            if is_hex(c) {
                Step::Goto(S::Hex2)
            } else {
                Step::Accept(Accept::Integer)
            }
        }
        S::Int => match c {
            _ if is_digit(c) => Step::Goto(S::Int),
            Some('.') => Step::Goto(S::Dble),
            Some('e' | 'E') => Step::Goto(S::Exp),
            _ => Step::Accept(Accept::Integer),
        },
        S::Dble => {
            if is_digit(c) {
                Step::Goto(S::Dble2)
            } else {
                Step::Reject
            }
        }
        S::Dble2 => match c {
            _ if is_digit(c) => Step::Goto(S::Dble2),
            Some('e' | 'E') => Step::Goto(S::Exp),
            _ => Step::Accept(Accept::Float),
        },
        S::Exp => match c {
            _ if is_digit(c) => Step::Goto(S::Exp3),
            Some('+' | '-') => Step::Goto(S::ExpSign),
            _ => Step::Reject,
        },
        S::ExpSign => {
            if is_digit(c) {
                Step::Goto(S::Exp3)
            } else {
                Step::Reject
            }
        }
        S::Exp3 => {
            if is_digit(c) {
                Step::Goto(S::Exp3)
            } else {
                Step::Accept(Accept::Float)
            }
        }

        S::LineComment => match c {
            Some(ch) if ch != '\n' => Step::Goto(S::LineComment),
            _ => Step::Halt,
        },
        S::BlockOpen => expect(c, 'b', S::BlockB),
        S::BlockB => expect(c, 'e', S::BlockBe),
        S::BlockBe => expect(c, 'g', S::BlockBeg),
        S::BlockBeg => expect(c, 'i', S::BlockBegi),
        S::BlockBegi => expect(c, 'n', S::BlockBegin),
        S::BlockBegin => match c {
            Some('\n') => Step::Goto(S::BlockLine),
            Some(ch) if is_space(ch) => Step::Goto(S::BlockBody),
            _ => Step::Reject,
        },
        S::BlockBody => block_fallback(c),
        S::BlockLine => match c {
            Some('=') => Step::Goto(S::BlockEq),
            _ => block_fallback(c),
        },
        S::BlockEq => match c {
            Some('e') => Step::Goto(S::BlockEqE),
            _ => block_fallback(c),
        },
        S::BlockEqE => match c {
            Some('n') => Step::Goto(S::BlockEqEn),
            _ => block_fallback(c),
        },
        S::BlockEqEn => match c {
            Some('d') => Step::Goto(S::BlockEnd),
            _ => block_fallback(c),
        },
        S::BlockEnd => match c {
            Some(ch) if is_space(ch) && ch != '\n' => Step::Goto(S::BlockTrail),
            Some(ch) if ch != '\n' => Step::Goto(S::BlockBody),
            _ => Step::Halt,
        },
        S::BlockTrail => match c {
            Some(ch) if ch != '\n' => Step::Goto(S::BlockTrail),
            _ => Step::Halt,
        },
    }
}

fn expect(c: Option<char>, wanted: char, next: State) -> Step {
    if c == Some(wanted) {
        Step::Goto(next)
    } else {
        Step::Reject
    }
}

/// Diagnostic text for a character rejected in `state`.
pub(crate) fn describe_rejection(state: State, c: Option<char>) -> String {
    use State as S;

    let expectation = match state {
        S::Str => "Expected printable ASCII char (>= 0x20) in string, found ",
        S::StrEscape => "Expected '\"','n','t','s','x' or '\\' after '\\', found ",
        S::StrHex => "Expected a-f or digit after 'x', found ",
        S::Int0 | S::Oct => "Integer in octal base must be represented with numbers 0-7, found digit ",
        S::Bin => "Expected binary number after '0b', found ",
        S::Bin2 => "Integer in binary must be represented with 0 or 1, found digit ",
        S::Hex => "Expected hexadecimal number after '0x', found ",
        S::Dble => "Expected digit after decimal point, found ",
        S::Exp => "Expected digit or +,- sign in exponent, found ",
        S::ExpSign => "Expected digit after +,- sign in exponent, found ",
        S::And => "Expected '&' after '&', found ",
        S::Or => "Expected '|' after '|', found ",
        S::BlockBody | S::BlockLine | S::BlockEq | S::BlockEqE | S::BlockEqEn => {
            "Expected \"=end\", found "
        }
        _ => "Unexpected ",
    };

    let found = match c {
        None => "EOF".to_string(),
        Some('\n' | '\r') => "EOL".to_string(),
        Some(ch) if ch >= ' ' => format!("'{}'", ch),
        Some(ch) => format!("0x{:x}", u32::from(ch)),
    };

    let hint = match state {
        S::Str if matches!(c, Some('\n' | '\r')) => "; Did you forget to terminate the string?",
        S::Int0 => " after '0'",
        S::BlockBody | S::BlockLine | S::BlockEq | S::BlockEqE | S::BlockEqEn => {
            "; Reached end of file but block comment is still opened"
        }
        _ => "",
    };

    format!("{}{}{}", expectation, found, hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_state_dispatch() {
        assert_eq!(step(State::Start, Some('(')), Step::Goto(State::LBracket));
        assert_eq!(step(State::Start, Some('7')), Step::Goto(State::Int));
        assert_eq!(step(State::Start, Some('0')), Step::Goto(State::Int0));
        assert_eq!(step(State::Start, Some('_')), Step::Goto(State::Ident));
        assert_eq!(step(State::Start, None), Step::Goto(State::Eof));
        assert_eq!(step(State::Start, Some('A')), Step::Reject);
        assert_eq!(step(State::Start, Some('@')), Step::Reject);
    }

    #[test]
    fn test_single_char_operators_accept_on_anything() {
        assert_eq!(step(State::Add, Some('+')), fixed(Fixed::Add));
        assert_eq!(step(State::Add, None), fixed(Fixed::Add));
        assert_eq!(step(State::Lt, Some('=')), Step::Goto(State::Lte));
        assert_eq!(step(State::Lt, Some(' ')), fixed(Fixed::Lt));
    }

    #[test]
    fn test_octal_rejects_decimal_digits() {
        assert_eq!(step(State::Int0, Some('8')), Step::Reject);
        assert_eq!(step(State::Oct, Some('9')), Step::Reject);
        assert_eq!(step(State::Oct, Some(' ')), Step::Accept(Accept::Integer));
    }

    #[test]
    fn test_binary_rejects_other_digits() {
        assert_eq!(step(State::Bin, Some('2')), Step::Reject);
        assert_eq!(step(State::Bin2, Some('2')), Step::Reject);
        assert_eq!(step(State::Bin2, Some('+')), Step::Accept(Accept::Integer));
    }

    #[test]
    fn test_block_comment_body_cannot_hit_eof() {
        assert_eq!(step(State::BlockBody, None), Step::Reject);
        assert_eq!(step(State::BlockLine, Some('=')), Step::Goto(State::BlockEq));
        assert_eq!(step(State::BlockEqEn, Some('x')), Step::Goto(State::BlockBody));
        assert_eq!(step(State::BlockEnd, None), Step::Halt);
        assert_eq!(step(State::BlockEnd, Some('x')), Step::Goto(State::BlockBody));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            describe_rejection(State::Bin2, Some('2')),
            "Integer in binary must be represented with 0 or 1, found digit '2'"
        );
        assert_eq!(
            describe_rejection(State::Str, Some('\n')),
            "Expected printable ASCII char (>= 0x20) in string, found EOL; Did you forget to terminate the string?"
        );
        assert_eq!(
            describe_rejection(State::Int0, Some('9')),
            "Integer in octal base must be represented with numbers 0-7, found digit '9' after '0'"
        );
        assert_eq!(describe_rejection(State::Start, Some('\u{1}')), "Unexpected 0x1");
        assert!(describe_rejection(State::BlockBody, None).ends_with("block comment is still opened"));
    }

    #[test]
    fn test_keywords_reclassified_on_accept() {
        assert_eq!(Accept::Ident.into_kind("nil".into()), TokenKind::Nil);
        assert_eq!(Accept::Ident.into_kind("or".into()), TokenKind::Or);
        assert_eq!(
            Accept::Ident.into_kind("nil?".into()),
            TokenKind::Ident("nil?".into())
        );
    }
}
