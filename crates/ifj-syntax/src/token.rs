//! Token definitions for the IFJ18 language.
//!
//! This module defines every token the IFJ18 scanner can produce, together with
//! the owned [`TokenList`] that holds a whole scanned source and the
//! [`TokenCursor`] the expression parser walks it with.
//!
//! # Token Categories
//!
//! - **Identifiers**: variable and function names (`foo`, `is_empty?`, `print!`)
//! - **Literals**: integers, floats and strings (`42`, `0x1f`, `1.5e3`, `"hi\n"`)
//! - **Keywords**: reserved words (`def`, `if`, `while`, `nil`)
//! - **Operators**: arithmetic, relational and boolean operators (`+`, `<=`, `&&`)
//! - **Punctuation**: brackets, comma and end-of-line
//! - **Special**: the end-of-file marker that terminates every list
//!
//! # Examples
//!
//! ```rust
//! use ifj_syntax::{Token, TokenKind};
//!
//! let keyword = Token {
//!     kind: TokenKind::While,
//!     line: 1,
//!     col: 1,
//! };
//! assert_eq!(keyword.text(), None);
//!
//! let number = Token {
//!     kind: TokenKind::Integer("0x1f".to_string()),
//!     line: 2,
//!     col: 5,
//! };
//! assert_eq!(number.text(), Some("0x1f"));
//! ```

use std::fmt;

/// Token types that can be produced by the IFJ18 scanner.
///
/// Literal and identifier variants carry the exact lexeme they were scanned
/// from: numbers stay in their source base and strings keep their quotes and
/// escape sequences. Converting a lexeme into a value is the job of the
/// operand helpers in `ifj-bytecode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier, optionally ending with `?` or `!`.
    Ident(String),

    /// An integer literal in decimal, octal (`017`), binary (`0b101`) or
    /// hexadecimal (`0xff`) notation.
    Integer(String),

    /// A floating point literal (`1.5`, `2e10`, `3.0E-2`).
    Float(String),

    /// A string literal, including both quotes: `"a\tb"`.
    String(String),

    // === Keywords ===
    /// `def`
    Def,
    /// `do`
    Do,
    /// `else`
    Else,
    /// `end`
    End,
    /// `if`
    If,
    /// `then`
    Then,
    /// `while`
    While,
    /// `true`
    True,
    /// `false`
    False,
    /// `nil`
    Nil,

    // === Punctuation ===
    /// Left bracket `(`
    LBracket,
    /// Right bracket `)`
    RBracket,
    /// Comma `,`
    Comma,
    /// End of a source line
    Eol,

    // === Operators ===
    /// Addition `+`
    Add,
    /// Subtraction `-`
    Sub,
    /// Multiplication `*`
    Mul,
    /// Division `/`
    Div,
    /// Equality `==`
    Eql,
    /// Inequality `!=`
    Neq,
    /// Less than `<`
    Lt,
    /// Greater than `>`
    Gt,
    /// Less than or equal `<=`
    Lte,
    /// Greater than or equal `>=`
    Gte,
    /// Boolean negation, `not` or `!`
    Not,
    /// Boolean conjunction, `and` or `&&`
    And,
    /// Boolean disjunction, `or` or `||`
    Or,
    /// Assignment `=`
    Assign,

    /// End-of-file marker, always the last token of a [`TokenList`]
    Eof,
}

impl TokenKind {
    /// Upper-case name used in diagnostics and token dumps.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "ID",
            TokenKind::Integer(_) => "INTEGER",
            TokenKind::Float(_) => "DOUBLE",
            TokenKind::String(_) => "STRING",
            TokenKind::Def => "DEF",
            TokenKind::Do => "DO",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::While => "WHILE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Nil => "NIL",
            TokenKind::LBracket => "LBRCKT",
            TokenKind::RBracket => "RBRCKT",
            TokenKind::Comma => "COMMA",
            TokenKind::Eol => "EOL",
            TokenKind::Add => "ADD",
            TokenKind::Sub => "SUB",
            TokenKind::Mul => "MUL",
            TokenKind::Div => "DIV",
            TokenKind::Eql => "EQL",
            TokenKind::Neq => "NEQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Lte => "LTE",
            TokenKind::Gte => "GTE",
            TokenKind::Not => "NOT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Eof => "EOF",
        }
    }

    /// The owned lexeme of identifier and literal kinds.
    pub fn text(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(s)
            | TokenKind::Integer(s)
            | TokenKind::Float(s)
            | TokenKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Map reserved words to their keyword kind.
    ///
    /// The match is exact and case-sensitive. `not`, `and` and `or` share their
    /// kinds with `!`, `&&` and `||`.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "def" => TokenKind::Def,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "not" => TokenKind::Not,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            "then" => TokenKind::Then,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{}({})", self.name(), text),
            None => f.write_str(self.name()),
        }
    }
}

/// A token with its source location.
///
/// `line` and `col` are 1-based. An end-of-line token sits at the position of
/// the newline it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type and, for literals and identifiers, the lexeme of this token
    pub kind: TokenKind,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Self { kind, line, col }
    }

    /// Shorthand for `self.kind.text()`.
    pub fn text(&self) -> Option<&str> {
        self.kind.text()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}\t{}", self.line, self.col, self.kind)
    }
}

/// An owned, ordered token sequence ending with exactly one [`TokenKind::Eof`].
///
/// Neighbouring tokens are reached by index; the whole list is released with a
/// single drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Wrap scanned tokens, appending an end-of-file token when the input does
    /// not already end with one. Any end-of-file token before the last
    /// position is dropped.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let last = tokens.pop();
        tokens.retain(|t| !t.is_eof());
        match last {
            Some(t) if t.is_eof() => tokens.push(t),
            Some(t) => {
                let (line, col) = (t.line, t.col);
                tokens.push(t);
                tokens.push(Token::new(TokenKind::Eof, line, col + 1));
            }
            None => tokens.push(Token::new(TokenKind::Eof, 1, 1)),
        }
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// A list always holds at least the end-of-file token.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The token before `index`, if any.
    pub fn prev(&self, index: usize) -> Option<&Token> {
        index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// The token after `index`, if any.
    pub fn next(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index + 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// A cursor positioned on the first token.
    pub fn cursor(&self) -> TokenCursor<'_> {
        TokenCursor::new(&self.tokens)
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Read position inside a token slice.
///
/// The cursor never moves past the final token: once it reaches the
/// end-of-file token, [`advance`](TokenCursor::advance) leaves it there.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// Create a cursor over `tokens`. The slice must not be empty and should
    /// end with an end-of-file token; [`TokenList::cursor`] guarantees both.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The token under the cursor, or `None` for an empty slice.
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// The token after the current one.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos + 1)
    }

    /// The token before the current one.
    pub fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Move to the next token; stays on the last token.
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_eof(&self) -> bool {
        self.current().map_or(true, Token::is_eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, col: usize) -> Token {
        Token::new(kind, 1, col)
    }

    #[test]
    fn test_keyword_lookup_is_exact() {
        assert_eq!(TokenKind::keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword("and"), Some(TokenKind::And));
        assert_eq!(TokenKind::keyword("While"), None);
        assert_eq!(TokenKind::keyword("whiles"), None);
    }

    #[test]
    fn test_text_only_for_literals() {
        assert_eq!(TokenKind::Ident("x".into()).text(), Some("x"));
        assert_eq!(TokenKind::String("\"a\"".into()).text(), Some("\"a\""));
        assert_eq!(TokenKind::Add.text(), None);
        assert_eq!(TokenKind::Nil.text(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::Float("1.5".into()).to_string(), "DOUBLE(1.5)");
        assert_eq!(TokenKind::RBracket.to_string(), "RBRCKT");
        assert_eq!(tok(TokenKind::Eol, 3).to_string(), "1:3\tEOL");
    }

    #[test]
    fn test_list_always_ends_with_single_eof() {
        let list = TokenList::new(vec![tok(TokenKind::Integer("1".into()), 1)]);
        assert_eq!(list.len(), 2);
        assert!(list.get(1).map_or(false, Token::is_eof));

        let list = TokenList::new(vec![
            tok(TokenKind::Eof, 1),
            tok(TokenKind::Add, 2),
            tok(TokenKind::Eof, 3),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().filter(|t| t.is_eof()).count(), 1);

        let empty = TokenList::new(Vec::new());
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_neighbours_by_index() {
        let list = TokenList::new(vec![tok(TokenKind::Add, 1), tok(TokenKind::Sub, 2)]);
        assert_eq!(list.prev(0), None);
        assert_eq!(list.next(0).map(|t| &t.kind), Some(&TokenKind::Sub));
        assert_eq!(list.prev(1).map(|t| &t.kind), Some(&TokenKind::Add));
    }

    #[test]
    fn test_cursor_stops_at_eof() {
        let list = TokenList::new(vec![tok(TokenKind::Add, 1)]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.current().map(|t| &t.kind), Some(&TokenKind::Add));
        cursor.advance();
        assert!(cursor.at_eof());
        cursor.advance();
        assert!(cursor.at_eof());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.previous().map(|t| &t.kind), Some(&TokenKind::Add));
    }
}
