//! IFJ18 scanner: converts source text into tokens.
//!
//! The scanner is a deterministic state machine (see [`machine`]) that reads
//! one lookahead character at a time. A lexeme is accepted when the
//! lookahead cannot extend it; that lookahead is kept and starts the next
//! lexeme. Every [`Scanner`] owns its position state, so scanning a new source
//! only needs a new scanner.

mod machine;

use std::str::Chars;

use ifj_syntax::error::{Error, ErrorKind, Result};
use ifj_syntax::token::{Token, TokenList};
use tracing::{debug, trace};

use crate::machine::{describe_rejection, State, Step};

/// Result of one run of the machine.
enum Scan {
    Token(Token),
    Skip,
    Error(Error),
}

/// Streaming scanner that produces tokens with positions.
pub struct Scanner<'a> {
    chars: Chars<'a>,
    /// Lookahead character; `None` once the input is exhausted.
    current: Option<char>,
    line: usize,
    col: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner over the given source string.
    ///
    /// The scanner starts on a virtual newline at line 0 so a block comment
    /// may open on the first line; that newline never becomes a token.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            current: Some('\n'),
            line: 0,
            col: 1,
        }
    }

    /// Line of the lookahead character.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the lookahead character.
    pub fn col(&self) -> usize {
        self.col
    }

    fn advance(&mut self) {
        let Some(prev) = self.current else {
            return;
        };
        self.current = self.chars.next();
        if prev == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    fn run_machine(&mut self) -> Scan {
        let (line, col) = (self.line, self.col);
        let mut state = State::Start;
        let mut lexeme = String::new();

        loop {
            let c = self.current;
            match machine::step(state, c) {
                Step::Goto(next) => {
                    if let Some(ch) = c {
                        lexeme.push(ch);
                    }
                    self.advance();
                    state = next;
                }
                Step::Accept(accept) => {
                    return Scan::Token(Token::new(accept.into_kind(lexeme), line, col));
                }
                Step::Halt => return Scan::Skip,
                Step::Reject => {
                    let err = Error::with_span(
                        ErrorKind::Lexical,
                        describe_rejection(state, c),
                        self.line,
                        self.col,
                    );
                    debug!(line = self.line, col = self.col, ?state, "lexical error");
                    // Resynchronize by dropping a character nothing can start with;
                    // otherwise it begins the next lexeme.
                    if state == State::Start {
                        self.advance();
                    }
                    return Scan::Error(err);
                }
            }
        }
    }

    /// Scan the next token.
    ///
    /// Whitespace and comments are skipped. A lexical error aborts only the
    /// current lexeme: calling `next_token` again resumes scanning. After the
    /// end of input every call returns an end-of-file token.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            match self.run_machine() {
                Scan::Token(token) if token.line == 0 => continue,
                Scan::Token(token) => {
                    trace!(line = token.line, col = token.col, kind = %token.kind, "token");
                    return Ok(token);
                }
                Scan::Skip => continue,
                Scan::Error(err) => return Err(err),
            }
        }
    }

    /// Tokenize the entire input into a list ending with an end-of-file token.
    ///
    /// Scanning continues past lexical errors so that every error in the
    /// source is reported; if there was at least one, all of them are
    /// returned instead of the tokens.
    pub fn tokenize(&mut self) -> std::result::Result<TokenList, Vec<Error>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let done = token.is_eof();
                    tokens.push(token);
                    if done {
                        break;
                    }
                }
                Err(err) => errors.push(err),
            }
        }
        debug!(tokens = tokens.len(), errors = errors.len(), "tokenize finished");
        if errors.is_empty() {
            Ok(TokenList::new(tokens))
        } else {
            Err(errors)
        }
    }
}

/// Tokenize `input` with a fresh [`Scanner`].
pub fn tokenize(input: &str) -> std::result::Result<TokenList, Vec<Error>> {
    Scanner::new(input).tokenize()
}
