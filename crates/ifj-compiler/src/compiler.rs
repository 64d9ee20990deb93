//! Line-oriented driver from tokens to IFJcode18.

use std::collections::BTreeSet;

use ifj_bytecode::Program;
use ifj_lexer::Scanner;
use ifj_parser::{parse_expression, CodeSink};
use ifj_syntax::error::{Error, ErrorKind, Result};
use ifj_syntax::token::{TokenCursor, TokenKind, TokenList};
use tracing::debug;

use crate::builder;

/// Compiles scripts made of expression lines and `name = expression` lines.
///
/// A compiler remembers the variables it has seen, so successive inputs may
/// be compiled against it and executed on one machine. The prologue is only
/// emitted for the first input. A failed compilation leaves the compiler as
/// it was.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    declared: BTreeSet<String>,
    /// Names with storage: defined by this compiler or supplied from outside.
    defined: BTreeSet<String>,
    prologue_done: bool,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `names` as declared elsewhere: expressions may use them and
    /// assignments store into them without defining them.
    pub fn with_declared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut compiler = Self::new();
        for name in names {
            let name = name.into();
            compiler.declared.insert(name.clone());
            compiler.defined.insert(name);
        }
        compiler
    }

    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.declared.iter().map(String::as_str)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    pub fn compile(&mut self, tokens: &TokenList) -> Result<Program> {
        let mut program = Program::new();
        self.compile_into(tokens, &mut program)?;
        Ok(program)
    }

    /// Scan and compile `source`; the first lexical error is returned.
    pub fn compile_source(&mut self, source: &str) -> Result<Program> {
        let tokens = Scanner::new(source).tokenize().map_err(|errors| {
            errors
                .into_iter()
                .next()
                .unwrap_or_else(|| Error::new(ErrorKind::Internal, "Scanner failed without an error"))
        })?;
        self.compile(&tokens)
    }

    /// Compile into any sink. Instructions are emitted as lines compile, so
    /// a sink may hold a partial program when an error is returned.
    pub fn compile_into<C: CodeSink + ?Sized>(&mut self, tokens: &TokenList, sink: &mut C) -> Result<()> {
        let mut next = self.clone();
        next.compile_lines(tokens.cursor(), sink)?;
        *self = next;
        Ok(())
    }

    fn compile_lines<C: CodeSink + ?Sized>(&mut self, mut cursor: TokenCursor<'_>, sink: &mut C) -> Result<()> {
        if !self.prologue_done {
            builder::prologue(sink);
            self.prologue_done = true;
        }

        while let Some(token) = cursor.current() {
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Eol => cursor.advance(),
                TokenKind::Ident(name)
                    if cursor.peek().map_or(false, |t| t.kind == TokenKind::Assign) =>
                {
                    cursor.advance();
                    cursor.advance();
                    parse_expression(&mut cursor, &self.declared, sink)?;
                    expect_line_end(&cursor)?;

                    let define = self.defined.insert(name.clone());
                    debug!(line = token.line, name = %name, define, "assignment");
                    builder::assign(sink, name, define);
                    self.declared.insert(name.clone());
                }
                _ => {
                    let value_type = parse_expression(&mut cursor, &self.declared, sink)?;
                    expect_line_end(&cursor)?;
                    debug!(line = token.line, %value_type, "expression statement");
                    builder::print_result(sink);
                }
            }
        }
        Ok(())
    }
}

fn expect_line_end(cursor: &TokenCursor<'_>) -> Result<()> {
    match cursor.current() {
        Some(t) if matches!(t.kind, TokenKind::Eol | TokenKind::Eof) => Ok(()),
        Some(t) => Err(Error::with_span(
            ErrorKind::Syntax,
            format!("Expected end of line after expression, found {}", t.kind.name()),
            t.line,
            t.col,
        )),
        None => Err(Error::new(ErrorKind::Internal, "Token list has no end-of-file token")),
    }
}
