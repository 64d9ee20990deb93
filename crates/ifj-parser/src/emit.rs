//! Destinations for emitted instructions.

use std::io::{self, Write};

use ifj_bytecode::{Instruction, Program};

/// Receives instructions in emission order.
///
/// Emission is eager: an instruction reaches the sink as soon as the
/// reduction producing it runs, so a failing parse leaves a partial stream.
pub trait CodeSink {
    fn emit(&mut self, instruction: Instruction);
}

impl CodeSink for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) {
        self.push(instruction);
    }
}

impl CodeSink for Program {
    fn emit(&mut self, instruction: Instruction) {
        self.push(instruction);
    }
}

impl<C: CodeSink + ?Sized> CodeSink for &mut C {
    fn emit(&mut self, instruction: Instruction) {
        (**self).emit(instruction);
    }
}

/// Writes each instruction as one line of IFJcode18 text.
///
/// The first write failure is kept and reported by [`WriterSink::finish`];
/// later instructions are dropped.
pub struct WriterSink<W: Write> {
    out: W,
    error: Option<io::Error>,
    written: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            written: 0,
        }
    }

    /// Number of instructions written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        match self.error.take() {
            Some(e) => Err(e),
            None => {
                self.out.flush()?;
                Ok(self.out)
            }
        }
    }
}

impl<W: Write> CodeSink for WriterSink<W> {
    fn emit(&mut self, instruction: Instruction) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{}", instruction) {
            Ok(()) => self.written += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifj_bytecode::Operand;

    #[test]
    fn test_writer_sink_prints_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit(Instruction::Pushs(Operand::Int(1)));
        sink.emit(Instruction::Nots);
        assert_eq!(sink.written(), 2);
        let out = sink.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "PUSHS int@1\nNOTS\n");
    }

    #[test]
    fn test_sink_through_reference() {
        fn emit_twice(mut sink: impl CodeSink) {
            sink.emit(Instruction::Adds);
            sink.emit(Instruction::Adds);
        }
        let mut code: Vec<Instruction> = Vec::new();
        emit_twice(&mut code);
        assert_eq!(code, vec![Instruction::Adds, Instruction::Adds]);
    }
}
