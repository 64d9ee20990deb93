use std::sync::OnceLock;

use ifj_syntax::error::{Error, ErrorKind};
use owo_colors::OwoColorize;

/// Whether diagnostics are colored. `IFJC_NO_COLOR` turns colors off.
pub fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("IFJC_NO_COLOR").is_none())
}

/// Apply `style` to `text` when colors are enabled.
pub fn paint(text: &str, style: fn(&str) -> String) -> String {
    if colors_enabled() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Print `err` with the offending source line and a caret under its column.
pub fn render_error(source: &str, err: &Error) {
    eprintln!(
        "{}: {}",
        paint(err.kind.label(), |s| s.red().bold().to_string()),
        paint(&err.msg, |s| s.red().to_string())
    );
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
            let gutter = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", paint(&gutter, |s| s.bright_black().to_string()), src_line);

            let mut marker = " ".repeat(gutter.len() + col.saturating_sub(1));
            marker.push_str("^ error here");
            eprintln!("{}", paint(&marker, |s| s.red().to_string()));
            eprintln!("     |");
        }
    }
    provide_error_suggestions(err);
}

/// Print errors from a source that produced several at once.
pub fn render_errors(source: &str, errors: &[Error]) {
    for err in errors {
        render_error(source, err);
    }
}

fn help(text: &str) {
    eprintln!("{}", paint(text, |s| s.yellow().to_string()));
}

fn example(text: &str) {
    eprintln!("    {}", paint(text, |s| s.bright_black().to_string()));
}

pub fn provide_error_suggestions(err: &Error) {
    let msg = err.msg.as_str();
    match err.kind {
        ErrorKind::Lexical if msg.contains("block comment") => {
            help("Help: A block comment opened with =begin must be closed by =end.");
            example("Both markers have to start at the beginning of a line.");
        }
        ErrorKind::Lexical if msg.contains("string") => {
            help("Help: String literals end on the same line with a closing \".");
            example("Escapes: \\\" \\n \\t \\s \\\\ \\xHH");
        }
        ErrorKind::Lexical => {
            help("Help: This character cannot continue the current token.");
            example("Integers: 42, 017, 0b101, 0x1f. Floats: 1.5, 2e10, 3.0E-2");
        }
        ErrorKind::Syntax if msg.contains("empty") => {
            help("Help: An expression was expected here.");
        }
        ErrorKind::Syntax if msg.contains("LBRCKT") || msg.contains("RBRCKT") => {
            help("Help: Check that every '(' has a matching ')'.");
        }
        ErrorKind::Syntax if msg.contains("ASSIGN") => {
            help("Help: Use '==' for comparison, '=' only to assign to a variable.");
            example("Example: x = 1 + 2");
        }
        ErrorKind::Syntax => {
            help("Help: Operators and operands must alternate.");
            example("Example: (a + 1) * 2");
        }
        ErrorKind::Undeclared => {
            help("Help: Variables must be assigned before they are used.");
            example("Example: x = 42");
        }
        ErrorKind::Semantic if msg.contains("64 bits") => {
            help("Help: Integer literals must fit in a signed 64-bit integer.");
        }
        ErrorKind::Semantic => {
            help("Help: Arithmetic needs numbers, '+' also joins two strings.");
            example("int and float operands are converted to float; 'not' needs a boolean.");
        }
        ErrorKind::Runtime(57) => {
            help("Help: You cannot divide by zero.");
        }
        ErrorKind::Runtime(53) => {
            help("Help: A variable held a value of the wrong type for this operator.");
        }
        ErrorKind::Internal => {
            help("Help: This is a compiler bug. Please report it with the input that caused it.");
        }
        _ => {}
    }
}
