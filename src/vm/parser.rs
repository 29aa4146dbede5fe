//! # VM Command Parser
//!
//! Reads the VM textual grammar (one command per line, `//` line comments,
//! blank lines ignored) and produces a [`Command`](crate::vm::command::Command)
//! per line. Tokens are split on whitespace rather than matched with a
//! regular expression, since the grammar has a fixed, small vocabulary.


use crate::error::{CompileError, ErrorKind, Span};
use crate::vm::command::{ArithmeticOp, Command, Segment, SourceCommand};

pub struct ParseResult {
    pub commands: Vec<SourceCommand>,
    pub errors: Vec<CompileError>,
}

#[must_use]
pub fn parse(source: &str, file: &str) -> ParseResult {
    let mut commands = Vec::new();
    let mut errors = Vec::new();

    for (line_no, raw_line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let stripped = strip_comment(raw_line).trim();
        if stripped.is_empty() {
            continue;
        }

        match parse_line(stripped, file, line_no) {
            Ok(command) => commands.push(SourceCommand {
                command,
                file: file.to_string(),
                span: Span::new(line_no, 1),
            }),
            Err(err) => errors.push(err),
        }
    }

    ParseResult { commands, errors }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_line(line: &str, file: &str, line_no: usize) -> Result<Command, CompileError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let span = Span::new(line_no, 1);

    match parts.as_slice() {
        [mnemonic] if *mnemonic == "return" => Ok(Command::Return),
        [mnemonic] if ArithmeticOp::from_str(mnemonic).is_some() => {
            Ok(Command::Arithmetic(ArithmeticOp::from_str(mnemonic).unwrap()))
        }
        ["push", segment, index] => Ok(Command::Push {
            segment: parse_segment(segment, file, span)?,
            index: parse_index(index, file, span)?,
        }),
        ["pop", segment, index] => Ok(Command::Pop {
            segment: parse_segment(segment, file, span)?,
            index: parse_index(index, file, span)?,
        }),
        ["label", name] => Ok(Command::Label((*name).to_string())),
        ["goto", name] => Ok(Command::Goto((*name).to_string())),
        ["if-goto", name] => Ok(Command::IfGoto((*name).to_string())),
        ["function", name, n_locals] => Ok(Command::Function {
            name: (*name).to_string(),
            n_locals: parse_index(n_locals, file, span)?,
        }),
        ["call", name, n_args] => Ok(Command::Call {
            name: (*name).to_string(),
            n_args: parse_index(n_args, file, span)?,
        }),
        _ => Err(CompileError::new(
            ErrorKind::UnexpectedToken,
            format!("unrecognized VM command: '{}'", line),
            file,
            span,
        )),
    }
}

fn parse_segment(token: &str, file: &str, span: Span) -> Result<Segment, CompileError> {
    Segment::from_str(token).ok_or_else(|| {
        CompileError::new(
            ErrorKind::UnexpectedToken,
            format!("unknown memory segment '{}'", token),
            file,
            span,
        )
    })
}

fn parse_index(token: &str, file: &str, span: Span) -> Result<u32, CompileError> {
    token.parse::<u32>().map_err(|_| {
        CompileError::new(
            ErrorKind::UnexpectedToken,
            format!("expected a non-negative integer, found '{}'", token),
            file,
            span,
        )
    })
}
