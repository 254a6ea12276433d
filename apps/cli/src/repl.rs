//! Interactive read-evaluate-print loop.

use std::io::{self, BufRead, Write};

use cdpdocs_core::QueryEngine;

pub(crate) const PROMPT: &str = "Ask a question (or type 'exit'): ";

/// Prompt, read a line, print the reply, until `exit` or end of input.
///
/// Only the line terminator is removed before matching, so `" exit"` is a
/// question, not a command. Returns the number of questions answered.
pub(crate) fn run<R: BufRead, W: Write>(
    engine: &QueryEngine<'_>,
    mut input: R,
    mut output: W,
) -> io::Result<usize> {
    let mut line = String::new();
    let mut answered = 0;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let question = strip_line_ending(&line);
        if question.to_lowercase() == "exit" {
            break;
        }

        writeln!(output, "{}", engine.respond(question))?;
        answered += 1;
    }

    Ok(answered)
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
