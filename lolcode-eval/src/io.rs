//! Injected collaborators: where `VISIBLE` writes and where `GIMMEH` reads.
//!
//! Both are external collaborators supplied by the embedding layer so the
//! same core serves a terminal REPL and a modal GUI prompt without the
//! interpreter knowing which one it's talking to.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Where `VISIBLE`/`SMOOSH` output lands. Must accept UTF-8 text with
/// embedded newlines.
pub trait PrintSink {
    fn print_line(&mut self, text: &str);
}

/// A blocking request-reply collaborator satisfying `GIMMEH`.
pub trait InputProvider {
    /// Returns the raw text the user entered, with no surrounding
    /// whitespace trimmed or added — the interpreter applies the
    /// space-padding rule itself.
    fn read_input(&mut self) -> String;
}

/// Default print sink: standard output, one line per call.
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn print_line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Default input provider: one line from standard input, trimmed of its
/// trailing newline.
pub struct StdinProvider;

impl InputProvider for StdinProvider {
    fn read_input(&mut self) -> String {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_ok() {
            let trimmed = line.trim_end_matches(['\n', '\r']);
            return trimmed.to_string();
        }
        String::new()
    }
}

/// An in-memory sink used by tests to assert on the lines a program
/// printed without touching real stdout.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub lines: Vec<String>,
}

impl PrintSink for BufferSink {
    fn print_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }

    pub fn joined(&self) -> String {
        let mut out = self.lines.join("\n");
        if !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Shared handle to a [`BufferSink`] so a test can hand the interpreter
/// ownership of the sink (via a `Box<dyn PrintSink>`) while still holding
/// onto a reference it can inspect afterward.
impl PrintSink for Rc<RefCell<BufferSink>> {
    fn print_line(&mut self, text: &str) {
        self.borrow_mut().print_line(text);
    }
}

/// An in-memory input provider used by tests to script `GIMMEH` answers.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: std::collections::VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ScriptedInput {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn read_input(&mut self) -> String {
        self.answers.pop_front().unwrap_or_default()
    }
}

/// Used by [`crate::interpreter::Interpreter`] when no injected sink is
/// supplied; writes through a raw `Write` so the CLI can hand it
/// `io::stdout().lock()` directly instead of going through `println!`.
pub struct WriterSink<W: Write>(pub W);

impl<W: Write> PrintSink for WriterSink<W> {
    fn print_line(&mut self, text: &str) {
        let _ = writeln!(self.0, "{text}");
    }
}
