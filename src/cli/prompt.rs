//! Interactive text input for commands that collect free text.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Asks the user a question and returns the trimmed answer.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Reads answers from stdin, printing each question to stdout first.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{} ", question)?;
        stdout.flush()?;

        read_answer(&mut io::stdin().lock())
    }
}

/// Read one trimmed line. End of input is `UnexpectedEof`, not an empty answer.
fn read_answer(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

/// Answers questions from a fixed list, recording what was asked.
///
/// Running out of answers is an `UnexpectedEof` error, as with a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer available"))
    }
}
