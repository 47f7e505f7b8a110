use monkey_lang_core::ast::Program;
use monkey_lang_core::parser::{self, ParseError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";

#[derive(Debug)]
pub enum ReadOutput {
    Exit,
    Clear,
    Value(Program),
    Errors(Vec<ParseError>),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            rl: DefaultEditor::new()?,
        })
    }

    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            // Ctrl-C drops the current line
            Err(ReadlineError::Interrupted) => return Ok(ReadOutput::Clear),
            Err(ReadlineError::Eof) => return Ok(ReadOutput::Exit),
            Err(err) => return Err(err),
            Ok(line) => line,
        };
        if !line.is_empty() {
            self.rl.add_history_entry(&line)?;
        }

        Ok(read_line(&line))
    }
}

/// An empty line ends the session; anything else is parsed on its own.
pub fn read_line(line: &str) -> ReadOutput {
    if line.is_empty() {
        return ReadOutput::Exit;
    }

    match parser::parse(line) {
        Ok(program) => ReadOutput::Value(program),
        Err(errors) => ReadOutput::Errors(errors),
    }
}
