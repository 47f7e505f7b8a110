mod evaluator;
mod printer;
mod reader;

use std::io::Write;

use evaluator::{Evaluator, FreshEvaluator, SessionEvaluator};
use printer::Printer;
use reader::{ReadOutput, Reader};
use tracing::debug;

use crate::error::RunError;
use crate::Scope;

struct Repl<E: Evaluator, W: Write> {
    reader: Reader,
    evaluator: E,
    printer: Printer<W>,
}

impl<E: Evaluator, W: Write> Repl<E, W> {
    fn run(mut self) -> Result<(), RunError> {
        self.printer.welcome()?;
        loop {
            match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Errors(errors) => {
                    debug!(count = errors.len(), "line rejected by the parser");
                    self.printer.print_errors(&errors)?
                }
                ReadOutput::Value(program) => {
                    let result = self.evaluator.evaluate(program);
                    self.printer.print(&result)?
                }
            }
        }
        self.printer.farewell()?;
        Ok(())
    }
}

pub fn start(scope: Scope) -> Result<(), RunError> {
    let reader = Reader::new()?;
    let printer = Printer::new(std::io::stdout());

    match scope {
        Scope::Session => Repl {
            reader,
            evaluator: SessionEvaluator::new(),
            printer,
        }
        .run(),
        Scope::Fresh => Repl {
            reader,
            evaluator: FreshEvaluator,
            printer,
        }
        .run(),
    }
}
