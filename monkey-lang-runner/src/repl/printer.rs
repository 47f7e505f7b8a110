use std::io::Write;

use monkey_lang_core::parser::ParseError;
use monkey_lang_interpreter::object::Object;

use crate::error::format_errors;

pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn welcome(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "Welcome to Monkey")
    }

    pub fn farewell(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "See you!")
    }

    pub fn print(&mut self, object: &Object) -> std::io::Result<()> {
        writeln!(self.out, "{}", object.inspect())
    }

    pub fn print_errors(&mut self, errors: &[ParseError]) -> std::io::Result<()> {
        writeln!(self.out, "parser errors:")?;
        writeln!(self.out, "{}", format_errors(errors))
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
