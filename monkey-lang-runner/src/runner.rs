use std::path::Path;

use monkey_lang_core::parser;
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::evaluator;
use monkey_lang_interpreter::object::Object;
use tracing::info;

use crate::error::RunError;

/// Parses the whole of `source` and evaluates it in a new global environment.
/// Nothing is evaluated if the source has parse errors.
pub fn execute(source: &str) -> Result<Object, RunError> {
    let program = parser::parse(source).map_err(RunError::Parse)?;
    let mut env = Environment::new();
    Ok(evaluator::eval_program(&program, &mut env))
}

pub fn execute_file(path: &Path) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunError::Read {
        path: path.to_owned(),
        source,
    })?;
    info!(path = %path.display(), "running script");

    let evaluated = execute(&source)?;
    println!("{}", evaluated.inspect());
    Ok(())
}
