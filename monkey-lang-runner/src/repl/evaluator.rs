use monkey_lang_core::ast::Program;
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::evaluator;
use monkey_lang_interpreter::object::Object;

pub trait Evaluator {
    fn evaluate(&mut self, program: Program) -> Object;
}

/// Keeps one environment for the whole session.
pub struct SessionEvaluator {
    environment: Environment,
}

impl SessionEvaluator {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }
}

impl Evaluator for SessionEvaluator {
    fn evaluate(&mut self, program: Program) -> Object {
        evaluator::eval_program(&program, &mut self.environment)
    }
}

pub struct FreshEvaluator;

impl Evaluator for FreshEvaluator {
    fn evaluate(&mut self, program: Program) -> Object {
        evaluator::eval_program(&program, &mut Environment::new())
    }
}
