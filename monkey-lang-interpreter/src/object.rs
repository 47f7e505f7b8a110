use std::fmt::Display;
use std::rc::Rc;

use gc::{Finalize, Gc, Trace};
use monkey_lang_core::ast;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    Error(#[unsafe_ignore_trace] EvaluationError),
    Function(Gc<Function>),
}

impl Object {
    pub const TRUE: Object = Object::Boolean(true);
    pub const FALSE: Object = Object::Boolean(false);

    pub fn null() -> Object {
        Object::Null
    }
    pub fn boolean(value: bool) -> Object {
        if value {
            Object::TRUE
        } else {
            Object::FALSE
        }
    }
    pub fn integer(value: i64) -> Object {
        Object::Integer(value)
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        env: Environment,
    ) -> Object {
        Object::Function(Gc::new(Function {
            parameters,
            body,
            env,
        }))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::Error(_) => "ERROR",
            Object::Function(_) => "FUNCTION",
        }
    }

    /// `null` and `false` are falsy, everything else (including `0`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Error(error) => write!(f, "Error: {}", error),
            Object::Function(function) => write!(
                f,
                "fn ({}) {{\n{}\n}}",
                ast::join_parameters(&function.parameters),
                function.body
            ),
        }
    }
}

/// A closure: the function literal plus the environment it was defined in.
#[derive(Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub parameters: Vec<ast::Identifier>,
    #[unsafe_ignore_trace]
    pub body: ast::BlockStatement,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters && self.body == other.body && self.env == other.env
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &ast::join_parameters(&self.parameters))
            .field("ptr", &(self as *const Function as usize))
            .finish()
    }
}

/// Unwinds evaluation up to the nearest function call (`Return`) or all the
/// way to the top level (`Error`).
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Object),
    Error(EvaluationError),
}

impl From<EvaluationError> for QuickReturn {
    fn from(error: EvaluationError) -> Self {
        QuickReturn::Error(error)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("type mismatch: {left} {} {right}", .operation.to_str())]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
        operation: ast::InfixOperationKind,
    },
    #[error("unknown operator: {left} {} {right}", .operation.to_str())]
    UnknownInfixOperator {
        left: &'static str,
        right: &'static str,
        operation: ast::InfixOperationKind,
    },
    #[error("unknown operator: {}{right}", .operation.to_str())]
    UnknownPrefixOperator {
        right: &'static str,
        operation: ast::PrefixOperationKind,
    },
    #[error("not a function: {0}")]
    CallNonFunction(&'static str),
    #[error("division by zero")]
    DivisionByZero,
}
