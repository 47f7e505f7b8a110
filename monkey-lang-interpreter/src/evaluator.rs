use monkey_lang_core::ast;
use monkey_lang_core::ast::Expression;
use tracing::debug;

use crate::environment::Environment;
use crate::object::{EvaluationError, Function, Object, QuickReturn};

type EvalResult = Result<Object, QuickReturn>;

/// Any AST node the evaluator can start from.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a ast::Program),
    Statement(&'a ast::Statement),
    Block(&'a ast::BlockStatement),
    Expression(&'a ast::Expression),
}

impl<'a> From<&'a ast::Program> for Node<'a> {
    fn from(program: &'a ast::Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a ast::Statement> for Node<'a> {
    fn from(statement: &'a ast::Statement) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a ast::BlockStatement> for Node<'a> {
    fn from(block: &'a ast::BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a ast::Expression> for Node<'a> {
    fn from(expression: &'a ast::Expression) -> Self {
        Node::Expression(expression)
    }
}

/// Evaluates `node` in `environment`. A `return` reaching this level yields
/// its value and an evaluation error becomes an [`Object::Error`].
pub fn eval<'a>(node: impl Into<Node<'a>>, environment: &mut Environment) -> Object {
    let result = match node.into() {
        Node::Program(program) => return eval_program(program, environment),
        Node::Statement(statement) => eval_statement(statement, environment),
        Node::Block(block) => eval_block_statement(block, environment),
        Node::Expression(expression) => eval_expression(expression, environment),
    };
    settle(result)
}

pub fn eval_program(program: &ast::Program, environment: &mut Environment) -> Object {
    let mut output = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Ok(object) => output = object,
            Err(quick_return) => return settle(Err(quick_return)),
        }
    }
    output
}

fn settle(result: EvalResult) -> Object {
    match result {
        Ok(object) => object,
        Err(QuickReturn::Return(value)) => value,
        Err(QuickReturn::Error(error)) => Object::Error(error),
    }
}

fn eval_statement(statement: &ast::Statement, environment: &mut Environment) -> EvalResult {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(statement: &ast::LetStatement, environment: &mut Environment) -> EvalResult {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(statement.identifier.name.clone(), value);
    Ok(Object::null())
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> EvalResult {
    let value = eval_expression(&statement.value, environment)?;
    Err(QuickReturn::Return(value))
}

fn eval_block_statement(block: &ast::BlockStatement, environment: &mut Environment) -> EvalResult {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

fn eval_expression(expression: &Expression, environment: &mut Environment) -> EvalResult {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::Identifier(identifier) => environment
            .get(&identifier.name)
            .ok_or_else(|| EvaluationError::UnknownIdentifier(identifier.name.clone()).into()),
        Expression::PrefixOperation(kind, expression) => {
            let right = eval_expression(expression, environment)?;
            eval_prefix_operation(*kind, right)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            eval_infix_operation(*kind, left, right)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if condition.is_truthy() {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            match &function {
                Object::Function(function) => apply_function(function, arguments),
                other => Err(EvaluationError::CallNonFunction(other.type_name()).into()),
            }
        }
    }
}

fn eval_expressions(
    arguments: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Object>, QuickReturn> {
    let mut result = Vec::with_capacity(arguments.len());
    for argument in arguments {
        result.push(eval_expression(argument, environment)?);
    }
    Ok(result)
}

/// Runs the body in a fresh scope enclosed by the function's defining scope,
/// not the caller's. Arguments bind positionally: extra ones are dropped and
/// missing ones leave their parameter unbound.
#[tracing::instrument(level = "trace", skip_all, fields(arity = function.parameters.len()))]
fn apply_function(function: &Function, arguments: Vec<Object>) -> EvalResult {
    if function.parameters.len() != arguments.len() {
        debug!(
            expected = function.parameters.len(),
            actual = arguments.len(),
            "argument count does not match parameter count"
        );
    }

    let mut environment = Environment::new_enclosed(function.env.clone());
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        environment.set(parameter.name.clone(), argument);
    }

    match eval_block_statement(&function.body, &mut environment) {
        Err(QuickReturn::Return(value)) => Ok(value),
        result => result,
    }
}

fn eval_prefix_operation(kind: ast::PrefixOperationKind, right: Object) -> EvalResult {
    match (kind, &right) {
        (ast::PrefixOperationKind::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (ast::PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (ast::PrefixOperationKind::Minus, _) => Err(EvaluationError::UnknownPrefixOperator {
            right: right.type_name(),
            operation: kind,
        }
        .into()),
    }
}

fn eval_infix_operation(kind: ast::InfixOperationKind, left: Object, right: Object) -> EvalResult {
    use ast::InfixOperationKind;

    match (&left, &right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        _ if left.type_name() != right.type_name() => Err(EvaluationError::TypeMismatch {
            left: left.type_name(),
            right: right.type_name(),
            operation: kind,
        }
        .into()),
        _ => match kind {
            InfixOperationKind::Equal => Ok(Object::boolean(left == right)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(left != right)),
            _ => Err(EvaluationError::UnknownInfixOperator {
                left: left.type_name(),
                right: right.type_name(),
                operation: kind,
            }
            .into()),
        },
    }
}

fn eval_integer_infix_operation(
    kind: ast::InfixOperationKind,
    left: i64,
    right: i64,
) -> EvalResult {
    use ast::InfixOperationKind;

    match kind {
        InfixOperationKind::Plus => Ok(Object::integer(left.wrapping_add(right))),
        InfixOperationKind::Minus => Ok(Object::integer(left.wrapping_sub(right))),
        InfixOperationKind::Multiply => Ok(Object::integer(left.wrapping_mul(right))),
        InfixOperationKind::Divide => {
            if right == 0 {
                Err(EvaluationError::DivisionByZero.into())
            } else {
                Ok(Object::integer(left.wrapping_div(right)))
            }
        }
        InfixOperationKind::LessThan => Ok(Object::boolean(left < right)),
        InfixOperationKind::GreaterThan => Ok(Object::boolean(left > right)),
        InfixOperationKind::Equal => Ok(Object::boolean(left == right)),
        InfixOperationKind::NotEqual => Ok(Object::boolean(left != right)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::environment::Environment;
    use crate::object::{EvaluationError, Object};
    use monkey_lang_core::ast::{InfixOperationKind, PrefixOperationKind};
    use monkey_lang_core::parser::parse;

    fn run(input: &str) -> Object {
        let ast = parse(input).unwrap();
        super::eval_program(&ast, &mut Environment::new())
    }

    fn test_evaluation(inputs: Vec<(&str, Object)>) {
        for (input, output) in inputs {
            assert_eq!(run(input), output, "input: {input}");
        }
    }

    #[test]
    fn test_literal() {
        let inputs = vec![
            ("5;", Object::integer(5)),
            ("99", Object::integer(99)),
            ("true;", Object::boolean(true)),
            ("false;", Object::boolean(false)),
            ("", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_integer_arithmetic() {
        let inputs = vec![
            ("--5;", Object::integer(5)),
            ("-10;", Object::integer(-10)),
            ("5 + 5 + 5 + 5 - 10", Object::integer(10)),
            ("2 * 2 * 2 * 2 * 2", Object::integer(32)),
            ("-50 + 100 + -50", Object::integer(0)),
            ("5 + 5 * 2", Object::integer(15)),
            ("5 / 5", Object::integer(1)),
            ("20 + 2 * -10", Object::integer(0)),
            ("50 / 2 * 2 + 10", Object::integer(60)),
            ("2 * (5 + 10)", Object::integer(30)),
            ("3 * 3 * 3 + 10", Object::integer(37)),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::integer(50)),
            ("7 / 2", Object::integer(3)),
            ("-7 / 2", Object::integer(-3)),
            ("9223372036854775807 + 1", Object::integer(i64::MIN)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_boolean_expressions() {
        let inputs = vec![
            ("1 < 2", Object::TRUE),
            ("1 > 2", Object::FALSE),
            ("1 < 1", Object::FALSE),
            ("1 == 1", Object::TRUE),
            ("1 != 1", Object::FALSE),
            ("1 != 2", Object::TRUE),
            ("true == true", Object::TRUE),
            ("false == false", Object::TRUE),
            ("true == false", Object::FALSE),
            ("true != false", Object::TRUE),
            ("(1 < 2) == true", Object::TRUE),
            ("(1 > 2) == true", Object::FALSE),
            (
                "let a = if (false) { 1 }; let b = if (false) { 2 }; a == b",
                Object::TRUE,
            ),
            ("let f = fn(x) { x }; f == f", Object::TRUE),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_bang_operator() {
        let inputs = vec![
            ("!true", Object::FALSE),
            ("!false", Object::TRUE),
            ("!5", Object::FALSE),
            ("!!true", Object::TRUE),
            ("!!5", Object::TRUE),
            ("!(5 - 5)", Object::FALSE),
            ("!if (false) { 1 }", Object::TRUE),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_if_else_expressions() {
        let inputs = vec![
            ("if (true) { 10 }", Object::integer(10)),
            ("if (false) { 10 }", Object::null()),
            ("if (1) { 10 }", Object::integer(10)),
            ("if (5 - 5) { 10 }", Object::integer(10)),
            ("if (1 < 2) { 10 }", Object::integer(10)),
            ("if (1 > 2) { 10 }", Object::null()),
            ("if (1 > 2) { 10 } else { 20 }", Object::integer(20)),
            ("if (1 < 2) { 10 } else { 20 }", Object::integer(10)),
            ("if (true) { }", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_return_statements() {
        let inputs = vec![
            ("return 10;", Object::integer(10)),
            ("return 10; 9;", Object::integer(10)),
            ("return 2 * 5; 9;", Object::integer(10)),
            ("9; return 2 * 5; 9;", Object::integer(10)),
            (
                "if (10 > 1) {
                    if (10 > 1) {
                        return 10;
                    }
                    return 1;
                }",
                Object::integer(10),
            ),
            (
                "let f = fn(x) { return x; x + 10; }; f(10);",
                Object::integer(10),
            ),
            (
                "let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);",
                Object::integer(20),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_error_handling() {
        use InfixOperationKind::*;
        let inputs = vec![
            (
                "1 == true",
                EvaluationError::TypeMismatch {
                    left: "INTEGER",
                    right: "BOOLEAN",
                    operation: Equal,
                },
            ),
            (
                "true != 1",
                EvaluationError::TypeMismatch {
                    left: "BOOLEAN",
                    right: "INTEGER",
                    operation: NotEqual,
                },
            ),
            (
                "5 + true;",
                EvaluationError::TypeMismatch {
                    left: "INTEGER",
                    right: "BOOLEAN",
                    operation: Plus,
                },
            ),
            (
                "true + 5",
                EvaluationError::TypeMismatch {
                    left: "BOOLEAN",
                    right: "INTEGER",
                    operation: Plus,
                },
            ),
            (
                "5 + true; 5;",
                EvaluationError::TypeMismatch {
                    left: "INTEGER",
                    right: "BOOLEAN",
                    operation: Plus,
                },
            ),
            (
                "-true",
                EvaluationError::UnknownPrefixOperator {
                    right: "BOOLEAN",
                    operation: PrefixOperationKind::Minus,
                },
            ),
            (
                "true + false;",
                EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                    operation: Plus,
                },
            ),
            (
                "5; true + false; 5",
                EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                    operation: Plus,
                },
            ),
            (
                "if (10 > 1) { true + false; }",
                EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                    operation: Plus,
                },
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                    operation: Plus,
                },
            ),
            (
                "true < false",
                EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                    operation: LessThan,
                },
            ),
            (
                "foobar",
                EvaluationError::UnknownIdentifier("foobar".into()),
            ),
            ("5(1)", EvaluationError::CallNonFunction("INTEGER")),
            ("1 / (5 - 5)", EvaluationError::DivisionByZero),
            (
                "let a = -true; 5",
                EvaluationError::UnknownPrefixOperator {
                    right: "BOOLEAN",
                    operation: PrefixOperationKind::Minus,
                },
            ),
        ];

        for (input, error) in inputs {
            assert_eq!(run(input), Object::Error(error), "input: {input}");
        }
    }

    #[test]
    fn test_error_message_text() {
        assert_eq!(
            run("true + 5").inspect(),
            "Error: type mismatch: BOOLEAN + INTEGER"
        );
        assert_eq!(
            run("let x = 1; y").inspect(),
            "Error: identifier not found: y"
        );
    }

    #[test]
    fn test_errors_short_circuit_arguments() {
        let mut env = Environment::new();
        let program = parse("let seen = 1; let f = fn(a, b) { a }; f(missing, seen)").unwrap();
        assert_eq!(
            super::eval_program(&program, &mut env),
            Object::Error(EvaluationError::UnknownIdentifier("missing".into()))
        );
        // bindings made before the failing statement stay in place
        assert_eq!(env.get("seen"), Some(Object::integer(1)));
    }

    #[test]
    fn test_let_statements() {
        let inputs = vec![
            ("let a = 5; a;", Object::integer(5)),
            ("let a = 5 * 5; a;", Object::integer(25)),
            ("let a = 5; let b = a; b;", Object::integer(5)),
            (
                "let a = 5; let b = a; let c = a + b + 5; c;",
                Object::integer(15),
            ),
            ("let a = 5;", Object::null()),
            ("let a = 5; let a = true; a", Object::TRUE),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_function_object() {
        match run("fn(x) { x + 2; };") {
            Object::Function(ref function) => {
                assert_eq!(function.parameters.len(), 1);
                assert_eq!(function.parameters[0].name.as_ref(), "x");
                assert_eq!(function.body.to_string(), "(x + 2)");
            }
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn test_function_application() {
        let inputs = vec![
            ("let identity = fn(x) { x }; identity(5)", Object::integer(5)),
            (
                "let identity = fn(x) { return x }; identity(5)",
                Object::integer(5),
            ),
            ("let double = fn(x) { x * 2 }; double(5)", Object::integer(10)),
            ("let add = fn(x, y) { x + y }; add(5, 5)", Object::integer(10)),
            (
                "let add = fn(x, y) { x + y }; add(5 + 5, add(5, 5))",
                Object::integer(20),
            ),
            ("fn(x) { x }(5)", Object::integer(5)),
            ("fn() { }()", Object::null()),
            (
                "
                let factorial = fn(n) {
                    if (n < 2) { 1 }
                    else { factorial(n - 1) * n }
                };
                factorial(5)",
                Object::integer(120),
            ),
            (
                "
                let func = fn(a) {
                    fn(b) {
                        a + b
                    }
                };
                func(5)(10)",
                Object::integer(15),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_argument_count_is_not_checked() {
        let inputs = vec![
            ("let f = fn(x, y) { x }; f(1, 2, 3)", Object::integer(1)),
            (
                "let f = fn(x, y) { y }; f(1)",
                Object::Error(EvaluationError::UnknownIdentifier("y".into())),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_closure() {
        let inputs = vec![
            (
                "let adder = fn(x) { fn(y) { x + y; } }; let addFive = adder(5); addFive(2);",
                Object::integer(7),
            ),
            (
                "let adder = fn(x) { fn(y) { x + y; } };
                let addFive = adder(5);
                let addTen = adder(10);
                addFive(2);
                addTen(1);
                addFive(3);",
                Object::integer(8),
            ),
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    x
                };
                fb
            };
            let temp = fa();
            temp()"#,
                Object::integer(5),
            ),
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    fn() { x }
                };
                fb
            };
            let temp = fa();
            let temp_ = temp();
            temp_()"#,
                Object::integer(5),
            ),
            (
                r#"
            let fa = fn() {
                let is_even = fn(x) {
                    if (x == 1) {
                        false
                    } else {
                        is_odd(x - 1)
                    }
                };
                let is_odd = fn(x) {
                    if (x == 1) {
                        true
                    } else {
                        is_even(x - 1)
                    }
                };
                is_even
            };
            let temp = fa();
            temp(3);"#,
                Object::boolean(false),
            ),
            (
                r#"
            let pair = fn(x) {
                let get = fn() { x };
                let twice = fn() { x + x };
                fn(which) { if (which) { get() } else { twice() } }
            };
            let p = pair(4);
            p(true) + p(false)"#,
                Object::integer(12),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_closure_uses_defining_scope_not_caller_scope() {
        let input = "
            let x = 1;
            let read = fn() { x };
            let shadow = fn(x) { read() };
            shadow(100)";

        test_evaluation(vec![(input, Object::integer(1))]);
    }

    #[test]
    fn test_captured_environments_survive_collection() {
        let mut env = Environment::new();
        let program = parse(
            "let adder = fn(x) { fn(y) { x + y } }; let addTwo = adder(2); let addThree = adder(3);",
        )
        .unwrap();
        super::eval_program(&program, &mut env);

        gc::force_collect();

        let program = parse("addTwo(1) + addThree(1)").unwrap();
        assert_eq!(super::eval_program(&program, &mut env), Object::integer(7));
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn test_eval_entry_points() {
        let mut env = Environment::new();
        let program = parse("let x = 4; return x * 2; 1").unwrap();

        assert_eq!(super::eval(&program, &mut env), Object::integer(8));
        assert_eq!(
            super::eval(&program.statements[1], &mut env),
            Object::integer(8)
        );
        match &program.statements[1] {
            monkey_lang_core::ast::Statement::Return(statement) => {
                assert_eq!(super::eval(&statement.value, &mut env), Object::integer(8))
            }
            other => panic!("expected a return statement, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let input = "let adder = fn(x) { fn(y) { x + y } }; let a = adder(3); a(4) * 2";

        let first = run(input);
        let second = run(input);
        assert_eq!(first, Object::integer(14));
        assert_eq!(first, second);
    }
}
