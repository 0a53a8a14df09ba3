use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error} {position}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDefined { .. } => "FunctionNotDefined",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::IncompatibleOperand { .. } => "IncompatibleOperand",
            ErrorImpl::IncompatibleTypes => "IncompatibleTypes",
            ErrorImpl::IncompatibleParameter => "IncompatibleParameter",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::RightSideWithoutValue => "RightSideWithoutValue",
            ErrorImpl::ExpectedBoolean => "ExpectedBoolean",
            ErrorImpl::ExpectedReturnStatement => "ExpectedReturnStatement",
            ErrorImpl::ExpectedReturnValue => "ExpectedReturnValue",
            ErrorImpl::UnexpectedReturnStatement => "UnexpectedReturnStatement",
            ErrorImpl::ReturnTypeMismatch => "ReturnTypeMismatch",
            ErrorImpl::UnexpectedControlFlow { .. } => "UnexpectedControlFlow",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::InvalidInteger { .. } => "InvalidInteger",
            ErrorImpl::MalformedTree { .. } => "MalformedTree",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::VariableNotDeclared { variable } => ErrorTip::Suggestion(format!(
                "Declare `{}` with `var`, `int`, `string` or `bool` before using it",
                variable
            )),
            ErrorImpl::FunctionNotDefined { function } => {
                ErrorTip::Suggestion(format!("Define `{}` before calling it", function))
            }
            ErrorImpl::IncompatibleOperand { operator, .. } => match operator.as_str() {
                "+" => ErrorTip::Suggestion(String::from(
                    "`+` takes two integers or two strings",
                )),
                _ => ErrorTip::Suggestion(format!("`{}` takes two integers", operator)),
            },
            ErrorImpl::UnexpectedArguments {
                expected, received, ..
            }
            | ErrorImpl::MissingArguments {
                expected, received, ..
            } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::ExpectedReturnStatement => ErrorTip::Suggestion(String::from(
                "A function with a return type must end with a `return` statement",
            )),
            ErrorImpl::UnexpectedControlFlow { keyword } => ErrorTip::Suggestion(format!(
                "`{}` can only be used inside a `while` body",
                keyword
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            _ => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("{variable} is not declared")]
    VariableNotDeclared { variable: String },
    #[error("function {function} is not defined")]
    FunctionNotDefined { function: String },
    #[error("{name} is not a function")]
    NotAFunction { name: String },
    #[error("incompatible type for operation {operator} {operand}")]
    IncompatibleOperand { operator: String, operand: String },
    #[error("incompatible types")]
    IncompatibleTypes,
    #[error("incompatible parameter type")]
    IncompatibleParameter,
    #[error("too manny parameters {received}-{expected} for function {function}")]
    UnexpectedArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("not enough parameters {received}-{expected} for function {function}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("right side does not return a variable")]
    RightSideWithoutValue,
    #[error("expected boolean")]
    ExpectedBoolean,
    #[error("expected return statement")]
    ExpectedReturnStatement,
    #[error("expected expression after return")]
    ExpectedReturnValue,
    #[error("unexpected return statement")]
    UnexpectedReturnStatement,
    #[error("unexpected return type for the function")]
    ReturnTypeMismatch,
    #[error("unexpected {keyword} statement outside of a loop")]
    UnexpectedControlFlow { keyword: String },
    #[error("unknown type {type_}")]
    UnknownType { type_: String },
    #[error("invalid integer literal {token}")]
    InvalidInteger { token: String },
    #[error("malformed parse tree: {message}")]
    MalformedTree { message: String },
}
