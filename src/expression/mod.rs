//! Boolean conditions over preference selections
//!
//! This module holds the condition AST, its compact wire codec, a textual
//! syntax for authoring conditions, and the evaluator that re-runs them
//! against the current selection.

pub mod ast;
pub mod codec;
pub mod eval;
pub mod parser;

pub use ast::{CompareOp, EvalError, Expr, ParseError};
pub use codec::{decode, encode, DecodeError};
pub use eval::{eval_expr, reevaluate, ContentCondition};
