//! Re-evaluation of content conditions against a selection snapshot.
//!
//! A [`ContentCondition`] caches the bindings of the preferences its tree
//! reads. Re-evaluating against bindings that agree on those preferences
//! returns the cached value without walking the tree; any other bindings
//! walk it. Either way the result depends only on the tree and the bindings.

use std::collections::BTreeMap;

use super::ast::{CompareOp, EvalError, Expr};
use crate::core::types::{ContentRef, OptionId, PrefId, SelectionState};

/// Evaluate an expression against a complete set of bindings
pub fn eval_expr(expr: &Expr, bindings: &SelectionState) -> Result<bool, EvalError> {
    match expr {
        Expr::Const(value) => Ok(*value),
        Expr::Compare { op, pref, option } => {
            let selected = bindings
                .get(pref)
                .ok_or_else(|| EvalError::UnresolvedVariable(pref.clone()))?;
            Ok(match op {
                CompareOp::Eq => selected == option,
                CompareOp::Ne => selected != option,
            })
        }
        Expr::And(items) => {
            for item in items {
                if !eval_expr(item, bindings)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Expr::Or(items) => {
            for item in items {
                if eval_expr(item, bindings)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Expr::Not(inner) => Ok(!eval_expr(inner, bindings)?),
    }
}

/// A condition gating one content block, with its last computed value
#[derive(Debug, Clone, PartialEq)]
pub struct ContentCondition {
    pub content_ref: ContentRef,
    pub expr: Expr,
    /// Last computed value; stale until the first evaluation
    pub value: bool,
    /// Bindings of the referenced preferences at the last evaluation
    inputs: Option<BTreeMap<PrefId, OptionId>>,
}

impl ContentCondition {
    /// A freshly decoded condition. Its value is stale until evaluated.
    pub fn new(content_ref: ContentRef, expr: Expr) -> Self {
        Self {
            content_ref,
            expr,
            value: false,
            inputs: None,
        }
    }

    /// True once the condition has been evaluated at least once
    pub fn is_evaluated(&self) -> bool {
        self.inputs.is_some()
    }

    /// Re-evaluate against `bindings`, returning the updated condition.
    ///
    /// Every referenced preference must be bound, even ones a short-circuit
    /// would skip, so a missing binding is reported regardless of the
    /// current selection.
    pub fn reevaluate(&self, bindings: &SelectionState) -> Result<ContentCondition, EvalError> {
        let mut inputs = BTreeMap::new();
        for pref in self.expr.referenced_prefs() {
            let selected = bindings
                .get(&pref)
                .ok_or_else(|| EvalError::UnresolvedVariable(pref.clone()))?;
            inputs.insert(pref, selected.clone());
        }

        let value = match &self.inputs {
            Some(previous) if *previous == inputs => self.value,
            _ => eval_expr(&self.expr, bindings)?,
        };

        Ok(ContentCondition {
            content_ref: self.content_ref.clone(),
            expr: self.expr.clone(),
            value,
            inputs: Some(inputs),
        })
    }
}

/// Free-function form of [`ContentCondition::reevaluate`]
pub fn reevaluate(
    condition: &ContentCondition,
    bindings: &SelectionState,
) -> Result<ContentCondition, EvalError> {
    condition.reevaluate(bindings)
}
