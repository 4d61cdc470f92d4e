//! Expression types and AST for content visibility conditions.
//!
//! A condition is a small boolean tree over preference selections. Leaves
//! compare one preference's selected option against a literal option id;
//! inner nodes combine leaves with and/or/not.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::types::{OptionId, PrefId};

/// Comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A constant (e.g. a block that is always shown)
    Const(bool),
    /// Looks up a preference's selected option and compares it to a literal
    Compare {
        op: CompareOp,
        pref: PrefId,
        option: OptionId,
    },
    /// True when every item is true (empty = true)
    And(Vec<Expr>),
    /// True when any item is true (empty = false)
    Or(Vec<Expr>),
    /// Negation
    Not(Box<Expr>),
}

impl Expr {
    pub fn equals(pref: impl Into<PrefId>, option: impl Into<OptionId>) -> Self {
        Expr::Compare {
            op: CompareOp::Eq,
            pref: pref.into(),
            option: option.into(),
        }
    }

    pub fn not_equals(pref: impl Into<PrefId>, option: impl Into<OptionId>) -> Self {
        Expr::Compare {
            op: CompareOp::Ne,
            pref: pref.into(),
            option: option.into(),
        }
    }

    pub fn negate(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Conjunction that collapses a single item to itself
    pub fn all(mut items: Vec<Expr>) -> Self {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::And(items)
        }
    }

    /// Disjunction that collapses a single item to itself
    pub fn any(mut items: Vec<Expr>) -> Self {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::Or(items)
        }
    }

    /// Every preference id the tree reads
    pub fn referenced_prefs(&self) -> BTreeSet<PrefId> {
        let mut prefs = BTreeSet::new();
        self.collect_prefs(&mut prefs);
        prefs
    }

    fn collect_prefs(&self, prefs: &mut BTreeSet<PrefId>) {
        match self {
            Expr::Const(_) => {}
            Expr::Compare { pref, .. } => {
                prefs.insert(pref.clone());
            }
            Expr::And(items) | Expr::Or(items) => {
                for item in items {
                    item.collect_prefs(prefs);
                }
            }
            Expr::Not(inner) => inner.collect_prefs(prefs),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{}", value),
            Expr::Compare { op, pref, option } => {
                if is_identifier(pref.as_str()) {
                    write!(f, "{}", pref)?;
                } else {
                    write_quoted(f, pref.as_str())?;
                }
                write!(f, " {} ", op.symbol())?;
                write_quoted(f, option.as_str())
            }
            Expr::And(items) | Expr::Or(items) if items.is_empty() => {
                write!(f, "{}", matches!(self, Expr::And(_)))
            }
            Expr::And(items) | Expr::Or(items) => {
                let joiner = if matches!(self, Expr::And(_)) {
                    " && "
                } else {
                    " || "
                };
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", joiner)?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Expr::Not(inner) => write!(f, "!({})", inner),
        }
    }
}

/// Whether `name` can be written bare on the left of a comparison
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, "\"")
}

/// Error type for expression evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Referenced a preference that has no binding
    UnresolvedVariable(PrefId),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnresolvedVariable(pref) => {
                write!(f, "Unresolved variable: {}", pref)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Error type for expression parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}
