//! Textual condition syntax.
//!
//! ```text
//! expr       := and_expr ("||" and_expr)*
//! and_expr   := unary ("&&" unary)*
//! unary      := "!" unary | primary
//! primary    := "(" expr ")" | comparison | "true" | "false"
//! comparison := (ident | string) ("==" | "!=") string
//! string     := "\"" (char | "\\\"" | "\\\\")* "\""
//! ```

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, multispace0, none_of, one_of, satisfy};
use nom::combinator::{all_consuming, map, recognize, value};
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};

use super::ast::{CompareOp, Expr, ParseError};

impl Expr {
    /// Parse a condition from its textual form
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        match all_consuming(delimited(multispace0, or_expr, multispace0)).parse(input) {
            Ok((_, expr)) => Ok(expr),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError {
                message: format!(
                    "unexpected input at offset {}: {:?}",
                    input.len() - e.input.len(),
                    e.input
                ),
            }),
            Err(nom::Err::Incomplete(_)) => Err(ParseError {
                message: "incomplete input".to_string(),
            }),
        }
    }
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    map(
        separated_list1(preceded(multispace0, tag("||")), and_expr),
        Expr::any,
    )
    .parse(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    map(
        separated_list1(preceded(multispace0, tag("&&")), unary),
        Expr::all,
    )
    .parse(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    preceded(
        multispace0,
        alt((map(preceded(char('!'), unary), Expr::negate), primary)),
    )
    .parse(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((
        delimited(char('('), or_expr, preceded(multispace0, char(')'))),
        comparison,
        value(Expr::Const(true), tag("true")),
        value(Expr::Const(false), tag("false")),
    ))
    .parse(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, pref) = alt((map(identifier, str::to_string), string_literal)).parse(input)?;
    let (input, op) = delimited(
        multispace0,
        alt((
            value(CompareOp::Eq, tag("==")),
            value(CompareOp::Ne, tag("!=")),
        )),
        multispace0,
    )
    .parse(input)?;
    let (input, option) = string_literal(input)?;

    Ok((
        input,
        Expr::Compare {
            op,
            pref: pref.into(),
            option: option.into(),
        },
    ))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    ))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(
            alt((none_of("\\\""), preceded(char('\\'), one_of("\\\"")))),
            String::new,
            |mut text, c| {
                text.push(c);
                text
            },
        ),
        char('"'),
    )
    .parse(input)
}
