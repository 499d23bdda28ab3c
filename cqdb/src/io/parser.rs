//! A parser for the textual conjunctive query format.
//!
//! Queries are written as `Q(x, y) :- R(x, z), S(z, y), x < 5` with an
//! optional `SUM(...)` aggregate as the last head entry, integer constants
//! written in decimal, and string constants wrapped in single quotes.

use std::fmt::Debug;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, separated_pair, tuple},
    IResult,
};
use thiserror::Error;

use crate::model::{
    Atom, ComparisonAtom, ComparisonOperator, Constant, Query, RelationalAtom, SumAggregate, Term,
    Variable,
};

/// An intermediate parsing result.
type IntermediateResult<'a, T> = IResult<&'a str, T>;

/// Errors that can occur during parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A syntax error.
    #[error("syntax error near \"{0}\"")]
    SyntaxError(String),
    /// The aggregate is not the last entry of the query head.
    #[error("SUM(...) must be the last entry of the query head")]
    MisplacedAggregate,
    /// The query head contains more than one aggregate.
    #[error("the query head contains more than one SUM(...) aggregate")]
    MultipleAggregates,
}

/// A combinator to add tracing to the parser.
/// [fun] is an identifier for the parser and [parser] is the actual parser.
#[inline(always)]
fn traced<'a, T, P>(fun: &'static str, mut parser: P) -> impl FnMut(&'a str) -> IntermediateResult<'a, T>
where
    T: Debug,
    P: FnMut(&'a str) -> IntermediateResult<'a, T>,
{
    move |input| {
        let result = parser(input);
        log::trace!(target: "parser", "{fun}({input:?}) -> {result:?}");
        result
    }
}

/// A combinator that creates a parser for a specific token,
/// optionally surrounded by spaces.
fn token<'a>(token: &'a str) -> impl FnMut(&'a str) -> IntermediateResult<'a, &'a str> {
    delimited(multispace0, tag(token), multispace0)
}

/// Parse a name: a letter followed by letters, digits, or underscores.
fn parse_name(input: &str) -> IntermediateResult<'_, &str> {
    traced(
        "parse_name",
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
    )(input)
}

/// Parse a variable.
fn parse_variable(input: &str) -> IntermediateResult<'_, Variable> {
    traced("parse_variable", map(parse_name, Variable::new))(input)
}

/// Parse an integer constant.
fn parse_integer(input: &str) -> IntermediateResult<'_, Constant> {
    traced(
        "parse_integer",
        map(
            map_res(recognize(pair(opt(char('-')), digit1)), str::parse),
            Constant::Integer,
        ),
    )(input)
}

/// Parse a string constant wrapped in single quotes.
fn parse_string(input: &str) -> IntermediateResult<'_, Constant> {
    traced(
        "parse_string",
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |literal: &str| Constant::String(literal.to_string()),
        ),
    )(input)
}

/// Parse a term: an integer constant, a string constant, or a variable.
fn parse_term(input: &str) -> IntermediateResult<'_, Term> {
    traced(
        "parse_term",
        alt((
            map(parse_integer, Term::Constant),
            map(parse_string, Term::Constant),
            map(parse_variable, Term::Variable),
        )),
    )(input)
}

/// Parse a relational atom.
fn parse_relational_atom(input: &str) -> IntermediateResult<'_, RelationalAtom> {
    traced(
        "parse_relational_atom",
        map(
            pair(
                parse_name,
                delimited(
                    token("("),
                    separated_list1(token(","), parse_term),
                    token(")"),
                ),
            ),
            |(predicate, terms)| RelationalAtom::new(predicate, terms),
        ),
    )(input)
}

/// Parse a comparison operator.
fn parse_operator(input: &str) -> IntermediateResult<'_, ComparisonOperator> {
    traced(
        "parse_operator",
        alt((
            value(ComparisonOperator::Unequal, tag("!=")),
            value(ComparisonOperator::LessThanEqual, tag("<=")),
            value(ComparisonOperator::GreaterThanEqual, tag(">=")),
            value(ComparisonOperator::Equal, tag("=")),
            value(ComparisonOperator::LessThan, tag("<")),
            value(ComparisonOperator::GreaterThan, tag(">")),
        )),
    )(input)
}

/// Parse a comparison atom.
fn parse_comparison_atom(input: &str) -> IntermediateResult<'_, ComparisonAtom> {
    traced(
        "parse_comparison_atom",
        map(
            tuple((
                parse_term,
                delimited(multispace0, parse_operator, multispace0),
                parse_term,
            )),
            |(lhs, operator, rhs)| ComparisonAtom::new(lhs, operator, rhs),
        ),
    )(input)
}

/// Parse a body atom.
fn parse_body_atom(input: &str) -> IntermediateResult<'_, Atom> {
    traced(
        "parse_body_atom",
        alt((
            map(parse_relational_atom, Atom::Relational),
            map(parse_comparison_atom, Atom::Comparison),
        )),
    )(input)
}

/// Parse a sum aggregate.
fn parse_aggregate(input: &str) -> IntermediateResult<'_, SumAggregate> {
    traced(
        "parse_aggregate",
        map(
            delimited(
                pair(tag("SUM"), token("(")),
                separated_list1(token("*"), parse_term),
                token(")"),
            ),
            SumAggregate::new,
        ),
    )(input)
}

/// A single entry of the query head.
#[derive(Debug)]
enum HeadEntry {
    /// A plain term.
    Term(Term),
    /// A sum aggregate.
    Aggregate(SumAggregate),
}

/// Parse a query head: a name applied to terms and at most one trailing
/// aggregate.
fn parse_head(input: &str) -> IntermediateResult<'_, (RelationalAtom, Vec<HeadEntry>)> {
    traced(
        "parse_head",
        map(
            pair(
                parse_name,
                delimited(
                    token("("),
                    separated_list0(
                        token(","),
                        alt((
                            map(parse_aggregate, HeadEntry::Aggregate),
                            map(parse_term, HeadEntry::Term),
                        )),
                    ),
                    token(")"),
                ),
            ),
            |(predicate, entries)| (RelationalAtom::new(predicate, Vec::new()), entries),
        ),
    )(input)
}

/// Split the parsed head entries into plain terms and the optional trailing
/// aggregate.
fn assemble_head(
    head: RelationalAtom,
    entries: Vec<HeadEntry>,
) -> Result<(RelationalAtom, Option<SumAggregate>), ParseError> {
    let mut terms = Vec::new();
    let mut aggregate = None;

    for entry in entries {
        match entry {
            HeadEntry::Term(term) => {
                if aggregate.is_some() {
                    return Err(ParseError::MisplacedAggregate);
                }
                terms.push(term);
            }
            HeadEntry::Aggregate(sum) => {
                if aggregate.is_some() {
                    return Err(ParseError::MultipleAggregates);
                }
                aggregate = Some(sum);
            }
        }
    }

    Ok((RelationalAtom::new(head.predicate(), terms), aggregate))
}

/// Parse a conjunctive query from its textual form.
pub fn parse_query(input: &str) -> Result<Query, ParseError> {
    let query = all_consuming(delimited(
        multispace0,
        separated_pair(
            parse_head,
            token(":-"),
            separated_list1(token(","), parse_body_atom),
        ),
        multispace0,
    ))(input);

    match query {
        Ok((_, ((head, entries), body))) => {
            let (head, aggregate) = assemble_head(head, entries)?;
            Ok(Query::new(head, aggregate, body))
        }
        Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
            let snippet: String = error.input.chars().take(24).collect();
            Err(ParseError::SyntaxError(snippet))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::SyntaxError(String::new())),
    }
}
