// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tag filter expressions, deciding which hooks fire for a tagged scenario.

use std::str::FromStr;

use derive_more::with_trait::{Display, Error};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    multi::fold_many0,
    sequence::{delimited, preceded},
    Finish as _, IResult,
};
use sealed::sealed;

/// Filter expression over a scenario's tags.
///
/// Supports `@tag` atoms combined with `and`, `or`, `not` and parentheses,
/// with `not` binding tighter than `and`, and `and` tighter than `or`.
/// Binary operators are left-associative.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum TagFilter {
    /// Conjunction of two filters.
    #[display("({_0} and {_1})")]
    And(Box<TagFilter>, Box<TagFilter>),

    /// Disjunction of two filters.
    #[display("({_0} or {_1})")]
    Or(Box<TagFilter>, Box<TagFilter>),

    /// Negation of a filter.
    #[display("not {_0}")]
    Not(Box<TagFilter>),

    /// Single tag, stored verbatim with its `@` prefix.
    #[display("{_0}")]
    Tag(String),
}

impl TagFilter {
    /// Evaluates this [`TagFilter`] for the given `tags`.
    ///
    /// Tags are compared verbatim, `@` prefix included.
    #[must_use]
    pub fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        match self {
            Self::And(l, r) => l.eval(tags.clone()) && r.eval(tags),
            Self::Or(l, r) => l.eval(tags.clone()) || r.eval(tags),
            Self::Not(t) => !t.eval(tags),
            Self::Tag(t) => tags.into_iter().any(|tag| tag.as_ref() == t),
        }
    }
}

impl FromStr for TagFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(or_expr)(s)
            .finish()
            .map(|(_, filter)| filter)
            .map_err(|_| ParseError { expression: s.to_owned() })
    }
}

/// Error of parsing a [`TagFilter`] expression.
#[derive(Clone, Debug, Display, Error)]
#[display("`{expression}` is not a valid tag filter expression")]
pub struct ParseError {
    /// Expression text that failed to parse.
    #[error(not(source))]
    pub expression: String,
}

/// Extension of an [`Option`]al [`TagFilter`] allowing to evaluate it.
#[sealed]
pub trait Ext {
    /// Evaluates this [`TagFilter`] for the given `tags`, with an absent
    /// filter allowing everything.
    #[must_use]
    fn allows<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone;
}

#[sealed]
impl Ext for Option<TagFilter> {
    fn allows<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        self.as_ref().map_or(true, |filter| filter.eval(tags))
    }
}

/// Characters allowed inside a tag name.
fn is_tag_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')'
}

/// Matches the given `kw` keyword, consuming any whitespace around it.
fn keyword<'s>(
    kw: &'static str,
) -> impl FnMut(&'s str) -> IResult<&'s str, &'s str> {
    delimited(multispace0, tag(kw), multispace0)
}

/// Parses a single `@tag` atom.
fn tag_atom(input: &str) -> IResult<&str, TagFilter> {
    map(preceded(char('@'), take_while1(is_tag_char)), |name| {
        TagFilter::Tag(format!("@{name}"))
    })(input)
}

/// Parses a parenthesized expression or a single `@tag` atom.
fn primary(input: &str) -> IResult<&str, TagFilter> {
    delimited(
        multispace0,
        alt((delimited(char('('), or_expr, char(')')), tag_atom)),
        multispace0,
    )(input)
}

/// Parses a `not`-prefixed term.
fn not_expr(input: &str) -> IResult<&str, TagFilter> {
    alt((
        map(preceded(keyword("not"), not_expr), |f| {
            TagFilter::Not(Box::new(f))
        }),
        primary,
    ))(input)
}

/// Parses a left-associative `and` chain.
fn and_expr(input: &str) -> IResult<&str, TagFilter> {
    let (input, first) = not_expr(input)?;
    fold_many0(
        preceded(keyword("and"), not_expr),
        move || first.clone(),
        |acc, rhs| TagFilter::And(Box::new(acc), Box::new(rhs)),
    )(input)
}

/// Parses a left-associative `or` chain.
fn or_expr(input: &str) -> IResult<&str, TagFilter> {
    let (input, first) = and_expr(input)?;
    fold_many0(
        preceded(keyword("or"), and_expr),
        move || first.clone(),
        |acc, rhs| TagFilter::Or(Box::new(acc), Box::new(rhs)),
    )(input)
}
