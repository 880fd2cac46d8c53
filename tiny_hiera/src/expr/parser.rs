//! nom grammar turning placeholder source text into [`Expr`] trees.
//!
//! Precedence, loosest first: pipe, conditional, `??`, `||`, `&&`,
//! equality, comparison, `in`, additive, multiplicative, unary, postfix.
//!
//! Two limits keep hostile input from exhausting the stack: the recursive
//! productions carry a depth counter, and every composite node is checked
//! against [`MAX_DEPTH`] as it is built, so long operator or member chains
//! are rejected as well as deeply bracketed ones.

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{escaped_transform, tag, take_while};
use nom::character::complete::{anychar, char, digit1, multispace0, none_of, one_of, satisfy};
use nom::combinator::{all_consuming, cut, map, not, opt, recognize, value};
use nom::error::{VerboseError, VerboseErrorKind, context};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use serde_json::{Number, Value};

use super::ast::{BinaryOp, Expr, UnaryOp};

/// Nesting limit for both parser recursion and tree height.
pub(super) const MAX_DEPTH: usize = 64;

/// Message reported when either limit is exceeded.
const NESTING_LIMIT: &str = "expression nested deeper than 64 levels";

/// Binary precedence levels handled by [`binary`].
const LEVELS: usize = 8;

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Parse `source` as a single expression.
///
/// # Errors
///
/// Returns a message naming what was expected and where, or the nesting
/// limit when the expression is too deep.
pub(super) fn parse(source: &str) -> Result<Expr, String> {
    if source.trim().is_empty() {
        return Err("empty expression".to_owned());
    }
    match all_consuming(terminated(|input| pipe(input, 0), multispace0))(source) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(describe(source, &err)),
        Err(nom::Err::Incomplete(_)) => Err("incomplete expression".to_owned()),
    }
}

/// Render a nom error as "expected X, found Y" using the innermost context.
fn describe(source: &str, err: &VerboseError<&str>) -> String {
    let innermost = err.errors.iter().find_map(|(_, kind)| match kind {
        VerboseErrorKind::Context(label) => Some(*label),
        VerboseErrorKind::Char(_) | VerboseErrorKind::Nom(_) => None,
    });
    if innermost == Some(NESTING_LIMIT) {
        return NESTING_LIMIT.to_owned();
    }
    let found = err.errors.first().map_or_else(
        || "end of expression".to_owned(),
        |(rest, _)| {
            let position = source.len().saturating_sub(rest.len());
            rest.chars().next().map_or_else(
                || "end of expression".to_owned(),
                |next| format!("'{next}' at position {position}"),
            )
        },
    );
    match innermost {
        Some(expected) => format!("expected {expected}, found {found}"),
        None => format!("unexpected {found}"),
    }
}

fn failure<'a>(input: &'a str, label: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Failure(VerboseError {
        errors: vec![(input, VerboseErrorKind::Context(label))],
    })
}

/// Step one level deeper, failing once the limit is reached.
fn descend(input: &str, depth: usize) -> Res<'_, usize> {
    if depth >= MAX_DEPTH {
        return Err(failure(input, NESTING_LIMIT));
    }
    Ok((input, depth + 1))
}

/// Accept a freshly built node only while the tree stays within the limit.
fn bounded(input: &str, expr: Expr) -> Result<Expr, nom::Err<VerboseError<&str>>> {
    if expr.height() > MAX_DEPTH {
        return Err(failure(input, NESTING_LIMIT));
    }
    Ok(expr)
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> Res<'a, O>
where
    F: FnMut(&'a str) -> Res<'a, O>,
{
    preceded(multispace0, inner)
}

/// A symbol that is not the prefix of a longer one, e.g. `|` but not `||`.
fn symbol<'a>(text: &'static str, longer: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    terminated(tag(text), not(one_of(longer)))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    terminated(tag(word), not(satisfy(is_word_char)))
}

fn identifier(input: &str) -> Res<'_, String> {
    map(
        recognize(pair(
            satisfy(|c| c.is_alphabetic() || c == '_'),
            take_while(is_word_char),
        )),
        str::to_owned,
    )(input)
}

fn pipe(input: &str, depth: usize) -> Res<'_, Expr> {
    let (after_descend, nested) = descend(input, depth)?;
    let (mut rest, mut expr) = conditional(after_descend, nested)?;
    loop {
        let (after_stage, stage) = opt(preceded(
            ws(symbol("|", "|")),
            cut(pair(
                context("a function name after '|'", ws(identifier)),
                opt(preceded(ws(char('(')), |i| arguments(i, nested, ')'))),
            )),
        ))(rest)?;
        let Some((name, extra)) = stage else {
            return Ok((rest, expr));
        };
        let mut args = vec![expr];
        args.extend(extra.unwrap_or_default());
        expr = bounded(after_stage, Expr::Call { name, args })?;
        rest = after_stage;
    }
}

fn conditional(input: &str, depth: usize) -> Res<'_, Expr> {
    let (after_condition, condition) = binary(input, 0, depth)?;
    let (rest, branches) = opt(preceded(
        ws(symbol("?", "?")),
        cut(pair(
            context("an expression after '?'", |i| pipe(i, depth)),
            preceded(
                context("':' in conditional expression", ws(char(':'))),
                context("an expression after ':'", |i| pipe(i, depth)),
            ),
        )),
    ))(after_condition)?;
    let Some((then, otherwise)) = branches else {
        return Ok((after_condition, condition));
    };
    let expr = bounded(
        rest,
        Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        },
    )?;
    Ok((rest, expr))
}

/// Left-associative binary operators, one precedence level per call.
fn binary(input: &str, level: usize, depth: usize) -> Res<'_, Expr> {
    if level == LEVELS {
        return unary(input, depth);
    }
    let (mut rest, mut left) = binary(input, level + 1, depth)?;
    while let (after_op, Some(op)) = opt(|i| operator(i, level))(rest)? {
        let (after_right, right) =
            cut(context("an operand", |i| binary(i, level + 1, depth)))(after_op)?;
        left = bounded(
            after_right,
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        )?;
        rest = after_right;
    }
    Ok((rest, left))
}

fn operator(input: &str, level: usize) -> Res<'_, BinaryOp> {
    let (after_space, _) = multispace0(input)?;
    match level {
        0 => value(BinaryOp::Coalesce, tag("??"))(after_space),
        1 => value(BinaryOp::Or, alt((tag("||"), keyword("or"))))(after_space),
        2 => value(BinaryOp::And, alt((tag("&&"), keyword("and"))))(after_space),
        3 => alt((
            value(BinaryOp::Eq, tag("==")),
            value(BinaryOp::NotEq, tag("!=")),
        ))(after_space),
        4 => alt((
            value(BinaryOp::Le, tag("<=")),
            value(BinaryOp::Ge, tag(">=")),
            value(BinaryOp::Lt, tag("<")),
            value(BinaryOp::Gt, tag(">")),
        ))(after_space),
        5 => value(BinaryOp::In, keyword("in"))(after_space),
        6 => alt((
            value(BinaryOp::Add, char('+')),
            value(BinaryOp::Sub, char('-')),
        ))(after_space),
        _ => alt((
            value(BinaryOp::Mul, char('*')),
            value(BinaryOp::Div, char('/')),
            value(BinaryOp::Rem, char('%')),
        ))(after_space),
    }
}

fn unary(input: &str, depth: usize) -> Res<'_, Expr> {
    let (after_prefix, prefix) = opt(ws(alt((
        value(UnaryOp::Not, alt((symbol("!", "="), keyword("not")))),
        value(UnaryOp::Negate, char('-')),
    ))))(input)?;
    let Some(op) = prefix else {
        return postfix(input, depth);
    };
    let (after_descend, nested) = descend(after_prefix, depth)?;
    let (rest, operand) = cut(context("an operand", |i| unary(i, nested)))(after_descend)?;
    let expr = bounded(
        rest,
        Expr::Unary {
            op,
            operand: Box::new(operand),
        },
    )?;
    Ok((rest, expr))
}

enum Access {
    Member(String),
    Index(Expr),
}

fn postfix(input: &str, depth: usize) -> Res<'_, Expr> {
    let (mut rest, mut expr) = primary(input, depth)?;
    loop {
        let (after_access, access) = opt(alt((
            map(
                preceded(
                    ws(char('.')),
                    cut(context("a field name after '.'", ws(identifier))),
                ),
                Access::Member,
            ),
            map(
                preceded(
                    ws(char('[')),
                    cut(terminated(
                        |i| pipe(i, depth),
                        context("']' to close index", ws(char(']'))),
                    )),
                ),
                Access::Index,
            ),
        )))(rest)?;
        let Some(step) = access else {
            return Ok((rest, expr));
        };
        let target = Box::new(expr);
        expr = bounded(
            after_access,
            match step {
                Access::Member(key) => Expr::Member { target, key },
                Access::Index(index) => Expr::Index {
                    target,
                    index: Box::new(index),
                },
            },
        )?;
        rest = after_access;
    }
}

fn primary(input: &str, depth: usize) -> Res<'_, Expr> {
    context(
        "an expression",
        preceded(
            multispace0,
            alt((
                map(number, Expr::Literal),
                map(string_literal, |text| Expr::Literal(Value::String(text))),
                |i| array(i, depth),
                |i| group(i, depth),
                |i| named(i, depth),
            )),
        ),
    )(input)
}

/// Integers, decimals and exponents; `1.name` stays an integer.
fn number(input: &str) -> Res<'_, Value> {
    let (rest, literal) = recognize(tuple((
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;
    let parsed = if literal.contains(['.', 'e', 'E']) {
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
    } else {
        literal.parse::<i64>().ok().map(Value::from)
    };
    parsed
        .map(|number| (rest, number))
        .ok_or_else(|| failure(input, "a number within the 64-bit range"))
}

fn string_literal(input: &str) -> Res<'_, String> {
    alt((quoted('\'', "'\\"), quoted('"', "\"\\")))(input)
}

fn quoted<'a>(quote: char, special: &'static str) -> impl FnMut(&'a str) -> Res<'a, String> {
    move |input| {
        let (after_open, _) = char(quote)(input)?;
        let (after_body, body) = opt(escaped_transform(
            none_of(special),
            '\\',
            alt((
                value('\n', char('n')),
                value('\t', char('t')),
                value('\r', char('r')),
                value('\0', char('0')),
                anychar,
            )),
        ))(after_open)?;
        let (rest, _) = cut(context("a closing quote", char(quote)))(after_body)?;
        Ok((rest, body.unwrap_or_default()))
    }
}

fn array(input: &str, depth: usize) -> Res<'_, Expr> {
    let (after_open, _) = char('[')(input)?;
    let (rest, items) = cut(|i| arguments(i, depth, ']'))(after_open)?;
    let expr = bounded(rest, Expr::Array(items))?;
    Ok((rest, expr))
}

fn group(input: &str, depth: usize) -> Res<'_, Expr> {
    delimited(
        char('('),
        cut(|i| pipe(i, depth)),
        cut(context("')' to close group", ws(char(')')))),
    )(input)
}

/// Keyword literals, calls and bare names.
fn named(input: &str, depth: usize) -> Res<'_, Expr> {
    let (after_name, name) = identifier(input)?;
    let literal = match name.as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "nil" | "null" => Some(Value::Null),
        _ => None,
    };
    if let Some(constant) = literal {
        return Ok((after_name, Expr::Literal(constant)));
    }
    let (rest, call_args) =
        opt(preceded(ws(char('(')), cut(|i| arguments(i, depth, ')'))))(after_name)?;
    let expr = match call_args {
        Some(args) => bounded(rest, Expr::Call { name, args })?,
        None => Expr::Name(name),
    };
    Ok((rest, expr))
}

/// Comma-separated expressions up to `close`, allowing a trailing comma.
/// The opening bracket has already been consumed.
fn arguments(input: &str, depth: usize, close: char) -> Res<'_, Vec<Expr>> {
    terminated(
        terminated(
            separated_list0(ws(char(',')), |i| pipe(i, depth)),
            opt(ws(char(','))),
        ),
        context(closing_label(close), ws(char(close))),
    )(input)
}

const fn closing_label(close: char) -> &'static str {
    if close == ')' {
        "')' to close the argument list"
    } else {
        "']' to close the array"
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::super::ast::{BinaryOp, Expr, UnaryOp};
    use super::{MAX_DEPTH, NESTING_LIMIT, parse};

    fn parse_ok(source: &str) -> Result<Expr> {
        parse(source).map_err(|message| anyhow!("{source}: {message}"))
    }

    fn parse_err(source: &str) -> Result<String> {
        parse(source)
            .err()
            .ok_or_else(|| anyhow!("expected '{source}' to fail"))
    }

    #[rstest]
    fn pipe_passes_left_side_as_first_argument() -> Result<()> {
        let expr = parse_ok("lookup('role') | lower()")?;
        let expected = Expr::Call {
            name: "lower".into(),
            args: vec![Expr::Call {
                name: "lookup".into(),
                args: vec![Expr::Literal(json!("role"))],
            }],
        };
        ensure!(expr == expected, "unexpected tree {expr:?}");
        Ok(())
    }

    #[rstest]
    fn multiplication_binds_tighter_than_addition() -> Result<()> {
        let Expr::Binary { op, right, .. } = parse_ok("1 + 2 * 3")? else {
            return Err(anyhow!("expected binary expression"));
        };
        ensure!(op == BinaryOp::Add);
        ensure!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
        Ok(())
    }

    #[rstest]
    #[case("42", json!(42))]
    #[case("4.5", json!(4.5))]
    #[case("1e3", json!(1000.0))]
    #[case("\"a\\\"b\"", json!("a\"b"))]
    #[case("'it\\'s'", json!("it's"))]
    #[case("'tab\\there'", json!("tab\there"))]
    #[case("''", json!(""))]
    #[case("true", json!(true))]
    #[case("nil", Value::Null)]
    fn parses_literals(#[case] source: &str, #[case] expected: Value) -> Result<()> {
        let expr = parse_ok(source)?;
        ensure!(expr == Expr::Literal(expected.clone()), "expected {expected}, got {expr:?}");
        Ok(())
    }

    #[rstest]
    fn member_access_after_number_is_not_a_fraction() -> Result<()> {
        let expr = parse_ok("1.name")?;
        let expected = Expr::Member {
            target: Box::new(Expr::Literal(json!(1))),
            key: "name".into(),
        };
        ensure!(expr == expected, "unexpected tree {expr:?}");
        Ok(())
    }

    #[rstest]
    #[case("a or b", BinaryOp::Or)]
    #[case("a || b", BinaryOp::Or)]
    #[case("a and b", BinaryOp::And)]
    #[case("a ?? b", BinaryOp::Coalesce)]
    #[case("a != b", BinaryOp::NotEq)]
    #[case("a <= b", BinaryOp::Le)]
    #[case("'x' in b", BinaryOp::In)]
    fn parses_word_and_symbol_operators(#[case] source: &str, #[case] expected: BinaryOp) -> Result<()> {
        let Expr::Binary { op, .. } = parse_ok(source)? else {
            return Err(anyhow!("{source}: expected binary expression"));
        };
        ensure!(op == expected, "{source}: expected {expected:?}, got {op:?}");
        Ok(())
    }

    #[rstest]
    fn keywords_need_a_word_boundary() -> Result<()> {
        ensure!(parse_ok("order")? == Expr::Name("order".into()));
        ensure!(parse_ok("index")? == Expr::Name("index".into()));
        let negated = parse_ok("not nothing")?;
        ensure!(
            negated
                == Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(Expr::Name("nothing".into())),
                },
            "unexpected tree {negated:?}"
        );
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("lookup(")]
    #[case("lookup('a',")]
    #[case("1 +")]
    #[case("(1")]
    #[case("a ? b")]
    #[case("x | 'y'")]
    #[case("a.1")]
    #[case("1 2")]
    #[case("[1, 2")]
    #[case("99999999999999999999")]
    fn rejects_incomplete_expressions(#[case] source: &str) -> Result<()> {
        parse_err(source)?;
        Ok(())
    }

    #[rstest]
    #[case("'open", "expected a closing quote, found end of expression")]
    #[case("a ? b", "expected ':' in conditional expression")]
    #[case("a = b", "unexpected '=' at position 2")]
    #[case("(1", "expected ')' to close group")]
    #[case("lookup('a', 1", "expected ')' to close the argument list")]
    #[case("x | 'y'", "expected a function name after '|', found ''' at position 4")]
    #[case("#", "expected an expression, found '#' at position 0")]
    fn messages_name_the_problem(#[case] source: &str, #[case] expected: &str) -> Result<()> {
        let message = parse_err(source)?;
        ensure!(message.contains(expected), "{source}: unexpected message '{message}'");
        Ok(())
    }

    #[rstest]
    fn bounds_bracket_nesting() -> Result<()> {
        let source = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        ensure!(parse_err(&source)? == NESTING_LIMIT);
        Ok(())
    }

    #[rstest]
    #[case::additions(["1"; 5000].join(" + "))]
    #[case::members(format!("lookup('a'){}", ".b".repeat(5000)))]
    #[case::indices(format!("lookup('a'){}", "[0]".repeat(5000)))]
    #[case::negations(format!("{}1", "-".repeat(5000)))]
    #[case::pipes(format!("1{}", " | string()".repeat(5000)))]
    fn bounds_long_chains(#[case] source: String) -> Result<()> {
        ensure!(parse_err(&source)? == NESTING_LIMIT);
        Ok(())
    }

    #[rstest]
    fn accepts_chains_up_to_the_limit() -> Result<()> {
        let source = ["1"; MAX_DEPTH + 1].join(" + ");
        let expr = parse_ok(&source)?;
        ensure!(expr.height() == MAX_DEPTH, "height {}", expr.height());
        Ok(())
    }

    #[rstest]
    fn nesting_message_names_the_limit() -> Result<()> {
        ensure!(NESTING_LIMIT.contains(&MAX_DEPTH.to_string()));
        Ok(())
    }
}
