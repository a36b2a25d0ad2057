use log::{debug, trace};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, space0},
    combinator::{cut, map, map_res, opt, recognize},
    error::{context, VerboseError, VerboseErrorKind},
    multi::many1,
    sequence::{pair, preceded},
    IResult,
};
use serde::{Deserialize, Serialize};

use super::{Expr, Literal, Operator};

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ParserConfig {
    // Deepest permitted nesting of parenthesised applications
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig { max_depth: 64 }
    }
}

fn parse_number(i: &str) -> ParseResult<'_, Literal> {
    context(
        "number",
        map(recognize(pair(opt(char('-')), digit1)), Literal::from_digits),
    )(i)
}

fn parse_operator(i: &str) -> ParseResult<'_, Operator> {
    let token = alt((
        tag("+"),
        tag("-"),
        tag("*"),
        tag("/"),
        tag("%"),
        tag("^"),
        tag("min"),
        tag("max"),
    ));

    context("operator", map_res(token, |token: &str| token.parse::<Operator>()))(i)
}

/// The first point at which the input failed to match the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset into the input line
    pub position: usize,
    /// 1-based, counted in characters
    pub column: usize,
    pub expected: String,
    /// `None` at end of input
    pub found: Option<char>,
}

impl SyntaxError {
    fn new(input: &str, remaining: &str, expected: impl Into<String>) -> SyntaxError {
        let position = input.len() - remaining.len();
        SyntaxError {
            position,
            column: input[..position].chars().count() + 1,
            expected: expected.into(),
            found: remaining.chars().next(),
        }
    }

    fn from_verbose(input: &str, e: VerboseError<&str>) -> SyntaxError {
        // Entries run from the innermost parser outwards
        let remaining = e.errors.first().map(|(i, _)| *i).unwrap_or(input);
        let expected = e
            .errors
            .iter()
            .find_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(c) => Some(*c),
                _ => None,
            })
            .unwrap_or("expression");

        SyntaxError::new(input, remaining, expected)
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<stdin>:1:{}: error: expected {} at ",
            self.column, self.expected
        )?;
        match self.found {
            Some(c) => write!(f, "'{}'", c),
            None => write!(f, "end of input"),
        }
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone)]
pub struct Parser {
    max_depth: usize,
}

impl Parser {
    pub fn new(config: &ParserConfig) -> Parser {
        Parser {
            max_depth: config.max_depth,
        }
    }

    fn parse_expression<'a>(&self, depth: usize, i: &'a str) -> ParseResult<'a, Expr> {
        preceded(
            space0,
            context(
                "expression",
                alt((
                    map(parse_number, Expr::Number),
                    |i: &'a str| self.parse_application(depth, i),
                )),
            ),
        )(i)
    }

    fn parse_application<'a>(&self, depth: usize, i: &'a str) -> ParseResult<'a, Expr> {
        let (i, _) = char::<_, VerboseError<&'a str>>('(')(i)?;

        if depth >= self.max_depth {
            return Err(nom::Err::Failure(VerboseError {
                errors: vec![(i, VerboseErrorKind::Context("nesting"))],
            }));
        }

        let (i, op) = cut(preceded(space0, parse_operator))(i)?;
        let (i, operands) = cut(many1(|i: &'a str| self.parse_expression(depth + 1, i)))(i)?;
        let close = context("')'", char::<_, VerboseError<&'a str>>(')'));
        let (i, _) = cut(preceded(space0, close))(i)?;

        Ok((i, Expr::Application(op, operands)))
    }

    pub fn parse(&self, input: &str) -> Result<Expr, SyntaxError> {
        let result = match self.parse_expression(0, input) {
            Ok((remaining, expr)) => {
                let remaining = remaining.trim_start_matches(&[' ', '\t'][..]);
                if remaining.is_empty() {
                    Ok(expr)
                } else {
                    Err(SyntaxError::new(input, remaining, "end of input"))
                }
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let mut error = SyntaxError::from_verbose(input, e);
                if error.expected == "nesting" {
                    error.expected = format!("nesting depth at most {}", self.max_depth);
                }
                Err(error)
            }
            Err(nom::Err::Incomplete(_)) => Err(SyntaxError::new(input, "", "expression")),
        };

        match &result {
            Ok(expr) => trace!("Parsed \"{}\" as {}", input, expr),
            Err(e) => debug!("Rejected \"{}\": {}", input, e),
        }
        result
    }
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new(&ParserConfig::default())
    }
}

pub fn parse(input: &str) -> Result<Expr, SyntaxError> {
    Parser::default().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(op: Operator, operands: Vec<Expr>) -> Expr {
        Expr::Application(op, operands)
    }

    #[test]
    fn test_parse_number() -> Result<(), Box<dyn std::error::Error>> {
        let (r1, v1) = parse_number("442")?;
        let (r2, v2) = parse_number("-34)")?;
        let (r3, v3) = parse_number("100000000000000000000 1")?;

        assert_eq!(r1, "");
        assert_eq!(r2, ")");
        assert_eq!(r3, " 1");
        assert_eq!(v1, Literal::Int(442));
        assert_eq!(v2, Literal::Int(-34));
        assert_eq!(
            v3,
            Literal::OutOfRange("100000000000000000000".to_string())
        );

        assert!(parse_number("IO").is_err());
        assert!(parse_number("-").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_operator() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(parse_operator("min 1")?, (" 1", Operator::Min));
        assert_eq!(parse_operator("max")?, ("", Operator::Max));
        assert_eq!(parse_operator("-1")?, ("1", Operator::Sub));
        assert_eq!(parse_operator("^")?, ("", Operator::Pow));
        assert!(parse_operator("mod").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_expression() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(parse("42")?, Expr::from(42));
        assert_eq!(parse("  -7 ")?, Expr::from(-7));
        assert_eq!(
            parse("(* 2 (+ 3 4))")?,
            app(
                Operator::Mul,
                vec![2.into(), app(Operator::Add, vec![3.into(), 4.into()])]
            )
        );
        assert_eq!(
            parse("(max\t(min 5 2) 9)")?,
            app(
                Operator::Max,
                vec![app(Operator::Min, vec![5.into(), 2.into()]), 9.into()]
            )
        );
        Ok(())
    }

    #[test]
    fn test_tight_tokens() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(parse("(+1 2)")?, app(Operator::Add, vec![1.into(), 2.into()]));
        assert_eq!(parse("(-1 2)")?, app(Operator::Sub, vec![1.into(), 2.into()]));
        assert_eq!(parse("(- -1)")?, app(Operator::Sub, vec![(-1).into()]));
        assert_eq!(parse("(+ 1-2)")?, app(Operator::Add, vec![1.into(), (-2).into()]));
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        for source in ["(+ 1 2 3)", "(% (^ 2 10) -7 (min 1 2 3))", "-12"].iter() {
            let e = parse(source)?;
            assert_eq!(e.to_string(), *source);
            assert_eq!(parse(&e.to_string())?, e);
        }
        Ok(())
    }

    #[test]
    fn test_rejected() {
        for source in ["()", "(+ )", "(+ 1", "+ 1 2", "", "  ", "(+ 1 2))", "(1 2)"].iter() {
            assert!(parse(source).is_err(), "{} should not parse", source);
        }
    }

    #[test]
    fn test_errors() {
        let e = parse("()").unwrap_err();
        assert_eq!(e.position, 1);
        assert_eq!(e.expected, "operator");
        assert_eq!(e.found, Some(')'));

        let e = parse("(+ )").unwrap_err();
        assert_eq!(e.position, 3);
        assert_eq!(e.expected, "expression");
        assert_eq!(e.found, Some(')'));

        let e = parse("(+ 1").unwrap_err();
        assert_eq!(e.position, 4);
        assert_eq!(e.expected, "')'");
        assert_eq!(e.found, None);
        assert_eq!(e.to_string(), "<stdin>:1:5: error: expected ')' at end of input");

        let e = parse("+ 1 2").unwrap_err();
        assert_eq!(e.position, 0);
        assert_eq!(e.expected, "expression");
        assert_eq!(e.found, Some('+'));

        let e = parse("(+ 1 2) x").unwrap_err();
        assert_eq!(e.position, 8);
        assert_eq!(e.expected, "end of input");
        assert_eq!(e.to_string(), "<stdin>:1:9: error: expected end of input at 'x'");

        let e = parse("(+ 1 2O)").unwrap_err();
        assert_eq!(e.position, 6);
        assert_eq!(e.expected, "')'");
        assert_eq!(e.found, Some('O'));
    }

    #[test]
    fn test_column() {
        let input = "(+ é";
        let e = parse(input).unwrap_err();
        assert_eq!(e.position, 3);
        assert_eq!(e.column, 4);
        assert_eq!(e.to_string(), "<stdin>:1:4: error: expected expression at 'é'");
    }

    #[test]
    fn test_max_depth() -> Result<(), Box<dyn std::error::Error>> {
        let parser = Parser::new(&ParserConfig { max_depth: 2 });

        assert!(parser.parse("(+ (+ 1 2) 3)").is_ok());

        let e = parser.parse("(+ (+ (+ 1 2) 3) 4)").unwrap_err();
        assert_eq!(e.expected, "nesting depth at most 2");
        assert_eq!(e.position, 7);

        let deep = format!("{}1{}", "(+ ".repeat(1_000), ")".repeat(1_000));
        let e = parse(&deep).unwrap_err();
        assert_eq!(e.expected, "nesting depth at most 64");
        assert_eq!(e.position, 3 * 64 + 1);
        Ok(())
    }
}
