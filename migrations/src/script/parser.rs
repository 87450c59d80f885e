//! Schema script parser
//!
//! Reads scripts written by [`super::render_schema`] (or edited by hand) back
//! into schema model tables. Token-level parsing uses nom; the resulting
//! calls are then checked against the small set the script grammar allows.

use super::implied_primary_index;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize, value},
    error::{Error as NomError, ErrorKind},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded},
};
use strata_types::{
    Column, ColumnOption, ForeignKey, Index, OptionValue, PRIMARY_INDEX, Table, TableOptions,
};

/// A schema script could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line the problem was found on
    pub line: usize,
    pub message: String,
}

impl ParseError {
    /// Build an error located where `rest` starts inside `source`.
    fn at(source: &str, rest: &str, message: impl Into<String>) -> Self {
        let offset = source.len().saturating_sub(rest.len());
        Self {
            line: source[..offset].matches('\n').count() + 1,
            message: message.into(),
        }
    }

    fn syntax(source: &str, err: nom::Err<NomError<&str>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                let near = e.input.lines().next().unwrap_or_default().trim();
                let message = if near.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected input near `{near}`")
                };
                Self::at(source, e.input, message)
            }
            nom::Err::Incomplete(_) => Self::at(source, "", "unexpected end of input"),
        }
    }
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// `literal('..')`: raw SQL
    Expr(String),
    /// `array(..)` entries; keyed entries carry `Some(key)`
    Array(Vec<(Option<Literal>, Literal)>),
}

/// Skip whitespace and `--` line comments
fn ws(input: &str) -> IResult<&str, ()> {
    let mut rest = input;
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix("--") {
            Some(comment) => rest = comment.find('\n').map_or("", |i| &comment[i..]),
            None => return Ok((trimmed, ())),
        }
    }
}

fn comma(input: &str) -> IResult<&str, ()> {
    value((), (ws, char(','), ws)).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// Single-quoted string; `\\` and `\'` are the only escapes
fn string_literal(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('\'').parse(input)?;
    let mut out = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('\'') => return Ok((chars.as_str(), out)),
            Some('\\') => match chars.clone().next() {
                Some(c @ ('\\' | '\'')) => {
                    chars.next();
                    out.push(c);
                }
                _ => out.push('\\'),
            },
            Some(c) => out.push(c),
            None => return Err(nom::Err::Failure(NomError::new(input, ErrorKind::Char))),
        }
        rest = chars.as_str();
    }
}

fn number(input: &str) -> IResult<&str, Literal> {
    let (rest, text) = recognize((
        opt(char('-')),
        digit1,
        opt((char('.'), digit1)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;

    let parsed = if text.contains(['.', 'e', 'E']) {
        text.parse().map(Literal::Float).ok()
    } else {
        text.parse().map(Literal::Int).ok()
    };

    match parsed {
        Some(literal) => Ok((rest, literal)),
        None => Err(nom::Err::Failure(NomError::new(input, ErrorKind::Digit))),
    }
}

fn keyword(input: &str) -> IResult<&str, Literal> {
    let (rest, word) = identifier(input)?;
    let literal = match word {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        "null" => Literal::Null,
        _ => return Err(nom::Err::Error(NomError::new(input, ErrorKind::Tag))),
    };
    Ok((rest, literal))
}

fn array(input: &str) -> IResult<&str, Literal> {
    let (input, _) = (tag("array"), ws, char('('), ws).parse(input)?;
    let (input, entries) = separated_list0(comma, entry).parse(input)?;
    let (input, _) = (opt(comma), ws, char(')')).parse(input)?;
    Ok((input, Literal::Array(entries)))
}

fn entry(input: &str) -> IResult<&str, (Option<Literal>, Literal)> {
    let (input, first) = literal(input)?;
    let (input, second) = opt(preceded((ws, tag("=>"), ws), literal)).parse(input)?;
    Ok((
        input,
        match second {
            Some(value) => (Some(first), value),
            None => (None, first),
        },
    ))
}

fn expression(input: &str) -> IResult<&str, Literal> {
    delimited(
        (tag("literal"), ws, char('('), ws),
        string_literal,
        (ws, char(')')),
    )
    .map(Literal::Expr)
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((array, expression, string_literal.map(Literal::Str), number, keyword)).parse(input)
}

// =============================================================================
// Blocks
// =============================================================================

/// `->name(args)`; `at` points at the arrow for error locations
struct Call<'a> {
    at: &'a str,
    name: &'a str,
    args: Vec<Literal>,
}

/// `table(args) ->call() ... ;`
struct Block<'a> {
    at: &'a str,
    args: Vec<Literal>,
    calls: Vec<Call<'a>>,
}

fn call(input: &str) -> IResult<&str, Call<'_>> {
    let (input, _) = ws(input)?;
    let at = input;
    let (input, _) = tag("->").parse(input)?;
    let (input, name) = preceded(ws, identifier).parse(input)?;
    let (input, _) = (ws, char('('), ws).parse(input)?;
    let (input, args) = separated_list0(comma, literal).parse(input)?;
    let (input, _) = (ws, char(')')).parse(input)?;
    Ok((input, Call { at, name, args }))
}

fn block(input: &str) -> IResult<&str, Block<'_>> {
    let at = input;
    let (input, _) = (tag("table"), ws, char('('), ws).parse(input)?;
    let (input, args) = separated_list1(comma, literal).parse(input)?;
    let (input, _) = (ws, char(')')).parse(input)?;
    let (input, calls) = many0(call).parse(input)?;
    let (input, _) = (ws, char(';')).parse(input)?;
    Ok((input, Block { at, args, calls }))
}

// =============================================================================
// Public API
// =============================================================================

/// Parse a full schema script into tables, in script order.
///
/// `update()` blocks are merged into the table created earlier. Each
/// created table gets the `PRIMARY` index its options imply.
pub fn parse_schema(source: &str) -> Result<Vec<Table>, ParseError> {
    let mut tables: Vec<Table> = Vec::new();
    let mut rest = source;

    loop {
        let (input, ()) = ws(rest).map_err(|e| ParseError::syntax(source, e))?;
        if input.is_empty() {
            break;
        }
        let (input, block) = block(input).map_err(|e| ParseError::syntax(source, e))?;
        apply_block(source, &mut tables, block)?;
        rest = input;
    }

    Ok(tables)
}

/// Parse the rendered arguments of a single `addColumn(..)` call.
pub fn parse_add_column_arguments(args: &str) -> Result<Column, ParseError> {
    let (rest, literals) = delimited(ws, separated_list1(comma, literal), ws)
        .parse(args)
        .map_err(|e| ParseError::syntax(args, e))?;

    if !rest.is_empty() {
        return Err(ParseError::syntax(
            args,
            nom::Err::Error(NomError::new(rest, ErrorKind::Eof)),
        ));
    }

    column_from_args(literals).map_err(|message| ParseError::at(args, args, message))
}

// =============================================================================
// Interpretation
// =============================================================================

fn apply_block(source: &str, tables: &mut Vec<Table>, block: Block<'_>) -> Result<(), ParseError> {
    let Some((terminal, body)) = block.calls.split_last() else {
        return Err(ParseError::at(
            source,
            block.at,
            "table block must end with ->create() or ->update()",
        ));
    };
    let creating = match terminal.name {
        "create" => true,
        "update" => false,
        other => {
            return Err(ParseError::at(
                source,
                terminal.at,
                format!("expected ->create() or ->update(), found ->{other}()"),
            ));
        }
    };
    if !terminal.args.is_empty() {
        return Err(ParseError::at(
            source,
            terminal.at,
            format!("->{}() takes no arguments", terminal.name),
        ));
    }

    let mut args = block.args.into_iter();
    let name = match args.next() {
        Some(Literal::Str(name)) => name,
        _ => return Err(ParseError::at(source, block.at, "table() expects a quoted table name")),
    };
    let options = args
        .next()
        .map(table_options)
        .transpose()
        .map_err(|message| ParseError::at(source, block.at, message))?;
    if args.next().is_some() {
        return Err(ParseError::at(source, block.at, "table() takes at most two arguments"));
    }

    if creating {
        if tables.iter().any(|t| t.name == name) {
            return Err(ParseError::at(
                source,
                block.at,
                format!("table '{name}' is created twice"),
            ));
        }
        let mut table = Table::new(name);
        table.options = options.unwrap_or_default();
        if let Some(primary) = implied_primary_index(&table) {
            table.indexes.push(primary);
        }
        apply_calls(source, &mut table, body)?;
        tables.push(table);
    } else {
        if options.as_ref().is_some_and(|o| !o.is_empty()) {
            return Err(ParseError::at(
                source,
                block.at,
                "update() blocks cannot change table options",
            ));
        }
        let Some(table) = tables.iter_mut().find(|t| t.name == name) else {
            return Err(ParseError::at(
                source,
                block.at,
                format!("table '{name}' is updated before it is created"),
            ));
        };
        apply_calls(source, table, body)?;
    }

    Ok(())
}

fn apply_calls(source: &str, table: &mut Table, calls: &[Call<'_>]) -> Result<(), ParseError> {
    for call in calls {
        let args = call.args.clone();
        let applied = match call.name {
            "addColumn" => column_from_args(args).map(|c| table.columns.push(c)),
            "addIndex" => index_from_args(args).map(|i| table.indexes.push(i)),
            "addForeignKey" => foreign_key_from_args(args).map(|fk| table.foreign_keys.push(fk)),
            "create" | "update" => Err(format!("->{}() must be the last call of a block", call.name)),
            other => Err(format!("unknown call ->{other}()")),
        };
        applied.map_err(|message| ParseError::at(source, call.at, message))?;
    }
    Ok(())
}

fn into_value(literal: Literal) -> Result<OptionValue, String> {
    Ok(match literal {
        Literal::Null => OptionValue::Null,
        Literal::Bool(b) => OptionValue::Bool(b),
        Literal::Int(n) => OptionValue::Int(n),
        Literal::Float(f) => OptionValue::Float(f),
        Literal::Str(s) => OptionValue::Str(s),
        Literal::Expr(sql) => OptionValue::Expr(sql),
        Literal::Array(entries) => OptionValue::List(string_entries(entries)?),
    })
}

fn string_entries(entries: Vec<(Option<Literal>, Literal)>) -> Result<Vec<String>, String> {
    entries
        .into_iter()
        .map(|entry| match entry {
            (None, Literal::Str(s)) => Ok(s),
            _ => Err("expected a list of quoted strings".to_string()),
        })
        .collect()
}

fn into_map(literal: Literal) -> Result<Vec<(String, Literal)>, String> {
    let Literal::Array(entries) = literal else {
        return Err("expected an options map".to_string());
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            (Some(Literal::Str(key)), value) => Ok((key, value)),
            _ => Err("expected 'key' => value pairs in options map".to_string()),
        })
        .collect()
}

/// A quoted scalar or a list of quoted strings
fn into_names(literal: Literal) -> Result<Vec<String>, String> {
    match literal {
        Literal::Str(s) => Ok(vec![s]),
        Literal::Array(entries) => string_entries(entries),
        _ => Err("expected a column name or a list of column names".to_string()),
    }
}

fn table_options(literal: Literal) -> Result<TableOptions, String> {
    into_map(literal)?
        .into_iter()
        .map(|(key, value)| into_value(value).map(|value| (key, value)))
        .collect()
}

fn column_from_args(args: Vec<Literal>) -> Result<Column, String> {
    let mut args = args.into_iter();

    let Some(Literal::Str(name)) = args.next() else {
        return Err("addColumn() expects a quoted column name".to_string());
    };
    let Some(Literal::Str(column_type)) = args.next() else {
        return Err("addColumn() expects a quoted column type".to_string());
    };

    let mut column = Column::new(name, column_type.as_str());

    if let Some(options) = args.next() {
        for (key, value) in into_map(options)? {
            let option = ColumnOption::from_key(&key)
                .ok_or_else(|| format!("unknown column option '{key}'"))?;
            option
                .write(&mut column, into_value(value)?)
                .map_err(|_| format!("invalid value for column option '{key}'"))?;
        }
    }

    if args.next().is_some() {
        return Err("addColumn() takes at most three arguments".to_string());
    }
    Ok(column)
}

fn index_from_args(args: Vec<Literal>) -> Result<Index, String> {
    let mut args = args.into_iter();

    let columns = args
        .next()
        .ok_or_else(|| "addIndex() expects a list of columns".to_string())
        .and_then(into_names)?;
    let mut index = Index::new(columns);

    if let Some(options) = args.next() {
        for (key, value) in into_map(options)? {
            match (key.as_str(), value) {
                ("name", Literal::Str(name)) if name == PRIMARY_INDEX => {
                    return Err(format!("index name '{PRIMARY_INDEX}' is reserved"));
                }
                ("name", Literal::Str(name)) => index.name = Some(name),
                ("type", Literal::Str(kind)) if kind == "fulltext" => index.fulltext = true,
                ("unique", Literal::Bool(unique)) => index.unique = unique,
                ("limit", Literal::Int(limit)) => {
                    index.limit = Some(
                        u32::try_from(limit).map_err(|_| format!("invalid index limit {limit}"))?,
                    );
                }
                (key, _) => return Err(format!("invalid index option '{key}'")),
            }
        }
    }

    if args.next().is_some() {
        return Err("addIndex() takes at most two arguments".to_string());
    }
    Ok(index)
}

fn foreign_key_from_args(args: Vec<Literal>) -> Result<ForeignKey, String> {
    let [columns, Literal::Str(referenced_table), referenced_columns] =
        <[Literal; 3]>::try_from(args).map_err(|_| {
            "addForeignKey() expects columns, a referenced table and referenced columns"
                .to_string()
        })?
    else {
        return Err("addForeignKey() expects a quoted referenced table name".to_string());
    };

    let fk = ForeignKey::new(
        into_names(columns)?,
        referenced_table,
        into_names(referenced_columns)?,
    );
    if !fk.is_well_formed() {
        return Err("foreign key column lists must be non-empty and of equal length".to_string());
    }
    Ok(fk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(literal("'it\\'s'").unwrap().1, Literal::Str("it's".into()));
        assert_eq!(literal(r"'C:\\tmp\n'").unwrap().1, Literal::Str(r"C:\tmp\n".into()));
        assert_eq!(literal("-12").unwrap().1, Literal::Int(-12));
        assert_eq!(literal("1.0").unwrap().1, Literal::Float(1.0));
        assert_eq!(literal("2e-3").unwrap().1, Literal::Float(0.002));
        assert_eq!(literal("false").unwrap().1, Literal::Bool(false));
        assert_eq!(literal("null").unwrap().1, Literal::Null);
        assert!(literal("maybe").is_err());
        assert_eq!(
            literal(r"literal( '(datetime(\'now\'))' )").unwrap().1,
            Literal::Expr("(datetime('now'))".into())
        );
        assert_eq!(literal("'(none)'").unwrap().1, Literal::Str("(none)".into()));
    }

    #[test]
    fn arrays_allow_trailing_commas_and_keys() {
        let (_, parsed) = literal("array( 'a' => 1, 'b',\n)").unwrap();
        assert_eq!(
            parsed,
            Literal::Array(vec![
                (Some(Literal::Str("a".into())), Literal::Int(1)),
                (None, Literal::Str("b".into())),
            ])
        );
    }

    #[test]
    fn column_arguments() {
        let column =
            parse_add_column_arguments("'email', 'string', array('limit'=>255,'null'=>true)")
                .unwrap();
        assert_eq!(column, Column::new("email", "string").limit(255).nullable());

        let column = parse_add_column_arguments("'body', 'text'").unwrap();
        assert_eq!(column, Column::new("body", "text"));
    }

    #[test]
    fn column_arguments_reject_unknown_options() {
        let err = parse_add_column_arguments("'x', 'integer', array('signed'=>false)").unwrap_err();
        assert_eq!(err.message, "unknown column option 'signed'");

        let err = parse_add_column_arguments("'x', 'integer', array('limit'=>'ten')").unwrap_err();
        assert_eq!(err.message, "invalid value for column option 'limit'");
    }

    #[test]
    fn errors_report_lines() {
        let source = "-- header\n\ntable('a', array())\n    ->addColumn('x', 'integer')\n    ->frobnicate()\n    ->create();\n";
        let err = parse_schema(source).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.message, "unknown call ->frobnicate()");

        let err = parse_schema("table('a', array())\n    ->addColumn('x, 'integer')\n    ->create();").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn missing_terminal_call() {
        let err = parse_schema("table('a', array())\n    ->addColumn('x', 'integer');").unwrap_err();
        assert_eq!(err.message, "expected ->create() or ->update(), found ->addColumn()");

        let err = parse_schema("table('a');").unwrap_err();
        assert_eq!(err.message, "table block must end with ->create() or ->update()");
    }

    #[test]
    fn update_requires_existing_table() {
        let err = parse_schema("table('posts')\n    ->addForeignKey('user_id', 'users', 'id')\n    ->update();")
            .unwrap_err();
        assert_eq!(err.message, "table 'posts' is updated before it is created");
    }

    #[test]
    fn foreign_key_lengths_must_match() {
        let source = "table('a', array())->create();\ntable('a')->addForeignKey(array('x', 'y'), 'b', 'id')->update();";
        let err = parse_schema(source).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.message,
            "foreign key column lists must be non-empty and of equal length"
        );
    }
}
