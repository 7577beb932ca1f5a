use crate::error::{QueryError, Result};
use crate::types::{AreaRef, Column, QueryParams, TagFilter};

const SEARCH_AREA: &str = "searchArea";

/// Builds the Overpass QL text for `params`.
///
/// The output has the same shape as a hand-written Overpass Turbo query:
/// a CSV output directive with a header row, the area binding, a union of
/// tag selectors restricted to the area, and `out center;`.
pub fn build_overpass_query_string(params: &QueryParams) -> Result<String> {
    if params.filters.is_empty() {
        return Err(QueryError::Config("query has no tag filters".into()));
    }
    if params.columns.is_empty() {
        return Err(QueryError::Config("query has no output columns".into()));
    }

    let columns = params
        .columns
        .iter()
        .map(render_column)
        .collect::<Vec<_>>()
        .join(",");

    let mut query = format!(
        "[out:csv({columns};true;\",\")][timeout:{}];\n",
        params.timeout
    );
    query.push_str(&render_area(&params.area));
    query.push_str("(\n");
    for filter in &params.filters {
        query.push_str("  ");
        query.push_str(&render_filter(filter));
        query.push('\n');
    }
    query.push_str(");\nout center;\n");
    Ok(query)
}

fn render_column(column: &Column) -> String {
    match column {
        Column::Meta(field) => format!("::{}", field.as_str()),
        Column::Tag(key) => quote(key),
    }
}

fn render_area(area: &AreaRef) -> String {
    match area {
        AreaRef::Geocode(name) => format!("{{{{geocodeArea:{name}}}}}->.{SEARCH_AREA};\n"),
        AreaRef::Id(id) => format!("area(id:{id})->.{SEARCH_AREA};\n"),
    }
}

fn render_filter(filter: &TagFilter) -> String {
    match &filter.value {
        Some(value) => format!(
            "{}[{}={}](area.{SEARCH_AREA});",
            filter.element,
            quote(&filter.key),
            quote(value)
        ),
        None => format!(
            "{}[{}](area.{SEARCH_AREA});",
            filter.element,
            quote(&filter.key)
        ),
    }
}

fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Strips comments and every whitespace character outside string literals.
///
/// Overpass QL ignores whitespace between tokens and reads `"wheelchair"` and
/// `wheelchair` as the same key, so plain identifiers lose their quotes. Two
/// queries with equal canonical forms are the same query.
pub fn canonicalize(text: &str) -> String {
    enum State {
        Code,
        Str(char),
        StrEscape(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(text.len());
    let mut literal = String::new();
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        state = match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    State::LineComment
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    State::BlockComment
                }
                '"' | '\'' => {
                    literal.clear();
                    State::Str(c)
                }
                c if c.is_whitespace() => State::Code,
                c => {
                    out.push(c);
                    State::Code
                }
            },
            State::Str(q) => match c {
                '\\' => {
                    literal.push(c);
                    State::StrEscape(q)
                }
                c if c == q => {
                    if is_plain_identifier(&literal) {
                        out.push_str(&literal);
                    } else {
                        out.push(q);
                        out.push_str(&literal);
                        out.push(q);
                    }
                    State::Code
                }
                c => {
                    literal.push(c);
                    State::Str(q)
                }
            },
            State::StrEscape(q) => {
                literal.push(c);
                State::Str(q)
            }
            State::LineComment => match c {
                '\n' => State::Code,
                _ => State::LineComment,
            },
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    State::Code
                } else {
                    State::BlockComment
                }
            }
        };
    }

    // unterminated literal: keep it as written
    if let State::Str(q) | State::StrEscape(q) = state {
        out.push(q);
        out.push_str(&literal);
    }
    out
}

/// Text Overpass accepts as an unquoted key or value.
fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub fn equivalent(a: &str, b: &str) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// Header names declared by the `[out:csv(...)]` directive of `query`, if it has one.
///
/// `::id` becomes `id` and `"toilets:wheelchair"` becomes `toilets:wheelchair`.
pub fn output_columns(query: &str) -> Option<Vec<String>> {
    const DIRECTIVE: &str = "[out:csv(";

    let canonical = canonicalize(query);
    let start = canonical.find(DIRECTIVE)? + DIRECTIVE.len();

    let mut columns = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    for c in canonical[start..].chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => quote = Some(c),
            (None, ',') => columns.push(std::mem::take(&mut current)),
            (None, ';' | ')') => {
                columns.push(current);
                return Some(
                    columns
                        .into_iter()
                        .map(|col| col.trim_start_matches("::").to_string())
                        .collect(),
                );
            }
            (None, c) => current.push(c),
        }
    }
    None
}

/// Expands Overpass Turbo `{{...}}` shortcuts so the raw interpreter can run the query.
///
/// Only `{{geocodeArea:NAME}}` is understood. It becomes `area(id:N)` with the
/// id returned by `resolve`. Comments and string literals are copied untouched.
pub fn expand_shortcuts<F>(template: &str, mut resolve: F) -> Result<String>
where
    F: FnMut(&str) -> Result<u64>,
{
    #[derive(Clone, Copy)]
    enum State {
        Code,
        Str(char),
        StrEscape(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(template.len());
    let mut state = State::Code;
    let mut i = 0;

    while let Some(c) = template[i..].chars().next() {
        let rest = &template[i..];
        match state {
            State::Code if rest.starts_with("{{") => {
                let after = &rest[2..];
                let Some(end) = after.find("}}") else {
                    return Err(QueryError::UnsupportedShortcut(rest.trim().to_string()));
                };
                let inner = after[..end].trim();

                match inner.split_once(':') {
                    Some((name, argument)) if name.trim() == "geocodeArea" => {
                        let id = resolve(argument.trim())?;
                        out.push_str(&format!("area(id:{id})"));
                    }
                    _ => return Err(QueryError::UnsupportedShortcut(format!("{{{{{inner}}}}}"))),
                }
                i += end + 4;
                continue;
            }
            State::Code if rest.starts_with("//") => {
                out.push_str("//");
                i += 2;
                state = State::LineComment;
                continue;
            }
            State::Code if rest.starts_with("/*") => {
                out.push_str("/*");
                i += 2;
                state = State::BlockComment;
                continue;
            }
            State::BlockComment if rest.starts_with("*/") => {
                out.push_str("*/");
                i += 2;
                state = State::Code;
                continue;
            }
            _ => {}
        }

        state = match state {
            State::Code if c == '"' || c == '\'' => State::Str(c),
            State::Str(q) if c == '\\' => State::StrEscape(q),
            State::Str(q) if c == q => State::Code,
            State::StrEscape(q) => State::Str(q),
            State::LineComment if c == '\n' => State::Code,
            other => other,
        };
        out.push(c);
        i += c.len_utf8();
    }
    Ok(out)
}
