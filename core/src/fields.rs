//! Extra-field fragment parsing.
//!
//! `--extra` fragments are merged into the event after the base fields. A
//! fragment is one or more comma-separated clauses of the form
//! `key => literal` or `key: literal`. Keys are bare identifiers or quoted
//! strings; literals are strings, numbers, or booleans. Fragments are
//! parsed, never evaluated.
//!
//! A malformed clause is fatal for the whole run: no partial event may be
//! emitted.

use std::fmt;

use serde_json::Value;

#[derive(Debug, PartialEq)]
pub enum FieldParseError {
    /// A clause was empty (e.g. trailing comma, or an empty fragment).
    EmptyClause,
    /// No `=>` or `:` separator outside quotes.
    MissingSeparator(String),
    /// Key is not a bare identifier or quoted string.
    BadKey(String),
    /// Value is not a string, number, or boolean literal.
    BadLiteral(String),
    /// A quoted string never closed.
    UnterminatedString(String),
}

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldParseError::EmptyClause => write!(f, "empty clause"),
            FieldParseError::MissingSeparator(clause) => {
                write!(f, "no '=>' or ':' separator in '{}'", clause)
            }
            FieldParseError::BadKey(key) => {
                write!(f, "invalid key '{}' (expected identifier or quoted string)", key)
            }
            FieldParseError::BadLiteral(value) => {
                write!(
                    f,
                    "invalid value '{}' (expected string, number, or boolean)",
                    value
                )
            }
            FieldParseError::UnterminatedString(text) => {
                write!(f, "unterminated string in '{}'", text)
            }
        }
    }
}

impl std::error::Error for FieldParseError {}

/// Parse one fragment into key/value pairs, in clause order.
pub fn parse_fragment(fragment: &str) -> Result<Vec<(String, Value)>, FieldParseError> {
    let mut pairs = Vec::new();
    for clause in split_clauses(fragment)? {
        pairs.push(parse_clause(&clause)?);
    }
    Ok(pairs)
}

/// Split a fragment on commas that are outside quoted strings.
fn split_clauses(fragment: &str) -> Result<Vec<String>, FieldParseError> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in fragment.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => {
                    clauses.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }
    if quote.is_some() {
        return Err(FieldParseError::UnterminatedString(fragment.to_string()));
    }
    clauses.push(current.trim().to_string());
    Ok(clauses)
}

/// Parse a single `key => literal` / `key: literal` clause.
fn parse_clause(clause: &str) -> Result<(String, Value), FieldParseError> {
    if clause.is_empty() {
        return Err(FieldParseError::EmptyClause);
    }
    let (raw_key, raw_value) = split_on_separator(clause)
        .ok_or_else(|| FieldParseError::MissingSeparator(clause.to_string()))?;
    let key = parse_key(raw_key.trim())?;
    let value = parse_literal(raw_value.trim())?;
    Ok((key, value))
}

/// Find the first `=>` (preferred) or `:` outside quoted text and split
/// there. `=>` is checked first so `key => value` never splits on a colon
/// inside the value.
fn split_on_separator(clause: &str) -> Option<(&str, &str)> {
    for sep in ["=>", ":"] {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, ch) in clause.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match quote {
                Some(q) => {
                    if ch == '\\' {
                        escaped = true;
                    } else if ch == q {
                        quote = None;
                    }
                }
                None => {
                    if ch == '\'' || ch == '"' {
                        quote = Some(ch);
                    } else if clause[i..].starts_with(sep) {
                        return Some((&clause[..i], &clause[i + sep.len()..]));
                    }
                }
            }
        }
    }
    None
}

/// Keys are bare identifiers (`[A-Za-z_][A-Za-z0-9_]*`) or quoted strings.
fn parse_key(raw: &str) -> Result<String, FieldParseError> {
    if raw.starts_with('\'') || raw.starts_with('"') {
        return match parse_quoted(raw) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(FieldParseError::BadKey(raw.to_string())),
        };
    }
    let mut chars = raw.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(raw.to_string())
    } else {
        Err(FieldParseError::BadKey(raw.to_string()))
    }
}

/// Literals are quoted strings, integers, floats, or booleans. Anything
/// else — including arrays, objects, and bare words — is rejected.
fn parse_literal(raw: &str) -> Result<Value, FieldParseError> {
    if raw.starts_with('\'') || raw.starts_with('"') {
        return parse_quoted(raw)
            .map(Value::String)
            .ok_or_else(|| FieldParseError::UnterminatedString(raw.to_string()));
    }
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::from(n));
    }
    if let Ok(n) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(n) {
            return Ok(Value::Number(number));
        }
    }
    Err(FieldParseError::BadLiteral(raw.to_string()))
}

/// Decode a single- or double-quoted string. `\n` and `\t` map to their
/// control characters; any other escaped character stands for itself.
/// Returns `None` on a missing or mismatched closing quote, or trailing
/// text after it.
fn parse_quoted(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let quote = chars.next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let mut out = String::new();
    let mut escaped = false;
    let mut closed = false;
    for ch in chars.by_ref() {
        if escaped {
            out.push(match ch {
                'n' => '\n',
                't' => '\t',
                other => other,
            });
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            closed = true;
            break;
        } else {
            out.push(ch);
        }
    }
    if !closed || escaped || chars.next().is_some() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one(fragment: &str) -> (String, Value) {
        let mut pairs = parse_fragment(fragment).unwrap();
        assert_eq!(pairs.len(), 1);
        pairs.remove(0)
    }

    #[test]
    fn arrow_clause() {
        assert_eq!(one("occurrences => 3"), ("occurrences".into(), json!(3)));
    }

    #[test]
    fn colon_clause() {
        assert_eq!(one("refresh: 1800"), ("refresh".into(), json!(1800)));
    }

    #[test]
    fn string_literals_both_quote_styles() {
        assert_eq!(one("team => 'platform'"), ("team".into(), json!("platform")));
        assert_eq!(one(r#"team => "platform""#), ("team".into(), json!("platform")));
    }

    #[test]
    fn boolean_and_float_literals() {
        assert_eq!(one("standalone => true"), ("standalone".into(), json!(true)));
        assert_eq!(one("paging => false"), ("paging".into(), json!(false)));
        assert_eq!(one("threshold => 0.75"), ("threshold".into(), json!(0.75)));
        assert_eq!(one("offset => -2"), ("offset".into(), json!(-2)));
    }

    #[test]
    fn quoted_key() {
        assert_eq!(one(r#""status" => 99"#), ("status".into(), json!(99)));
    }

    #[test]
    fn multiple_clauses_keep_order() {
        let pairs = parse_fragment("a => 1, b => 'two', c: false").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".into(), json!(1)),
                ("b".into(), json!("two")),
                ("c".into(), json!(false)),
            ]
        );
    }

    #[test]
    fn comma_inside_string_is_not_a_clause_break() {
        assert_eq!(one("note => 'a, b'"), ("note".into(), json!("a, b")));
    }

    #[test]
    fn colon_inside_string_value_with_arrow_separator() {
        assert_eq!(one("url => 'http://x:80'"), ("url".into(), json!("http://x:80")));
    }

    #[test]
    fn escapes_in_strings() {
        assert_eq!(one(r#"msg => "line1\nline2""#), ("msg".into(), json!("line1\nline2")));
        assert_eq!(one(r#"msg => "say \"hi\"""#), ("msg".into(), json!("say \"hi\"")));
    }

    #[test]
    fn rejects_empty_fragment() {
        assert_eq!(parse_fragment("").unwrap_err(), FieldParseError::EmptyClause);
        assert_eq!(parse_fragment("a => 1,").unwrap_err(), FieldParseError::EmptyClause);
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(matches!(
            parse_fragment("just_a_word").unwrap_err(),
            FieldParseError::MissingSeparator(_)
        ));
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(matches!(
            parse_fragment("1key => 2").unwrap_err(),
            FieldParseError::BadKey(_)
        ));
        assert!(matches!(
            parse_fragment("=> 2").unwrap_err(),
            FieldParseError::BadKey(_)
        ));
    }

    #[test]
    fn rejects_non_literal_values() {
        assert!(matches!(
            parse_fragment("a => [1, 2]").unwrap_err(),
            // '[1' is not a literal; the comma splits the rest off first.
            FieldParseError::BadLiteral(_)
        ));
        assert!(matches!(
            parse_fragment("a => bareword").unwrap_err(),
            FieldParseError::BadLiteral(_)
        ));
        assert!(matches!(
            parse_fragment("a => system('rm -rf /')").unwrap_err(),
            FieldParseError::BadLiteral(_)
        ));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(matches!(
            parse_fragment("a => 'oops").unwrap_err(),
            FieldParseError::UnterminatedString(_)
        ));
    }
}
