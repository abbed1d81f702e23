//! Markers: slot values that expand into SQL structure instead of binding.
//!
//! A [`Marker`] placed in a fragment slot is expanded into a child
//! [`Fragment`] at render time. Each expansion is pure; only identifier quoting
//! depends on the dialect being rendered.
//!
//! | Marker | Renders as |
//! |---|---|
//! | [`Marker::values`] | `("a", "b") VALUES ($1, $2)` |
//! | [`Marker::set`] | `SET "a" = $1, "b" = $2` |
//! | [`Marker::expr`] | `("a" = $1 AND "b" = $2)` |
//! | [`Marker::where_clause`] | `WHERE ("a" = $1 AND "b" = $2)` |
//! | [`Marker::cols`] | `"a", "b"` |
//! | [`Marker::json`] | the JSON text itself, inlined |
//! | [`Marker::spread`] | `$1, $2, $3` |
//! | [`Marker::in_list`] | `IN ($1, $2, $3)` |
//! | [`Marker::name`] | `"users"` |
//!
//! # Marker objects in JSON
//!
//! [`Slot::from_json`] recognizes objects carrying one of the reserved keys in
//! [`MARKER_KEYS`]. When an object carries several, the first key in that list
//! wins. Objects with none of them are bound as opaque JSON values.

use crate::dialect::Dialect;
use crate::error::{FragError, FragResult};
use crate::fields::Fields;
use crate::fragment::{Fragment, Slot};
use serde::Serialize;

/// Reserved marker keys, in recognition priority order.
pub const MARKER_KEYS: [&str; 9] = [
    "$vals", "$expr", "$where", "$set", "$cols", "$json", "$spread", "$in", "$name",
];

/// A structural slot value, expanded into a [`Fragment`] at render time.
#[derive(Debug, Clone)]
pub enum Marker {
    /// `(cols) VALUES (placeholders)` for an INSERT.
    ValuesInsert(Fields),
    /// Parenthesized equality conditions joined by `AND`.
    Expr(Fields),
    /// `WHERE` followed by an [`Marker::Expr`] over the same fields.
    Where(Fields),
    /// `SET col = value, ...` for an UPDATE.
    Set(Fields),
    /// Comma-separated quoted column names.
    Cols(Vec<String>),
    /// JSON literal inlined into the SQL text. Never parameterized: only use
    /// with values that are safe to embed.
    Json(serde_json::Value),
    /// Comma-separated placeholders, no surrounding punctuation.
    Spread(Vec<Slot>),
    /// `IN (...)` around a spread.
    In(Vec<Slot>),
    /// A single quoted identifier.
    Name(String),
}

impl Marker {
    /// `(cols) VALUES (...)` from an ordered row.
    pub fn values(row: impl Into<Fields>) -> Self {
        Self::ValuesInsert(row.into())
    }

    /// `(a = $1 AND b = $2)`.
    pub fn expr(conditions: impl Into<Fields>) -> Self {
        Self::Expr(conditions.into())
    }

    /// `WHERE (a = $1 AND b = $2)`.
    pub fn where_clause(conditions: impl Into<Fields>) -> Self {
        Self::Where(conditions.into())
    }

    /// `SET a = $1, b = $2`.
    pub fn set(assignments: impl Into<Fields>) -> Self {
        Self::Set(assignments.into())
    }

    /// Quoted column list.
    pub fn cols<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Cols(columns.into_iter().map(Into::into).collect())
    }

    /// Quoted column list taken from the keys of `fields`.
    pub fn cols_of(fields: &Fields) -> Self {
        Self::cols(fields.keys())
    }

    /// Inline the JSON serialization of `value` as SQL text.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> FragResult<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Comma-separated placeholders for every item.
    pub fn spread<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Slot>,
    {
        Self::Spread(items.into_iter().map(Into::into).collect())
    }

    /// `IN (...)` over every item.
    pub fn in_list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Slot>,
    {
        Self::In(items.into_iter().map(Into::into).collect())
    }

    /// A quoted identifier (table, column, schema-qualified name).
    pub fn name(ident: impl Into<String>) -> Self {
        Self::Name(ident.into())
    }

    /// Short name of this marker kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValuesInsert(_) => "values",
            Self::Expr(_) => "expr",
            Self::Where(_) => "where",
            Self::Set(_) => "set",
            Self::Cols(_) => "cols",
            Self::Json(_) => "json",
            Self::Spread(_) => "spread",
            Self::In(_) => "in",
            Self::Name(_) => "name",
        }
    }

    /// `true` when a mapping or list payload has no entries.
    ///
    /// Such markers still render, but usually into broken SQL (`SET `, `IN ()`).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::ValuesInsert(f) | Self::Expr(f) | Self::Where(f) | Self::Set(f) => f.is_empty(),
            Self::Cols(c) => c.is_empty(),
            Self::Spread(items) | Self::In(items) => items.is_empty(),
            Self::Json(_) | Self::Name(_) => false,
        }
    }

    /// Expand into the fragment this marker stands for.
    pub fn expand(&self, dialect: Dialect) -> Fragment {
        match self {
            Self::ValuesInsert(fields) => expand_values(fields, dialect),
            Self::Expr(fields) => expand_expr(fields, dialect),
            Self::Where(fields) => wrap(expand_expr(fields, dialect), "WHERE ", ""),
            Self::Set(fields) => expand_set(fields, dialect),
            Self::Cols(columns) => {
                Fragment::raw(quote_list(columns.iter().map(String::as_str), dialect))
            }
            Self::Json(value) => Fragment::raw(value.to_string()),
            Self::Spread(items) => expand_spread(items),
            Self::In(items) => wrap(expand_spread(items), "IN (", ")"),
            Self::Name(ident) => Fragment::raw(dialect.quote_identifier(ident)),
        }
    }

    /// Build a marker from a reserved key and its JSON payload.
    pub(crate) fn from_json_payload(key: &str, payload: serde_json::Value) -> FragResult<Self> {
        match key {
            "$vals" => fields_payload("values", payload).map(Self::ValuesInsert),
            "$expr" => fields_payload("expr", payload).map(Self::Expr),
            "$where" => fields_payload("where", payload).map(Self::Where),
            "$set" => fields_payload("set", payload).map(Self::Set),
            "$cols" => cols_payload(payload).map(Self::Cols),
            "$json" => Ok(Self::Json(payload)),
            "$spread" => list_payload(payload).map(Self::Spread),
            "$in" => list_payload(payload).map(Self::In),
            "$name" => match payload {
                serde_json::Value::String(s) => Ok(Self::Name(s)),
                other => Err(FragError::invalid_marker(
                    "name",
                    format!("expected a string, got {}", json_type(&other)),
                )),
            },
            other => Err(FragError::invalid_marker(
                "unknown",
                format!("'{other}' is not a marker key"),
            )),
        }
    }
}

/// First reserved key present on `object` with a truthy payload.
pub(crate) fn recognized_key(
    object: &serde_json::Map<String, serde_json::Value>,
) -> Option<&'static str> {
    MARKER_KEYS
        .into_iter()
        .find(|key| object.get(*key).is_some_and(is_truthy))
}

/// `null`, `false`, zero and `""` do not mark anything; empty arrays and
/// objects do.
fn is_truthy(payload: &serde_json::Value) -> bool {
    match payload {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Prepend `prefix` to the first segment and append `suffix` to the last.
fn wrap(fragment: Fragment, prefix: &str, suffix: &str) -> Fragment {
    let (mut segments, slots) = fragment.into_parts();
    if let Some(first) = segments.first_mut() {
        first.insert_str(0, prefix);
    }
    if let Some(last) = segments.last_mut() {
        last.push_str(suffix);
    }
    Fragment::from_parts_unchecked(segments, slots)
}

fn quote_list<'a>(names: impl Iterator<Item = &'a str>, dialect: Dialect) -> String {
    let mut out = String::new();
    for (i, name) in names.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        dialect.write_identifier(name, &mut out);
    }
    out
}

fn expand_values(fields: &Fields, dialect: Dialect) -> Fragment {
    let mut head = String::from("(");
    head.push_str(&quote_list(fields.keys(), dialect));
    head.push_str(") VALUES (");

    if fields.is_empty() {
        head.push(')');
        return Fragment::raw(head);
    }

    let mut segments = Vec::with_capacity(fields.len() + 1);
    segments.push(head);
    segments.extend((1..fields.len()).map(|_| ", ".to_string()));
    segments.push(")".to_string());

    let slots = fields.iter().map(|(_, v)| v.clone()).collect();
    Fragment::from_parts_unchecked(segments, slots)
}

fn expand_set(fields: &Fields, dialect: Dialect) -> Fragment {
    if fields.is_empty() {
        return Fragment::raw("SET ");
    }

    let mut segments = Vec::with_capacity(fields.len() + 1);
    let mut slots = Vec::with_capacity(fields.len());
    for (i, (key, value)) in fields.iter().enumerate() {
        let mut seg = String::from(if i > 0 { ", " } else { "SET " });
        dialect.write_identifier(key, &mut seg);
        seg.push_str(" = ");
        segments.push(seg);
        slots.push(value.clone());
    }
    segments.push(String::new());
    Fragment::from_parts_unchecked(segments, slots)
}

fn expand_expr(fields: &Fields, dialect: Dialect) -> Fragment {
    if fields.is_empty() {
        return Fragment::raw("()");
    }

    let mut segments = Vec::with_capacity(fields.len() + 1);
    let mut slots = Vec::with_capacity(fields.len());
    for (i, (key, value)) in fields.iter().enumerate() {
        let mut seg = String::from(if i > 0 { " AND " } else { "(" });
        dialect.write_identifier(key, &mut seg);
        seg.push_str(" = ");
        segments.push(seg);
        slots.push(value.clone());
    }
    segments.push(")".to_string());
    Fragment::from_parts_unchecked(segments, slots)
}

fn expand_spread(items: &[Slot]) -> Fragment {
    let mut segments = Vec::with_capacity(items.len() + 1);
    segments.push(String::new());
    segments.extend((1..items.len()).map(|_| ", ".to_string()));
    if !items.is_empty() {
        segments.push(String::new());
    }
    Fragment::from_parts_unchecked(segments, items.to_vec())
}

fn fields_payload(marker: &'static str, payload: serde_json::Value) -> FragResult<Fields> {
    match payload {
        serde_json::Value::Object(object) => {
            let mut fields = Fields::new();
            for (key, value) in object {
                fields.insert(key, Slot::from_json(value)?);
            }
            Ok(fields)
        }
        other => Err(FragError::invalid_marker(
            marker,
            format!("expected an object, got {}", json_type(&other)),
        )),
    }
}

fn cols_payload(payload: serde_json::Value) -> FragResult<Vec<String>> {
    match payload {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Ok(s),
                other => Err(FragError::invalid_marker(
                    "cols",
                    format!("column names must be strings, got {}", json_type(&other)),
                )),
            })
            .collect(),
        serde_json::Value::Object(object) => Ok(object.into_iter().map(|(k, _)| k).collect()),
        other => Err(FragError::invalid_marker(
            "cols",
            format!("expected an array or object, got {}", json_type(&other)),
        )),
    }
}

fn list_payload(payload: serde_json::Value) -> FragResult<Vec<Slot>> {
    match payload {
        serde_json::Value::Array(items) => items.into_iter().map(Slot::from_json).collect(),
        single => Ok(vec![Slot::from_json(single)?]),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
