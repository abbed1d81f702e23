//! SQL dialects: placeholder tokens and identifier quoting.
//!
//! A [`Dialect`] decides two things while a fragment renders:
//!
//! - the bind placeholder for a 1-based position (`$1` for Postgres, `?` for MySQL)
//! - how identifiers are quoted (`"name"` for Postgres, `` `name` `` for MySQL)
//!
//! # Active dialect
//!
//! [`Fragment::render`](crate::Fragment::render) uses a single process-wide
//! dialect, initialized to [`Dialect::Postgres`]. Change it once at startup with
//! [`set_dialect`], [`set_dialect_by_name`] or [`init_dialect_from_env`].
//!
//! This setting is global, not per request. Rendering under two different
//! dialects at the same time in one process is not supported through it; pass
//! the dialect explicitly with [`RenderOptions::with_dialect`](crate::RenderOptions::with_dialect)
//! instead.

use crate::error::{FragError, FragResult};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read by [`Dialect::from_env`].
pub const DIALECT_ENV: &str = "SQLFRAG_DIALECT";

/// A supported SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Dialect {
    /// PostgreSQL: `$1, $2, ...` placeholders, `"ident"` quoting.
    #[default]
    Postgres = 0,
    /// MySQL: `?` placeholders, `` `ident` `` quoting, dotted names split per segment.
    MySql = 1,
}

impl Dialect {
    /// Canonical short name (`pg` / `mysql`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Postgres => "pg",
            Self::MySql => "mysql",
        }
    }

    /// Identifier quote character.
    pub fn quote_char(self) -> char {
        match self {
            Self::Postgres => '"',
            Self::MySql => '`',
        }
    }

    /// Placeholder token for the given 1-based position.
    pub fn placeholder(self, position: usize) -> String {
        let mut out = String::new();
        self.write_placeholder(position, &mut out);
        out
    }

    pub(crate) fn write_placeholder(self, position: usize, out: &mut String) {
        match self {
            Self::Postgres => {
                use std::fmt::Write;
                let _ = write!(out, "${position}");
            }
            Self::MySql => out.push('?'),
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    ///
    /// MySQL additionally closes and reopens the quote around every `.`, so
    /// `db.users` becomes `` `db`.`users` ``. Postgres keeps the dot inside a
    /// single quoted identifier.
    pub fn quote_identifier(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_identifier(name, &mut out);
        out
    }

    pub(crate) fn write_identifier(self, name: &str, out: &mut String) {
        let quote = self.quote_char();
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
                out.push(quote);
            } else if ch == '.' && self == Self::MySql {
                out.push(quote);
                out.push('.');
                out.push(quote);
            } else {
                out.push(ch);
            }
        }
        out.push(quote);
    }

    /// Read the dialect from `SQLFRAG_DIALECT`.
    ///
    /// Returns `Ok(None)` when the variable is unset or empty.
    pub fn from_env() -> FragResult<Option<Self>> {
        match std::env::var(DIALECT_ENV) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => raw.parse().map(Some),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(FragError::configuration(format!("{DIALECT_ENV}: {e}"))),
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::MySql,
            _ => Self::Postgres,
        }
    }
}

impl FromStr for Dialect {
    type Err = FragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pg" | "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            other => Err(FragError::configuration(format!(
                "unknown dialect '{other}' (expected one of: pg, postgres, postgresql, mysql)"
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static ACTIVE: AtomicU8 = AtomicU8::new(Dialect::Postgres as u8);

/// The process-wide active dialect.
pub fn current_dialect() -> Dialect {
    Dialect::from_u8(ACTIVE.load(Ordering::Relaxed))
}

/// Replace the process-wide active dialect, returning the previous one.
pub fn set_dialect(dialect: Dialect) -> Dialect {
    let previous = Dialect::from_u8(ACTIVE.swap(dialect as u8, Ordering::Relaxed));

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "sqlfrag.dialect", %previous, current = %dialect, "active dialect changed");

    previous
}

/// Parse `name` and make it the process-wide active dialect.
pub fn set_dialect_by_name(name: &str) -> FragResult<Dialect> {
    let dialect: Dialect = name.parse()?;
    set_dialect(dialect);
    Ok(dialect)
}

/// Apply `SQLFRAG_DIALECT` to the process-wide setting, if present.
///
/// Returns the dialect that is active afterwards.
pub fn init_dialect_from_env() -> FragResult<Dialect> {
    if let Some(dialect) = Dialect::from_env()? {
        set_dialect(dialect);
    }
    Ok(current_dialect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_placeholders_embed_position() {
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Postgres.placeholder(12), "$12");
    }

    #[test]
    fn mysql_placeholders_are_positional() {
        assert_eq!(Dialect::MySql.placeholder(1), "?");
        assert_eq!(Dialect::MySql.placeholder(7), "?");
    }

    #[test]
    fn postgres_quote_doubles_embedded_quotes() {
        assert_eq!(Dialect::Postgres.quote_identifier("users"), r#""users""#);
        assert_eq!(Dialect::Postgres.quote_identifier(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn postgres_quote_keeps_dots_inside() {
        assert_eq!(Dialect::Postgres.quote_identifier("a.b"), r#""a.b""#);
    }

    #[test]
    fn mysql_quote_splits_dotted_names() {
        assert_eq!(Dialect::MySql.quote_identifier("a.b"), "`a`.`b`");
        assert_eq!(Dialect::MySql.quote_identifier("db.t.c"), "`db`.`t`.`c`");
    }

    #[test]
    fn mysql_quote_doubles_backticks() {
        assert_eq!(Dialect::MySql.quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn parses_known_names() {
        assert_eq!("pg".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!(" mysql ".parse::<Dialect>().unwrap(), Dialect::MySql);
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Dialect::Postgres.to_string(), "pg");
        assert_eq!(Dialect::MySql.to_string(), "mysql");
    }
}
