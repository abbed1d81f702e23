//! # sqlfrag
//!
//! Composable SQL fragments that render to parameterized queries.
//!
//! A [`Fragment`] is literal SQL text interleaved with slots. Rendering turns
//! every scalar slot into a dialect placeholder and collects its value, so user
//! data never lands in the SQL text.
//!
//! ## Features
//!
//! - **Nesting**: fragments embed in fragments; placeholders stay consecutive across the tree
//! - **Markers**: `VALUES`, `SET`, `WHERE`, column lists, `IN (...)` and identifiers from plain data
//! - **Dialects**: Postgres (`$1`) and MySQL (`?`), selected globally or per render
//! - **Data-driven**: JSON objects with `$set`, `$where`, ... keys become markers via [`Slot::from_json`]
//!
//! ## Example
//!
//! ```ignore
//! use sqlfrag::{Fields, Marker, sql};
//!
//! let changes = Fields::new().field("status", "inactive").field("score", 0);
//! let q = sql!(
//!     "UPDATE ", Marker::name("users"), " ", Marker::set(changes),
//!     " WHERE id ", Marker::in_list([1, 2, 3]), ""
//! );
//!
//! let rendered = q.render()?;
//! assert_eq!(
//!     rendered.text,
//!     r#"UPDATE "users" SET "status" = $1, "score" = $2 WHERE id IN ($3, $4, $5)"#
//! );
//! ```
//!
//! ## Dialect selection
//!
//! [`Fragment::render`] reads the process-wide dialect ([`set_dialect`],
//! [`init_dialect_from_env`]). That setting is shared by the whole process;
//! code that renders for more than one dialect at a time should pass
//! [`RenderOptions::with_dialect`] to [`Fragment::render_with`] instead.

pub mod dialect;
pub mod error;
pub mod fields;
pub mod fragment;
pub mod marker;
pub mod value;

pub use dialect::{
    DIALECT_ENV, Dialect, current_dialect, init_dialect_from_env, set_dialect, set_dialect_by_name,
};
pub use error::{FragError, FragResult};
pub use fields::Fields;
pub use fragment::{Fragment, RenderOptions, Rendered, Slot, sql};
pub use marker::{MARKER_KEYS, Marker};
pub use value::Value;
