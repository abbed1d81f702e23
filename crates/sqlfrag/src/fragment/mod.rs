//! Fragments: literal text segments interleaved with slots.
//!
//! A [`Fragment`] holds `n + 1` text segments around `n` [`Slot`]s. Rendering
//! walks the tree, replacing every scalar with a placeholder and inlining
//! nested fragments and expanded markers, so placeholders are numbered
//! consecutively across the whole tree.
//!
//! # Example
//!
//! ```ignore
//! use sqlfrag::{Marker, sql};
//!
//! let filter = sql!("status = ", "active", "");
//! let q = sql!(
//!     "SELECT * FROM ", Marker::name("users"), " WHERE ", filter, " AND id ", Marker::in_list([1, 2, 3]), ""
//! );
//!
//! let rendered = q.render()?;
//! // SELECT * FROM "users" WHERE status = $1 AND id IN ($2, $3, $4)
//! ```

mod render;


pub use render::{RenderOptions, Rendered};

use crate::error::{FragError, FragResult};
use crate::marker::{self, Marker};
use crate::value::Value;

/// What fills the gap between two text segments.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Bound through a placeholder.
    Value(Value),
    /// Rendered inline, sharing the parent's placeholder numbering.
    Fragment(Fragment),
    /// Expanded into a fragment at render time.
    Marker(Marker),
}

impl Slot {
    /// Convert a JSON value into a slot, recognizing marker objects.
    ///
    /// Objects carrying a reserved key from [`MARKER_KEYS`](crate::MARKER_KEYS)
    /// become [`Slot::Marker`]; the first key in priority order wins. Any other
    /// JSON value is bound as a scalar.
    pub fn from_json(value: serde_json::Value) -> FragResult<Self> {
        match value {
            serde_json::Value::Object(mut object) => match marker::recognized_key(&object) {
                Some(key) => {
                    let payload = object.remove(key).unwrap_or(serde_json::Value::Null);
                    Marker::from_json_payload(key, payload).map(Slot::Marker)
                }
                None => Ok(Slot::Value(Value::Json(serde_json::Value::Object(object)))),
            },
            other => Ok(Slot::Value(Value::from(other))),
        }
    }
}

impl From<Value> for Slot {
    fn from(v: Value) -> Self {
        Slot::Value(v)
    }
}

impl From<Fragment> for Slot {
    fn from(f: Fragment) -> Self {
        Slot::Fragment(f)
    }
}

impl From<Marker> for Slot {
    fn from(m: Marker) -> Self {
        Slot::Marker(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Slot {
    fn from(v: Option<T>) -> Self {
        Slot::Value(Value::from(v))
    }
}

macro_rules! impl_slot_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Slot {
                fn from(v: $ty) -> Self {
                    Slot::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_slot_from_scalar!(
    bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String, &String, Vec<u8>, &[u8]
);

impl From<&str> for Slot {
    fn from(v: &str) -> Self {
        Slot::Value(Value::from(v))
    }
}

/// An immutable piece of SQL: text segments interleaved with slots.
///
/// `segments.len() == slots.len() + 1` always holds; `slots[i]` renders
/// between `segments[i]` and `segments[i + 1]`. Cloning gives an independent
/// copy; use [`Fragment::into_parts`] and [`sql`] to build a modified one.
#[derive(Debug, Clone)]
#[must_use]
pub struct Fragment {
    segments: Vec<String>,
    slots: Vec<Slot>,
}

/// Build a fragment from literal segments and the slots between them.
///
/// Fails with [`FragError::ShapeMismatch`] unless there is exactly one more
/// segment than slots.
pub fn sql<S>(segments: impl IntoIterator<Item = S>, slots: Vec<Slot>) -> FragResult<Fragment>
where
    S: Into<String>,
{
    let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
    if segments.len() != slots.len() + 1 {
        return Err(FragError::ShapeMismatch {
            segments: segments.len(),
            slots: slots.len(),
        });
    }
    Ok(Fragment { segments, slots })
}

impl Fragment {
    /// A text-only fragment (no slots).
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            segments: vec![text.into()],
            slots: Vec::new(),
        }
    }

    /// An empty fragment; renders to `""`.
    pub fn empty() -> Self {
        Self::raw(String::new())
    }

    /// Callers guarantee `segments.len() == slots.len() + 1`.
    #[doc(hidden)]
    pub fn from_parts_unchecked(segments: Vec<String>, slots: Vec<Slot>) -> Self {
        debug_assert_eq!(segments.len(), slots.len() + 1);
        Self { segments, slots }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of scalar slots held directly (nested fragments and markers not counted).
    pub fn param_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Value(_)))
            .count()
    }

    /// Take the segments and slots apart.
    pub fn into_parts(self) -> (Vec<String>, Vec<Slot>) {
        (self.segments, self.slots)
    }
}

/// Build a [`Fragment`] from alternating literals and slot expressions.
///
/// The list starts and ends with a string literal, so the segment/slot shape
/// always holds. Every expression is converted with `Slot::from`.
///
/// ```ignore
/// let q = sqlfrag::sql!("SELECT * FROM t WHERE id = ", id, " AND kind = ", kind, "");
/// ```
#[macro_export]
macro_rules! sql {
    ($first:literal $(, $slot:expr, $seg:literal)*) => {
        $crate::Fragment::from_parts_unchecked(
            ::std::vec![
                ::std::string::String::from($first)
                $(, ::std::string::String::from($seg))*
            ],
            ::std::vec![$($crate::Slot::from($slot)),*],
        )
    };
}
