use super::{Fragment, Slot};
use crate::dialect::{Dialect, current_dialect};
use crate::error::{FragError, FragResult};
use crate::value::Value;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Rendered SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub text: String,
    pub values: Vec<Value>,
}

#[cfg(feature = "postgres")]
impl Rendered {
    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

/// Options for a single render call.
///
/// The default snapshots the process-wide dialect and renders as a root
/// fragment starting at placeholder 1, permissive about empty markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Dialect for placeholders and identifier quoting.
    pub dialect: Dialect,
    /// 1-based position of the first placeholder.
    pub start: usize,
    /// Collapse newline-plus-indentation runs into a single space.
    pub root: bool,
    /// Reject markers with empty mapping/list payloads.
    pub strict: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dialect: current_dialect(),
            start: 1,
            root: true,
            strict: false,
        }
    }
}

impl RenderOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with `dialect` regardless of the process-wide setting.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Number the first placeholder `start` (1-based).
    pub fn starting_at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Keep the text verbatim, as when this fragment is embedded in another.
    pub fn nested(mut self) -> Self {
        self.root = false;
        self
    }

    /// Fail on empty `values`/`set`/`expr`/`where`/`cols`/`spread`/`in` markers.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl Fragment {
    /// Render with the process-wide dialect, numbering from 1.
    pub fn render(&self) -> FragResult<Rendered> {
        self.render_with(&RenderOptions::default())
    }

    /// Render with the process-wide dialect, numbering from `start`.
    pub fn render_from(&self, start: usize) -> FragResult<Rendered> {
        self.render_with(&RenderOptions::default().starting_at(start))
    }

    /// Render as a nested child: numbering from `start`, whitespace untouched.
    pub fn render_nested(&self, start: usize) -> FragResult<Rendered> {
        self.render_with(&RenderOptions::default().starting_at(start).nested())
    }

    /// Render with explicit options.
    pub fn render_with(&self, options: &RenderOptions) -> FragResult<Rendered> {
        if options.start == 0 {
            return Err(FragError::configuration(
                "placeholder positions are 1-based; start must be >= 1",
            ));
        }

        let mut rendered = self.render_node(options, options.start)?;
        if options.root {
            rendered.text = collapse_newlines(&rendered.text);

            #[cfg(feature = "tracing")]
            tracing::trace!(
                target: "sqlfrag.render",
                dialect = %options.dialect,
                params = rendered.values.len(),
                sql = %rendered.text,
                "rendered fragment"
            );
        }
        Ok(rendered)
    }

    fn render_node(&self, options: &RenderOptions, start: usize) -> FragResult<Rendered> {
        let mut text = String::with_capacity(self.segments.iter().map(String::len).sum());
        let mut values = Vec::new();
        let mut offset = start;

        for (i, segment) in self.segments.iter().enumerate() {
            text.push_str(segment);

            let Some(slot) = self.slots.get(i) else {
                continue;
            };

            let expanded;
            let child = match slot {
                Slot::Value(value) => {
                    options.dialect.write_placeholder(offset, &mut text);
                    offset += 1;
                    values.push(value.clone());
                    continue;
                }
                Slot::Fragment(fragment) => fragment,
                Slot::Marker(marker) => {
                    if marker.is_empty() {
                        if options.strict {
                            return Err(FragError::validation(format!(
                                "empty `{}` marker",
                                marker.kind()
                            )));
                        }

                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            target: "sqlfrag.marker",
                            marker = marker.kind(),
                            "empty marker payload renders incomplete SQL"
                        );
                    }
                    expanded = marker.expand(options.dialect);
                    &expanded
                }
            };

            let inner = child.render_node(options, offset)?;
            text.push_str(&inner.text);
            offset += inner.values.len();
            values.extend(inner.values);
        }

        Ok(Rendered { text, values })
    }
}

fn collapse_newlines(text: &str) -> String {
    static NEWLINE_RUN: OnceLock<Regex> = OnceLock::new();
    let re = NEWLINE_RUN
        .get_or_init(|| Regex::new(r"\n\s*").expect("invalid built-in newline regex"));
    re.replace_all(text, " ").into_owned()
}
