//! Scalar bind values.
//!
//! Every [`Value`] in a fragment is replaced by a placeholder and returned in
//! [`Rendered::values`](crate::Rendered::values); none of them ever reaches the
//! SQL text.

use serde::Serialize;

/// A scalar value bound out-of-band to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Text.
    Text(String),
    /// Binary buffer.
    Bytes(Vec<u8>),
    /// Opaque JSON document (arrays, objects, unrecognized marker objects).
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Plain conversion: no marker recognition happens here, see
/// [`Slot::from_json`](crate::Slot::from_json) for that.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Json(serde_json::Value::Number(n)), Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Json(other),
        }
    }
}

#[cfg(feature = "postgres")]
mod pg {
    use super::Value;
    use bytes::BytesMut;
    use std::error::Error;
    use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

    impl ToSql for Value {
        fn to_sql(
            &self,
            ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
            match self {
                Value::Null => Ok(IsNull::Yes),
                Value::Bool(b) => b.to_sql_checked(ty, out),
                Value::Int(i) => match *ty {
                    Type::INT2 => i16::try_from(*i)?.to_sql_checked(ty, out),
                    Type::INT4 => i32::try_from(*i)?.to_sql_checked(ty, out),
                    Type::FLOAT4 => (*i as f32).to_sql_checked(ty, out),
                    Type::FLOAT8 => (*i as f64).to_sql_checked(ty, out),
                    _ => i.to_sql_checked(ty, out),
                },
                Value::Float(f) => match *ty {
                    Type::FLOAT4 => (*f as f32).to_sql_checked(ty, out),
                    _ => f.to_sql_checked(ty, out),
                },
                Value::Text(s) => s.to_sql_checked(ty, out),
                Value::Bytes(b) => b.to_sql_checked(ty, out),
                Value::Json(j) => j.to_sql_checked(ty, out),
            }
        }

        // NULL binds to any type; every other variant is checked against `ty`
        // by the inner `to_sql_checked`.
        fn accepts(_ty: &Type) -> bool {
            true
        }

        to_sql_checked!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_primitives() {
        assert_eq!(Value::from(7_i32), Value::Int(7));
        assert_eq!(Value::from(7_u8), Value::Int(7));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(1.5_f64), Value::Float(1.5));
        assert_eq!(Value::from("x"), Value::Text("x".into()));
        assert_eq!(Value::from(vec![1_u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn option_none_is_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("a")), Value::Text("a".into()));
    }

    #[test]
    fn from_json_scalars_and_documents() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(3)), Value::Int(3));
        assert_eq!(Value::from(json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from(json!("s")), Value::Text("s".into()));
        assert_eq!(Value::from(json!([1, 2])), Value::Json(json!([1, 2])));
        assert_eq!(Value::from(json!({"a": 1})), Value::Json(json!({"a": 1})));
    }

    #[test]
    fn serializes_as_plain_json() {
        let values = vec![
            Value::Null,
            Value::Int(1),
            Value::Text("a".into()),
            Value::Json(json!({"k": true})),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,1,"a",{"k":true}]"#
        );
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn to_sql_narrows_integers_for_int4() {
        use bytes::BytesMut;
        use tokio_postgres::types::{IsNull, ToSql, Type};

        let mut buf = BytesMut::new();
        let is_null = Value::Int(5).to_sql(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], &5_i32.to_be_bytes());

        let mut buf = BytesMut::new();
        assert!(Value::Int(i64::MAX).to_sql(&Type::INT2, &mut buf).is_err());
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn to_sql_null_for_any_type() {
        use bytes::BytesMut;
        use tokio_postgres::types::{IsNull, ToSql, Type};

        let mut buf = BytesMut::new();
        let is_null = Value::Null.to_sql(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn to_sql_widens_integers_for_float8() {
        use bytes::BytesMut;
        use tokio_postgres::types::{ToSql, Type};

        let mut buf = BytesMut::new();
        Value::Int(5).to_sql_checked(&Type::FLOAT8, &mut buf).unwrap();
        assert_eq!(&buf[..], &5.0_f64.to_be_bytes());

        let mut buf = BytesMut::new();
        Value::Int(5).to_sql_checked(&Type::FLOAT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &5.0_f32.to_be_bytes());
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn to_sql_rejects_mismatched_types() {
        use bytes::BytesMut;
        use tokio_postgres::types::{ToSql, Type};

        let mut buf = BytesMut::new();
        assert!(Value::Text("abc".into()).to_sql_checked(&Type::INT8, &mut buf).is_err());
        assert!(Value::Bool(true).to_sql_checked(&Type::INT4, &mut buf).is_err());
        assert!(Value::Float(1.5).to_sql_checked(&Type::INT8, &mut buf).is_err());
        assert!(Value::Bytes(vec![1]).to_sql_checked(&Type::TEXT, &mut buf).is_err());
        assert!(Value::Json(json!({"a": 1})).to_sql_checked(&Type::INT4, &mut buf).is_err());
        assert!(buf.is_empty());

        assert!(Value::Text("abc".into()).to_sql_checked(&Type::TEXT, &mut buf).is_ok());
        assert_eq!(&buf[..], b"abc");
    }
}
