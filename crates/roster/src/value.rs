//! Bound parameter values.
//!
//! Statements built by [`Sql`](crate::Sql) carry their parameters as
//! [`Value`]s rather than opaque `dyn ToSql` objects, so a built statement can
//! be compared and cloned.

use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};

/// A single bindable parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i32),
    Float(f64),
}

impl Value {
    /// Whether this value can be written into a column of type `ty`.
    pub fn fits(&self, ty: &Type) -> bool {
        match self {
            Self::Text(_) => <String as ToSql>::accepts(ty),
            Self::Int(_) => *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8,
            Self::Float(_) => *ty == Type::FLOAT4 || *ty == Type::FLOAT8,
        }
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if !self.fits(ty) {
            return Err(Box::new(WrongType::new::<Value>(ty.clone())));
        }
        match self {
            Self::Text(s) => s.to_sql(ty, out),
            Self::Int(v) if *ty == Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
            Self::Int(v) if *ty == Type::INT8 => i64::from(*v).to_sql(ty, out),
            Self::Int(v) => v.to_sql(ty, out),
            // REAL columns hold single precision.
            Self::Float(v) if *ty == Type::FLOAT4 => (*v as f32).to_sql(ty, out),
            Self::Float(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || *ty == Type::INT2
            || *ty == Type::INT4
            || *ty == Type::INT8
            || *ty == Type::FLOAT4
            || *ty == Type::FLOAT8
    }

    to_sql_checked!();
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_narrows_for_real_columns() {
        let mut buf = BytesMut::new();
        Value::Float(88.5).to_sql(&Type::FLOAT4, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        Value::Float(88.5).to_sql(&Type::FLOAT8, &mut buf).unwrap();
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn int_widens_for_bigint_columns() {
        let mut buf = BytesMut::new();
        Value::Int(7).to_sql(&Type::INT8, &mut buf).unwrap();
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn int_overflowing_smallint_is_an_error() {
        let mut buf = BytesMut::new();
        assert!(Value::Int(70_000).to_sql(&Type::INT2, &mut buf).is_err());
    }

    #[test]
    fn mismatched_column_type_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(Value::from("Alice").to_sql(&Type::INT4, &mut buf).is_err());
        assert!(Value::Int(1).to_sql(&Type::TEXT, &mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn accepts_union_of_variants() {
        assert!(<Value as ToSql>::accepts(&Type::VARCHAR));
        assert!(<Value as ToSql>::accepts(&Type::FLOAT4));
        assert!(!<Value as ToSql>::accepts(&Type::BOOL));
    }
}
