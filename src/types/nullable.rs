//! # Nullable Values
//!
//! `Nullable<T>` is a tagged optional: `Null` or `Value(T)`. Two nullables
//! are equal when both are null, or both hold equal values. Typed accessors
//! return it so callers cannot read a null column's dead slot by accident.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    Null,
    Value(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Nullable::Null
    }
}

impl<T> Nullable<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Nullable::Null => None,
            Nullable::Value(v) => Some(v),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Null => None,
            Nullable::Value(v) => Some(v),
        }
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Null => Nullable::Null,
            Nullable::Value(v) => Nullable::Value(v),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Nullable<U> {
        match self {
            Nullable::Null => Nullable::Null,
            Nullable::Value(v) => Nullable::Value(f(v)),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Nullable::Value(v),
            None => Nullable::Null,
        }
    }
}

impl<T> From<Nullable<T>> for Option<T> {
    fn from(value: Nullable<T>) -> Self {
        value.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_treats_nulls_as_equal() {
        assert_eq!(Nullable::<i32>::Null, Nullable::Null);
        assert_eq!(Nullable::Value(3), Nullable::Value(3));
        assert_ne!(Nullable::Value(3), Nullable::Null);
        assert_ne!(Nullable::Value(3), Nullable::Value(4));
    }

    #[test]
    fn converts_to_and_from_option() {
        let n: Nullable<&str> = Some("ab").into();
        assert_eq!(n.value(), Some(&"ab"));
        let o: Option<i64> = Nullable::<i64>::Null.into();
        assert_eq!(o, None);
        assert!(Nullable::<u8>::default().is_null());
    }
}
