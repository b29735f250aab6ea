//! Structured attributes attached to records and handlers.
//!
//! An [`Attr`] pairs a key with a [`Value`]. Values are either scalars that
//! render to text or a [`Value::Group`] holding further attributes, which is
//! how nested scopes are represented before flattening.

use std::fmt;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, SecondsFormat, Utc};

/// Value carried by an [`Attr`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(SystemTime),
    /// Nested attributes rendered under `parent.child` keys.
    Group(Vec<Attr>),
}

impl Value {
    /// Return `true` for group values.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Return `true` if the value carries nothing worth rendering.
    ///
    /// Only empty strings and groups without members are empty; zero numbers
    /// and `false` are meaningful values.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Group(attrs) => attrs.is_empty(),
            _ => false,
        }
    }

    /// Render a scalar to text. Groups render as `[k=v k=v]`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::Time(t) => {
                let t: DateTime<Utc> = (*t).into();
                f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{attr}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

value_from! {
    String => Str,
    i64 => Int,
    i32 => Int as i64,
    u64 => Uint,
    u32 => Uint as u64,
    usize => Uint as u64,
    f64 => Float,
    f32 => Float as f64,
    bool => Bool,
    Duration => Duration,
    SystemTime => Time,
    Vec<Attr> => Group,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

/// A key/value pair attached to a record or accumulated on a handler.
#[derive(Clone, Debug, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// Create an attribute from anything convertible into a [`Value`].
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a group attribute holding `attrs`.
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            key: key.into(),
            value: Value::Group(attrs),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
