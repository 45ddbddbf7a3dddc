//! Read-only navigation over arbitrary data.
//!
//! Anything that can be walked by path implements [`Node`] and reports one
//! of four shapes. The accessor, the flattener and the getter sources only
//! ever look at data through this trait.

use crate::record::Record;
use crate::value::{Document, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A scalar leaf, borrowed from the node that reported it.
#[derive(Clone, Copy)]
pub enum Scalar<'a> {
    /// No value: `None`, `null`, `()`.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    /// A value that renders itself as text.
    Display(&'a dyn fmt::Display),
}

/// The four shapes a node can have.
pub enum Shape<'a> {
    Scalar(Scalar<'a>),
    Map(&'a dyn MapNode),
    Seq(&'a dyn SeqNode),
    Record(&'a dyn Record),
}

pub trait Node {
    fn shape(&self) -> Shape<'_>;
}

/// Key type of a mapping. Only string-like keys can be addressed by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    String,
    Other(&'static str),
}

pub trait MapNode {
    fn key_kind(&self) -> KeyKind;

    fn entry(&self, key: &str) -> Option<&dyn Node>;

    /// All entries, in ascending key order.
    fn entries(&self) -> Vec<(String, &dyn Node)>;
}

pub trait SeqNode {
    fn len(&self) -> usize;

    fn element(&self, index: usize) -> Option<&dyn Node>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Materializing ──────────────────────────────────────────────────

/// Copy any node into an owned `Value`.
///
/// Record fields are keyed by their alias when they have one, otherwise by
/// their name. Self-rendering scalars become strings.
pub fn to_value(node: &dyn Node) -> Value {
    match node.shape() {
        Shape::Scalar(scalar) => match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::Int(i),
            Scalar::Float(n) => Value::Float(n),
            Scalar::Str(s) => Value::String(s.to_string()),
            Scalar::Display(d) => Value::String(d.to_string()),
        },
        Shape::Map(map) => Value::Map(
            map.entries()
                .into_iter()
                .map(|(key, child)| (key, to_value(child)))
                .collect(),
        ),
        Shape::Seq(seq) => Value::List(
            (0..seq.len())
                .filter_map(|i| seq.element(i))
                .map(to_value)
                .collect(),
        ),
        Shape::Record(record) => {
            let mut out = Document::new();
            for field in record.fields() {
                let key = field.alias.unwrap_or(field.name);
                out.insert(key.to_string(), to_value(field.value));
            }
            Value::Map(out)
        }
    }
}

// ── Dynamic values ─────────────────────────────────────────────────

impl Node for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Scalar(Scalar::Null),
            Value::Bool(b) => Shape::Scalar(Scalar::Bool(*b)),
            Value::Int(i) => Shape::Scalar(Scalar::Int(*i)),
            Value::Float(n) => Shape::Scalar(Scalar::Float(*n)),
            Value::String(s) => Shape::Scalar(Scalar::Str(s)),
            Value::List(items) => Shape::Seq(items),
            Value::Map(entries) => Shape::Map(entries),
        }
    }
}

// ── Scalars ────────────────────────────────────────────────────────

impl Node for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

macro_rules! node_int {
    ($($t:ty),*) => {$(
        impl Node for $t {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(Scalar::Int(i64::from(*self)))
            }
        }
    )*};
}

node_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! node_wide_int {
    ($($t:ty),*) => {$(
        impl Node for $t {
            fn shape(&self) -> Shape<'_> {
                match i64::try_from(*self) {
                    Ok(i) => Shape::Scalar(Scalar::Int(i)),
                    Err(_) => Shape::Scalar(Scalar::Float(*self as f64)),
                }
            }
        }
    )*};
}

node_wide_int!(u64, usize, isize);

impl Node for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl Node for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(*self))
    }
}

impl Node for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }
}

impl Node for &'static str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }
}

impl Node for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Display(self))
    }
}

impl Node for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Null)
    }
}

// ── Wrappers ───────────────────────────────────────────────────────

impl<T: Node> Node for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(inner) => inner.shape(),
            None => Shape::Scalar(Scalar::Null),
        }
    }
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

// ── Sequences ──────────────────────────────────────────────────────

impl<T: Node> SeqNode for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Node> {
        self.get(index).map(|n| n as &dyn Node)
    }
}

impl<T: Node> Node for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self)
    }
}

impl<T: Node, const N: usize> SeqNode for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element(&self, index: usize) -> Option<&dyn Node> {
        self.get(index).map(|n| n as &dyn Node)
    }
}

impl<T: Node, const N: usize> Node for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self)
    }
}

// ── Mappings ───────────────────────────────────────────────────────

impl<V: Node> MapNode for BTreeMap<String, V> {
    fn key_kind(&self) -> KeyKind {
        KeyKind::String
    }

    fn entry(&self, key: &str) -> Option<&dyn Node> {
        self.get(key).map(|n| n as &dyn Node)
    }

    fn entries(&self) -> Vec<(String, &dyn Node)> {
        self.iter()
            .map(|(k, v)| (k.clone(), v as &dyn Node))
            .collect()
    }
}

impl<V: Node> MapNode for HashMap<String, V> {
    fn key_kind(&self) -> KeyKind {
        KeyKind::String
    }

    fn entry(&self, key: &str) -> Option<&dyn Node> {
        self.get(key).map(|n| n as &dyn Node)
    }

    fn entries(&self) -> Vec<(String, &dyn Node)> {
        let mut entries: Vec<_> = self
            .iter()
            .map(|(k, v)| (k.clone(), v as &dyn Node))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<V: Node> Node for BTreeMap<String, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }
}

impl<V: Node> Node for HashMap<String, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }
}

// Integer-keyed maps can be walked and flattened, but not addressed by path.
macro_rules! node_int_keyed_map {
    ($($k:ty),*) => {$(
        impl<V: Node> MapNode for BTreeMap<$k, V> {
            fn key_kind(&self) -> KeyKind {
                KeyKind::Other(stringify!($k))
            }

            fn entry(&self, _key: &str) -> Option<&dyn Node> {
                None
            }

            fn entries(&self) -> Vec<(String, &dyn Node)> {
                self.iter()
                    .map(|(k, v)| (k.to_string(), v as &dyn Node))
                    .collect()
            }
        }

        impl<V: Node> Node for BTreeMap<$k, V> {
            fn shape(&self) -> Shape<'_> {
                Shape::Map(self)
            }
        }

        impl<V: Node> MapNode for HashMap<$k, V> {
            fn key_kind(&self) -> KeyKind {
                KeyKind::Other(stringify!($k))
            }

            fn entry(&self, _key: &str) -> Option<&dyn Node> {
                None
            }

            fn entries(&self) -> Vec<(String, &dyn Node)> {
                let mut entries: Vec<_> = self.iter().collect();
                entries.sort_by_key(|(k, _)| **k);
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v as &dyn Node))
                    .collect()
            }
        }

        impl<V: Node> Node for HashMap<$k, V> {
            fn shape(&self) -> Shape<'_> {
                Shape::Map(self)
            }
        }
    )*};
}

node_int_keyed_map!(i32, i64, u32, u64, usize);
