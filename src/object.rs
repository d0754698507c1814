//! The PDF object graph as seen by the profiles.
//!
//! The object graph is produced by an external parser; this module only
//! models it. Dictionaries keep insertion order so that rule evaluation and
//! the reasons it produces are reproducible from run to run.

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Ordered PDF dictionary (name → object).
pub type Dictionary = IndexMap<String, Object>;

/// A PDF value, direct or indirect.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integer number
    Integer(i64),
    /// Real number
    Real(f64),
    /// Literal or hex string, as raw bytes
    String(Vec<u8>),
    /// Name, without the leading slash
    Name(String),
    /// Array
    Array(Vec<Object>),
    /// Dictionary
    Dictionary(Dictionary),
    /// Stream: its dictionary and the still-encoded body
    Stream {
        /// Stream dictionary (Filter, DecodeParms, Subtype, ...)
        dict: Dictionary,
        /// Encoded body
        data: bytes::Bytes,
    },
    /// `n g R`
    Reference(ObjectRef),
}

/// Object number and generation of an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation
    pub gen: u16,
}

impl ObjectRef {
    /// Build a reference from number and generation.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Shorthand for a name object.
    pub fn name(name: impl Into<String>) -> Self {
        Object::Name(name.into())
    }

    /// Shorthand for a string object built from text.
    pub fn text(text: impl AsRef<str>) -> Self {
        Object::String(text.as_ref().as_bytes().to_vec())
    }

    /// Shorthand for a reference object.
    pub fn reference(id: u32, gen: u16) -> Self {
        Object::Reference(ObjectRef::new(id, gen))
    }

    /// Variant name, used in type-mismatch errors and reason details.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// The value of an integer object.
    pub fn as_integer(&self) -> Option<i64> {
        if let Object::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Integer or real, widened to `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// The value of a name object.
    pub fn as_name(&self) -> Option<&str> {
        if let Object::Name(n) = self {
            Some(n)
        } else {
            None
        }
    }

    /// The dictionary of a dictionary or stream object.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) | Object::Stream { dict: d, .. } => Some(d),
            _ => None,
        }
    }

    /// The items of an array object.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        if let Object::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// The target of a reference object.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        if let Object::Reference(r) = self {
            Some(*r)
        } else {
            None
        }
    }

    /// The value of a boolean object.
    pub fn as_bool(&self) -> Option<bool> {
        if let Object::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Read a string or name as text. Strings are decoded lossily.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Object::String(s) => Some(String::from_utf8_lossy(s).into_owned()),
            Object::Name(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Whether this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Whether this is a stream.
    pub fn is_stream(&self) -> bool {
        matches!(self, Object::Stream { .. })
    }

    /// Cast to dictionary or report the actual type.
    pub fn expect_dict(&self) -> Result<&Dictionary> {
        self.as_dict()
            .ok_or_else(|| Error::wrong_type("Dictionary", self.type_name()))
    }
}

impl From<Dictionary> for Object {
    fn from(dict: Dictionary) -> Self {
        Object::Dictionary(dict)
    }
}

/// Names listed in a Filter entry.
///
/// A single name yields one entry, an array yields its names in order;
/// anything else yields none.
pub fn extract_filter_names(filter_obj: &Object) -> Vec<String> {
    match filter_obj {
        Object::Name(name) => vec![name.clone()],
        Object::Array(items) => items
            .iter()
            .filter_map(Object::as_name)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Build a dictionary from key/value pairs, preserving their order.
///
/// ```
/// use pdfa_profiles::object::{dict, Object};
///
/// let d = dict([("Type", Object::name("Page"))]);
/// assert_eq!(d.get("Type").and_then(|o| o.as_name()), Some("Page"));
/// ```
pub fn dict<K, I>(entries: I) -> Dictionary
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Object)>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
