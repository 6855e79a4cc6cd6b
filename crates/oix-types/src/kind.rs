use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of an indexed object.
///
/// The numeric codes are fixed: they are the type codes the content store
/// reports alongside fetched content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ObjectKind {
    /// Placeholder: the object is referenced but its content is not known yet.
    #[default]
    None = 0,
    /// A commit: root tree, parents, and message.
    Commit = 1,
    /// Directory listing: entries mapping names to object references.
    Tree = 2,
    /// Raw content.
    Blob = 3,
    /// Annotated tag pointing at another object.
    Tag = 4,
}

impl ObjectKind {
    /// The four concrete kinds, in code order.
    pub const CONCRETE: [ObjectKind; 4] = [Self::Commit, Self::Tree, Self::Blob, Self::Tag];

    /// Numeric type code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a type code back to a kind. Unknown codes yield `None` (the
    /// `Option`, not the placeholder kind).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Commit),
            2 => Some(Self::Tree),
            3 => Some(Self::Blob),
            4 => Some(Self::Tag),
            _ => None,
        }
    }

    /// Returns `true` for every kind except the `None` placeholder.
    pub fn is_concrete(self) -> bool {
        self != Self::None
    }
}

/// Canonical name of a kind; `None` for the placeholder kind.
pub fn typename(kind: ObjectKind) -> Option<&'static str> {
    match kind {
        ObjectKind::None => None,
        ObjectKind::Commit => Some("commit"),
        ObjectKind::Tree => Some("tree"),
        ObjectKind::Blob => Some("blob"),
        ObjectKind::Tag => Some("tag"),
    }
}

/// Map a canonical name to its kind.
///
/// # Panics
///
/// An unrecognized name means corrupted data or a programming error, and
/// is fatal. Use [`ObjectKind::from_str`] to handle it as an error instead.
pub fn kind_from_name(name: &str) -> ObjectKind {
    match name.parse() {
        Ok(kind) => kind,
        Err(e) => panic!("{e}"),
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CONCRETE
            .into_iter()
            .find(|k| typename(*k) == Some(s))
            .ok_or_else(|| TypeError::UnknownTypeName(s.to_string()))
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", typename(*self).unwrap_or("none"))
    }
}
