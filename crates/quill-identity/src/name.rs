// name.rs
//
// Declaration names, including the reserved member names used for
// indexers and increment/decrement operators.

use std::fmt;
use std::rc::Rc;

/// Name of a declaration or member.
///
/// Reserved names never collide with user-written identifiers, so a type can
/// declare an ordinary member called `IndexerGet` without shadowing its indexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Normal(Rc<str>),
    IndexerGet,
    IndexerSet,
    OpInc,
    OpDec,
}

impl Name {
    pub fn new(text: &str) -> Self {
        Name::Normal(Rc::from(text))
    }

    /// Text of a normal name, `None` for reserved names.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Name::Normal(text) => Some(&**text),
            _ => None,
        }
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, Name::Normal(_))
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Normal(text) => f.write_str(text),
            Name::IndexerGet => f.write_str("indexer get"),
            Name::IndexerSet => f.write_str("indexer set"),
            Name::OpInc => f.write_str("operator++"),
            Name::OpDec => f.write_str("operator--"),
        }
    }
}
