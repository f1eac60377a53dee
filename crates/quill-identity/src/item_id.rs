// item_id.rs
//
// ItemId: arity-qualified path from a module root through nested declarations.

use std::fmt;
use std::rc::Rc;

use crate::Name;

/// One step of an item path: a declaration name plus the number of type
/// parameters that declaration introduces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: Name,
    pub type_param_count: usize,
}

impl Segment {
    pub fn new(name: Name, type_param_count: usize) -> Self {
        Self {
            name,
            type_param_count,
        }
    }
}

/// Identity of a type, function or variable declaration.
///
/// Nested types and nested generic functions each add a segment, so
/// `X<T>.Y<U>.F<V>` is `[X/1, Y/1, F/1]` under its module. Two ids are equal
/// iff their modules and segment sequences are equal. Ids are built once per
/// declaration and never mutated; cloning shares the segment storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId {
    module: Rc<str>,
    path: Rc<[Segment]>,
}

impl ItemId {
    /// The root of a module. Top-level declarations are its children.
    pub fn module(name: &str) -> Self {
        Self {
            module: Rc::from(name),
            path: Rc::from(Vec::new()),
        }
    }

    pub fn child(&self, name: Name, type_param_count: usize) -> Self {
        let mut path: Vec<Segment> = self.path.to_vec();
        path.push(Segment::new(name, type_param_count));
        Self {
            module: Rc::clone(&self.module),
            path: Rc::from(path),
        }
    }

    /// Id of the enclosing declaration (or module root). `None` at the root.
    pub fn outer(&self) -> Option<ItemId> {
        let (_, init) = self.path.split_last()?;
        Some(Self {
            module: Rc::clone(&self.module),
            path: Rc::from(init.to_vec()),
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    pub fn segments(&self) -> &[Segment] {
        &self.path
    }

    pub fn last(&self) -> Option<&Segment> {
        self.path.last()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_module_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Every declaration id from the outermost declaration down to `self`.
    /// The module root is not included.
    pub fn prefixes(&self) -> Vec<ItemId> {
        (1..=self.path.len())
            .map(|len| Self {
                module: Rc::clone(&self.module),
                path: Rc::from(self.path[..len].to_vec()),
            })
            .collect()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)?;
        for segment in self.path.iter() {
            write!(f, ".{}", segment.name)?;
            if segment.type_param_count > 0 {
                write!(f, "`{}", segment.type_param_count)?;
            }
        }
        Ok(())
    }
}
