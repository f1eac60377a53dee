// metadata/mod.rs
//
// Declaration records (types, functions, variables) and the lookup interface
// every metadata source implements.

mod module;
mod service;

pub use module::{ModuleMetadata, ModuleMetadataBuilder};
pub use service::MetadataService;

use quill_identity::{ItemId, Name};

use crate::type_value::TypeValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Class,
    Struct,
    Enum,
}

/// A type declaration.
///
/// `type_params` are the parameters this declaration introduces; parameters of
/// enclosing declarations are not repeated. `base` is written in terms of this
/// type's own parameters (and those of its enclosing types).
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub id: ItemId,
    pub kind: TypeKind,
    pub type_params: Vec<Name>,
    pub base: Option<TypeValue>,
    pub enum_cases: Vec<Name>,
}

impl TypeInfo {
    pub fn new(id: ItemId, kind: TypeKind, type_params: Vec<Name>) -> Self {
        assert_declared_arity(&id, type_params.len());
        Self {
            id,
            kind,
            type_params,
            base: None,
            enum_cases: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: TypeValue) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_enum_cases(mut self, cases: Vec<Name>) -> Self {
        self.enum_cases = cases;
        self
    }

    pub fn outer(&self) -> Option<ItemId> {
        self.id.outer()
    }
}

#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: Name,
    pub ty: TypeValue,
}

impl ParamInfo {
    pub fn new(name: &str, ty: TypeValue) -> Self {
        Self {
            name: Name::new(name),
            ty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FuncInfo {
    pub id: ItemId,
    pub type_params: Vec<Name>,
    pub params: Vec<ParamInfo>,
    /// Declared return type. For sequence functions this is the element type;
    /// the type-value service wraps it in the runtime sequence type.
    pub ret: TypeValue,
    pub is_sequence: bool,
    pub is_static: bool,
}

impl FuncInfo {
    pub fn new(id: ItemId, type_params: Vec<Name>, params: Vec<ParamInfo>, ret: TypeValue) -> Self {
        assert_declared_arity(&id, type_params.len());
        Self {
            id,
            type_params,
            params,
            ret,
            is_sequence: false,
            is_static: false,
        }
    }

    pub fn sequence(mut self) -> Self {
        self.is_sequence = true;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn outer(&self) -> Option<ItemId> {
        self.id.outer()
    }
}

#[derive(Debug, Clone)]
pub struct VarInfo {
    pub id: ItemId,
    pub ty: TypeValue,
    pub is_static: bool,
}

impl VarInfo {
    pub fn new(id: ItemId, ty: TypeValue) -> Self {
        assert_declared_arity(&id, 0);
        Self {
            id,
            ty,
            is_static: false,
        }
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

fn assert_declared_arity(id: &ItemId, count: usize) {
    let declared = id.last().map_or(0, |segment| segment.type_param_count);
    assert_eq!(
        declared, count,
        "INTERNAL ERROR: {} declares {} type parameters but its id says {}",
        id, count, declared
    );
}

/// One independently built set of declarations (the current script, the
/// runtime, or a referenced module).
pub trait MetadataSource {
    fn module_name(&self) -> &str;

    fn type_info(&self, id: &ItemId) -> Option<&TypeInfo>;

    fn func_info(&self, id: &ItemId) -> Option<&FuncInfo>;

    fn var_info(&self, id: &ItemId) -> Option<&VarInfo>;

    /// Functions declared directly under `outer` with the given name, of any arity.
    fn funcs_named(&self, outer: &ItemId, name: &Name) -> Vec<&FuncInfo>;
}
