// type_value.rs
//
// TypeValue: immutable, structurally compared type expressions, plus the
// nested per-scope argument lists that carry generic bindings.
//
// Values are Rc-shared trees rather than arena handles: metadata sources are
// built independently of one another, so a value has to stay meaningful
// without a shared intern table. Equality and hashing are structural.

use std::rc::Rc;

use smallvec::SmallVec;

use quill_identity::{ItemId, Name};

/// SmallVec for type children - inline up to 4 (covers most argument lists and params)
pub type TypeValueVec = SmallVec<[TypeValue; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeValue {
    Void,
    /// Placeholder for a value whose type could not be determined. Only ever
    /// produced alongside a reported error.
    Unresolved,
    Nominal(Rc<NominalType>),
    Function(Rc<FunctionType>),
    TypeParam(Rc<TypeParamRef>),
}

/// `X<A, B>.Y<C>`: a declaration id plus one argument level per id segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NominalType {
    pub id: ItemId,
    pub type_args: TypeArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub ret: TypeValue,
    pub params: TypeValueVec,
}

/// Unbound reference to type parameter `name` declared by `owner`
/// (a type or a function).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParamRef {
    pub owner: ItemId,
    pub name: Name,
}

impl TypeValue {
    /// Build a nominal value.
    ///
    /// Panics if the argument levels do not match the arity recorded in each
    /// id segment; the count invariant is established here and nowhere else.
    pub fn nominal(id: ItemId, type_args: TypeArgs) -> Self {
        assert!(
            type_args.matches_arity(&id),
            "INTERNAL ERROR: type arguments {:?} do not match the arity of {}",
            type_args.levels(),
            id
        );
        TypeValue::Nominal(Rc::new(NominalType { id, type_args }))
    }

    pub fn function(ret: TypeValue, params: impl IntoIterator<Item = TypeValue>) -> Self {
        TypeValue::Function(Rc::new(FunctionType {
            ret,
            params: params.into_iter().collect(),
        }))
    }

    pub fn type_param(owner: ItemId, name: Name) -> Self {
        TypeValue::TypeParam(Rc::new(TypeParamRef { owner, name }))
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeValue::Void)
    }

    #[inline]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeValue::Unresolved)
    }

    pub fn as_nominal(&self) -> Option<&NominalType> {
        match self {
            TypeValue::Nominal(nominal) => Some(nominal),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeValue::Function(func) => Some(func),
            _ => None,
        }
    }

    /// True if `Unresolved` occurs anywhere in this value.
    pub fn contains_unresolved(&self) -> bool {
        match self {
            TypeValue::Unresolved => true,
            TypeValue::Void | TypeValue::TypeParam(_) => false,
            TypeValue::Nominal(nominal) => nominal.type_args.any(&mut |t| t.contains_unresolved()),
            TypeValue::Function(func) => {
                func.ret.contains_unresolved() || func.params.iter().any(|p| p.contains_unresolved())
            }
        }
    }

    /// True if a reference to one of `owner`'s own type parameters occurs in this value.
    pub fn mentions_params_of(&self, owner: &ItemId) -> bool {
        match self {
            TypeValue::TypeParam(param) => param.owner == *owner,
            TypeValue::Void | TypeValue::Unresolved => false,
            TypeValue::Nominal(nominal) => nominal.type_args.any(&mut |t| t.mentions_params_of(owner)),
            TypeValue::Function(func) => {
                func.ret.mentions_params_of(owner)
                    || func.params.iter().any(|p| p.mentions_params_of(owner))
            }
        }
    }
}

impl From<FunctionType> for TypeValue {
    fn from(func: FunctionType) -> Self {
        TypeValue::Function(Rc::new(func))
    }
}

/// Nested per-scope type argument list.
///
/// Nesting mirrors `ItemId` nesting: `X<A, B>.Y<C>` is
/// `{ outer: { outer: None, args: [A, B] }, args: [C] }`. A non-generic
/// segment still owns a (empty) level, so the number of levels always equals
/// the number of id segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeArgs {
    outer: Option<Rc<TypeArgs>>,
    args: TypeValueVec,
}

impl TypeArgs {
    /// Arguments of a top-level declaration.
    pub fn root(args: impl IntoIterator<Item = TypeValue>) -> Self {
        Self {
            outer: None,
            args: args.into_iter().collect(),
        }
    }

    pub fn nested(outer: TypeArgs, args: impl IntoIterator<Item = TypeValue>) -> Self {
        Self {
            outer: Some(Rc::new(outer)),
            args: args.into_iter().collect(),
        }
    }

    /// All-empty argument list for a declaration whose segments take no
    /// type parameters.
    pub fn empty(depth: usize) -> Self {
        assert!(depth > 0, "INTERNAL ERROR: type arguments for a module root");
        (1..depth).fold(TypeArgs::root([]), |outer, _| TypeArgs::nested(outer, []))
    }

    pub fn outer(&self) -> Option<&TypeArgs> {
        self.outer.as_deref()
    }

    /// Arguments of the innermost level.
    pub fn args(&self) -> &[TypeValue] {
        &self.args
    }

    pub fn depth(&self) -> usize {
        1 + self.outer.as_ref().map_or(0, |outer| outer.depth())
    }

    /// Argument levels, outermost first.
    pub fn levels(&self) -> Vec<&[TypeValue]> {
        let mut levels = Vec::with_capacity(4);
        let mut cur = Some(self);
        while let Some(level) = cur {
            levels.push(level.args.as_slice());
            cur = level.outer.as_deref();
        }
        levels.reverse();
        levels
    }

    /// Replace the innermost level, keeping the outer chain shared.
    pub fn with_args(&self, args: impl IntoIterator<Item = TypeValue>) -> Self {
        Self {
            outer: self.outer.clone(),
            args: args.into_iter().collect(),
        }
    }

    /// True if the levels line up with `id`'s segments and their arities.
    pub fn matches_arity(&self, id: &ItemId) -> bool {
        let levels = self.levels();
        levels.len() == id.depth()
            && levels
                .iter()
                .zip(id.segments())
                .all(|(level, segment)| level.len() == segment.type_param_count)
    }

    /// Rebuild every level through `f`.
    pub fn map(&self, f: &mut impl FnMut(&TypeValue) -> TypeValue) -> Self {
        Self {
            outer: self.outer.as_ref().map(|outer| Rc::new(outer.map(f))),
            args: self.args.iter().map(|arg| f(arg)).collect(),
        }
    }

    pub fn any(&self, f: &mut impl FnMut(&TypeValue) -> bool) -> bool {
        self.args.iter().any(|arg| f(arg)) || self.outer.as_ref().is_some_and(|outer| outer.any(f))
    }
}

/// Reference to a function: its id plus bindings for every enclosing level
/// and its own type parameters. Not yet substituted; the type-value service
/// computes the signature on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncValue {
    pub id: ItemId,
    pub type_args: TypeArgs,
}

impl FuncValue {
    pub fn new(id: ItemId, type_args: TypeArgs) -> Self {
        assert!(
            type_args.matches_arity(&id),
            "INTERNAL ERROR: type arguments do not match the arity of {}",
            id
        );
        Self { id, type_args }
    }

    /// True if no level carries any argument (nothing to substitute).
    pub fn is_non_generic(&self) -> bool {
        self.type_args.levels().iter().all(|level| level.is_empty())
    }
}

/// Reference to a variable. The innermost level is always empty; the outer
/// levels bind the declaring type's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarValue {
    pub id: ItemId,
    pub type_args: TypeArgs,
}

impl VarValue {
    pub fn new(id: ItemId, type_args: TypeArgs) -> Self {
        assert!(
            type_args.matches_arity(&id),
            "INTERNAL ERROR: type arguments do not match the arity of {}",
            id
        );
        Self { id, type_args }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal(module: &str, name: &str) -> TypeValue {
        TypeValue::nominal(ItemId::module(module).child(Name::new(name), 0), TypeArgs::root([]))
    }

    #[test]
    fn levels_are_outermost_first() {
        let a = nominal("M", "A");
        let b = nominal("M", "B");
        let c = nominal("M", "C");
        let args = TypeArgs::nested(TypeArgs::root([a.clone(), b.clone()]), [c.clone()]);
        assert_eq!(args.depth(), 2);
        assert_eq!(args.levels(), vec![&[a, b][..], &[c][..]]);
    }

    #[test]
    fn equal_structure_is_equal_value() {
        let x = ItemId::module("M").child(Name::new("X"), 1);
        let first = TypeValue::nominal(x.clone(), TypeArgs::root([nominal("M", "A")]));
        let second = TypeValue::nominal(x, TypeArgs::root([nominal("M", "A")]));
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "do not match the arity")]
    fn nominal_rejects_wrong_arity() {
        let x = ItemId::module("M").child(Name::new("X"), 2);
        TypeValue::nominal(x, TypeArgs::root([nominal("M", "A")]));
    }

    #[test]
    fn empty_args_cover_every_segment() {
        let y = ItemId::module("M").child(Name::new("X"), 0).child(Name::new("Y"), 0);
        let args = TypeArgs::empty(2);
        assert!(args.matches_arity(&y));
    }

    #[test]
    fn mentions_params_of_only_matches_owner() {
        let f = ItemId::module("M").child(Name::new("F"), 1);
        let g = ItemId::module("M").child(Name::new("G"), 1);
        let t = TypeValue::type_param(f.clone(), Name::new("T"));
        let func = TypeValue::function(TypeValue::Void, [t]);
        assert!(func.mentions_params_of(&f));
        assert!(!func.mentions_params_of(&g));
    }
}
