// type_value_service.rs
//
// Higher-level type questions ("what is the type of this variable, function,
// base type, member") answered from metadata plus the applier.

use quill_identity::{ItemId, Name};

use crate::applier::TypeValueApplier;
use crate::metadata::{FuncInfo, MetadataService};
use crate::type_value::{FuncValue, FunctionType, NominalType, TypeArgs, TypeValue, VarValue};
use crate::well_known::seq_type;

/// Why a member lookup produced no reference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberLookupError {
    NotFound,
    /// Several functions could take the given type arguments.
    Ambiguous(usize),
    /// Explicit type arguments on a variable, or more than the function takes.
    TypeArgCount { expected: usize, found: usize },
}

/// Stateless facade over [`MetadataService`] and [`TypeValueApplier`].
#[derive(Clone, Copy)]
pub struct TypeValueService<'a> {
    meta: &'a MetadataService,
    applier: TypeValueApplier<'a>,
}

impl<'a> TypeValueService<'a> {
    pub fn new(meta: &'a MetadataService) -> Self {
        Self {
            meta,
            applier: TypeValueApplier::new(meta),
        }
    }

    pub fn meta(&self) -> &'a MetadataService {
        self.meta
    }

    pub fn applier(&self) -> TypeValueApplier<'a> {
        self.applier
    }

    // ========================================================================
    // Reference values -> types
    // ========================================================================

    /// Declared type of the variable with its declaring types' arguments applied.
    pub fn var_type(&self, var: &VarValue) -> TypeValue {
        let info = self
            .meta
            .var_info(&var.id)
            .unwrap_or_else(|| panic!("INTERNAL ERROR: no metadata for variable {}", var.id));
        self.applier.apply_in(&var.id, &var.type_args, &info.ty)
    }

    /// Signature of the function with every level of its arguments applied.
    /// A sequence function's declared element type is wrapped in `Seq<T>`
    /// before substitution.
    pub fn func_type(&self, func: &FuncValue) -> FunctionType {
        let info = self.func_info(&func.id);
        self.applier.apply_func(func, &declared_signature(info))
    }

    pub fn func_info(&self, id: &ItemId) -> &'a FuncInfo {
        self.meta
            .func_info(id)
            .unwrap_or_else(|| panic!("INTERNAL ERROR: no metadata for function {}", id))
    }

    /// Declared base of a nominal value, expressed in that value's own arguments.
    pub fn base_type(&self, ty: &TypeValue) -> Option<TypeValue> {
        let nominal = ty.as_nominal()?;
        let base = self.meta.type_info(&nominal.id)?.base.as_ref()?;
        Some(self.applier.apply(Some(ty), base))
    }

    // ========================================================================
    // Member lookup
    // ========================================================================

    /// Find member function `name` on `object` (or the nearest base declaring
    /// it) and bind the outer levels from the object plus `explicit` for the
    /// function's own level.
    ///
    /// Missing trailing function-level arguments are filled with references
    /// to the function's own parameters, to be inferred at the call.
    pub fn member_func_value(
        &self,
        object: &NominalType,
        name: &Name,
        explicit: &[TypeValue],
    ) -> Result<FuncValue, MemberLookupError> {
        let mut receiver = object.clone();
        loop {
            let candidates = self.meta.member_funcs(&receiver.id, name);
            if !candidates.is_empty() {
                let info = pick_by_arity(&candidates, explicit.len())?;
                tracing::trace!(member = %info.id, receiver = %receiver.id, "member function");
                let own = explicit
                    .iter()
                    .cloned()
                    .chain(
                        info.type_params[explicit.len()..]
                            .iter()
                            .map(|param| TypeValue::type_param(info.id.clone(), param.clone())),
                    );
                let type_args = TypeArgs::nested(receiver.type_args.clone(), own);
                return Ok(FuncValue::new(info.id.clone(), type_args));
            }
            receiver = self.base_nominal(&receiver).ok_or(MemberLookupError::NotFound)?;
        }
    }

    /// Find member variable `name` on `object` or the nearest base declaring it.
    /// Variables take no type arguments.
    pub fn member_var_value(
        &self,
        object: &NominalType,
        name: &Name,
        explicit: &[TypeValue],
    ) -> Result<VarValue, MemberLookupError> {
        if !explicit.is_empty() {
            return Err(MemberLookupError::TypeArgCount {
                expected: 0,
                found: explicit.len(),
            });
        }
        let mut receiver = object.clone();
        loop {
            let id = receiver.id.child(name.clone(), 0);
            if self.meta.var_info(&id).is_some() {
                tracing::trace!(member = %id, "member variable");
                return Ok(VarValue::new(id, TypeArgs::nested(receiver.type_args.clone(), [])));
            }
            receiver = self.base_nominal(&receiver).ok_or(MemberLookupError::NotFound)?;
        }
    }

    fn base_nominal(&self, receiver: &NominalType) -> Option<NominalType> {
        let ty = TypeValue::nominal(receiver.id.clone(), receiver.type_args.clone());
        self.base_type(&ty)?.as_nominal().cloned()
    }

    // ========================================================================
    // Compatibility
    // ========================================================================

    /// `from` is assignable to `to` if it equals `to` or some type on its base
    /// chain does. There is no structural or interface compatibility.
    pub fn is_assignable(&self, to: &TypeValue, from: &TypeValue) -> bool {
        let mut current = Some(from.clone());
        while let Some(ty) = current {
            if ty == *to {
                return true;
            }
            current = self.base_type(&ty);
        }
        false
    }
}

/// Declared signature in terms of the declaration's own parameters.
pub fn declared_signature(info: &FuncInfo) -> FunctionType {
    let ret = if info.is_sequence {
        seq_type(info.ret.clone())
    } else {
        info.ret.clone()
    };
    FunctionType {
        ret,
        params: info.params.iter().map(|p| p.ty.clone()).collect(),
    }
}

/// Exact arity wins; otherwise the only function able to take `count`
/// leading arguments.
fn pick_by_arity<'i>(candidates: &[&'i FuncInfo], count: usize) -> Result<&'i FuncInfo, MemberLookupError> {
    let exact: Vec<&FuncInfo> = candidates
        .iter()
        .copied()
        .filter(|f| f.type_params.len() == count)
        .collect();
    match exact.as_slice() {
        [only] => return Ok(*only),
        [] => {}
        many => return Err(MemberLookupError::Ambiguous(many.len())),
    }
    let partial: Vec<&FuncInfo> = candidates
        .iter()
        .copied()
        .filter(|f| f.type_params.len() > count)
        .collect();
    match partial.as_slice() {
        [only] => Ok(*only),
        [] => Err(MemberLookupError::TypeArgCount {
            expected: candidates[0].type_params.len(),
            found: count,
        }),
        many => Err(MemberLookupError::Ambiguous(many.len())),
    }
}
