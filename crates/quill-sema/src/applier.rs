// applier.rs
//
// Type environments and type-parameter substitution across nested generic
// scopes.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use quill_identity::ItemId;

use crate::metadata::MetadataService;
use crate::type_value::{FuncValue, FunctionType, NominalType, TypeArgs, TypeParamRef, TypeValue};

/// Bindings for one substitution: (owning scope, parameter name) -> value.
pub type TypeEnv = FxHashMap<TypeParamRef, TypeValue>;

/// Builds environments from metadata and substitutes through them.
/// Holds no state besides the metadata it reads.
#[derive(Clone, Copy)]
pub struct TypeValueApplier<'a> {
    meta: &'a MetadataService,
}

impl<'a> TypeValueApplier<'a> {
    pub fn new(meta: &'a MetadataService) -> Self {
        Self { meta }
    }

    /// Pair every declaration on the path to `id` with its argument level,
    /// outermost first.
    ///
    /// The levels are assumed to line up with `id`'s segments; whoever built
    /// the value established that. A declaration unknown to the metadata
    /// contributes no bindings.
    pub fn env_for(&self, id: &ItemId, type_args: &TypeArgs) -> TypeEnv {
        let mut env = TypeEnv::default();
        for (scope, level) in id.prefixes().into_iter().zip(type_args.levels()) {
            let Some(names) = self.meta.type_params_of(&scope) else {
                continue;
            };
            for (name, arg) in names.iter().zip(level) {
                env.insert(
                    TypeParamRef {
                        owner: scope.clone(),
                        name: name.clone(),
                    },
                    arg.clone(),
                );
            }
        }
        env
    }

    /// Rewrite `target` in the environment of `context`. Only a nominal
    /// context binds anything; otherwise `target` comes back unchanged.
    pub fn apply(&self, context: Option<&TypeValue>, target: &TypeValue) -> TypeValue {
        match context {
            Some(TypeValue::Nominal(nominal)) => {
                let env = self.env_for(&nominal.id, &nominal.type_args);
                substitute(target, &env)
            }
            _ => target.clone(),
        }
    }

    /// Rewrite `target` in the environment of the declaration `id`
    /// instantiated with `type_args` (used for variables, whose own level is
    /// empty).
    pub fn apply_in(&self, id: &ItemId, type_args: &TypeArgs, target: &TypeValue) -> TypeValue {
        let env = self.env_for(id, type_args);
        substitute(target, &env)
    }

    /// Rewrite a function signature. The function's own parameters are bound
    /// from the innermost level of `func`'s arguments, the declaring types'
    /// parameters from the outer levels.
    pub fn apply_func(&self, func: &FuncValue, target: &FunctionType) -> FunctionType {
        let env = self.env_for(&func.id, &func.type_args);
        substitute_func(target, &env)
    }
}

// ============================================================================
// Substitution
// ============================================================================

/// Replace every `TypeParamRef` bound in `env`. Unbound refs, `Void` and
/// `Unresolved` pass through. Unchanged subtrees are shared with the input.
pub fn substitute(ty: &TypeValue, env: &TypeEnv) -> TypeValue {
    if env.is_empty() {
        return ty.clone();
    }
    rewrite(ty, env).unwrap_or_else(|| ty.clone())
}

pub fn substitute_func(func: &FunctionType, env: &TypeEnv) -> FunctionType {
    FunctionType {
        ret: substitute(&func.ret, env),
        params: func.params.iter().map(|p| substitute(p, env)).collect(),
    }
}

/// `None` when nothing below `ty` was bound.
fn rewrite(ty: &TypeValue, env: &TypeEnv) -> Option<TypeValue> {
    match ty {
        TypeValue::TypeParam(param) => env.get(param).cloned(),
        TypeValue::Nominal(nominal) => {
            let mut changed = false;
            let type_args = nominal.type_args.map(&mut |arg| match rewrite(arg, env) {
                Some(new) => {
                    changed = true;
                    new
                }
                None => arg.clone(),
            });
            changed.then(|| {
                TypeValue::Nominal(Rc::new(NominalType {
                    id: nominal.id.clone(),
                    type_args,
                }))
            })
        }
        TypeValue::Function(func) => {
            let ret = rewrite(&func.ret, env);
            let params: SmallParams = func.params.iter().map(|p| rewrite(p, env)).collect();
            if ret.is_none() && params.iter().all(Option::is_none) {
                return None;
            }
            Some(TypeValue::function(
                ret.unwrap_or_else(|| func.ret.clone()),
                params
                    .into_iter()
                    .zip(func.params.iter())
                    .map(|(new, old)| new.unwrap_or_else(|| old.clone())),
            ))
        }
        TypeValue::Void | TypeValue::Unresolved => None,
    }
}

type SmallParams = smallvec::SmallVec<[Option<TypeValue>; 4]>;
