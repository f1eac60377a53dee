// analyzer/identifier.rs
//
// Identifier resolution in fixed priority order.

use quill_identity::Name;

use crate::storage::StorageInfo;
use crate::type_value::{FuncValue, TypeArgs, TypeValue};

use super::Analyzer;

/// What a name (with its explicit type arguments) refers to at the current
/// point of analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierInfo {
    /// `ty` is the narrowed type when an override is active, `declared`
    /// always the declared one.
    Var {
        storage: StorageInfo,
        ty: TypeValue,
        declared: TypeValue,
    },
    Func(FuncValue),
    Type(TypeValue),
    NotFound,
    /// Several module-level declarations match.
    Ambiguous(usize),
}

impl Analyzer {
    /// Resolve `name`. First match wins:
    ///
    /// 1. local of the active function (only without type arguments)
    /// 2. member of `this`
    /// 3. private global
    /// 4. module-level var, function or type matching `(name, type_args.len())`;
    ///    exactly one candidate across all three kinds must exist
    pub fn get_identifier_info(&self, name: &str, type_args: &[TypeValue]) -> IdentifierInfo {
        self.lookup_identifier(name, type_args, false)
    }

    /// `allow_partial` lets a call resolve a generic function from fewer
    /// explicit type arguments than it declares; the rest are inferred.
    pub(super) fn lookup_identifier(&self, name: &str, type_args: &[TypeValue], allow_partial: bool) -> IdentifierInfo {
        if type_args.is_empty()
            && let Some((slot, declared)) = self.func.lookup_local(name)
        {
            tracing::trace!(name, slot, "local");
            return self.var_info(StorageInfo::Local(slot), declared.clone());
        }

        if let Some(info) = self.lookup_this_member(name) {
            return info;
        }

        if type_args.is_empty()
            && let Some((slot, declared)) = self.private_globals.lookup(name)
        {
            tracing::trace!(name, slot, "private global");
            return self.var_info(StorageInfo::PrivateGlobal(slot), declared.clone());
        }

        let key = Name::new(name);
        let mut found = Vec::new();
        if type_args.is_empty() {
            for var in self.meta.global_vars(&key) {
                found.push(self.var_info(StorageInfo::ModuleGlobal(var.id.clone()), var.ty.clone()));
            }
        }
        for func in self.meta.global_funcs(&key) {
            if func.type_params.len() == type_args.len() {
                let args = TypeArgs::root(type_args.iter().cloned());
                found.push(IdentifierInfo::Func(FuncValue::new(func.id.clone(), args)));
            }
        }
        for id in self.global_type_ids(&key, type_args.len()) {
            found.push(IdentifierInfo::Type(TypeValue::nominal(id, TypeArgs::root(type_args.iter().cloned()))));
        }
        tracing::trace!(name, candidates = found.len(), "module-level lookup");

        match found.len() {
            1 => found.pop().unwrap_or(IdentifierInfo::NotFound),
            0 if allow_partial => self.partial_func(&key, type_args),
            0 => IdentifierInfo::NotFound,
            count => IdentifierInfo::Ambiguous(count),
        }
    }

    /// Members of `this` are not resolved by this analyzer; instance scope
    /// never contributes a binding.
    fn lookup_this_member(&self, _name: &str) -> Option<IdentifierInfo> {
        None
    }

    /// The single module-level function declaring more type parameters than
    /// were given, with the missing ones left as its own parameter refs.
    fn partial_func(&self, name: &Name, type_args: &[TypeValue]) -> IdentifierInfo {
        let candidates: Vec<_> = self
            .meta
            .global_funcs(name)
            .into_iter()
            .filter(|func| func.type_params.len() > type_args.len())
            .collect();
        match candidates.as_slice() {
            [] => IdentifierInfo::NotFound,
            [func] => {
                let open = func.type_params[type_args.len()..]
                    .iter()
                    .map(|param| TypeValue::type_param(func.id.clone(), param.clone()));
                let args = TypeArgs::root(type_args.iter().cloned().chain(open));
                IdentifierInfo::Func(FuncValue::new(func.id.clone(), args))
            }
            many => IdentifierInfo::Ambiguous(many.len()),
        }
    }

    fn var_info(&self, storage: StorageInfo, declared: TypeValue) -> IdentifierInfo {
        let ty = self
            .func
            .override_for(&storage)
            .cloned()
            .unwrap_or_else(|| declared.clone());
        IdentifierInfo::Var { storage, ty, declared }
    }
}
