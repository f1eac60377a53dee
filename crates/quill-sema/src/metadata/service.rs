// metadata/service.rs
//
// Merged lookup over every registered metadata source.

use std::fmt;
use std::rc::Rc;

use quill_identity::{ItemId, Name};

use super::{FuncInfo, MetadataSource, TypeInfo, VarInfo};

/// Lookup-by-id over the current script's metadata plus every referenced
/// module. Id lookups are exact. Name lookups may return several candidates;
/// turning that into a user-facing ambiguity error is the caller's job.
#[derive(Clone, Default)]
pub struct MetadataService {
    sources: Vec<Rc<dyn MetadataSource>>,
}

impl fmt::Debug for MetadataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sources.iter().map(|source| source.module_name()))
            .finish()
    }
}

impl MetadataService {
    pub fn new(sources: Vec<Rc<dyn MetadataSource>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Rc<dyn MetadataSource>] {
        &self.sources
    }

    pub fn type_infos(&self, id: &ItemId) -> Vec<&TypeInfo> {
        self.sources.iter().filter_map(|s| s.type_info(id)).collect()
    }

    pub fn func_infos(&self, id: &ItemId) -> Vec<&FuncInfo> {
        self.sources.iter().filter_map(|s| s.func_info(id)).collect()
    }

    pub fn var_infos(&self, id: &ItemId) -> Vec<&VarInfo> {
        self.sources.iter().filter_map(|s| s.var_info(id)).collect()
    }

    pub fn type_info(&self, id: &ItemId) -> Option<&TypeInfo> {
        self.sources.iter().find_map(|s| s.type_info(id))
    }

    pub fn func_info(&self, id: &ItemId) -> Option<&FuncInfo> {
        self.sources.iter().find_map(|s| s.func_info(id))
    }

    pub fn var_info(&self, id: &ItemId) -> Option<&VarInfo> {
        self.sources.iter().find_map(|s| s.var_info(id))
    }

    /// Type parameters declared by the declaration `id` names (a type or a
    /// function; variables declare none).
    pub fn type_params_of(&self, id: &ItemId) -> Option<&[Name]> {
        if let Some(info) = self.type_info(id) {
            return Some(&info.type_params);
        }
        if let Some(info) = self.func_info(id) {
            return Some(&info.type_params);
        }
        self.var_info(id).map(|_| &[][..])
    }

    /// Functions declared directly under `outer` named `name`, any arity.
    pub fn member_funcs(&self, outer: &ItemId, name: &Name) -> Vec<&FuncInfo> {
        self.sources
            .iter()
            .flat_map(|s| s.funcs_named(outer, name))
            .collect()
    }

    // ========================================================================
    // Module-level name queries
    // ========================================================================

    /// Top-level types named `name` with `arity` parameters, across all modules.
    pub fn global_types(&self, name: &Name, arity: usize) -> Vec<&TypeInfo> {
        self.sources
            .iter()
            .filter_map(|s| s.type_info(&ItemId::module(s.module_name()).child(name.clone(), arity)))
            .collect()
    }

    /// Top-level functions named `name`, any arity, across all modules.
    pub fn global_funcs(&self, name: &Name) -> Vec<&FuncInfo> {
        self.sources
            .iter()
            .flat_map(|s| s.funcs_named(&ItemId::module(s.module_name()), name))
            .collect()
    }

    /// Top-level variables named `name`, across all modules.
    pub fn global_vars(&self, name: &Name) -> Vec<&VarInfo> {
        self.sources
            .iter()
            .filter_map(|s| s.var_info(&ItemId::module(s.module_name()).child(name.clone(), 0)))
            .collect()
    }
}
