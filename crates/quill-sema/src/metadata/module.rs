// metadata/module.rs
//
// In-memory metadata for one module.

use rustc_hash::FxHashMap;

use quill_identity::{ItemId, Name};

use super::{FuncInfo, MetadataSource, TypeInfo, VarInfo};

/// Declarations of one module, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ModuleMetadata {
    module_name: String,
    types: FxHashMap<ItemId, TypeInfo>,
    funcs: FxHashMap<ItemId, FuncInfo>,
    vars: FxHashMap<ItemId, VarInfo>,
    /// (outer, name) -> function ids, for lookups that do not know the arity yet.
    funcs_by_name: FxHashMap<(ItemId, Name), Vec<ItemId>>,
}

impl ModuleMetadata {
    pub fn root(&self) -> ItemId {
        ItemId::module(&self.module_name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    pub fn funcs(&self) -> impl Iterator<Item = &FuncInfo> {
        self.funcs.values()
    }

    pub fn vars(&self) -> impl Iterator<Item = &VarInfo> {
        self.vars.values()
    }
}

impl MetadataSource for ModuleMetadata {
    fn module_name(&self) -> &str {
        &self.module_name
    }

    fn type_info(&self, id: &ItemId) -> Option<&TypeInfo> {
        self.types.get(id)
    }

    fn func_info(&self, id: &ItemId) -> Option<&FuncInfo> {
        self.funcs.get(id)
    }

    fn var_info(&self, id: &ItemId) -> Option<&VarInfo> {
        self.vars.get(id)
    }

    fn funcs_named(&self, outer: &ItemId, name: &Name) -> Vec<&FuncInfo> {
        self.funcs_by_name
            .get(&(outer.clone(), name.clone()))
            .map(|ids| ids.iter().filter_map(|id| self.funcs.get(id)).collect())
            .unwrap_or_default()
    }
}

/// Collects declarations for a module. Ids must belong to the builder's module.
#[derive(Debug)]
pub struct ModuleMetadataBuilder {
    metadata: ModuleMetadata,
}

impl ModuleMetadataBuilder {
    pub fn new(module_name: &str) -> Self {
        Self {
            metadata: ModuleMetadata {
                module_name: module_name.to_string(),
                ..ModuleMetadata::default()
            },
        }
    }

    pub fn root(&self) -> ItemId {
        self.metadata.root()
    }

    pub fn add_type(&mut self, info: TypeInfo) -> &mut Self {
        self.check_module(&info.id);
        self.metadata.types.insert(info.id.clone(), info);
        self
    }

    pub fn add_func(&mut self, info: FuncInfo) -> &mut Self {
        self.check_module(&info.id);
        if let (Some(outer), Some(last)) = (info.id.outer(), info.id.last()) {
            self.metadata
                .funcs_by_name
                .entry((outer, last.name.clone()))
                .or_default()
                .push(info.id.clone());
        }
        self.metadata.funcs.insert(info.id.clone(), info);
        self
    }

    pub fn add_var(&mut self, info: VarInfo) -> &mut Self {
        self.check_module(&info.id);
        self.metadata.vars.insert(info.id.clone(), info);
        self
    }

    pub fn build(self) -> ModuleMetadata {
        self.metadata
    }

    fn check_module(&self, id: &ItemId) {
        assert_eq!(
            id.module_name(),
            self.metadata.module_name,
            "INTERNAL ERROR: {} added to metadata of module {}",
            id,
            self.metadata.module_name
        );
    }
}
