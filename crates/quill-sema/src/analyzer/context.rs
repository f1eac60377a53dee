// analyzer/context.rs
//
// Per-function analysis state and the guards that enter/leave function and
// block scopes.

use std::mem;
use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;

use crate::storage::StorageInfo;
use crate::type_value::TypeValue;

use super::Analyzer;

/// What `return` statements are checked against.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    Fixed(TypeValue),
    /// Lambda without a declared return type; set by the first `return`.
    Inferred(Option<TypeValue>),
}

#[derive(Debug, Clone)]
struct LocalVar {
    name: String,
    ty: TypeValue,
}

/// One function, lambda or task body being analyzed.
///
/// The slot table is append-only for the lifetime of the context, so slot
/// indices are never reused, even across sibling blocks. Visible names and
/// narrowing overrides are snapshotted and restored per block.
#[derive(Debug, Clone)]
pub struct FuncContext {
    locals: Vec<LocalVar>,
    names: FxHashMap<String, usize>,
    pub(super) overrides: FxHashMap<StorageInfo, TypeValue>,
    pub(super) ret: ReturnType,
    /// Element type when analyzing a sequence function.
    pub(super) seq_elem: Option<TypeValue>,
    pub(super) loop_depth: usize,
    pub(super) is_this_call: bool,
}

pub(super) struct ScopeSnapshot {
    names: FxHashMap<String, usize>,
    overrides: FxHashMap<StorageInfo, TypeValue>,
}

impl FuncContext {
    pub fn new(ret: ReturnType, seq_elem: Option<TypeValue>, is_this_call: bool) -> Self {
        Self {
            locals: Vec::new(),
            names: FxHashMap::default(),
            overrides: FxHashMap::default(),
            ret,
            seq_elem,
            loop_depth: 0,
            is_this_call,
        }
    }

    /// Context of the top-level statements.
    pub fn script() -> Self {
        Self::new(ReturnType::Fixed(TypeValue::Void), None, false)
    }

    /// Allocate the next slot and make `name` refer to it.
    pub fn add_local(&mut self, name: &str, ty: TypeValue) -> usize {
        let slot = self.locals.len();
        self.locals.push(LocalVar {
            name: name.to_string(),
            ty,
        });
        self.names.insert(name.to_string(), slot);
        slot
    }

    pub fn lookup_local(&self, name: &str) -> Option<(usize, &TypeValue)> {
        let slot = *self.names.get(name)?;
        Some((slot, &self.locals[slot].ty))
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Names of all slots, in slot order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.locals.iter().map(|local| local.name.as_str())
    }

    pub fn override_for(&self, storage: &StorageInfo) -> Option<&TypeValue> {
        self.overrides.get(storage)
    }

    pub(super) fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            names: self.names.clone(),
            overrides: self.overrides.clone(),
        }
    }

    /// Overrides dropped inside the block by an assignment stay dropped.
    pub(super) fn restore(&mut self, snapshot: ScopeSnapshot) {
        self.names = snapshot.names;
        let mut overrides = snapshot.overrides;
        overrides.retain(|storage, _| self.overrides.contains_key(storage));
        self.overrides = overrides;
    }
}

// ============================================================================
// Scope guards
// ============================================================================

/// Block scope: names and overrides introduced inside are dropped on exit.
pub(super) struct BlockScope<'a> {
    analyzer: &'a mut Analyzer,
    saved: Option<ScopeSnapshot>,
    saved_global: bool,
}

impl Analyzer {
    /// Enter a nested block. Declarations inside are locals.
    pub(super) fn enter_block(&mut self) -> BlockScope<'_> {
        let mut scope = self.enter_narrowing();
        scope.analyzer.global_scope = false;
        scope
    }

    /// Scope for the branches of a narrowing `if`. Unlike a block it keeps
    /// the global-scope flag, so it can wrap statements that are not blocks.
    pub(super) fn enter_narrowing(&mut self) -> BlockScope<'_> {
        let saved = Some(self.func.snapshot());
        let saved_global = self.global_scope;
        BlockScope {
            analyzer: self,
            saved,
            saved_global,
        }
    }

    /// Make `ctx` the active function context until the guard is finished or
    /// dropped.
    pub(super) fn enter_func(&mut self, ctx: FuncContext) -> FuncScope<'_> {
        let outer = mem::replace(&mut self.func, ctx);
        let outer_global = self.global_scope;
        self.global_scope = false;
        FuncScope {
            analyzer: self,
            saved: Some((outer, outer_global)),
        }
    }
}

impl Drop for BlockScope<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.saved.take() {
            self.analyzer.func.restore(snapshot);
        }
        self.analyzer.global_scope = self.saved_global;
    }
}

impl Deref for BlockScope<'_> {
    type Target = Analyzer;

    fn deref(&self) -> &Analyzer {
        self.analyzer
    }
}

impl DerefMut for BlockScope<'_> {
    fn deref_mut(&mut self) -> &mut Analyzer {
        self.analyzer
    }
}

/// Function scope: the enclosing context is restored on exit.
pub(super) struct FuncScope<'a> {
    analyzer: &'a mut Analyzer,
    saved: Option<(FuncContext, bool)>,
}

impl FuncScope<'_> {
    /// Leave the function, returning its finished context.
    pub fn finish(mut self) -> FuncContext {
        self.restore()
            .unwrap_or_else(|| panic!("INTERNAL ERROR: function scope finished twice"))
    }

    fn restore(&mut self) -> Option<FuncContext> {
        let (outer, outer_global) = self.saved.take()?;
        self.analyzer.global_scope = outer_global;
        Some(mem::replace(&mut self.analyzer.func, outer))
    }
}

impl Drop for FuncScope<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}

impl Deref for FuncScope<'_> {
    type Target = Analyzer;

    fn deref(&self) -> &Analyzer {
        self.analyzer
    }
}

impl DerefMut for FuncScope<'_> {
    fn deref_mut(&mut self) -> &mut Analyzer {
        self.analyzer
    }
}
