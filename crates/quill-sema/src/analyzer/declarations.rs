// analyzer/declarations.rs
//
// Skeleton collection, declaration type evaluation and the script metadata
// build (the three phases before body analysis).

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use quill_identity::{ItemId, Name, Span};
use quill_syntax::{FuncDecl, MemberDecl, MemberVarDecl, NodeId, Script, ScriptElement, TypeDecl, TypeDeclKind, TypeExpr};

use crate::errors::SemanticError;
use crate::metadata::{FuncInfo, ModuleMetadata, ModuleMetadataBuilder, ParamInfo, TypeInfo, TypeKind, VarInfo};
use crate::type_value::TypeValue;

use super::Analyzer;

/// A script type known before its metadata exists.
#[derive(Debug, Clone)]
pub(super) struct SkeletonType {
    pub kind: TypeKind,
    pub type_params: Vec<Name>,
    pub node: NodeId,
    pub span: Span,
}

/// Ids of every script declaration, collected before any type expression is
/// evaluated so that declarations can refer to each other in any order.
#[derive(Debug, Default)]
pub(super) struct Skeleton {
    pub types: FxHashMap<ItemId, SkeletonType>,
    pub funcs: FxHashSet<ItemId>,
    pub vars: FxHashSet<ItemId>,
}

impl Skeleton {
    fn contains(&self, id: &ItemId) -> bool {
        self.types.contains_key(id) || self.funcs.contains(id) || self.vars.contains(id)
    }
}

/// An enclosing declaration during type-expression resolution.
#[derive(Debug, Clone)]
pub(super) struct DeclScope {
    pub id: ItemId,
    pub type_params: Vec<Name>,
    pub is_type: bool,
}

pub(super) fn type_decl_id(outer: &ItemId, decl: &TypeDecl) -> ItemId {
    outer.child(Name::new(&decl.name), decl.type_params.len())
}

pub(super) fn func_decl_id(outer: &ItemId, decl: &FuncDecl) -> ItemId {
    outer.child(decl.name.clone(), decl.type_params.len())
}

fn var_decl_id(outer: &ItemId, decl: &MemberVarDecl) -> ItemId {
    outer.child(Name::new(&decl.name), 0)
}

pub(super) fn param_names(params: &[String]) -> Vec<Name> {
    params.iter().map(|name| Name::new(name)).collect()
}

fn type_kind(kind: TypeDeclKind) -> TypeKind {
    match kind {
        TypeDeclKind::Class => TypeKind::Class,
        TypeDeclKind::Struct => TypeKind::Struct,
        TypeDeclKind::Enum => TypeKind::Enum,
    }
}

impl Analyzer {
    // ========================================================================
    // Phase 1: skeleton
    // ========================================================================

    /// Collect declaration ids. A duplicate id is a structural failure.
    pub(super) fn collect_skeleton(&mut self, script: &Script) {
        let root = self.script_root();
        for element in &script.elements {
            match element {
                ScriptElement::Type(decl) => self.collect_type(&root, decl),
                ScriptElement::Func(decl) => self.collect_func(&root, decl),
                ScriptElement::Stmt(_) => {}
            }
        }
    }

    fn collect_type(&mut self, outer: &ItemId, decl: &TypeDecl) {
        let id = type_decl_id(outer, decl);
        if self.skeleton.contains(&id) {
            self.duplicate(&decl.name, decl.id, decl.span);
            return;
        }
        self.skeleton.types.insert(
            id.clone(),
            SkeletonType {
                kind: type_kind(decl.kind),
                type_params: param_names(&decl.type_params),
                node: decl.id,
                span: decl.span,
            },
        );

        let mut cases = FxHashSet::default();
        for member in &decl.members {
            match member {
                MemberDecl::Type(nested) => self.collect_type(&id, nested),
                MemberDecl::Func(func) => self.collect_func(&id, func),
                MemberDecl::Var(var) => {
                    let var_id = var_decl_id(&id, var);
                    if self.skeleton.contains(&var_id) {
                        self.duplicate(&var.name, var.id, var.span);
                    } else {
                        self.skeleton.vars.insert(var_id);
                    }
                }
                MemberDecl::EnumCase(case) => {
                    if !cases.insert(case.name.as_str()) {
                        self.duplicate(&case.name, case.id, case.span);
                    }
                }
            }
        }
    }

    fn collect_func(&mut self, outer: &ItemId, decl: &FuncDecl) {
        let id = func_decl_id(outer, decl);
        if self.skeleton.contains(&id) {
            self.duplicate(&decl.name.to_string(), decl.id, decl.span);
            return;
        }
        self.skeleton.funcs.insert(id);
    }

    fn duplicate(&mut self, name: &str, node: NodeId, span: Span) {
        self.add_error(
            SemanticError::DuplicateDeclaration {
                name: name.to_string(),
                span: span.into(),
            },
            node,
            span,
        );
    }

    // ========================================================================
    // Phase 2: declaration types
    // ========================================================================

    /// Resolve every declared base, parameter, return and member type.
    pub(super) fn evaluate_declarations(&mut self, script: &Script) -> ModuleMetadataBuilder {
        let mut builder = ModuleMetadataBuilder::new(&self.module_name);
        let root = self.script_root();
        for element in &script.elements {
            match element {
                ScriptElement::Type(decl) => self.evaluate_type(&root, decl, &mut builder),
                // Module-level functions are always static.
                ScriptElement::Func(decl) => self.evaluate_func(&root, decl, true, &mut builder),
                ScriptElement::Stmt(_) => {}
            }
        }
        builder
    }

    fn evaluate_type(&mut self, outer: &ItemId, decl: &TypeDecl, builder: &mut ModuleMetadataBuilder) {
        let id = type_decl_id(outer, decl);
        let type_params = param_names(&decl.type_params);
        self.decl_scope.push(DeclScope {
            id: id.clone(),
            type_params: type_params.clone(),
            is_type: true,
        });

        // Written in terms of this type's own parameters.
        let base = decl.base.as_ref().and_then(|base| self.evaluate_base(base));
        let mut enum_cases = Vec::new();
        for member in &decl.members {
            match member {
                MemberDecl::Type(nested) => self.evaluate_type(&id, nested, builder),
                MemberDecl::Func(func) => self.evaluate_func(&id, func, func.is_static, builder),
                MemberDecl::Var(var) => {
                    let ty = self.resolve_type_expr(&var.ty);
                    let mut info = VarInfo::new(var_decl_id(&id, var), ty);
                    if var.is_static {
                        info = info.static_member();
                    }
                    builder.add_var(info);
                }
                MemberDecl::EnumCase(case) => enum_cases.push(Name::new(&case.name)),
            }
        }
        self.decl_scope.pop();

        let mut info = TypeInfo::new(id, type_kind(decl.kind), type_params).with_enum_cases(enum_cases);
        if let Some(base) = base {
            info = info.with_base(base);
        }
        builder.add_type(info);
    }

    /// Only classes and structs can be derived from.
    fn evaluate_base(&mut self, expr: &TypeExpr) -> Option<TypeValue> {
        let ty = self.resolve_type_expr(expr);
        if ty.is_unresolved() {
            return None;
        }
        let derivable = ty
            .as_nominal()
            .and_then(|nominal| self.type_kind(&nominal.id))
            .is_some_and(|kind| matches!(kind, TypeKind::Class | TypeKind::Struct));
        if !derivable {
            self.add_error(
                SemanticError::InvalidBaseType {
                    found: ty.to_string(),
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
            return None;
        }
        Some(ty)
    }

    fn evaluate_func(
        &mut self,
        outer: &ItemId,
        decl: &FuncDecl,
        is_static: bool,
        builder: &mut ModuleMetadataBuilder,
    ) {
        let id = func_decl_id(outer, decl);
        let type_params = param_names(&decl.type_params);
        self.decl_scope.push(DeclScope {
            id: id.clone(),
            type_params: type_params.clone(),
            is_type: false,
        });
        let params = decl
            .params
            .iter()
            .map(|param| ParamInfo::new(&param.name, self.resolve_type_expr(&param.ty)))
            .collect();
        let ret = self.resolve_type_expr(&decl.ret);
        self.decl_scope.pop();

        let mut info = FuncInfo::new(id, type_params, params, ret);
        if decl.is_sequence {
            info = info.sequence();
        }
        if is_static {
            info = info.static_member();
        }
        builder.add_func(info);
    }

    // ========================================================================
    // Phase 3: script metadata
    // ========================================================================

    /// Finish the script metadata. A base-type cycle is a structural failure
    /// (`None`).
    pub(super) fn build_script_metadata(&mut self, builder: ModuleMetadataBuilder) -> Option<Rc<ModuleMetadata>> {
        let metadata = builder.build();
        let bases: FxHashMap<ItemId, ItemId> = metadata
            .types()
            .filter_map(|info| Some((info.id.clone(), info.base.as_ref()?.as_nominal()?.id.clone())))
            .collect();

        let mut cyclic: Vec<ItemId> = Vec::new();
        for start in bases.keys() {
            let mut current = bases.get(start);
            for _ in 0..bases.len() {
                match current {
                    Some(next) if next == start => {
                        cyclic.push(start.clone());
                        break;
                    }
                    Some(next) => current = bases.get(next),
                    None => break,
                }
            }
        }
        cyclic.sort_by_key(|id| self.skeleton.types.get(id).map(|t| t.node));
        for id in &cyclic {
            if let Some(decl) = self.skeleton.types.get(id).cloned() {
                self.add_error(
                    SemanticError::CyclicBaseType {
                        name: id.to_string(),
                        span: decl.span.into(),
                    },
                    decl.node,
                    decl.span,
                );
            }
        }
        if !cyclic.is_empty() {
            return None;
        }
        Some(Rc::new(metadata))
    }

    // ========================================================================
    // Declaration queries usable before the script metadata exists
    // ========================================================================

    pub(super) fn type_exists(&self, id: &ItemId) -> bool {
        self.skeleton.types.contains_key(id) || self.meta.type_info(id).is_some()
    }

    pub(super) fn type_kind(&self, id: &ItemId) -> Option<TypeKind> {
        match self.skeleton.types.get(id) {
            Some(skeleton) => Some(skeleton.kind),
            None => self.meta.type_info(id).map(|info| info.kind),
        }
    }

    pub(super) fn declared_type_params(&self, id: &ItemId) -> Vec<Name> {
        match self.skeleton.types.get(id) {
            Some(skeleton) => skeleton.type_params.clone(),
            None => self.meta.type_params_of(id).map(<[Name]>::to_vec).unwrap_or_default(),
        }
    }
}
