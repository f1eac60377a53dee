// analyzer/functions.rs
//
// Phase 4 driver: the script body, then every global and member function body.

use quill_identity::ItemId;
use quill_syntax::{FuncDecl, MemberDecl, Script, ScriptElement, TypeDecl};

use crate::node_map::NodeInfo;
use crate::storage::StorageInfo;
use crate::type_value::TypeValue;

use super::declarations::{DeclScope, func_decl_id, param_names, type_decl_id};
use super::{Analyzer, FuncContext, ReturnType, TemplateKind};

impl Analyzer {
    pub(super) fn analyze_bodies(&mut self, script: &Script) {
        for element in &script.elements {
            if let ScriptElement::Stmt(stmt) = element {
                self.stmt(stmt);
            }
        }
        let script_ctx = std::mem::replace(&mut self.func, FuncContext::script());
        self.push_template(TemplateKind::ScriptBody, &script_ctx, None);
        tracing::debug!(locals = script_ctx.local_count(), "script body analyzed");

        let root = self.script_root();
        for element in &script.elements {
            match element {
                ScriptElement::Type(decl) => self.analyze_type_bodies(&root, decl),
                ScriptElement::Func(decl) => self.analyze_func_body(&root, decl),
                ScriptElement::Stmt(_) => {}
            }
        }
    }

    fn analyze_type_bodies(&mut self, outer: &ItemId, decl: &TypeDecl) {
        let id = type_decl_id(outer, decl);
        self.decl_scope.push(DeclScope {
            id: id.clone(),
            type_params: param_names(&decl.type_params),
            is_type: true,
        });
        for member in &decl.members {
            match member {
                MemberDecl::Type(nested) => self.analyze_type_bodies(&id, nested),
                MemberDecl::Func(func) => self.analyze_func_body(&id, func),
                MemberDecl::Var(_) | MemberDecl::EnumCase(_) => {}
            }
        }
        self.decl_scope.pop();
    }

    #[tracing::instrument(level = "trace", skip_all, fields(func = %decl.name))]
    fn analyze_func_body(&mut self, outer: &ItemId, decl: &FuncDecl) {
        let id = func_decl_id(outer, decl);
        let info = self.types().func_info(&id).clone();
        self.decl_scope.push(DeclScope {
            id: id.clone(),
            type_params: info.type_params.clone(),
            is_type: false,
        });

        // A sequence function yields its declared type and returns nothing.
        let ctx = if info.is_sequence {
            FuncContext::new(ReturnType::Fixed(TypeValue::Void), Some(info.ret.clone()), !info.is_static)
        } else {
            FuncContext::new(ReturnType::Fixed(info.ret.clone()), None, !info.is_static)
        };
        let mut scope = self.enter_func(ctx);
        for (param, param_info) in decl.params.iter().zip(&info.params) {
            let slot = scope.func.add_local(&param.name, param_info.ty.clone());
            scope.node_map.set_info(param.id, NodeInfo::VarDecl(StorageInfo::Local(slot)));
        }
        scope.block(&decl.body);
        let ctx = scope.finish();
        self.decl_scope.pop();

        self.push_template(TemplateKind::Func(id), &ctx, Some(decl.body.id));
    }
}
