// analyzer/mod.rs
//
// Single-pass semantic analysis of one script: skeleton collection, type
// expression evaluation, script metadata build, then body analysis.

mod context;
mod declarations;
mod errors;
mod expr;
mod functions;
mod identifier;
mod lambda;
mod output;
mod state;
mod stmt;
mod type_resolution;

#[cfg(test)]
mod tests;

pub use context::{FuncContext, ReturnType};
pub use identifier::IdentifierInfo;
pub use output::{AnalysisOutput, AnalyzerBuilder, Template, TemplateKind, TypeError};

use std::rc::Rc;

use quill_identity::ItemId;
use quill_syntax::Script;

use crate::capture::Capturer;
use crate::metadata::{MetadataService, MetadataSource};
use crate::node_map::NodeMap;
use crate::type_value::TypeValue;
use crate::type_value_service::TypeValueService;

use declarations::{DeclScope, Skeleton};
use state::{Diagnostics, PrivateGlobals};

/// Analyzer for one script. Built with [`AnalyzerBuilder`]; consumed by
/// [`Analyzer::analyze`].
pub struct Analyzer {
    module_name: String,
    /// Referenced sources (runtime first). The script's own metadata is
    /// prepended to `meta` once it has been built.
    refs: Vec<Rc<dyn MetadataSource>>,
    capturer: Box<dyn Capturer>,
    meta: MetadataService,
    skeleton: Skeleton,
    /// Active function context. Swapped (not nested) on entering a function
    /// or lambda body.
    func: FuncContext,
    /// True while analyzing statements directly in the script body.
    global_scope: bool,
    private_globals: PrivateGlobals,
    /// Enclosing declarations, outermost first (for type-expression resolution).
    decl_scope: Vec<DeclScope>,
    node_map: NodeMap,
    templates: Vec<Template>,
    diagnostics: Diagnostics,
}

impl Analyzer {
    fn new(module_name: String, refs: Vec<Rc<dyn MetadataSource>>, capturer: Box<dyn Capturer>) -> Self {
        let meta = MetadataService::new(refs.clone());
        Self {
            module_name,
            refs,
            capturer,
            meta,
            skeleton: Skeleton::default(),
            func: FuncContext::script(),
            global_scope: true,
            private_globals: PrivateGlobals::default(),
            decl_scope: Vec::new(),
            node_map: NodeMap::new(),
            templates: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Analyze `script`. Any recorded error discards the whole output.
    #[tracing::instrument(skip_all, fields(module = %self.module_name))]
    pub fn analyze(mut self, script: &Script) -> Result<AnalysisOutput, Vec<TypeError>> {
        self.collect_skeleton(script);
        if self.diagnostics.has_error() {
            tracing::debug!(errors = self.diagnostics.len(), "skeleton collection failed");
            return Err(self.diagnostics.into_errors());
        }
        tracing::debug!(
            types = self.skeleton.types.len(),
            funcs = self.skeleton.funcs.len(),
            "skeleton collected"
        );

        let builder = self.evaluate_declarations(script);
        tracing::debug!(errors = self.diagnostics.len(), "declaration types evaluated");

        let script_metadata = match self.build_script_metadata(builder) {
            Some(metadata) => metadata,
            None => return Err(self.diagnostics.into_errors()),
        };
        let mut sources: Vec<Rc<dyn MetadataSource>> = Vec::with_capacity(self.refs.len() + 1);
        sources.push(script_metadata.clone());
        sources.extend(self.refs.iter().cloned());
        self.meta = MetadataService::new(sources);
        tracing::debug!(sources = ?self.meta, "script metadata built");

        self.analyze_bodies(script);
        tracing::debug!(
            templates = self.templates.len(),
            errors = self.diagnostics.len(),
            "bodies analyzed"
        );

        if self.diagnostics.has_error() {
            return Err(self.diagnostics.into_errors());
        }
        for template in &self.templates {
            assert!(
                template.seq_return_type.as_ref().is_none_or(|ty| !ty.contains_unresolved()),
                "INTERNAL ERROR: unresolved type reached template {:?}",
                template.kind
            );
        }
        debug_assert!(
            self.node_map.iter().all(|(_, data)| !data.ty.as_ref().is_some_and(TypeValue::contains_unresolved)),
            "INTERNAL ERROR: unresolved type in an error-free analysis"
        );

        let script_local_count = self
            .templates
            .iter()
            .find(|template| template.kind == TemplateKind::ScriptBody)
            .map_or(0, |template| template.local_count);
        Ok(AnalysisOutput {
            node_map: self.node_map,
            private_global_count: self.private_globals.count(),
            script_local_count,
            templates: self.templates,
            script_metadata,
        })
    }

    fn types(&self) -> TypeValueService<'_> {
        TypeValueService::new(&self.meta)
    }

    /// Id of the script module root.
    fn script_root(&self) -> ItemId {
        ItemId::module(&self.module_name)
    }
}
