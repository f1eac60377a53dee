// Analysis output, builder, and diagnostic types for the analyzer.

use std::rc::Rc;

use quill_identity::{ItemId, Span};
use quill_syntax::NodeId;

use crate::capture::{Capturer, FreeVariableCapturer};
use crate::errors::SemanticError;
use crate::metadata::{MetadataSource, ModuleMetadata};
use crate::node_map::NodeMap;
use crate::type_value::TypeValue;
use crate::well_known::runtime_module;

use super::Analyzer;

/// A type error wrapping a miette-enabled SemanticError
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    /// Node the error was reported against.
    pub node: NodeId,
    pub span: Span,
}

impl TypeError {
    pub fn new(error: SemanticError, node: NodeId, span: Span) -> Self {
        Self { error, node, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    /// Top-level statements of the script.
    ScriptBody,
    Func(ItemId),
    Lambda(NodeId),
    Task(NodeId),
}

/// Everything the runtime needs to execute one analyzed body.
#[derive(Debug, Clone)]
pub struct Template {
    pub kind: TemplateKind,
    /// Frame size: parameters, captures and every local ever declared.
    pub local_count: usize,
    /// Element type of a sequence function.
    pub seq_return_type: Option<TypeValue>,
    pub is_this_call: bool,
    /// Body node (block or expression); `None` for the script body, whose
    /// statements are the script's top-level statements.
    pub body: Option<NodeId>,
}

/// Output from semantic analysis. Only produced when no error was recorded.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub node_map: NodeMap,
    pub private_global_count: usize,
    /// Frame size of the script body.
    pub script_local_count: usize,
    /// In completion order: a nested lambda precedes the body containing it.
    pub templates: Vec<Template>,
    pub script_metadata: Rc<ModuleMetadata>,
}

impl AnalysisOutput {
    /// Template of the function declared as `id`.
    pub fn func_template(&self, id: &ItemId) -> Option<&Template> {
        self.templates
            .iter()
            .find(|template| matches!(&template.kind, TemplateKind::Func(func) if func == id))
    }
}

/// Builder for configuring an Analyzer.
pub struct AnalyzerBuilder {
    module_name: String,
    modules: Vec<Rc<dyn MetadataSource>>,
    capturer: Box<dyn Capturer>,
}

impl AnalyzerBuilder {
    /// Create a new builder for the script module `module_name`.
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            modules: Vec::new(),
            capturer: Box::new(FreeVariableCapturer),
        }
    }

    /// Reference a pre-built module.
    pub fn with_module(mut self, module: Rc<dyn MetadataSource>) -> Self {
        self.modules.push(module);
        self
    }

    /// Replace the built-in free-variable capturer.
    pub fn with_capturer(mut self, capturer: Box<dyn Capturer>) -> Self {
        self.capturer = capturer;
        self
    }

    /// Build the Analyzer. The runtime module is always referenced first.
    pub fn build(self) -> Analyzer {
        let mut refs: Vec<Rc<dyn MetadataSource>> = Vec::with_capacity(self.modules.len() + 1);
        refs.push(Rc::new(runtime_module()));
        refs.extend(self.modules);
        Analyzer::new(self.module_name, refs, self.capturer)
    }
}
