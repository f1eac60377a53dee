//! quill semantic analysis: the generic type-value model, metadata lookup,
//! substitution, and the single-pass analyzer that produces storage addresses
//! and templates for the runtime.

pub mod analyzer;
pub mod applier;
pub mod capture;
pub mod errors;
pub mod infer;
pub mod metadata;
pub mod node_map;
pub mod storage;
pub mod type_value;
pub mod type_value_service;
pub mod well_known;

// Internal modules (not part of the public API)
pub(crate) mod type_display;

#[cfg(test)]
mod testing;

// Re-exports: public API surface
pub use analyzer::{
    AnalysisOutput, Analyzer, AnalyzerBuilder, FuncContext, IdentifierInfo, ReturnType, Template, TemplateKind,
    TypeError,
};
pub use applier::{TypeEnv, TypeValueApplier};
pub use capture::{CaptureBody, CaptureKind, Capturer, FreeVariableCapturer, NeedCapture};
pub use errors::SemanticError;
pub use metadata::{
    FuncInfo, MetadataService, MetadataSource, ModuleMetadata, ModuleMetadataBuilder, ParamInfo, TypeInfo, TypeKind,
    VarInfo,
};
pub use node_map::{CallInfo, LambdaInfo, NodeData, NodeInfo, NodeMap};
pub use storage::{AssignTarget, CaptureInfo, StorageInfo};
pub use type_value::{FuncValue, FunctionType, NominalType, TypeArgs, TypeParamRef, TypeValue, VarValue};
pub use type_value_service::{MemberLookupError, TypeValueService};
