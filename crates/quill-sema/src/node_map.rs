//! Per-node analysis results.
//!
//! The runtime reads everything it needs about a syntax node from here,
//! keyed by the node's `NodeId`.

use rustc_hash::FxHashMap;

use quill_syntax::NodeId;

use crate::storage::{AssignTarget, CaptureInfo, StorageInfo};
use crate::type_value::{FuncValue, TypeValue};

/// What a call expression invokes.
#[derive(Debug, Clone, PartialEq)]
pub enum CallInfo {
    /// Named function. `object` is the receiver of an instance call.
    Func {
        func: FuncValue,
        object: Option<NodeId>,
    },
    /// Callee is a value of function type.
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaInfo {
    pub captures: Vec<CaptureInfo>,
    /// Index into the output's template list.
    pub template: usize,
}

/// Kind-specific result for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeInfo {
    /// Readable location (identifier or member access).
    Storage(StorageInfo),
    /// Reference to a function used as a value or callee.
    Func(FuncValue),
    /// Resolved type expression, or an identifier naming a type.
    Type(TypeValue),
    Call(CallInfo),
    /// Indexer read.
    Indexer { getter: FuncValue },
    Assign(AssignTarget),
    /// `++`/`--`. `operator` is the target type's `operator++`/`operator--`.
    IncDec {
        target: AssignTarget,
        operator: FuncValue,
        is_prefix: bool,
    },
    Lambda(LambdaInfo),
    Task(LambdaInfo),
    /// Slot of a declared variable.
    VarDecl(StorageInfo),
    /// Tested type of an `is` expression.
    IsTest { ty: TypeValue },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    pub ty: Option<TypeValue>,
    pub info: Option<NodeInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    nodes: FxHashMap<NodeId, NodeData>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, node: NodeId, ty: TypeValue) {
        self.nodes.entry(node).or_default().ty = Some(ty);
    }

    pub fn set_info(&mut self, node: NodeId, info: NodeInfo) {
        self.nodes.entry(node).or_default().info = Some(info);
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(&node)
    }

    pub fn ty(&self, node: NodeId) -> Option<&TypeValue> {
        self.nodes.get(&node)?.ty.as_ref()
    }

    pub fn info(&self, node: NodeId) -> Option<&NodeInfo> {
        self.nodes.get(&node)?.info.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter().map(|(id, data)| (*id, data))
    }
}
