// storage.rs
//
// Address forms the runtime consumes for readable/assignable locations.

use quill_identity::{ItemId, Name};
use quill_syntax::NodeId;

use crate::capture::CaptureKind;
use crate::type_value::{FuncValue, TypeValue, VarValue};

/// Where a value lives. Produced once per resolved identifier, member access
/// or declaration, and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageInfo {
    /// Top-level variable of a module (the script's own module vars included).
    ModuleGlobal(ItemId),
    /// Top-level `var` of the script body, by generated slot.
    PrivateGlobal(usize),
    /// Slot in the active function frame.
    Local(usize),
    EnumCase(Name),
    /// `object` is the receiver type and expression when the access goes
    /// through a value. Static vars are only reachable through their type name
    /// (`T.x`), which yields `None`; `var` carries the type and its arguments.
    StaticMember {
        object: Option<(TypeValue, NodeId)>,
        var: VarValue,
    },
    InstanceMember {
        object: NodeId,
        object_type: TypeValue,
        name: Name,
    },
}

impl StorageInfo {
    pub fn is_local(&self) -> bool {
        matches!(self, StorageInfo::Local(_))
    }

    /// True for storages a plain store can write.
    pub fn is_writable(&self) -> bool {
        !matches!(self, StorageInfo::EnumCase(_))
    }
}

/// Resolved target of an assignment or `++`/`--`.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// Plain store into `storage`.
    Direct { storage: StorageInfo, ty: TypeValue },
    /// Property-like target. The runtime evaluates `object` and `args` once,
    /// calls `getter(args)` when the current value is needed and
    /// `setter(args, value)` to store.
    CallBased {
        object: NodeId,
        object_type: TypeValue,
        getter: FuncValue,
        setter: FuncValue,
        args: Vec<NodeId>,
        ty: TypeValue,
    },
}

impl AssignTarget {
    pub fn ty(&self) -> &TypeValue {
        match self {
            AssignTarget::Direct { ty, .. } | AssignTarget::CallBased { ty, .. } => ty,
        }
    }

    pub fn storage(&self) -> Option<&StorageInfo> {
        match self {
            AssignTarget::Direct { storage, .. } => Some(storage),
            AssignTarget::CallBased { .. } => None,
        }
    }
}

/// One outer local wired into a lambda or task body.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureInfo {
    pub name: String,
    pub kind: CaptureKind,
    /// Storage in the enclosing function.
    pub storage: StorageInfo,
    pub ty: TypeValue,
    /// Slot the capture occupies in the new body's frame.
    pub local: usize,
}
