use serde::Serialize;

use crate::ast::SourceSpan;
use crate::finding::Finding;
use crate::flow::{FlowFacts, OperationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

impl Visibility {
    /// Unknown or missing visibility is treated as internal so it never
    /// produces an entry point by accident.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("public") => Visibility::Public,
            Some("external") => Visibility::External,
            Some("private") => Visibility::Private,
            _ => Visibility::Internal,
        }
    }

    pub fn is_entry_point(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl Mutability {
    /// Pre-0.5 `constant` functions are views.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("pure") => Mutability::Pure,
            Some("view") | Some("constant") => Mutability::View,
            Some("payable") => Mutability::Payable,
            _ => Mutability::NonPayable,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Mutability::Pure | Mutability::View)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionKind {
    Function,
    Fallback,
    Receive,
    FreeFunction,
}

impl FunctionKind {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("fallback") => FunctionKind::Fallback,
            Some("receive") => FunctionKind::Receive,
            Some("freeFunction") => FunctionKind::FreeFunction,
            _ => FunctionKind::Function,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateVariable {
    pub name: String,
    pub type_name: String,
    pub is_owner_like: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    #[serde(skip)]
    pub span: Option<SourceSpan>,
}

impl Parameter {
    pub fn is_address(&self) -> bool {
        self.type_name.contains("address")
    }

    /// Integer-typed and not address-typed, so each parameter lands in at
    /// most one validation class.
    pub fn is_integer(&self) -> bool {
        !self.is_address() && self.type_name.contains("int")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitiveOperation {
    pub kind: OperationKind,
    pub detail: String,
    /// First occurrence, relative to the body slice.
    #[serde(skip)]
    pub offset: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccessControlEvidence {
    pub uses_known_modifier: bool,
    pub has_owner_guard_expression: bool,
    pub owner_variable_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub mutability: Mutability,
    pub is_entry_point: bool,
    #[serde(skip)]
    pub span: Option<SourceSpan>,
    /// Span of the text the heuristics ran over: the body block, or the whole
    /// definition when the body has no usable span.
    #[serde(skip)]
    pub body_span: Option<SourceSpan>,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub sensitive_ops: Vec<SensitiveOperation>,
    pub mutates_state: bool,
    pub has_access_control: bool,
    pub access_control: AccessControlEvidence,
    pub flow: FlowFacts,
}

impl FunctionSummary {
    pub fn has_op(&self, kind: OperationKind) -> bool {
        self.sensitive_ops.iter().any(|op| op.kind == kind)
    }

    pub fn has_value_flow(&self) -> bool {
        self.sensitive_ops.iter().any(|op| op.kind.is_value_flow())
    }

    pub fn first_op(&self, kind: OperationKind) -> Option<&SensitiveOperation> {
        self.sensitive_ops
            .iter()
            .filter(|op| op.kind == kind)
            .min_by_key(|op| op.offset)
    }

    /// Absolute source offset of a body-relative offset.
    pub fn absolute_offset(&self, relative: usize) -> Option<usize> {
        self.body_span.map(|span| span.start + relative)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractSummary {
    pub name: String,
    pub kind: String,
    pub state_variables: Vec<StateVariable>,
    pub functions: Vec<FunctionSummary>,
    pub findings: Vec<Finding>,
}

impl ContractSummary {
    pub fn owner_variable_names(&self) -> Vec<String> {
        self.state_variables
            .iter()
            .filter(|v| v.is_owner_like)
            .map(|v| v.name.clone())
            .collect()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSummary> {
        self.functions.iter().find(|f| f.name == name)
    }
}
