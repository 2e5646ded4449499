use serde::Deserialize;

/// Root of a solc compact-JSON AST. Only the fields the extractor reads are modelled;
/// everything else in the compiler output is ignored during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl SourceUnit {
    pub fn contracts(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            Node::ContractDefinition(def) => Some(def),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "nodeType")]
pub enum Node {
    ContractDefinition(ContractDefinition),
    VariableDeclaration(VariableDeclaration),
    FunctionDefinition(FunctionDefinition),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contract_kind: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptions {
    #[serde(default)]
    pub type_string: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state_variable: bool,
    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
    #[serde(default)]
    pub src: Option<String>,
}

impl VariableDeclaration {
    pub fn type_string(&self) -> &str {
        self.type_descriptions.type_string.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierPath {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierInvocation {
    #[serde(default)]
    pub modifier_name: IdentifierPath,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterList {
    #[serde(default)]
    pub parameters: Vec<VariableDeclaration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    #[serde(default)]
    pub name: String,
    /// `function`, `constructor`, `fallback`, `receive` or `freeFunction`.
    /// Absent on pre-0.5 compilers, which set `isConstructor` instead.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<ModifierInvocation>,
    #[serde(default)]
    pub parameters: ParameterList,
    #[serde(default = "default_implemented")]
    pub implemented: bool,
    #[serde(default)]
    pub body: Option<Block>,
    #[serde(default)]
    pub src: Option<String>,
}

fn default_implemented() -> bool {
    true
}

impl FunctionDefinition {
    pub fn is_constructor(&self) -> bool {
        self.is_constructor || self.kind.as_deref() == Some("constructor")
    }

    pub fn modifier_names(&self) -> impl Iterator<Item = &str> {
        self.modifiers
            .iter()
            .filter_map(|m| m.modifier_name.name.as_deref())
    }
}
