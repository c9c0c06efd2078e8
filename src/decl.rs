//! Target-neutral declaration tree.
//!
//! This is what the generators produce and what a [`crate::render::Backend`]
//! consumes. Every `Vec` in here is already in emission order.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
    Bool,
    Int,
    Float,
    Text,
    /// Opaque payload, held as a generic JSON tree.
    Raw,
    List(Box<TargetType>),
    /// String-keyed map.
    Map(Box<TargetType>),
    Named(String),
    /// Anonymous record; fields sorted by wire name.
    Record(Vec<FieldDecl>),
    /// Value may be absent, distinguishable from the zero value.
    Optional(Box<TargetType>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name as it appears on the wire.
    pub wire_name: String,
    pub ty: TargetType,
    /// Nullable fields are left out of the encoding when absent.
    pub omit_when_absent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<EnumConst>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConst {
    /// `type_ident(value)`, made unique within the enum.
    pub ident: String,
    /// The literal wire string.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Record(RecordDecl),
    Enum(EnumDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Record(record) => &record.name,
            TypeDecl::Enum(decl) => &decl.name,
        }
    }
}

/// A declared error: its record shape plus its stable identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDecl {
    /// Name as declared in the schema, e.g. `NotFound`.
    pub name: String,
    /// Fully-qualified wire name, e.g. `org.example.Foo.NotFound`.
    pub wire_name: String,
    /// Case of the closed error enum wrapping the record.
    pub variant: String,
    /// Record named `<name>Error`.
    pub record: RecordDecl,
}

/// The closed set of errors of one interface and the two lookup tables over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorRegistry {
    /// Closed enum over every declared error.
    pub name: String,
    pub errors: Vec<ErrorDecl>,
    /// wire name → error type name; used when a generic failure comes in.
    pub decode: BTreeMap<String, String>,
    /// error type name → wire name; used when a typed error goes out.
    pub encode: BTreeMap<String, String>,
}

/// Input/output shapes of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub wire_name: String,
    pub input: RecordDecl,
    pub output: RecordDecl,
}

/// One call site shared by the client and server surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operation identifier in the target language.
    pub ident: String,
    pub wire_name: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientDecl {
    pub name: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerDecl {
    /// Capability trait an implementation must satisfy.
    pub capability: String,
    /// Request router bound to a capability.
    pub dispatcher: String,
    pub operations: Vec<Operation>,
    /// Reserved error name reported for unknown methods.
    pub not_found: String,
}

/// Everything generated for one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub interface: String,
    pub types: Vec<TypeDecl>,
    pub errors: ErrorRegistry,
    pub methods: Vec<MethodDecl>,
    pub client: ClientDecl,
    pub server: ServerDecl,
}
