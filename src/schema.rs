//! The interface model handed over by the IDL parser.
//!
//! Everything here is plain data. The generator only borrows it; nothing in
//! the crate mutates an `Interface` after it was loaded.
//!
//! Maps are `IndexMap`s so the order the parser produced is preserved
//! verbatim. Emission never relies on that order: every generator sorts keys
//! before it emits anything.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Field name → type. Used for structs, method inputs/outputs and errors.
pub type FieldMapping = IndexMap<String, TypeRef>;

/// Root schema object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Dot-delimited namespace, e.g. `org.example.Foo`.
    pub name: String,
    #[serde(default)]
    pub types: IndexMap<String, TypeDef>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodDef>,
    #[serde(default)]
    pub errors: IndexMap<String, FieldMapping>,
}

/// A named type declared at interface scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDef {
    Struct {
        #[serde(default)]
        fields: FieldMapping,
    },
    Enum { variants: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    #[serde(default, rename = "in")]
    pub input: FieldMapping,
    #[serde(default, rename = "out")]
    pub output: FieldMapping,
}

/// A (possibly nullable) reference to a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(flatten)]
    pub kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Kind {
    Bool,
    Int,
    Float,
    String,
    /// Opaque payload with no typed shape.
    Object,
    Array { inner: Box<TypeRef> },
    /// Keys are always strings.
    Map { inner: Box<TypeRef> },
    /// Reference to an entry of `Interface::types`.
    Name { name: String },
    Struct {
        #[serde(default)]
        fields: FieldMapping,
    },
    Enum { variants: Vec<String> },
}

impl TypeRef {
    pub fn new(kind: Kind) -> Self {
        Self { nullable: false, kind }
    }

    pub fn nullable(kind: Kind) -> Self {
        Self { nullable: true, kind }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Kind::Name { name: name.into() })
    }

    pub fn array(inner: TypeRef) -> Self {
        Self::new(Kind::Array { inner: Box::new(inner) })
    }

    pub fn map(inner: TypeRef) -> Self {
        Self::new(Kind::Map { inner: Box::new(inner) })
    }
}

impl Interface {
    /// Parse a JSON-serialized model. Errors carry the JSON path of the
    /// offending node.
    pub fn from_json(source: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(source)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        crate::path_de::from_slice_with_path(&bytes).map_err(|error| error.at(path))
    }

    /// Wire name of a member (method or error) of this interface.
    pub fn qualify(&self, member: &str) -> String {
        format!("{}.{}", self.name, member)
    }
}
