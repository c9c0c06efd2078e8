//! Named type declarations.

use crate::decl::{EnumConst, EnumDecl, RecordDecl, TypeDecl};
use crate::mapper::map_fields;
use crate::naming::{Namespace, type_ident};
use crate::schema::{FieldMapping, Interface, TypeDef};

/// Declare every named type of the interface, sorted by name.
pub fn declare_types(iface: &Interface) -> Vec<TypeDecl> {
    let mut names: Vec<&String> = iface.types.keys().collect();
    names.sort();

    names
        .into_iter()
        .map(|name| match &iface.types[name] {
            TypeDef::Struct { fields } => TypeDecl::Record(declare_record(name, fields)),
            TypeDef::Enum { variants } => TypeDecl::Enum(declare_enum(name, variants)),
        })
        .collect()
}

pub fn declare_record(name: &str, fields: &FieldMapping) -> RecordDecl {
    RecordDecl {
        name: type_ident(name),
        fields: map_fields(fields),
    }
}

/// Variants keep their declared order; each value is the literal wire string.
pub fn declare_enum(name: &str, variants: &[String]) -> EnumDecl {
    let mut idents = Namespace::new();
    EnumDecl {
        name: type_ident(name),
        variants: variants
            .iter()
            .map(|value| EnumConst {
                ident: idents.claim(type_ident(value)),
                value: value.clone(),
            })
            .collect(),
    }
}
