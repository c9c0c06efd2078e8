use crate::decl::{FieldDecl, TargetType};
use crate::naming::type_ident;
use crate::schema::{FieldMapping, Kind, TypeRef};

/// Resolve a schema type into its target representation.
///
/// Nullability is stripped first and re-applied around the mapped kind, so it
/// composes with every kind, `Name` references included.
pub fn map_type(ty: &TypeRef) -> TargetType {
    let core = map_kind(&ty.kind);
    if ty.nullable {
        TargetType::Optional(Box::new(core))
    } else {
        core
    }
}

fn map_kind(kind: &Kind) -> TargetType {
    match kind {
        Kind::Bool => TargetType::Bool,
        Kind::Int => TargetType::Int,
        Kind::Float => TargetType::Float,
        Kind::String => TargetType::Text,
        Kind::Object => TargetType::Raw,
        Kind::Array { inner } => TargetType::List(Box::new(map_type(inner))),
        Kind::Map { inner } => TargetType::Map(Box::new(map_type(inner))),
        Kind::Name { name } => TargetType::Named(type_ident(name)),
        Kind::Struct { fields } => TargetType::Record(map_fields(fields)),
        // inline enums have no declared name to refer to; they travel as text
        Kind::Enum { .. } => TargetType::Text,
    }
}

/// Map a field mapping, sorted by wire name.
pub fn map_fields(fields: &FieldMapping) -> Vec<FieldDecl> {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|name| {
            let ty = &fields[name];
            FieldDecl {
                wire_name: name.clone(),
                ty: map_type(ty),
                omit_when_absent: ty.nullable,
            }
        })
        .collect()
}
