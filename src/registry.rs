//! Error registry: typed error shapes plus the decode/encode tables.

use crate::decl::{ErrorDecl, ErrorRegistry};
use crate::declare::declare_record;
use crate::naming::{Namespace, type_ident};
use crate::schema::Interface;

pub const ERROR_ENUM: &str = "Error";

impl ErrorRegistry {
    /// Build the registry for the interface's declared errors, sorted by name.
    ///
    /// The enum and record names are claimed from `names`, so they never
    /// shadow a declared type.
    pub fn build(iface: &Interface, names: &mut Namespace) -> Self {
        let mut errors: Vec<&String> = iface.errors.keys().collect();
        errors.sort();

        let mut registry = ErrorRegistry {
            name: names.claim(ERROR_ENUM),
            ..ErrorRegistry::default()
        };
        let mut variants = Namespace::new();
        for name in errors {
            let mut record = declare_record(&format!("{name}Error"), &iface.errors[name]);
            record.name = names.claim(record.name);
            let wire_name = iface.qualify(name);

            registry.decode.insert(wire_name.clone(), record.name.clone());
            registry.encode.insert(record.name.clone(), wire_name.clone());
            registry.errors.push(ErrorDecl {
                name: name.clone(),
                wire_name,
                variant: variants.claim(type_ident(name)),
                record,
            });
        }
        registry
    }

    /// Error type for an incoming wire name. `None` means the failure is not
    /// ours and must be passed through untouched.
    pub fn decode(&self, wire_name: &str) -> Option<&str> {
        self.decode.get(wire_name).map(String::as_str)
    }

    /// Wire name of a declared error type.
    ///
    /// Only declared error types can reach the encode path; asking for any
    /// other type is a broken caller.
    pub fn encode(&self, type_name: &str) -> &str {
        match self.encode.get(type_name) {
            Some(wire_name) => wire_name,
            None => unreachable!("error type {type_name} is not declared by this interface"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldMapping, Kind, TypeRef};

    fn iface() -> Interface {
        let mut iface = Interface { name: "org.example.Foo".into(), ..Interface::default() };
        let mut fields = FieldMapping::new();
        fields.insert("id".into(), TypeRef::nullable(Kind::String));
        iface.errors.insert("NotFound".into(), fields);
        iface.errors.insert("Denied".into(), FieldMapping::new());
        iface
    }

    #[test]
    fn errors_are_sorted_and_suffixed() {
        let registry = ErrorRegistry::build(&iface(), &mut Namespace::new());
        let names: Vec<_> = registry.errors.iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, ["DeniedError", "NotFoundError"]);
        assert_eq!(registry.errors[1].wire_name, "org.example.Foo.NotFound");
        assert_eq!(registry.errors[1].record.fields[0].wire_name, "id");
        assert!(registry.errors[1].record.fields[0].omit_when_absent);
    }

    #[test]
    fn tables_are_inverse() {
        let registry = ErrorRegistry::build(&iface(), &mut Namespace::new());
        for error in &registry.errors {
            let type_name = registry.decode(&error.wire_name).unwrap();
            assert_eq!(type_name, error.record.name);
            assert_eq!(registry.encode(type_name), error.wire_name);
        }
    }

    #[test]
    fn unknown_wire_name_is_not_decoded() {
        let registry = ErrorRegistry::build(&iface(), &mut Namespace::new());
        assert_eq!(registry.decode("org.example.Bar.NotFound"), None);
        assert_eq!(registry.decode("NotFound"), None);
    }

    #[test]
    fn generated_names_avoid_declared_types() {
        let mut names = Namespace::new();
        names.claim("Error");
        names.claim("NotFoundError");
        let registry = ErrorRegistry::build(&iface(), &mut names);
        assert_eq!(registry.name, "Error_");
        assert_eq!(registry.errors[1].record.name, "NotFoundError_");
        assert_eq!(registry.errors[1].variant, "NotFound");
        assert_eq!(registry.decode("org.example.Foo.NotFound"), Some("NotFoundError_"));
    }

    #[test]
    #[should_panic(expected = "not declared")]
    fn encoding_a_foreign_type_is_a_defect() {
        ErrorRegistry::build(&iface(), &mut Namespace::new()).encode("BogusError");
    }
}
