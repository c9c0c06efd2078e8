//! Server capability contract and request dispatcher.

use crate::client::operations;
use crate::decl::{MethodDecl, ServerDecl};
use crate::naming::Namespace;
use crate::rpc::METHOD_NOT_FOUND;

pub const CAPABILITY: &str = "Backend";
pub const DISPATCHER: &str = "Handler";

/// One capability operation and one dispatch case per method.
///
/// The dispatcher compares wire names exactly; the order of the cases only
/// matters for reproducible output.
pub fn declare_server(methods: &[MethodDecl], names: &mut Namespace) -> ServerDecl {
    ServerDecl {
        capability: names.claim(CAPABILITY),
        dispatcher: names.claim(DISPATCHER),
        operations: operations(methods),
        not_found: METHOD_NOT_FOUND.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::declare_methods;
    use crate::schema::{Interface, MethodDef};

    #[test]
    fn one_case_per_method() {
        let mut iface = Interface { name: "org.example.Foo".into(), ..Interface::default() };
        iface.methods.insert("Set".into(), MethodDef::default());
        iface.methods.insert("Get".into(), MethodDef::default());

        let mut names = Namespace::new();
        let methods = declare_methods(&iface, &mut names);
        let server = declare_server(&methods, &mut names);
        assert_eq!(server.capability, "Backend");
        assert_eq!(server.dispatcher, "Handler");
        let wire: Vec<_> = server.operations.iter().map(|op| op.wire_name.as_str()).collect();
        assert_eq!(wire, ["org.example.Foo.Get", "org.example.Foo.Set"]);
        assert_eq!(server.operations[0].ident, "get");
    }

    #[test]
    fn not_found_name_is_outside_the_interface_namespace() {
        let server = declare_server(&[], &mut Namespace::new());
        assert_eq!(server.not_found, "org.varlink.service.MethodNotFound");
        assert!(server.operations.is_empty());
    }

    #[test]
    fn capability_and_dispatcher_avoid_declared_types() {
        let mut names = Namespace::new();
        names.claim("Backend");
        names.claim("Handler");
        let server = declare_server(&[], &mut names);
        assert_eq!(server.capability, "Backend_");
        assert_eq!(server.dispatcher, "Handler_");
    }
}
