//! Generate typed RPC bindings from a parsed interface model.
//!
//! Pipeline: [`schema::Interface`] → [`build_bundle`] (target-neutral
//! declarations) → [`render::Backend`] (source text).

pub mod client;
pub mod decl;
pub mod declare;
pub mod error;
pub mod mapper;
pub mod naming;
pub mod path_de;
pub mod registry;
pub mod render;
pub mod rpc;
pub mod schema;
pub mod server;

use crate::decl::{Bundle, ErrorRegistry};
use crate::naming::Namespace;
use crate::render::{Backend, RustBackend};
use crate::schema::Interface;

pub use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Options {
    /// Module wrapping the generated items.
    pub package: String,
    /// Runtime module path imported as `rpc` by the generated code.
    pub runtime: String,
}

impl Options {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            runtime: render::rust::DEFAULT_RUNTIME.to_string(),
        }
    }
}

/// Every declaration generated for one interface, in emission order.
///
/// Declared types keep their names; every generated name is claimed after
/// them and stepped around any clash.
pub fn build_bundle(iface: &Interface) -> Bundle {
    let types = declare::declare_types(iface);
    let mut names = Namespace::new();
    for decl in &types {
        names.claim(decl.name());
    }
    let errors = ErrorRegistry::build(iface, &mut names);
    let methods = client::declare_methods(iface, &mut names);
    let client = client::declare_client(&methods, &mut names);
    let server = server::declare_server(&methods, &mut names);

    tracing::debug!(
        interface = %iface.name,
        types = types.len(),
        errors = errors.errors.len(),
        methods = methods.len(),
        "declared bindings"
    );

    Bundle {
        interface: iface.name.clone(),
        types,
        errors,
        methods,
        client,
        server,
    }
}

/// Render Rust bindings for `iface`. Output depends only on the interface's
/// content, never on its member order.
pub fn generate(iface: &Interface, options: &Options) -> String {
    let backend = RustBackend::new(options.package.as_str()).with_runtime(options.runtime.as_str());
    backend.render(&build_bundle(iface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldMapping, Kind, MethodDef, TypeDef, TypeRef};

    fn point_fields() -> FieldMapping {
        let mut fields = FieldMapping::new();
        fields.insert("x".into(), TypeRef::new(Kind::Int));
        fields.insert("y".into(), TypeRef::new(Kind::Int));
        fields
    }

    fn foo() -> Interface {
        let mut iface = Interface { name: "org.example.Foo".into(), ..Interface::default() };
        iface.types.insert("Point".into(), TypeDef::Struct { fields: point_fields() });
        let mut output = FieldMapping::new();
        output.insert("point".into(), TypeRef::named("Point"));
        iface.methods.insert("GetPoint".into(), MethodDef { input: FieldMapping::new(), output });
        iface.errors.insert("NotFound".into(), FieldMapping::new());
        iface
    }

    #[test]
    fn renders_example_interface() {
        let out = generate(&foo(), &Options::new("foo"));
        assert!(out.contains("pub mod foo {"));
        assert!(out.contains("pub struct Point {"));
        assert!(out.contains("#[serde(rename = \"x\")]"));
        assert!(out.contains("pub struct GetPointIn {}"));
        assert!(out.contains("pub point: Point,"));
        assert!(out.contains("pub struct NotFoundError {}"));
        assert!(out.contains(
            "\"org.example.Foo.NotFound\" => ::std::result::Result::Ok(Self::NotFound("
        ));
        assert!(out.contains("Self::NotFound(_) => \"org.example.Foo.NotFound\","));
        assert!(out.contains(".call(\"org.example.Foo.GetPoint\", rpc::encode(&input)?)"));
        assert!(out.contains(
            "fn get_point(&self, input: GetPointIn) -> ::std::result::Result<GetPointOut, Error>;"
        ));
        assert!(out.contains("\"org.example.Foo.GetPoint\" => {"));
    }

    #[test]
    fn output_ignores_member_order() {
        let mut reversed = Interface { name: "org.example.Foo".into(), ..Interface::default() };
        let original = foo();
        for (k, v) in original.errors.iter().rev() {
            reversed.errors.insert(k.clone(), v.clone());
        }
        for (k, v) in original.methods.iter().rev() {
            reversed.methods.insert(k.clone(), v.clone());
        }
        let mut fields = FieldMapping::new();
        fields.insert("y".into(), TypeRef::new(Kind::Int));
        fields.insert("x".into(), TypeRef::new(Kind::Int));
        reversed.types.insert("Point".into(), TypeDef::Struct { fields });

        let options = Options::new("foo");
        assert_eq!(generate(&original, &options), generate(&reversed, &options));
    }

    #[test]
    fn generation_is_repeatable() {
        let options = Options::new("foo");
        assert_eq!(generate(&foo(), &options), generate(&foo(), &options));
    }

    #[test]
    fn declared_types_win_over_generated_names() {
        let mut iface = foo();
        for name in ["Error", "Client", "Handler", "GetPointIn"] {
            iface.types.insert(name.into(), TypeDef::Struct { fields: FieldMapping::new() });
        }
        let bundle = build_bundle(&iface);
        assert_eq!(bundle.errors.name, "Error_");
        assert_eq!(bundle.client.name, "Client_");
        assert_eq!(bundle.server.capability, "Backend");
        assert_eq!(bundle.server.dispatcher, "Handler_");
        assert_eq!(bundle.methods[0].input.name, "GetPointIn_");
        assert_eq!(bundle.client.operations[0].input, "GetPointIn_");

        let out = generate(&iface, &Options::new("foo"));
        assert_eq!(out.matches("pub enum Error_ {").count(), 1);
        assert_eq!(out.matches("pub struct Error {}").count(), 1);
        assert!(out.contains("-> ::std::result::Result<GetPointOut, Error_>;"));
    }

    #[test]
    fn bundle_names_follow_interface() {
        let bundle = build_bundle(&foo());
        assert_eq!(bundle.interface, "org.example.Foo");
        assert_eq!(bundle.types[0].name(), "Point");
        assert_eq!(bundle.methods[0].wire_name, "org.example.Foo.GetPoint");
        assert_eq!(bundle.errors.decode("org.example.Foo.NotFound"), Some("NotFoundError"));
    }
}
