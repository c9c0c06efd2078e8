//! Rust backend.
//!
//! Renders a [`Bundle`] into a single module using the `codegen` crate.
//! Items are emitted in bundle order: named types, errors, method shapes,
//! client, capability trait, dispatcher.
//!
//! Rust has no anonymous structs, so inline records are hoisted into named
//! structs called `<Owner><Field>` and emitted right after their owner.
//!
//! Declared types share the module with the generated items and may use any
//! name, `Option` and `Result` included. Every std item is therefore spelled
//! out by its full path.

use std::collections::VecDeque;

use codegen::{Block, Field, Scope};

use super::Backend;
use crate::decl::{
    Bundle, ClientDecl, EnumDecl, ErrorRegistry, MethodDecl, RecordDecl, ServerDecl, TargetType,
    TypeDecl,
};
use crate::naming::{Namespace, field_ident, type_ident};

pub const DEFAULT_RUNTIME: &str = "::varlink_codegen::rpc";

const OPTION: &str = "::std::option::Option";
const RESULT: &str = "::std::result::Result";
const STRING: &str = "::std::string::String";
const VEC: &str = "::std::vec::Vec";
const BTREE_MAP: &str = "::std::collections::BTreeMap";
const VALUE: &str = "::serde_json::Value";

const RECORD_DERIVES: &[&str] = &[
    "Debug",
    "Clone",
    "Default",
    "PartialEq",
    "::serde::Serialize",
    "::serde::Deserialize",
];

#[derive(Debug, Clone)]
pub struct RustBackend {
    /// Name of the module wrapping all generated items.
    pub module: String,
    /// Path of the runtime support module, imported as `rpc`.
    pub runtime: String,
}

impl RustBackend {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            runtime: DEFAULT_RUNTIME.to_string(),
        }
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }
}

impl Backend for RustBackend {
    fn render(&self, bundle: &Bundle) -> String {
        let mut generator = RustGenerator::new(bundle);
        generator.scope.raw(&format!("use {} as rpc;", self.runtime));

        for decl in &bundle.types {
            match decl {
                TypeDecl::Record(record) => generator.record(record, None),
                TypeDecl::Enum(decl) => generator.enumeration(decl),
            }
        }
        generator.errors(&bundle.errors);
        generator.method_shapes(&bundle.methods);
        generator.client(&bundle.client);
        generator.server(&bundle.server);

        let body = generator.scope.to_string();
        let mut out = String::new();
        out.push_str(&format!(
            "// @generated by varlink-codegen from `{}`. DO NOT EDIT.\n\n",
            bundle.interface
        ));
        out.push_str(&format!("/// Bindings for the `{}` interface.\n", bundle.interface));
        out.push_str("#[allow(unused, non_camel_case_types, clippy::all)]\n");
        out.push_str(&format!("pub mod {} {{\n", self.module));
        for line in body.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("}\n");
        out
    }
}

struct RustGenerator<'a> {
    bundle: &'a Bundle,
    scope: Scope,
    /// Every type name in the module; hoisted records claim theirs here.
    names: Namespace,
    hoisted: VecDeque<RecordDecl>,
}

impl<'a> RustGenerator<'a> {
    fn new(bundle: &'a Bundle) -> Self {
        let mut names = Namespace::new();
        for decl in &bundle.types {
            names.claim(decl.name());
        }
        names.claim(bundle.errors.name.as_str());
        for error in &bundle.errors.errors {
            names.claim(error.record.name.as_str());
        }
        for method in &bundle.methods {
            names.claim(method.input.name.as_str());
            names.claim(method.output.name.as_str());
        }
        names.claim(bundle.client.name.as_str());
        names.claim(bundle.server.capability.as_str());
        names.claim(bundle.server.dispatcher.as_str());

        Self {
            bundle,
            scope: Scope::new(),
            names,
            hoisted: VecDeque::new(),
        }
    }

    fn error_enum(&self) -> &'a str {
        &self.bundle.errors.name
    }

    fn rust_type(&mut self, ty: &TargetType, hint: &str) -> String {
        match ty {
            TargetType::Bool => "bool".to_string(),
            TargetType::Int => "i64".to_string(),
            TargetType::Float => "f64".to_string(),
            TargetType::Text => STRING.to_string(),
            TargetType::Raw => VALUE.to_string(),
            TargetType::List(inner) => format!("{VEC}<{}>", self.rust_type(inner, hint)),
            TargetType::Map(inner) => {
                format!("{BTREE_MAP}<{STRING}, {}>", self.rust_type(inner, hint))
            }
            TargetType::Named(name) => name.clone(),
            TargetType::Record(fields) => {
                let name = self.names.claim(hint);
                self.hoisted.push_back(RecordDecl {
                    name: name.clone(),
                    fields: fields.clone(),
                });
                name
            }
            TargetType::Optional(inner) => format!("{OPTION}<{}>", self.rust_type(inner, hint)),
        }
    }

    /// Emit a record and every inline record it pulled in.
    fn record(&mut self, record: &RecordDecl, doc: Option<&str>) {
        self.push_record(record, doc);
        while let Some(inline) = self.hoisted.pop_front() {
            self.push_record(&inline, None);
        }
    }

    fn push_record(&mut self, record: &RecordDecl, doc: Option<&str>) {
        if record.fields.is_empty() {
            // codegen renders a field-less struct as a unit struct, which
            // serde encodes as `null` rather than `{}`
            let mut text = String::new();
            if let Some(doc) = doc {
                text.push_str(&format!("/// {doc}\n"));
            }
            text.push_str(&format!("#[derive({})]\n", RECORD_DERIVES.join(", ")));
            text.push_str(&format!("pub struct {} {{}}", record.name));
            self.scope.raw(&text);
            return;
        }

        let mut idents = Namespace::new();
        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let hint = format!("{}{}", record.name, type_ident(&field.wire_name));
            let ty = self.rust_type(&field.ty, &hint);
            let attr = if field.omit_when_absent {
                format!(
                    "#[serde(rename = {:?}, default, skip_serializing_if = \"{OPTION}::is_none\")]",
                    field.wire_name
                )
            } else {
                format!("#[serde(rename = {:?})]", field.wire_name)
            };
            let ident = idents.claim(field_ident(&field.wire_name));
            let mut decl = Field::new(&format!("pub {ident}"), ty.as_str());
            decl.annotation(attr.as_str());
            fields.push(decl);
        }

        let def = self.scope.new_struct(&record.name);
        def.vis("pub");
        if let Some(doc) = doc {
            def.doc(doc);
        }
        for derive in RECORD_DERIVES {
            def.derive(derive);
        }
        for field in fields {
            def.push_field(field);
        }
    }

    fn enumeration(&mut self, decl: &EnumDecl) {
        let mut text = String::new();
        text.push_str(
            "#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]\n",
        );
        text.push_str(&format!("pub enum {} {{\n", decl.name));
        for (i, variant) in decl.variants.iter().enumerate() {
            if i == 0 {
                text.push_str("    #[default]\n");
            }
            text.push_str(&format!("    #[serde(rename = {:?})]\n", variant.value));
            text.push_str(&format!("    {},\n", variant.ident));
        }
        text.push('}');
        self.scope.raw(&text);

        let imp = self.scope.new_impl(&decl.name);
        let as_str = imp.new_fn("as_str");
        as_str.vis("pub");
        as_str.doc("Literal wire value of this variant.");
        as_str.arg_ref_self();
        as_str.ret("&'static str");
        let mut arms = Block::new("match *self");
        for variant in &decl.variants {
            arms.line(&format!("Self::{} => {:?},", variant.ident, variant.value));
        }
        as_str.push_block(arms);

        display_impl(&mut self.scope, &decl.name, "f.write_str(self.as_str())");
    }

    fn errors(&mut self, registry: &ErrorRegistry) {
        for error in &registry.errors {
            let wire_name = &error.wire_name;
            self.record(&error.record, Some(&format!("Error `{wire_name}`.")));

            let imp = self.scope.new_impl(&error.record.name);
            let name = imp.new_fn("name");
            name.vis("pub");
            name.doc("Fully-qualified wire name of this error.");
            name.arg_ref_self();
            name.ret("&'static str");
            name.line(&format!("{wire_name:?}"));

            display_impl(&mut self.scope, &error.record.name, "f.write_str(self.name())");
            self.scope
                .new_impl(&error.record.name)
                .impl_trait("::std::error::Error");
        }

        let error_enum = self.error_enum();
        let mut text = format!("/// Errors declared by `{}`.\n", self.bundle.interface);
        text.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        text.push_str(&format!("pub enum {error_enum} {{\n"));
        for error in &registry.errors {
            text.push_str(&format!("    {}({}),\n", error.variant, error.record.name));
        }
        text.push('}');
        self.scope.raw(&text);

        let imp = self.scope.new_impl(error_enum);

        // encode table
        let name = imp.new_fn("name");
        name.vis("pub");
        name.doc("Fully-qualified wire name of the wrapped error.");
        name.arg_ref_self();
        name.ret("&'static str");
        let mut arms = Block::new("match *self");
        for error in &registry.errors {
            arms.line(&format!(
                "Self::{}(_) => {:?},",
                error.variant,
                registry.encode(&error.record.name)
            ));
        }
        name.push_block(arms);

        let into_wire = imp.new_fn("into_wire");
        into_wire.vis("pub");
        into_wire.doc("Encode into the generic error envelope.");
        into_wire.arg_self();
        into_wire.ret(format!("{RESULT}<rpc::WireError, rpc::Error>"));
        into_wire.line("let name = self.name();");
        let mut arms = Block::new(&format!("let parameters: {VALUE} = match self"));
        for error in &registry.errors {
            arms.line(&format!("Self::{}(err) => rpc::encode(&err)?,", error.variant));
        }
        arms.after(";");
        into_wire.push_block(arms);
        into_wire.line(format!("{RESULT}::Ok(rpc::WireError::new(name, parameters))"));

        // decode table
        let from_wire = imp.new_fn("from_wire");
        from_wire.vis("pub");
        from_wire.doc(
            "Decode a generic error envelope. Names this interface does not declare \
             come back untouched as `rpc::Error::Remote`.",
        );
        from_wire.arg("wire", "rpc::WireError");
        from_wire.ret(format!("{RESULT}<Self, rpc::Error>"));
        let mut arms = Block::new("match wire.name.as_str()");
        for (wire_name, type_name) in &registry.decode {
            let Some(error) = registry.errors.iter().find(|e| &e.record.name == type_name) else {
                continue;
            };
            arms.line(&format!(
                "{wire_name:?} => {RESULT}::Ok(Self::{}(rpc::decode::<{type_name}>(wire.parameters)?)),",
                error.variant
            ));
        }
        arms.line(format!("_ => {RESULT}::Err(rpc::Error::Remote(wire)),"));
        from_wire.push_block(arms);

        let from_rpc = imp.new_fn("from_rpc");
        from_rpc.vis("pub");
        from_rpc.doc("Route a failed call through the decode table.");
        from_rpc.arg("err", "rpc::Error");
        from_rpc.ret("rpc::CallError<Self>");
        let mut outer = Block::new("match err");
        let mut remote = Block::new("rpc::Error::Remote(wire) => match Self::from_wire(wire)");
        remote.line(format!("{RESULT}::Ok(err) => rpc::CallError::Interface(err),"));
        remote.line(format!("{RESULT}::Err(err) => rpc::CallError::Rpc(err),"));
        remote.after(",");
        outer.push_block(remote);
        outer.line("other => rpc::CallError::Rpc(other),");
        from_rpc.push_block(outer);

        display_impl(&mut self.scope, error_enum, "f.write_str(self.name())");
        self.scope.new_impl(error_enum).impl_trait("::std::error::Error");

        for error in &registry.errors {
            let imp = self.scope.new_impl(error_enum);
            imp.impl_trait(format!("::std::convert::From<{}>", error.record.name));
            let from = imp.new_fn("from");
            from.arg("err", error.record.name.as_str());
            from.ret("Self");
            from.line(&format!("Self::{}(err)", error.variant));
        }
    }

    fn method_shapes(&mut self, methods: &[MethodDecl]) {
        for method in methods {
            self.record(&method.input, Some(&format!("Input of `{}`.", method.wire_name)));
            self.record(&method.output, Some(&format!("Output of `{}`.", method.wire_name)));
        }
    }

    fn client(&mut self, client: &ClientDecl) {
        let error_enum = self.error_enum();
        let def = self.scope.new_struct(&client.name);
        def.vis("pub")
            .doc(&format!("Client for `{}`.", self.bundle.interface))
            .generic("T")
            .derive("Debug")
            .derive("Clone")
            .field("transport", "T");

        let imp = self.scope.new_impl(&client.name);
        imp.generic("T").target_generic("T").bound("T", "rpc::Transport");

        let new = imp.new_fn("new");
        new.vis("pub").arg("transport", "T").ret("Self").line("Self { transport }");

        let transport = imp.new_fn("transport");
        transport.vis("pub").arg_ref_self().ret("&T").line("&self.transport");

        let into_inner = imp.new_fn("into_inner");
        into_inner.vis("pub").arg_self().ret("T").line("self.transport");

        for op in &client.operations {
            let call = imp.new_fn(&op.ident);
            call.vis("pub")
                .doc(&format!(
                    "Calls `{}`. `None` sends a default `{}`.",
                    op.wire_name, op.input
                ))
                .arg_ref_self()
                .arg("input", format!("{OPTION}<{}>", op.input))
                .ret(format!("{RESULT}<{}, rpc::CallError<{error_enum}>>", op.output))
                .line("let input = input.unwrap_or_default();")
                .line("let reply = self")
                .line("    .transport")
                .line(&format!("    .call({:?}, rpc::encode(&input)?)", op.wire_name))
                .line(&format!("    .map_err({error_enum}::from_rpc)?;"))
                .line(format!("{RESULT}::Ok(rpc::decode(reply)?)"));
        }
    }

    fn server(&mut self, server: &ServerDecl) {
        let error_enum = self.error_enum();
        let capability = self.scope.new_trait(&server.capability);
        capability.vis("pub");
        capability.doc(&format!(
            "Capability a server implements to serve `{}`.",
            self.bundle.interface
        ));
        for op in &server.operations {
            let f = capability.new_fn(&op.ident);
            f.doc(&format!("Serves `{}`.", op.wire_name));
            f.arg_ref_self();
            f.arg("input", op.input.as_str());
            f.ret(format!("{RESULT}<{}, {error_enum}>", op.output));
        }

        let def = self.scope.new_struct(&server.dispatcher);
        def.vis("pub")
            .doc(&format!(
                "Routes `{}` calls to a [`{}`].",
                self.bundle.interface, server.capability
            ))
            .generic("B")
            .derive("Debug")
            .derive("Clone")
            .field("backend", "B");

        let imp = self.scope.new_impl(&server.dispatcher);
        imp.generic("B").target_generic("B").bound("B", server.capability.as_str());
        imp.new_fn("new")
            .vis("pub")
            .arg("backend", "B")
            .ret("Self")
            .line("Self { backend }");
        imp.new_fn("backend")
            .vis("pub")
            .arg_ref_self()
            .ret("&B")
            .line("&self.backend");

        let imp = self.scope.new_impl(&server.dispatcher);
        imp.generic("B")
            .target_generic("B")
            .impl_trait("rpc::Service")
            .bound("B", server.capability.as_str());
        let dispatch = imp.new_fn("dispatch");
        dispatch.arg_ref_self();
        dispatch.arg("method", "&str");
        dispatch.arg("parameters", VALUE);
        dispatch.ret(format!("{RESULT}<{VALUE}, rpc::Error>"));

        let mut cases = Block::new("match method");
        for op in &server.operations {
            let mut case = Block::new(&format!("{:?} =>", op.wire_name));
            case.line(&format!("let input: {} = rpc::decode(parameters)?;", op.input));
            let mut outcome = Block::new(&format!("match self.backend.{}(input)", op.ident));
            outcome.line(format!("{RESULT}::Ok(output) => rpc::encode(&output),"));
            outcome.line(format!(
                "{RESULT}::Err(err) => {RESULT}::Err(rpc::Error::Remote(err.into_wire()?)),"
            ));
            case.push_block(outcome);
            cases.push_block(case);
        }
        cases.line(&format!(
            "_ => {RESULT}::Err(rpc::Error::Remote(rpc::WireError::new({:?}, ::serde_json::json!({{ \"method\": method }})))),",
            server.not_found
        ));
        dispatch.push_block(cases);
    }
}

fn display_impl(scope: &mut Scope, target: &str, body: &str) {
    let imp = scope.new_impl(target);
    imp.impl_trait("::std::fmt::Display");
    let fmt = imp.new_fn("fmt");
    fmt.arg_ref_self();
    fmt.arg("f", "&mut ::std::fmt::Formatter<'_>");
    fmt.ret("::std::fmt::Result");
    fmt.line(body);
}
