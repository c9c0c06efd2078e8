//! Per-method shapes and the client call surface.

use crate::decl::{ClientDecl, MethodDecl, Operation};
use crate::declare::declare_record;
use crate::naming::{Namespace, fn_ident};
use crate::schema::Interface;

pub const CLIENT: &str = "Client";

/// Inherent methods of the client; operations may not shadow them.
const RESERVED: &[&str] = &["new", "transport", "into_inner"];

/// `MIn`/`MOut` shapes for every method, sorted by method name.
pub fn declare_methods(iface: &Interface, names: &mut Namespace) -> Vec<MethodDecl> {
    let mut methods: Vec<&String> = iface.methods.keys().collect();
    methods.sort();

    methods
        .into_iter()
        .map(|name| {
            let method = &iface.methods[name];
            let mut input = declare_record(&format!("{name}In"), &method.input);
            input.name = names.claim(input.name);
            let mut output = declare_record(&format!("{name}Out"), &method.output);
            output.name = names.claim(output.name);
            MethodDecl {
                name: name.clone(),
                wire_name: iface.qualify(name),
                input,
                output,
            }
        })
        .collect()
}

/// One operation per method, in method order. Client and server share
/// these, so both sides agree on every identifier.
pub fn operations(methods: &[MethodDecl]) -> Vec<Operation> {
    let mut idents = Namespace::with_reserved(RESERVED);
    methods
        .iter()
        .map(|method| Operation {
            ident: idents.claim(fn_ident(&method.name)),
            wire_name: method.wire_name.clone(),
            input: method.input.name.clone(),
            output: method.output.name.clone(),
        })
        .collect()
}

pub fn declare_client(methods: &[MethodDecl], names: &mut Namespace) -> ClientDecl {
    ClientDecl {
        name: names.claim(CLIENT),
        operations: operations(methods),
    }
}
