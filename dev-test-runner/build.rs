use std::path::PathBuf;

use varlink_codegen::schema::Interface;
use varlink_codegen::{Options, generate};

/// Fixture file → generated module.
const FIXTURES: &[(&str, &str)] = &[
    ("example.json", "foo"),
    ("clashes.json", "clash"),
    ("types_only.json", "types_only"),
];

fn main() {
    let manifest_dir = PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").unwrap());

    for (file, module) in FIXTURES {
        let fixture = manifest_dir.join("fixtures").join(file);
        println!("cargo:rerun-if-changed={}", fixture.display());

        let iface = match Interface::load(&fixture) {
            Ok(iface) => iface,
            Err(error) => panic!("failed to load {}: {error}", fixture.display()),
        };
        let source = generate(&iface, &Options::new(*module));
        std::fs::write(out_dir.join(format!("{module}.rs")), source).unwrap();
    }
}
