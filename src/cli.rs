//! Minimal CLI: interface model → Rust bindings
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use varlink_codegen::naming::module_ident;
use varlink_codegen::render::rust::DEFAULT_RUNTIME;
use varlink_codegen::schema::Interface;
use varlink_codegen::Options;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate typed client/server bindings from a JSON-serialized interface model
#[derive(Parser, Debug)]
#[command(name = "varlink-codegen", version)]
pub struct CommandLineInterface {
    /// interface model (.json) produced by the IDL parser
    #[arg(short, long)]
    input: PathBuf,

    /// output .rs file; parent directories are created
    #[arg(short, long)]
    output: PathBuf,

    /// module name for the generated items (defaults to the output's directory name)
    #[arg(short = 'n', long)]
    package: Option<String>,

    /// path of the runtime module the bindings import as `rpc`
    #[arg(long, default_value = DEFAULT_RUNTIME)]
    runtime: String,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        // debug path
        if self.no_op {
            eprintln!("{self:#?}");
            return Ok(());
        }

        // 1) load model
        let iface = Interface::load(&self.input)?;

        // 2) generate
        let package = match self.package.as_deref() {
            Some(package) => module_ident(package),
            None => default_package(&self.output)?,
        };
        let options = Options {
            package,
            runtime: self.runtime.clone(),
        };
        let rust_src = varlink_codegen::generate(&iface, &options);

        // 3) write once
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.output, &rust_src)
            .with_context(|| format!("failed to write {}", self.output.display()))?;

        tracing::info!(
            interface = %iface.name,
            package = %options.package,
            output = %self.output.display(),
            "wrote bindings"
        );
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Name of the directory the output lands in, as a module identifier.
fn default_package(output: &Path) -> Result<String> {
    let output = std::path::absolute(output)
        .with_context(|| format!("failed to resolve {}", output.display()))?;
    let dir = output
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(module_ident(&dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_defaults_to_output_directory() {
        let package = default_package(Path::new("/tmp/gen/my-bindings/out.rs")).unwrap();
        assert_eq!(package, "my_bindings");
    }

    #[test]
    fn root_output_falls_back_to_placeholder() {
        assert_eq!(default_package(Path::new("/out.rs")).unwrap(), "bindings");
    }

    #[test]
    fn parses_short_flags() {
        let cli = CommandLineInterface::try_parse_from([
            "varlink-codegen", "-i", "foo.json", "-o", "out/foo.rs", "-n", "foo",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("foo.json"));
        assert_eq!(cli.package.as_deref(), Some("foo"));
        assert_eq!(cli.runtime, DEFAULT_RUNTIME);
    }

    #[test]
    fn output_is_required() {
        assert!(CommandLineInterface::try_parse_from(["varlink-codegen", "-i", "foo.json"]).is_err());
    }
}
