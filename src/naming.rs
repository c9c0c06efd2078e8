//! Identifier casing.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `wire_name` | [`exported_name`] | `WireName` |
//! | `max_items` | [`field_ident`] | `max_items` |
//! | `type` | [`field_ident`] | `r#type` |
//! | `GetPoint` | [`fn_ident`] | `get_point` |
//! | `my-bindings` | [`module_ident`] | `my_bindings` |
//! | `self` | [`type_ident`] | `Self_` |

use std::collections::BTreeSet;

use heck::ToSnakeCase;

/// Convert a wire identifier into an exported type-level identifier.
///
/// Splits on `_`, upper-cases the first letter of every word and joins the
/// words. The rest of each word is kept as is.
///
/// ```
/// use varlink_codegen::naming::exported_name;
///
/// assert_eq!(exported_name("dark_blue"), "DarkBlue");
/// assert_eq!(exported_name("Point"), "Point");
/// ```
pub fn exported_name(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Type-level identifier: [`exported_name`], with `Self` escaped.
pub fn type_ident(name: &str) -> String {
    escape_keyword(exported_name(name))
}

/// Struct field identifier for a wire field name.
pub fn field_ident(wire: &str) -> String {
    escape_keyword(wire.to_snake_case())
}

/// Operation name for a method, used by both the client and the backend trait.
pub fn fn_ident(method: &str) -> String {
    escape_keyword(method.to_snake_case())
}

/// Module name for the generated bindings.
pub fn module_ident(name: &str) -> String {
    let ident = name.to_snake_case();
    if ident.is_empty() {
        return "bindings".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return escape_keyword(format!("_{ident}"));
    }
    escape_keyword(ident)
}

const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Identifiers handed out within one scope.
///
/// Distinct wire names can normalize to the same identifier (`fooBar` and
/// `foo_bar`). The first claim keeps the name, later ones get `_` appended
/// until they are free. Claim in sorted order to keep the result stable.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    taken: BTreeSet<String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namespace where `reserved` can never be handed out.
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn claim(&mut self, ident: impl Into<String>) -> String {
        let mut ident = ident.into();
        while self.taken.contains(&ident) {
            ident.push('_');
        }
        self.taken.insert(ident.clone());
        ident
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.taken.contains(ident)
    }
}

fn escape_keyword(ident: String) -> String {
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}
