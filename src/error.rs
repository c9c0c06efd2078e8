use std::path::{Path, PathBuf};

/// Failures of the generator itself. Failures of generated bindings live in
/// [`crate::rpc::Error`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid interface model{}: at JSON path {json_path} → {source}", display_origin(.origin))]
    Schema {
        origin: Option<PathBuf>,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Attach the file a schema error came from.
    pub fn at(self, file: &Path) -> Self {
        match self {
            Error::Schema { json_path, source, .. } => Error::Schema {
                origin: Some(file.to_path_buf()),
                json_path,
                source,
            },
            other => other,
        }
    }
}

fn display_origin(origin: &Option<PathBuf>) -> String {
    match origin {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}
