use serde::de::DeserializeOwned;

use crate::error::Error;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, Error> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => Err(schema_error(err)),
    }
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => Err(schema_error(err)),
    }
}

fn schema_error(err: serde_path_to_error::Error<serde_json::Error>) -> Error {
    let json_path = err.path().to_string();
    Error::Schema {
        origin: None,
        json_path,
        source: err.into_inner(),
    }
}
