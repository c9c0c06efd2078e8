//! Runtime support linked by generated bindings.
//!
//! Generated code imports this module as `rpc`. It only defines the shapes
//! the bindings need: the generic error envelope, the error taxonomy, and the
//! two seams a transport plugs into ([`Transport`] on the calling side,
//! [`Service`] on the serving side). Framing and connection handling belong
//! to whatever implements those traits.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Reserved error name for calls to a method no dispatch case matches.
pub const METHOD_NOT_FOUND: &str = "org.varlink.service.MethodNotFound";

/// Generic failure as it travels on the wire: a fully-qualified name plus
/// encoded parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{name}")]
pub struct WireError {
    pub name: String,
    #[serde(default)]
    pub parameters: Value,
}

impl WireError {
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        Self { name: name.into(), parameters }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, json!({ "method": method }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The peer answered with an error envelope.
    #[error("call failed: {0}")]
    Remote(WireError),

    #[error("invalid parameters: {0}")]
    Parameters(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl Error {
    /// The envelope, if this failure carries one.
    pub fn wire(&self) -> Option<&WireError> {
        match self {
            Error::Remote(wire) => Some(wire),
            _ => None,
        }
    }
}

impl From<WireError> for Error {
    fn from(wire: WireError) -> Self {
        Error::Remote(wire)
    }
}

/// Failure of a generated client call.
#[derive(Debug)]
pub enum CallError<E> {
    /// One of the interface's own declared errors.
    Interface(E),
    /// Anything else, passed through unchanged.
    Rpc(Error),
}

impl<E> CallError<E> {
    pub fn interface(&self) -> Option<&E> {
        match self {
            CallError::Interface(err) => Some(err),
            CallError::Rpc(_) => None,
        }
    }

    pub fn rpc(&self) -> Option<&Error> {
        match self {
            CallError::Interface(_) => None,
            CallError::Rpc(err) => Some(err),
        }
    }
}

impl<E> From<Error> for CallError<E> {
    fn from(err: Error) -> Self {
        CallError::Rpc(err)
    }
}

impl<E: fmt::Display> fmt::Display for CallError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Interface(err) => write!(f, "call failed: {err}"),
            CallError::Rpc(err) => err.fmt(f),
        }
    }
}

impl<E> std::error::Error for CallError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Interface(err) => Some(err),
            CallError::Rpc(err) => Some(err),
        }
    }
}

/// Calling side: sends one call and waits for its reply parameters.
pub trait Transport {
    fn call(&self, method: &str, parameters: Value) -> Result<Value, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, method: &str, parameters: Value) -> Result<Value, Error> {
        (**self).call(method, parameters)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn call(&self, method: &str, parameters: Value) -> Result<Value, Error> {
        (**self).call(method, parameters)
    }
}

/// Serving side: routes one call by its fully-qualified method name.
pub trait Service {
    fn dispatch(&self, method: &str, parameters: Value) -> Result<Value, Error>;
}

/// In-process transport handing every call straight to a [`Service`].
#[derive(Debug, Clone)]
pub struct Loopback<S> {
    service: S,
}

impl<S: Service> Loopback<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: Service> Transport for Loopback<S> {
    fn call(&self, method: &str, parameters: Value) -> Result<Value, Error> {
        tracing::trace!(method, "loopback call");
        self.service.dispatch(method, parameters)
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<Value, Error> {
    Ok(serde_json::to_value(value)?)
}

/// Decode call or reply parameters. Absent parameters decode as `{}`.
pub fn decode<T: DeserializeOwned>(parameters: Value) -> Result<T, Error> {
    let parameters = match parameters {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    Ok(serde_json::from_value(parameters)?)
}
