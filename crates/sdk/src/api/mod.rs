//! Operation surface, grouped by resource.
//!
//! Every operation is described by a static [`Operation`] (method, path
//! template, accept type) and takes an option bundle naming its path, query
//! and header inputs. Unset optional fields are omitted from the request.

use reqwest::header::HeaderMap;
use reqwest::Method;

/// Generates the per-call header setters shared by every option bundle.
macro_rules! call_options {
    ($options:ty) => {
        impl $options {
            /// Forward `X-Correlation-Id` with the request.
            pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
                self.x_correlation_id = Some(id.into());
                self
            }

            /// Forward `X-Request-Id` with the request.
            pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
                self.x_request_id = Some(id.into());
                self
            }

            /// Add a header to this call only.
            pub fn with_header(
                mut self,
                name: reqwest::header::HeaderName,
                value: reqwest::header::HeaderValue,
            ) -> Self {
                self.headers.append(name, value);
                self
            }
        }
    };
}

/// Generates fluent setters for optional fields.
macro_rules! optional_setters {
    ($options:ty { $($field:ident: $ty:ty => $setter:ident),* $(,)? }) => {
        impl $options {
            $(
                #[doc = concat!("Set `", stringify!($field), "`.")]
                pub fn $setter(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }
    };
}

mod controls;
mod evaluations;
mod reports;
mod resources;

pub use controls::*;
pub use evaluations::*;
pub use reports::*;
pub use resources::*;

pub(crate) use sealed::{Call, Operation, OperationOptions};

/// `Accept` value of JSON operations.
pub const APPLICATION_JSON: &str = "application/json";
/// `Accept` value of the report evaluation download.
pub const APPLICATION_CSV: &str = "application/csv";

mod sealed {
    use super::*;

    /// Static description of one operation.
    #[derive(Debug)]
    pub struct Operation {
        /// Identifier sent in the analytics header.
        pub id: &'static str,
        pub method: Method,
        /// Path template relative to the service URL.
        pub path: &'static str,
        pub accept: &'static str,
    }

    /// One invocation of an operation, borrowed from its option bundle.
    ///
    /// Query parameters keep the order in which the operation lists them.
    #[derive(Debug)]
    pub struct Call<'a> {
        pub operation: &'static Operation,
        pub path_params: Vec<(&'static str, &'a str)>,
        pub query: Vec<(&'static str, Option<String>)>,
        pub x_correlation_id: Option<&'a str>,
        pub x_request_id: Option<&'a str>,
        pub headers: &'a HeaderMap,
    }

    impl<'a> Call<'a> {
        pub fn new(
            operation: &'static Operation,
            x_correlation_id: Option<&'a str>,
            x_request_id: Option<&'a str>,
            headers: &'a HeaderMap,
        ) -> Self {
            Self {
                operation,
                path_params: Vec::new(),
                query: Vec::new(),
                x_correlation_id,
                x_request_id,
                headers,
            }
        }

        pub fn path_param(mut self, name: &'static str, value: &'a str) -> Self {
            self.path_params.push((name, value));
            self
        }

        pub fn query<V: ToString>(mut self, name: &'static str, value: Option<&V>) -> Self {
            self.query.push((name, value.map(ToString::to_string)));
            self
        }
    }

    /// Implemented by every option bundle.
    pub trait OperationOptions {
        fn call(&self) -> Call<'_>;
    }
}

/// Build an operation descriptor for a `GET` endpoint.
const fn get(id: &'static str, path: &'static str, accept: &'static str) -> Operation {
    Operation {
        id,
        method: Method::GET,
        path,
        accept,
    }
}

