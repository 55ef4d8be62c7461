//! Marathon control-plane client.
//!
//! - [`Endpoint`] validates the configured URI and resolves credentials.
//! - [`MarathonApi`] is the narrow capability interface the exporter depends on.
//! - [`HttpClient`] implements it over HTTP+JSON with reqwest.
//! - [`Connector`] blocks startup until the control plane answers a handshake.
mod api;
pub use api::MarathonApi;

mod config;
pub use config::ClientConfig;

mod endpoint;
pub use endpoint::{Credentials, EnvCredentials, Endpoint};

mod errors;
pub use errors::ClientError;

mod http;
pub use http::HttpClient;

mod connector;
pub use connector::{ConnectionState, Connector, Sleeper, TokioSleeper};
