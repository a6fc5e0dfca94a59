use crate::{DataProvider, SharedJudge};
use std::{fmt::Debug, future::Future};

pub mod rest_api;
pub mod websocket;

pub use rest_api::ApiServer;
pub use websocket::WebSocketServer;

pub trait Server<T: DataProvider + Default>: Sized {
    type ErrorKind: Debug;
    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_HOST: &'static str = "127.0.0.1";

    fn new(host: String, port: u16, data_provider: T) -> Self;

    fn start(&mut self) -> impl Future<Output = Result<(), Self::ErrorKind>> + Send;

    fn get_address(&self) -> String;

    fn default() -> Self;

    fn with_data_provider(data_provider: T) -> Self;

    /// replaces the judge deciding on submitted answers
    fn with_judge(self, judge: SharedJudge) -> Self;

    // loads environment variables or uses default values if not set
    fn from_env(data_provider: T) -> Self;
}

/// Reads `host_var` and `port_var`, falling back to the given defaults.
pub(crate) fn address_from_env(
    host_var: &str,
    port_var: &str,
    default_host: &str,
    default_port: u16,
) -> (String, u16) {
    let host = std::env::var(host_var).unwrap_or_else(|_| default_host.to_string());
    let port = std::env::var(port_var)
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(default_port);
    (host, port)
}
