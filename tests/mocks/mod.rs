//! Shared mocks and fixtures for integration tests

pub mod fixtures;
pub mod providers;
pub mod transport;

#[allow(unused_imports)]
pub use providers::{MockProvider, MockResponse};
#[allow(unused_imports)]
pub use transport::RouteTransport;
