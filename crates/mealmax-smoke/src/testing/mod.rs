//! Testing utilities for exercising the runner without a live service.

pub mod mock_transport;

pub use mock_transport::MockTransport;
