pub mod coordinator;
pub mod http;

pub use coordinator::Coordinator;
pub use http::router;
