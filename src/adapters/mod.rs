// Concrete implementations of the domain ports: local files and the WAHIS HTTP API.

pub mod http;
pub mod storage;

pub use http::HttpEventSource;
pub use storage::LocalStorage;
