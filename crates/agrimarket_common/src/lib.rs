pub mod error; // Error handling
pub mod http; // Shared HTTP client construction
pub mod logging; // Logging utilities

pub use error::{storage_error, AgriError};

pub use http::{create_client, HTTP_CLIENT};

pub use logging::{init_from_str, init_with_level};
