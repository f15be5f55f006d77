pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::ConfigLoader;
pub use schema::{Config, ConvertConfig, FetchConfig, GpkgConfig, OgrConfig, PostgresConfig};
pub use validator::{validate, ValidationResult};
