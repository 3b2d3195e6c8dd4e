//! Option schemas, resolution, validation and the loader registry.

pub mod error;
pub mod loader;
pub mod opts;
pub mod registry;
pub mod resolve;
pub mod rules;
pub mod schema;

pub use error::{ConstructError, LoadError, OptionError, SchemaError};
pub use loader::{Level, Loaded, Loader};
pub use opts::{to_dest, to_env_var, Opt, OptValue};
pub use registry::{load, registry, Registry};
pub use resolve::{resolve, DeprecationNotice, RawOptions, ResolvedOptions, Source};
pub use rules::Rule;
pub use schema::Schema;
