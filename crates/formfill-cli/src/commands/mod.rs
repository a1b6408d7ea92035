//! Command implementations.

pub mod extract;
pub mod models;
pub mod profile;
pub mod schema;

pub use self::extract::execute_extract;
pub use self::models::execute_models;
pub use self::profile::execute_profile;
pub use self::schema::execute_schema;
