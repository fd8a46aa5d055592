//! This is a library that provides objects and functionality to help you keep
//! a collection of named geographic locations inside of a database and query
//! them by their time of day.

pub mod database;
pub mod error;
pub mod loadable;
pub mod location;
pub mod query;
pub mod timeofday;

pub use database::Database;
pub use error::Error;
pub use error::Result;
pub use location::Location;
pub use timeofday::TimeOfDay;
