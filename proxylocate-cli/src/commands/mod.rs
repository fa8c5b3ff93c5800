pub mod env;
pub mod fetch;
pub mod paths;
pub mod probe;
