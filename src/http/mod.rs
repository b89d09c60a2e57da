pub mod routing;
pub mod templates;
pub mod types;
