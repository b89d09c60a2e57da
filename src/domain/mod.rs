pub mod repository;
pub mod todo;
pub mod validation;
