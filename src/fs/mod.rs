pub mod operations;
pub mod walk;
