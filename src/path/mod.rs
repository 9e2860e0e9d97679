pub mod convention;
pub mod grammar;
