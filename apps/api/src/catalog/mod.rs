pub mod queries;
pub mod seed;
