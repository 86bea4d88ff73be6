pub mod course;
pub mod profile;
pub mod user;
