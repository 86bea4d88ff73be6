// Behavioral questionnaire: adjective → factor lookup, tallying, and
// nearest-reference-profile matching.

pub mod factors;
pub mod handlers;
pub mod matcher;
