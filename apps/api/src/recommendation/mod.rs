// Career recommendation: dataset loading, personality + skill scoring,
// progression ladders, and the endpoints that expose them.

pub mod dataset;
pub mod handlers;
pub mod progression;
pub mod scorer;
