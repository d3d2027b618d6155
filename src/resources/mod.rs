//! Minimal resource definitions used by the bundled generator.
//! Only the fields the demo deployment needs are modelled.

pub mod kubernetes;
pub mod prometheus;
