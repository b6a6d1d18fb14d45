//! Control logic: the irrigation decision and how it reaches the outputs.

pub mod actuator;
pub mod decision;
