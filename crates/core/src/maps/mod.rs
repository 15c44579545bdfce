//! Polygon map resolution

pub mod ports;
pub mod service;
