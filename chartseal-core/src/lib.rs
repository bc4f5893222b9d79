//! Chartseal library exports

pub mod integrity;
pub mod series;
