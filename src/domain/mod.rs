// Domain layer: records, client-side filters and the ports the advisory client talks through.

pub mod filters;
pub mod fixtures;
pub mod model;
pub mod ports;
