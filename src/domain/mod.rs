// Domain layer: records, outcomes and the ports the pipeline drives.

pub mod model;
pub mod ports;
