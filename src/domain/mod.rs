// Domain layer: shared types and the executor port. Only std/serde here.

pub mod model;
pub mod ports;
