// Domain layer: core models and ports (interfaces). No network or XML code lives here.

pub mod model;
pub mod ports;
