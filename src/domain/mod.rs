// Record shapes shared by the fetch and transform phases, and the ports they depend on.

pub mod model;
pub mod ports;
