// Domain layer: content model, slugs, envelopes and the ports the loader talks through.

pub mod envelope;
pub mod model;
pub mod ports;
pub mod related;
pub mod slug;
