mod authorize;

pub use authorize::*;
