mod policies;
mod teams;
mod users;

pub use policies::*;
pub use teams::*;
pub use users::*;
