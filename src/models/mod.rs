mod organization;
mod policy;
mod team;
mod user;
mod validators;

pub use organization::*;
pub use policy::*;
pub use team::*;
pub use user::*;
