pub mod courses;
pub mod users;

pub use courses::*;
pub use users::*;
