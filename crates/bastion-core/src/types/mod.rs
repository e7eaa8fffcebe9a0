//! Core types for Bastion

mod directory;
mod login;
mod policy;
mod user;

pub use directory::*;
pub use login::*;
pub use policy::*;
pub use user::*;
