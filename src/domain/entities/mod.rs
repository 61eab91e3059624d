//! Core business entities.

mod link;
mod session;
mod user;

pub use link::{Link, NewLink};
pub use session::{NewSession, Session};
pub use user::{NewUser, User};
