//! Domain operations behind the HTTP handlers. Every function takes the
//! store and the caller explicitly and runs the authorization guard first.

pub mod accounts;
pub mod admin;
pub mod directory;
pub mod feedback;
pub mod session;
