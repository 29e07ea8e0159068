pub mod admin;
pub mod directory;
pub mod feedback;
pub mod session;
pub mod user;
