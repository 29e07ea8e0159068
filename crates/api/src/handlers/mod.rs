pub mod accounts;
pub mod admin;
pub mod directory;
pub mod feedback;
pub mod session;
