pub mod accounts;
pub mod admin;
pub mod directory;
pub mod health;
pub mod session;
