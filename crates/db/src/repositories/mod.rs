pub mod feedback;
pub mod session_request;
pub mod user;
