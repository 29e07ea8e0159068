//! Domain model of the EduConnect tutoring marketplace: users and their
//! role profiles, the session-request state machine, the feedback ledger
//! and directory queries. Nothing in this crate performs I/O.

pub mod errors;
pub mod models;
