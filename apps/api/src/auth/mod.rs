// Credential store, cookie-backed identity context, and the capability guards.

pub mod credentials;
pub mod handlers;
pub mod session;
