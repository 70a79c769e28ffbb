pub mod auth;
pub mod role;
pub mod specialty;
pub mod teacher;
pub mod user;
