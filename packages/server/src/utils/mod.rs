pub mod hash;
pub mod jwt;
pub mod teacher;
pub mod user;
