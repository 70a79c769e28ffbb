mod auth;
mod catalog;
