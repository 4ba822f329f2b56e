pub mod handlers;
pub mod webhook;
