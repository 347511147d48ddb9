pub mod render;
pub mod router;
pub mod server;
