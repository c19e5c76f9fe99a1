pub mod form;
pub mod server;
