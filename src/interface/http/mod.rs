pub mod import_handler;
pub mod problem;
