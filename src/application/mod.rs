pub mod dto;
pub mod import_service;
