pub mod converter_service;
pub mod resolver;
