//! Backend clients.

pub mod ollama_service;
