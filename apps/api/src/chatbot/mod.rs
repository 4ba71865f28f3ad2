pub mod assembler;
pub mod handlers;
pub mod prompts;
pub mod retriever;
pub mod service;
