//! Chat-completion clients and the prompt templates they are fed.

pub mod client;
pub mod client_impl;
pub mod factory;
pub mod prompts;
