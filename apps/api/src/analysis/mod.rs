pub mod extract;
#[cfg(test)]
pub mod fixtures;
pub mod handlers;
pub mod locate;
pub mod pipeline;
pub mod prompts;
pub mod repair;
pub mod validation;
