pub mod advisor;
pub mod inflight;
pub mod prompts;
pub mod schema;
pub mod session;
