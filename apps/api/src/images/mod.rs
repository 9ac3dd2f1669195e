// Image tools that do not go through the background-removal pipeline.

pub mod generate;
pub mod handlers;
