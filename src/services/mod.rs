pub mod ai_parser;
pub mod ai_prompt;
pub mod plan_generation;
pub mod plan_normalizer;
pub mod plan_validator;
