// CV scoring engine: six section analyzers, keyword coverage, a weighted
// overall score, input consistency checks, and optional LLM coaching.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod coach;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod report;
pub mod sections;
pub mod validation;
