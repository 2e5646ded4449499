//! Heuristic static analysis for Solidity contracts.
//!
//! A [`SyntaxProvider`](ast::SyntaxProvider) turns source text into a solc
//! compact-JSON AST; the extractor and summarizer derive per-function facts from
//! it, and a [`RuleRegistry`](rule::RuleRegistry) turns those facts into
//! findings. [`Engine`](engine::Engine) runs the whole pipeline over a batch.

pub mod ast;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod finding;
pub mod flow;
pub mod heuristics;
pub mod report;
pub mod rule;
pub mod summary;
