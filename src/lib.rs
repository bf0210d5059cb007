//! TLDR Analyzer - Insurance Policy Simplification
//!
//! This crate turns an insurance policy document into a risk-tiered clause
//! analysis with a plain-language summary, answers follow-up questions about
//! the document, and renders the outcome as a paginated report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
