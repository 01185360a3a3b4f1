//! Pipewright Core
//!
//! Core types and abstractions for the Pipewright deployment tool.
//!
//! This crate contains:
//! - Domain types: the parsed pipeline definition, deployment messages,
//!   audit records, and script mappings
//! - DTOs: wire types for the pipeline-service API

pub mod domain;
pub mod dto;
