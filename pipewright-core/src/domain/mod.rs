//! Core domain types
//!
//! This module contains the domain structures shared across the Pipewright
//! crates. These types represent one deployment's business entities: the
//! definition being deployed, the messages it produces, the audit trail it
//! leaves behind, and the script mappings it carries.

pub mod definition;
pub mod message;
pub mod report;
pub mod scripts;
