//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case APIs.
//! - Keep transport layers decoupled from storage details.

pub mod city_service;
