//! Core utilities and shared types
//!
//! This module contains the error taxonomy shared across the application.

pub mod error;
