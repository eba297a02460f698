//! Data models for submissions, applicant records and configuration.

pub mod applicant;
pub mod config;
pub mod document;
