//! Signet - Secure Document Access and Countersignature Service
//!
//! This crate implements email-verified access to business proposals,
//! short-lived signed asset URLs, and atomic countersignature.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
