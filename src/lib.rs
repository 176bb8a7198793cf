//! Hostpay - payment orchestration core for the hosting platform
//!
//! Multi-rail payment initiation (card gateway, UPI, wallet deep link,
//! alternate gateway), callback verification with request signing, and
//! idempotent order settlement with subscription side effects.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
