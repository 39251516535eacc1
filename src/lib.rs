//! Policy Forge - Iterative Content-Moderation Policy Authoring
//!
//! This crate turns a short description of moderation intent into a
//! coherent trio of policy documents (public, moderator, machine)
//! through a staged workflow with LLM-backed generation and human
//! review in the loop.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
