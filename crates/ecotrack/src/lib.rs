//! Core domain logic for the EcoTrack sustainability tracking service.
//!
//! The crate is organized as workflow modules (users, impact ledger, challenge
//! lifecycle, badge awarding, invitations) that expose synchronous services over
//! injected repository handles. Transport concerns live in the per-workflow
//! routers and in the `ecotrack-api` binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
