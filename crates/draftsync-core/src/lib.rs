//! draftsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Draft`, `DraftRef`, `DraftPatch`, `DraftStats`, `SyncStatus`
//! - **Port definitions** - Traits for adapters: `IDraftStore`, `IRemoteGateway`
//! - **Configuration** - YAML-backed settings shared by every adapter
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.

pub mod config;
pub mod domain;
pub mod ports;
