//! LoanDesk Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `LoanApplication`, `LoanStatus`, `AuditEntry`, `LoanSnapshot`
//! - **Business rules** - the auto-decision rule and the flat monthly payment formula
//! - **Port definitions** - `IKeyValueStore`, the persistence capability adapters implement
//! - **Configuration** - YAML-backed settings for storage keys and logging
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Services in `loandesk-loans` and `loandesk-audit` orchestrate domain
//! entities through those ports.

pub mod config;
pub mod domain;
pub mod ports;
