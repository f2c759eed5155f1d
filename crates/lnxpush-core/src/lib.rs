//! LNXPush Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `SyncAccount`, `SyncParameters`, `SyncTrigger`,
//!   connection state/events
//! - **Use cases** - `ResolveAccountUseCase`, `PrepareAttemptUseCase`
//! - **Port definitions** - Traits for adapters: `IAccountDirectory`,
//!   `IPreferenceStore`, `ICloudConnection`, `IUserInteraction`, `IUploadTask`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
