//! # itemforge
//!
//! A typed attribute layer and command assembler for key-value item
//! stores, with:
//! - Self-validating attribute kinds (scalars, collections, lifecycle)
//! - Composite key templates with partial application
//! - Soft-delete and timestamp lifecycle management
//! - Optimistic-concurrency tokens embedded as update conditions
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command Assembler                        │
//! │            (Put / Get / Delete / Query / Update)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Record                                │
//! │          (key / item projections, lifecycle state)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Schema    │          │ Attributes  │
//!   │ (structure) │          │ (validation)│
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Format    │
//!                           │ (templates) │
//!                           └─────────────┘
//! ```
//!
//! The crate performs no I/O: the assembled command shapes are plain
//! serializable structs handed to an external store client.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod format;
pub mod attribute;
pub mod schema;
pub mod record;
pub mod command;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{ErrorMode, Profile};
pub use error::{ForgeError, Issue, Issues, Result};
pub use value::{Data, Item, Value};

pub use attribute::{Attribute, AttributeKind};
pub use command::{
    delete_command, get_command, put_command, query_command, update_command, DeleteCommand,
    GetCommand, Overrides, PutCommand, QueryCommand, QueryCustomize, UpdateCommand,
    UpdateCustomize,
};
pub use record::Record;
pub use schema::Schema;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of itemforge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
