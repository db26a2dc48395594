//! # Declara Core
//!
//! Core data structures and types for the Declara engine, which produces
//! fixed-width tax-declaration (Declaración Jurada) files for the Chilean
//! tax authority from validated tabular data.
//!
//! ## Key concepts
//!
//! - **DeclarationSchema**: metadata of one declaration type — fields,
//!   positions, widths and validation rules
//! - **RowSet**: the table being processed, one map of field code → value
//!   per row
//! - **ValidationReport**: structured findings of a validation run
//! - **EncodedDocument**: the final Latin-1 fixed-width byte artifact
//! - **SchemaProvider**: the seam towards the external metadata store
//!
//! ## Example
//!
//! ```rust
//! use declara_core::{DataKind, FieldBuilder, SchemaBuilder};
//!
//! let schema = SchemaBuilder::new("1922", "Movimiento Mensual de Ventas")
//!     .field(FieldBuilder::new("C1", DataKind::Text).width(10).position(1).build())
//!     .field(FieldBuilder::new("C2", DataKind::Integer).width(12).position(2).build())
//!     .build();
//!
//! assert!(schema.validate().is_ok());
//! assert_eq!(schema.line_width(), 22);
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod provider;
pub mod report;
pub mod rowset;
pub mod rut;
pub mod schema;

pub use builder::*;
pub use document::*;
pub use error::*;
pub use provider::*;
pub use report::*;
pub use rowset::*;
pub use schema::*;
