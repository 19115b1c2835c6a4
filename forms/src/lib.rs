//! Form-state core for field visit reports.
//!
//! This crate owns the dynamic multi-row sections a merchandiser fills in
//! during a client visit and the pure assembly step that turns a finished
//! draft into the backend request body. Nothing here performs I/O: catalogs
//! arrive as candidate lists and the assembled payload leaves as a serde
//! value for the `api` crate to send.
//!
//! SYSTEM CONTEXT
//! ==============
//! `section` holds the per-section row list, `options` answers which
//! candidates a row may still pick, `visit` wires the four visit-report
//! sections together, and `payload` coerces the final rows into wire DTOs.

pub mod candidate;
pub mod options;
pub mod payload;
pub mod row;
pub mod section;
pub mod visit;

pub use candidate::{Candidate, CandidateId};
pub use payload::{VisitPayload, assemble_visit, parse_int_lenient};
pub use row::{Row, RowEdit, RowKey};
pub use section::{DynamicSection, FieldKind, FieldSpec, SectionConfig, SectionError, ToggleSpec};
pub use visit::{SectionName, VisitDraft};
