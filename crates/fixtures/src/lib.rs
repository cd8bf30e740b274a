//! Peex test fixtures
//!
//! Build-once data objects used to drive UI scenarios:
//! - `Candidate` and its fluent `CandidateBuilder`
//! - canned `Address` presets for the geocoding validation paths
//! - `Job`, `SocialSecurityDocument` and `IdentityDocument` attachments
//!
//! Fixtures live for a single test case and are never persisted.

pub mod address;
pub mod candidate;
pub mod document;
pub mod error;
pub mod helpers;
pub mod job;

pub use address::{Address, AddressPreset, GeocodePrecision};
pub use candidate::{Candidate, CandidateBuilder, ContractType, Gender};
pub use document::{IdentityDocument, IdentityKind, SocialSecurityDocument};
pub use error::{FixtureError, FixtureResult};
pub use job::Job;
