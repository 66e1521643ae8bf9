//! Record types shared by the colorimetric dataset loaders.
//!
//! An [`ExperimentRecord`] holds one named experimental condition: its
//! tristimulus-like observation rows in trial order and the descriptive
//! metadata the dataset publishes for it. Records are collected into a
//! [`RecordMap`], which keeps parse order for iteration and offers exact
//! name lookup.

pub mod error;
pub mod metadata;
pub mod record;

pub use error::{RecordError, Result};
pub use metadata::{MetadataKind, MetadataValue};
pub use record::{ExperimentRecord, RecordMap, Tristimulus};
