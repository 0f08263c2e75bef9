//! Generates Tableau data source documents (.tds) and packaged data
//! sources (.tdsx) from a tabular data file and a JSON dataset manifest.
//!
//! A manifest declares dimensions, measures and optionally hierarchies
//! and groups. Field names may resolve through a metadata repository,
//! which contributes descriptions, formulas, formats and semantic roles
//! as well as hierarchy and group memberships. The resolved model is
//! assembled by [`tableau::Tableau`] into a single schema-correct XML
//! document, and [`package::package_tds`] bundles the document with a
//! copy of its data file into a distributable archive.
//!
//! The usual entry points are [`dataset::create_tds`] and
//! [`dataset::create_tdsx`].

pub mod column;
pub mod columnar;
pub mod connection;
pub mod dataset;
pub mod error;
pub mod folder;
pub mod hierarchy;
pub mod json_metadata;
pub mod metadata;
pub mod package;
pub mod tableau;

pub use connection::SourceKind;
pub use dataset::{
    DatasetOptions, create_tds, create_tdsx, create_tdsx_from_csv, create_tdsx_from_excel,
    create_tdsx_from_hyper,
};
pub use error::TdsGeneratorError;
pub use json_metadata::JsonRepository;
pub use metadata::MetadataRepository;
pub use package::package_tds;
pub use tableau::Tableau;
