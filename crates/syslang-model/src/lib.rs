//! Document model, loader, and writer for SysLang system descriptions.

pub mod loader;
pub mod model;
pub mod path;
pub mod writer;

pub use loader::{has_canonical_extension, load_model, parse_model, LoadError, FILE_EXTENSION};
pub use model::{Component, ParamValue, PrincipleUse, Relation, SystemInfo, SystemModel, TestCase};
pub use path::ModelPath;
pub use writer::{save_model, write_model, WriteError};
