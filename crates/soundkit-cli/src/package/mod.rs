//! npm package staging
//!
//! This module provides utilities for:
//! - Copying files and directory trees concurrently
//! - Running the external compilers that emit JS modules and declarations
//! - Assembling the publishable `dist/` directory
//!
//! # Traits
//!
//! - [`ModuleCompiler`] - Compiles project sources; swapped for fakes in tests
//!
//! # Implementations
//!
//! - [`CommandCompiler`] - Runs an external command such as `tsc`
//! - [`PackageAssembler`] - Wipes, stages and fills the output directory
//!
//! # Example
//!
//! ```ignore
//! use crate::package::PackageAssembler;
//!
//! let assembler = PackageAssembler::new(Path::new("."), config.package.clone());
//! let report = assembler.assemble().await?;
//! ```

mod assembler;
mod compiler;
mod copy;

pub use assembler::PackageAssembler;
pub use copy::{copy_all, remove_dir_if_exists};
