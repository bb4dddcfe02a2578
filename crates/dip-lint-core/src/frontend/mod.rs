//! Rust front end: lowers `syn` syntax trees into the program model.
//!
//! Lowering happens in two passes. [`ProgramIndex::build`] first collects
//! every type definition and function signature across all files, so that
//! calls can resolve to declarations in other files. [`lower`] then walks a
//! single file and produces its [`Unit`].

mod display;
mod index;
mod lower;
mod modules;

pub use display::type_display;
pub use index::{ProgramIndex, TypeScope};
pub use modules::module_of_file;

use crate::model::Unit;
use lower::Lowerer;
use std::path::PathBuf;

/// Lowers one parsed file into a [`Unit`] using a prebuilt index.
///
/// `relative_path` also places the file in the module tree; see
/// [`module_of_file`].
#[must_use]
pub fn lower(index: &ProgramIndex, relative_path: impl Into<PathBuf>, file: &syn::File) -> Unit {
    let path = relative_path.into();
    let (declarations, bindings) = Lowerer::lower(index, module_of_file(&path), file);
    Unit {
        path,
        declarations,
        bindings,
    }
}

/// Parses and lowers a single self-contained source file.
///
/// # Errors
///
/// Returns an error if `source` is not valid Rust.
pub fn lower_source(relative_path: impl Into<PathBuf>, source: &str) -> Result<Unit, syn::Error> {
    let path = relative_path.into();
    let file = syn::parse_file(source)?;
    let index = ProgramIndex::build([(path.as_path(), &file)]);
    Ok(lower(&index, path, &file))
}
