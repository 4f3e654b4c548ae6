//! Finding, mapping and binding the renderer binary

mod binder;
mod locator;
mod registry;

pub use binder::{BoundLibrary, DynamicBinder, LibraryBinder, LibraryHandle};
pub use locator::{LibraryLocator, LocatedLibrary, DEFAULT_LIBRARY_FILE, DEFAULT_SEARCH_DIRS};
pub(crate) use registry::BindingClaim;
