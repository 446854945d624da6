//! Icon catalog resolution
//!
//! Turns a declarative, versioned menu configuration plus the icon packs that
//! are available at runtime into a concrete catalog:
//!
//! - [`CatalogIndex`] merges icon packs into an id lookup
//! - [`resolve_icon`] resolves one reference through its fallback chain
//! - [`process_category`] applies per-category limits and expansion policy
//! - [`resolve_all`] and [`CatalogEngine`] produce the ordered categories,
//!   the flattened icon list and the validation report

mod category;
pub mod config;
mod engine;
mod index;
mod resolver;

pub use category::{
    is_expanded, process_category, truncate_icons, ProcessedCategory, DEFAULT_CATEGORY_ORDER,
};
pub use config::{CategoryConfig, CustomIcon, IconConfig, IconMenuConfig, MenuSettings};
pub use engine::{
    merge_icons, resolve_all, validate, CatalogEngine, CollectionState, MergePolicy,
    ResolvedCatalog, ValidationReport,
};
pub use index::{load_pack, parse_pack, CatalogIndex};
pub use resolver::{resolve_icon, FailureReason, ResolutionFailure};
