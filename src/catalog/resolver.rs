//! Icon reference resolution against the catalog index

use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::config::IconConfig;
use super::index::CatalogIndex;
use crate::model::Icon;

/// Why a reference could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Donor ids were configured but none of them exist in the catalog
    DonorsMissing,
    /// The reference carries no existing, fallback or custom icon at all
    NoResolutionPath,
}

/// A configured icon reference that resolved to nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not resolve icon \"{ref_id}\" ({})", describe_chain(.existing_icon_id, .fallback_icon))]
pub struct ResolutionFailure {
    pub reason: FailureReason,
    pub ref_id: String,
    pub ref_name: String,
    pub existing_icon_id: Option<String>,
    pub fallback_icon: Option<String>,
}

impl ResolutionFailure {
    /// Which part of the fallback chain was attempted, for diagnostics
    pub fn attempted_chain(&self) -> String {
        describe_chain(&self.existing_icon_id, &self.fallback_icon)
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::DonorsMissing => write!(f, "donor icons missing"),
            FailureReason::NoResolutionPath => write!(f, "no resolution path"),
        }
    }
}

fn describe_chain(existing: &Option<String>, fallback: &Option<String>) -> String {
    format!(
        "existingIconId: {}, fallbackIcon: {}",
        existing.as_deref().unwrap_or("none"),
        fallback.as_deref().unwrap_or("none")
    )
}

/// Resolve one configured reference.
///
/// Resolution order, first success wins:
/// 1. `existingIconId` found in the index
/// 2. `fallbackIcon` found in the index
/// 3. inline `customIcon`
///
/// Donor icons lend their visuals and collection; the configured `id` and
/// `name` always replace the donor's.
pub fn resolve_icon(
    reference: &IconConfig,
    index: &CatalogIndex,
) -> Result<Icon, ResolutionFailure> {
    if let Some(existing_id) = &reference.existing_icon_id {
        match index.get(existing_id) {
            Some(donor) => return Ok(borrow_visuals(donor, reference)),
            None => debug!(
                existing = %existing_id,
                icon = %reference.name,
                "existing icon not found"
            ),
        }
    }

    if let Some(fallback_id) = &reference.fallback_icon {
        match index.get(fallback_id) {
            Some(donor) => {
                debug!(fallback = %fallback_id, icon = %reference.name, "using fallback icon");
                return Ok(borrow_visuals(donor, reference));
            }
            None => debug!(
                fallback = %fallback_id,
                icon = %reference.name,
                "fallback icon not found"
            ),
        }
    }

    if let Some(custom) = &reference.custom_icon {
        return Ok(Icon {
            id: reference.id.clone(),
            name: reference.name.clone(),
            url: custom.url.clone(),
            collection: Some(reference.collection.clone()),
            is_isometric: custom.is_isometric,
            scale: custom.scale,
            flip_x: custom.flip_x,
            flip_y: custom.flip_y,
            display_group: None,
        });
    }

    let reason = if reference.existing_icon_id.is_some() || reference.fallback_icon.is_some() {
        FailureReason::DonorsMissing
    } else {
        FailureReason::NoResolutionPath
    };
    let failure = ResolutionFailure {
        reason,
        ref_id: reference.id.clone(),
        ref_name: reference.name.clone(),
        existing_icon_id: reference.existing_icon_id.clone(),
        fallback_icon: reference.fallback_icon.clone(),
    };
    debug!("{failure}");
    Err(failure)
}

fn borrow_visuals(donor: &Icon, reference: &IconConfig) -> Icon {
    Icon {
        id: reference.id.clone(),
        name: reference.name.clone(),
        display_group: None,
        ..donor.clone()
    }
}
