// src/capacity.rs
use crate::descriptor::DESCRIPTOR_LEN;
use crate::error::{ConvertError, Result};
use crate::geometry::Geometry;
use log::debug;

/// Operator overrides for a source whose size disagrees with the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapacityCheck {
    /// Accept a source longer than the geometry; the excess is never read.
    pub ignore_excess: bool,
    /// Accept a source shorter than the geometry.
    pub force: bool,
}

/// Compare the geometry's capacity with the source length. A trailing
/// descriptor is not sector data and does not count.
pub fn validate(geometry: &Geometry, source_len: u64, has_descriptor: bool, check: CapacityCheck) -> Result<()> {
    let declared = geometry.capacity();
    let actual = if has_descriptor { source_len.saturating_sub(DESCRIPTOR_LEN) } else { source_len };
    debug!("capacity: declared {} bytes, source {} bytes", declared, actual);

    if actual > declared && !check.ignore_excess {
        return Err(ConvertError::ImageTooLarge { actual, declared });
    }
    if actual < declared && !check.force {
        return Err(ConvertError::ImageTooSmall { actual, declared });
    }
    Ok(())
}
