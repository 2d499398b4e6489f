use crate::grid::error::GridError;
use h3o::{LatLng, Resolution};

/// Maps coordinates to H3 cell ids at a fixed resolution.
///
/// Cell ids are the lowercase hexadecimal form produced by the reference H3 library, which is
/// what the lightning aggregates are keyed by. A locator can only be built for a valid
/// resolution, so a misconfigured grid fails at startup rather than on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexCellLocator {
    resolution: Resolution,
}

impl HexCellLocator {
    pub fn new(resolution: u8) -> Result<Self, GridError> {
        let resolution =
            Resolution::try_from(resolution).map_err(|e| GridError::InvalidResolution(resolution, e))?;
        Ok(Self { resolution })
    }

    pub fn resolution(&self) -> u8 {
        u8::from(self.resolution)
    }

    /// Returns the id of the cell containing `(lat, lon)`.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidCoordinate`] if either coordinate is not finite.
    pub fn cell_for(&self, lat: f64, lon: f64) -> Result<String, GridError> {
        let coord =
            LatLng::new(lat, lon).map_err(|source| GridError::InvalidCoordinate { lat, lon, source })?;
        Ok(coord.to_cell(self.resolution).to_string())
    }
}
