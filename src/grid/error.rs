use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Unsupported hex grid resolution {0}, expected 0..=15")]
    InvalidResolution(u8, #[source] h3o::error::InvalidResolution),

    #[error("Coordinate ({lat}, {lon}) cannot be mapped to a hex cell")]
    InvalidCoordinate {
        lat: f64,
        lon: f64,
        #[source]
        source: h3o::error::InvalidLatLng,
    },
}
