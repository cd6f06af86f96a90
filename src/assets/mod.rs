/// Encoded bytes and data URLs → rasters.
pub mod decode;
/// Asynchronous background/logo loading.
pub mod loader;
/// The shared premultiplied bitmap type.
pub mod raster;

pub use decode::{decode_data_url, decode_image};
pub use loader::{LoaderConfig, RasterLoader};
pub use raster::Raster;
