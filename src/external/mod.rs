pub mod location_iq;

pub use location_iq::{DynGeocoder, Geocoder, LocationIq};
