//! Site optimization: pick the best nearby weather station for a wind farm.

pub mod site_search;

pub use site_search::{geodesic_distance_km, SiteSearch, DEFAULT_RADIUS_KM};
