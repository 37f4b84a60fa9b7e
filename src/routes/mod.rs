pub mod amenity_routes;
pub mod payment_routes;
