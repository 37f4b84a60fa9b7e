pub mod amenity_repository;
