pub mod amenity_controller;
