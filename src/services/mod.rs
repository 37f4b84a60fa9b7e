//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan integraciones externas; la lógica del catálogo
//! vive en controllers/.

pub mod payment_service;

pub use payment_service::*;
