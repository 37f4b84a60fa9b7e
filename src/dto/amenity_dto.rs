//! DTOs del catálogo de amenities
//!
//! Este módulo convierte la entrada no confiable (query string / body JSON)
//! en comandos tipados e inmutables antes de tocar la capa de persistencia.
//! Todas las violaciones de un request se reportan juntas, no solo la primera.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::amenity::{Amenity, AmenityCategory};

// Filtros crudos para búsqueda de amenities (campos desconocidos se ignoran)
#[derive(Debug, Default, Deserialize)]
pub struct AmenityFilters {
    pub category: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<String>,
}

/// Comando de búsqueda ya validado
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmenitySearchCommand {
    pub category: Option<AmenityCategory>,
    pub is_active: Option<bool>,
}

impl AmenitySearchCommand {
    /// Resolución del filtro por defecto, aplicada en un solo punto:
    /// sin valor explícito solo se listan amenities activas.
    pub fn effective_is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

impl AmenityFilters {
    /// Parsear y validar los filtros de búsqueda
    pub fn parse(&self) -> Result<AmenitySearchCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category = match self.category.as_deref() {
            None => None,
            Some(raw) => match AmenityCategory::parse(raw) {
                Some(category) => Some(category),
                None => {
                    errors.add("category", invalid_category_error(raw));
                    None
                }
            },
        };

        let is_active = match self.is_active.as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(raw) => {
                let mut error = ValidationError::new("boolean");
                error.add_param("value".into(), &raw.to_string());
                error.add_param("expected".into(), &"true | false".to_string());
                errors.add("isActive", error);
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(AmenitySearchCommand { category, is_active })
    }
}

// Request para crear una nueva amenity
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAmenityRequest {
    #[validate(
        custom = "crate::utils::validation::validate_not_empty",
        length(max = 100)
    )]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom = "validate_category")]
    pub category: String,

    #[validate(range(min = 0.0))]
    pub price_modifier: f64,

    #[validate(length(max = 255))]
    pub icon: Option<String>,
}

/// Comando de creación ya validado
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAmenityCommand {
    pub name: String,
    pub description: Option<String>,
    pub category: AmenityCategory,
    pub price_modifier: Decimal,
    pub icon: Option<String>,
}

impl CreateAmenityRequest {
    /// Validar el request completo y convertirlo en comando tipado
    pub fn parse(self) -> Result<CreateAmenityCommand, ValidationErrors> {
        self.validate()?;

        // Tras validate() la categoría es miembro del enum y el precio no es
        // negativo ni NaN; from_f64_retain solo puede fallar con infinitos.
        let category = AmenityCategory::parse(&self.category)
            .ok_or_else(|| single_error("category", invalid_category_error(&self.category)))?;

        let price_modifier = Decimal::from_f64_retain(self.price_modifier)
            .ok_or_else(|| {
                let mut error = ValidationError::new("decimal");
                error.add_param("value".into(), &self.price_modifier);
                single_error("price_modifier", error)
            })?;

        Ok(CreateAmenityCommand {
            name: self.name,
            description: self.description,
            category,
            price_modifier,
            icon: self.icon,
        })
    }
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    if AmenityCategory::parse(value).is_none() {
        return Err(invalid_category_error(value));
    }
    Ok(())
}

fn invalid_category_error(value: &str) -> ValidationError {
    let mut error = ValidationError::new("category");
    error.add_param("value".into(), &value.to_string());
    let allowed: Vec<&str> = AmenityCategory::ALL.iter().map(|c| c.as_str()).collect();
    error.add_param("allowed_values".into(), &allowed);
    error
}

fn single_error(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

// Response de amenity para la API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: AmenityCategory,
    pub price_modifier: Decimal,
    pub icon: Option<String>,
    pub is_active: bool,
    pub vehicle_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Amenity> for AmenityResponse {
    fn from(amenity: Amenity) -> Self {
        Self {
            id: amenity.id,
            name: amenity.name,
            description: amenity.description,
            category: amenity.category,
            price_modifier: amenity.price_modifier,
            icon: amenity.icon,
            is_active: amenity.is_active,
            vehicle_count: amenity.vehicle_count,
            created_at: amenity.created_at,
        }
    }
}

// Response del listado: lista plana, particionada por categoría y
// enumeración completa de categorías (independiente de los filtros)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityListData {
    pub amenities: Vec<AmenityResponse>,
    pub grouped_amenities: BTreeMap<AmenityCategory, Vec<AmenityResponse>>,
    pub categories: Vec<AmenityCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, category: &str, price: f64) -> CreateAmenityRequest {
        CreateAmenityRequest {
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            price_modifier: price,
            icon: None,
        }
    }

    #[test]
    fn test_parse_search_empty_defaults_to_active_only() {
        let filters = AmenityFilters::default();
        let cmd = filters.parse().unwrap();
        assert_eq!(cmd.category, None);
        assert_eq!(cmd.is_active, None);
        assert!(cmd.effective_is_active());
    }

    #[test]
    fn test_parse_search_explicit_values() {
        let filters = AmenityFilters {
            category: Some("luxury".to_string()),
            is_active: Some("false".to_string()),
        };
        let cmd = filters.parse().unwrap();
        assert_eq!(cmd.category, Some(AmenityCategory::Luxury));
        assert_eq!(cmd.is_active, Some(false));
        assert!(!cmd.effective_is_active());
    }

    #[test]
    fn test_parse_search_invalid_category() {
        let filters = AmenityFilters {
            category: Some("premium".to_string()),
            is_active: None,
        };
        let errors = filters.parse().unwrap_err();
        assert!(errors.field_errors().contains_key("category"));
    }

    #[test]
    fn test_parse_search_invalid_is_active() {
        let filters = AmenityFilters {
            category: None,
            is_active: Some("yes".to_string()),
        };
        let errors = filters.parse().unwrap_err();
        assert!(errors.field_errors().contains_key("isActive"));
    }

    #[test]
    fn test_parse_search_reports_all_violations() {
        let filters = AmenityFilters {
            category: Some("premium".to_string()),
            is_active: Some("maybe".to_string()),
        };
        let errors = filters.parse().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("category"));
        assert!(fields.contains_key("isActive"));
    }

    #[test]
    fn test_parse_create_valid() {
        let cmd = create_request("WiFi", "luxury", 5.0).parse().unwrap();
        assert_eq!(cmd.name, "WiFi");
        assert_eq!(cmd.category, AmenityCategory::Luxury);
        assert_eq!(cmd.price_modifier, Decimal::from_f64_retain(5.0).unwrap());
    }

    #[test]
    fn test_parse_create_zero_price_is_valid() {
        let cmd = create_request("Heater", "comfort", 0.0).parse().unwrap();
        assert_eq!(cmd.price_modifier, Decimal::ZERO);
    }

    #[test]
    fn test_parse_create_negative_price_fails() {
        let errors = create_request("Heater", "comfort", -1.0).parse().unwrap_err();
        assert!(errors.field_errors().contains_key("price_modifier"));
    }

    #[test]
    fn test_parse_create_collects_every_violation() {
        let errors = create_request("   ", "premium", -3.5).parse().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("category"));
        assert!(fields.contains_key("price_modifier"));
        assert_eq!(fields.len(), 3);
    }
}
