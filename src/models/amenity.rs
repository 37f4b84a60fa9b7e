//! Modelo de Amenity
//!
//! Este módulo contiene el struct Amenity y la enumeración de categorías.
//! Mapea exactamente al schema PostgreSQL con primary key 'id' y
//! constraint UNIQUE sobre 'name'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Categoría de amenity - mapea al ENUM amenity_category
///
/// Las variantes se declaran en orden alfabético, igual que el ENUM en
/// PostgreSQL: así el orden de declaración, el orden léxico y el orden
/// de almacenamiento coinciden.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[sqlx(type_name = "amenity_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AmenityCategory {
    Accessibility,
    Comfort,
    Convenience,
    Entertainment,
    Luxury,
    Safety,
}

impl AmenityCategory {
    /// Enumeración completa, en orden de declaración
    pub const ALL: [AmenityCategory; 6] = [
        AmenityCategory::Accessibility,
        AmenityCategory::Comfort,
        AmenityCategory::Convenience,
        AmenityCategory::Entertainment,
        AmenityCategory::Luxury,
        AmenityCategory::Safety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AmenityCategory::Accessibility => "accessibility",
            AmenityCategory::Comfort => "comfort",
            AmenityCategory::Convenience => "convenience",
            AmenityCategory::Entertainment => "entertainment",
            AmenityCategory::Luxury => "luxury",
            AmenityCategory::Safety => "safety",
        }
    }

    /// Parsear el valor textual recibido por query string o body
    pub fn parse(value: &str) -> Option<AmenityCategory> {
        match value {
            "accessibility" => Some(AmenityCategory::Accessibility),
            "comfort" => Some(AmenityCategory::Comfort),
            "convenience" => Some(AmenityCategory::Convenience),
            "entertainment" => Some(AmenityCategory::Entertainment),
            "luxury" => Some(AmenityCategory::Luxury),
            "safety" => Some(AmenityCategory::Safety),
            _ => None,
        }
    }
}

impl std::fmt::Display for AmenityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amenity principal - mapea a la tabla amenities
///
/// `vehicle_count` es derivado (agregado sobre vehicle_amenities en el
/// momento de la consulta) y no existe como columna; en los INSERT ...
/// RETURNING queda en 0 vía `#[sqlx(default)]`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: AmenityCategory,
    pub price_modifier: Decimal,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub vehicle_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_roundtrip() {
        for category in AmenityCategory::ALL {
            assert_eq!(AmenityCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(AmenityCategory::parse("premium"), None);
        assert_eq!(AmenityCategory::parse("LUXURY"), None);
        assert_eq!(AmenityCategory::parse(""), None);
    }

    #[test]
    fn test_category_order_is_alphabetical() {
        let mut sorted = AmenityCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, AmenityCategory::ALL);

        let mut names: Vec<&str> = AmenityCategory::ALL.iter().map(|c| c.as_str()).collect();
        names.sort();
        let declared: Vec<&str> = AmenityCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, declared);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let value = serde_json::to_value(AmenityCategory::Luxury).unwrap();
        assert_eq!(value, serde_json::json!("luxury"));
    }
}
