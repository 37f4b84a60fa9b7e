use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::dto::amenity_dto::{
    AmenityListData, AmenityResponse, AmenitySearchCommand, CreateAmenityCommand,
};
use crate::models::amenity::AmenityCategory;
use crate::repositories::amenity_repository::AmenityRepository;
use crate::utils::errors::{conflict_error, AppError};

pub struct AmenityController {
    repository: AmenityRepository,
}

impl AmenityController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AmenityRepository::new(pool),
        }
    }

    /// Listar amenities según el comando de búsqueda.
    ///
    /// Sin filtro explícito de visibilidad solo se listan las activas;
    /// `categories` siempre trae la enumeración completa para que el
    /// cliente pueda ofrecer categorías todavía sin amenities.
    pub async fn list(&self, cmd: AmenitySearchCommand) -> Result<AmenityListData, AppError> {
        let amenities = self
            .repository
            .search(cmd.category, cmd.effective_is_active())
            .await?;

        let amenities: Vec<AmenityResponse> =
            amenities.into_iter().map(AmenityResponse::from).collect();
        let grouped_amenities = group_by_category(&amenities);

        Ok(AmenityListData {
            amenities,
            grouped_amenities,
            categories: AmenityCategory::ALL.to_vec(),
        })
    }

    /// Crear una amenity nueva.
    ///
    /// El pre-check de nombre solo mejora el mensaje de error; el guard
    /// autoritativo es el constraint UNIQUE, cuya violación tardía el
    /// repositorio traduce al mismo conflicto.
    pub async fn create(&self, cmd: CreateAmenityCommand) -> Result<AmenityResponse, AppError> {
        if self.repository.name_exists(&cmd.name).await? {
            return Err(conflict_error("Amenity", "name", &cmd.name));
        }

        let amenity = self.repository.insert(cmd).await?;

        Ok(AmenityResponse::from(amenity))
    }
}

/// Particionar la lista ordenada por categoría.
///
/// Cada grupo conserva el orden relativo de la lista plana; una categoría
/// sin amenities no aparece como clave. Con la lista ordenada por
/// (categoría, nombre), el orden de las claves del BTreeMap coincide con
/// el orden de primera aparición.
fn group_by_category(
    amenities: &[AmenityResponse],
) -> BTreeMap<AmenityCategory, Vec<AmenityResponse>> {
    let mut grouped: BTreeMap<AmenityCategory, Vec<AmenityResponse>> = BTreeMap::new();
    for amenity in amenities {
        grouped
            .entry(amenity.category)
            .or_default()
            .push(amenity.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn amenity(name: &str, category: AmenityCategory) -> AmenityResponse {
        AmenityResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            category,
            price_modifier: Decimal::ZERO,
            icon: None,
            is_active: true,
            vehicle_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_by_category_partitions_exactly() {
        let amenities = vec![
            amenity("Heater", AmenityCategory::Comfort),
            amenity("AC", AmenityCategory::Luxury),
            amenity("WiFi", AmenityCategory::Luxury),
            amenity("Airbags", AmenityCategory::Safety),
        ];

        let grouped = group_by_category(&amenities);

        let total: usize = grouped.values().map(|group| group.len()).sum();
        assert_eq!(total, amenities.len());
        for group in grouped.values() {
            assert!(!group.is_empty());
        }

        let luxury: Vec<&str> = grouped[&AmenityCategory::Luxury]
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(luxury, vec!["AC", "WiFi"]);
    }

    #[test]
    fn test_group_by_category_omits_empty_groups() {
        let amenities = vec![
            amenity("AC", AmenityCategory::Luxury),
            amenity("WiFi", AmenityCategory::Luxury),
        ];

        let grouped = group_by_category(&amenities);

        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key(&AmenityCategory::Luxury));
        assert!(!grouped.contains_key(&AmenityCategory::Comfort));
    }

    #[test]
    fn test_group_keys_follow_first_appearance_of_sorted_list() {
        // Lista ya ordenada por (categoría, nombre), como la entrega el
        // repositorio.
        let amenities = vec![
            amenity("Heater", AmenityCategory::Comfort),
            amenity("AC", AmenityCategory::Luxury),
            amenity("Airbags", AmenityCategory::Safety),
        ];

        let grouped = group_by_category(&amenities);

        let keys: Vec<AmenityCategory> = grouped.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                AmenityCategory::Comfort,
                AmenityCategory::Luxury,
                AmenityCategory::Safety,
            ]
        );
    }

    #[test]
    fn test_group_by_category_empty_list() {
        let grouped = group_by_category(&[]);
        assert!(grouped.is_empty());
    }
}
