use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::amenity_dto::CreateAmenityCommand;
use crate::models::amenity::{Amenity, AmenityCategory};
use crate::utils::errors::{conflict_error, AppError};

pub struct AmenityRepository {
    pool: PgPool,
}

impl AmenityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Buscar amenities filtradas, con el conteo de vehículos asociados.
    ///
    /// Orden determinista: categoría ascendente (orden de declaración del
    /// ENUM) y nombre ascendente byte a byte (COLLATE "C").
    pub async fn search(
        &self,
        category: Option<AmenityCategory>,
        is_active: bool,
    ) -> Result<Vec<Amenity>, AppError> {
        let amenities = sqlx::query_as::<_, Amenity>(
            r#"
            SELECT
                a.id, a.name, a.description, a.category, a.price_modifier,
                a.icon, a.is_active, a.created_at,
                COUNT(va.vehicle_id) AS vehicle_count
            FROM amenities a
            LEFT JOIN vehicle_amenities va ON va.amenity_id = a.id
            WHERE a.is_active = $1
            AND ($2::amenity_category IS NULL OR a.category = $2)
            GROUP BY a.id
            ORDER BY a.category ASC, a.name COLLATE "C" ASC
            "#,
        )
        .bind(is_active)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(amenities)
    }

    /// Verificación rápida de unicidad de nombre (solo para dar un mensaje
    /// amigable; el guard real es el constraint UNIQUE de la columna)
    pub async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM amenities WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    /// Insertar una amenity nueva; nace activa con vehicle_count 0.
    ///
    /// Dos create concurrentes con el mismo nombre pueden pasar ambos el
    /// pre-check; la violación tardía del constraint UNIQUE se traduce aquí
    /// al mismo error de conflicto que produce el pre-check.
    pub async fn insert(&self, cmd: CreateAmenityCommand) -> Result<Amenity, AppError> {
        let id = Uuid::new_v4();
        let name = cmd.name.clone();

        let amenity = sqlx::query_as::<_, Amenity>(
            r#"
            INSERT INTO amenities (id, name, description, category, price_modifier, icon, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING id, name, description, category, price_modifier, icon, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(cmd.name)
        .bind(cmd.description)
        .bind(cmd.category)
        .bind(cmd.price_modifier)
        .bind(cmd.icon)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return conflict_error("Amenity", "name", &name);
                }
            }
            AppError::Database(e)
        })?;

        Ok(amenity)
    }
}
