use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::models::{Character, LocationRef};

/// characters 表实体，origin / location / episode 以 JSONB 存储
#[derive(Debug, FromRow)]
pub struct CharacterEntity {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: Json<LocationRef>,
    pub location: Json<LocationRef>,
    pub image: String,
    pub episode: Json<Vec<String>>,
    pub url: String,
    pub created: DateTime<Utc>,
}

impl From<CharacterEntity> for Character {
    fn from(entity: CharacterEntity) -> Self {
        Character {
            id: entity.id,
            name: entity.name,
            status: entity.status,
            species: entity.species,
            kind: entity.kind,
            gender: entity.gender,
            origin: entity.origin.0,
            location: entity.location.0,
            image: entity.image,
            episode: entity.episode.0,
            url: entity.url,
            created: entity.created,
        }
    }
}
