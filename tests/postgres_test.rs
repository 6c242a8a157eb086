//! 需要真实 Postgres：`DATABASE_URL=... cargo test -- --ignored`

use characters_backend::database::{CharacterRepository, PgCharacterRepository, ensure_schema};
use characters_backend::models::{Character, LocationRef};
use chrono::{TimeZone, Utc};
use sqlx::postgres::PgPoolOptions;

fn character(id: i64, status: &str) -> Character {
    Character {
        id,
        name: "Rick Sanchez".into(),
        status: status.into(),
        species: "Human".into(),
        kind: String::new(),
        gender: "Male".into(),
        origin: LocationRef {
            name: "Earth (C-137)".into(),
            url: "https://rickandmortyapi.com/api/location/1".into(),
        },
        location: LocationRef {
            name: "Citadel of Ricks".into(),
            url: "https://rickandmortyapi.com/api/location/3".into(),
        },
        image: "https://rickandmortyapi.com/api/character/avatar/1.jpeg".into(),
        episode: vec![
            "https://rickandmortyapi.com/api/episode/1".into(),
            "https://rickandmortyapi.com/api/episode/2".into(),
        ],
        url: format!("https://rickandmortyapi.com/api/character/{}", id),
        created: Utc.with_ymd_and_hms(2017, 11, 4, 18, 48, 46).unwrap(),
    }
}

async fn repository() -> (PgCharacterRepository, sqlx::PgPool) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();
    (PgCharacterRepository::new(pool.clone()), pool)
}

#[tokio::test]
#[ignore]
async fn test_upsert_is_idempotent_by_id() {
    let (repo, pool) = repository().await;
    let id = 900_001;

    repo.upsert(&[character(id, "Alive")]).await.unwrap();
    repo.upsert(&[character(id, "Dead")]).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored, character(id, "Dead"));
}

#[tokio::test]
#[ignore]
async fn test_failed_batch_commits_nothing() {
    let (repo, _) = repository().await;
    let good = character(900_002, "Alive");
    // NUL 字节无法写入 TEXT 列，整批回滚
    let mut bad = character(900_003, "Alive");
    bad.name = "Rick\0Sanchez".into();

    assert!(repo.upsert(&[good.clone(), bad]).await.is_err());
    assert!(repo.find_by_id(good.id).await.unwrap().is_none());
}
