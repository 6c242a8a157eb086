// 数据库模块
// characters 表结构与存储库

pub mod models;
pub mod repositories;

pub use models::character::CharacterEntity;
pub use repositories::character::{
    CharacterRepository, MemoryCharacterRepository, PgCharacterRepository,
};

use sqlx::PgPool;

/// 建表（若不存在）
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT '',
            species TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT '',
            gender TEXT NOT NULL DEFAULT '',
            origin JSONB NOT NULL,
            location JSONB NOT NULL,
            image TEXT NOT NULL DEFAULT '',
            episode JSONB NOT NULL DEFAULT '[]'::jsonb,
            url TEXT NOT NULL DEFAULT '',
            created TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_characters_name ON characters (name)")
        .execute(pool)
        .await?;

    Ok(())
}
