use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tokio::sync::Mutex;

use crate::database::models::character::CharacterEntity;
use crate::models::Character;

/// 角色存储库
///
/// `upsert` 以 id 为主键插入或覆盖，整批在一个事务内提交。
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    async fn upsert(&self, characters: &[Character]) -> Result<(), sqlx::Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Character>, sqlx::Error>;

    /// 连通性检查
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// Postgres 实现
#[derive(Clone)]
pub struct PgCharacterRepository {
    pool: PgPool,
}

impl PgCharacterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterRepository for PgCharacterRepository {
    async fn upsert(&self, characters: &[Character]) -> Result<(), sqlx::Error> {
        if characters.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for character in characters {
            sqlx::query(
                r#"
                INSERT INTO characters (
                    id, name, status, species, type, gender,
                    origin, location, image, episode, url, created
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    status = EXCLUDED.status,
                    species = EXCLUDED.species,
                    type = EXCLUDED.type,
                    gender = EXCLUDED.gender,
                    origin = EXCLUDED.origin,
                    location = EXCLUDED.location,
                    image = EXCLUDED.image,
                    episode = EXCLUDED.episode,
                    url = EXCLUDED.url,
                    created = EXCLUDED.created
                "#,
            )
            .bind(character.id)
            .bind(&character.name)
            .bind(&character.status)
            .bind(&character.species)
            .bind(&character.kind)
            .bind(&character.gender)
            .bind(Json(&character.origin))
            .bind(Json(&character.location))
            .bind(&character.image)
            .bind(Json(&character.episode))
            .bind(&character.url)
            .bind(character.created)
            .execute(&mut *tx)
            .await?;
        }

        // 任一条失败时 tx 被丢弃并回滚
        tx.commit().await?;
        tracing::debug!("Upserted {} characters", characters.len());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Character>, sqlx::Error> {
        let entity = sqlx::query_as::<_, CharacterEntity>(
            r#"
            SELECT id, name, status, species, type, gender,
                   origin, location, image, episode, url, created
            FROM characters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Character::from))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// 内存实现，语义与 Postgres 实现一致
#[derive(Default)]
pub struct MemoryCharacterRepository {
    rows: Mutex<BTreeMap<i64, Character>>,
    unavailable: AtomicBool,
}

impl MemoryCharacterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储不可用，之后的操作全部失败
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }

    fn check_available(&self) -> Result<(), sqlx::Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl CharacterRepository for MemoryCharacterRepository {
    async fn upsert(&self, characters: &[Character]) -> Result<(), sqlx::Error> {
        self.check_available()?;
        let mut rows = self.rows.lock().await;
        for character in characters {
            rows.insert(character.id, character.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Character>, sqlx::Error> {
        self.check_available()?;
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check_available()
    }
}
