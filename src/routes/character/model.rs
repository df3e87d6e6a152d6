use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::routes::ability::model::Ability;
use crate::routes::condition::model::Condition;
use crate::routes::inventory::model::InventoryItem;
use crate::routes::notes::model::{Decision, JournalEntry};
use crate::routes::relationship::model::CharacterRelationship;
use crate::routes::spell::model::Spell;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub race: String,
    pub image_url: Option<String>,
    pub level: i64,
    pub background: String,
    pub goal: String,
    pub health_current: i64,
    pub health_max: i64,
    pub mana_current: i64,
    pub mana_max: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Stat {
    pub id: i64,
    pub character_id: i64,
    pub name: String,
    pub value: i64,
}

/// 角色连同全部子资源, 对应详情视图
#[derive(Debug, Serialize)]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub character: Character,
    pub stats: Vec<Stat>,
    pub abilities: Vec<Ability>,
    pub spells: Vec<Spell>,
    pub inventory_items: Vec<InventoryItem>,
    pub conditions: Vec<Condition>,
    pub relationships: Vec<CharacterRelationship>,
    pub decisions: Vec<Decision>,
    pub journal_entries: Vec<JournalEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequest {
    pub name: Option<String>,
    pub race: Option<String>,
    pub goal: Option<String>,
    pub background: Option<String>,
    pub level: Option<i64>,
    pub health_current: Option<i64>,
    pub health_max: Option<i64>,
    pub mana_current: Option<i64>,
    pub mana_max: Option<i64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub race: Option<String>,
    pub goal: Option<String>,
    pub background: Option<String>,
    pub level: Option<i64>,
    pub health_current: Option<i64>,
    pub health_max: Option<i64>,
    pub mana_current: Option<i64>,
    pub mana_max: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterQuery {
    pub character_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CharacterGetResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<CharacterDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<CharacterDetail>>,
}

#[derive(Debug, Serialize)]
pub struct CharacterMutationResponse {
    pub message: String,
    pub character_id: i64,
}

// 创建角色时的四项基础属性
const DEFAULT_STATS: [&str; 4] = ["FUE", "AGI", "MEN", "CAR"];

impl Character {
    /// 所有权检查的唯一入口: 按 (id, user_id) 查找.
    /// 所有子资源操作都必须经过这里确认父角色归属
    pub async fn find_owned(
        pool: &SqlitePool,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Character>(
            r#"
            SELECT id, user_id, name, race, image_url, level, background, goal,
                   health_current, health_max, mana_current, mana_max
            FROM characters
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Character>(
            r#"
            SELECT id, user_id, name, race, image_url, level, background, goal,
                   health_current, health_max, mana_current, mana_max
            FROM characters
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 创建角色并写入基础属性, 同一事务.
    /// 生命值默认 6+FUE, 法力值默认 3+MEN
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        req: CreateCharacterRequest,
    ) -> Result<i64, sqlx::Error> {
        let mut stats: BTreeMap<String, i64> =
            DEFAULT_STATS.iter().map(|name| (name.to_string(), 0)).collect();
        stats.extend(req.stats);

        let fuerza = stats.get("FUE").copied().unwrap_or(0);
        let mente = stats.get("MEN").copied().unwrap_or(0);

        let mut tx = pool.begin().await?;

        let character_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO characters (user_id, name, race, image_url, level, background, goal,
                                    health_current, health_max, mana_current, mana_max)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(req.name.unwrap_or_default())
        .bind(req.race.unwrap_or_default())
        .bind(req.image_url)
        .bind(req.level.unwrap_or(1))
        .bind(req.background.unwrap_or_default())
        .bind(req.goal.unwrap_or_default())
        .bind(req.health_current.unwrap_or(6 + fuerza))
        .bind(req.health_max.unwrap_or(6 + fuerza))
        .bind(req.mana_current.unwrap_or(3 + mente))
        .bind(req.mana_max.unwrap_or(3 + mente))
        .fetch_one(&mut *tx)
        .await?;

        for (name, value) in stats {
            sqlx::query("INSERT INTO stats (character_id, name, value) VALUES (?, ?, ?)")
                .bind(character_id)
                .bind(name)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(character_id)
    }

    pub async fn update(
        &self,
        pool: &SqlitePool,
        req: UpdateCharacterRequest,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE characters
            SET name = ?, race = ?, goal = ?, background = ?, level = ?,
                health_current = ?, health_max = ?, mana_current = ?, mana_max = ?, image_url = ?
            WHERE id = ?
            "#,
        )
        .bind(req.name.as_deref().unwrap_or(&self.name))
        .bind(req.race.as_deref().unwrap_or(&self.race))
        .bind(req.goal.as_deref().unwrap_or(&self.goal))
        .bind(req.background.as_deref().unwrap_or(&self.background))
        .bind(req.level.unwrap_or(self.level))
        .bind(req.health_current.unwrap_or(self.health_current))
        .bind(req.health_max.unwrap_or(self.health_max))
        .bind(req.mana_current.unwrap_or(self.mana_current))
        .bind(req.mana_max.unwrap_or(self.mana_max))
        .bind(req.image_url.as_deref().or(self.image_url.as_deref()))
        .bind(self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// 显式级联删除: 先删子资源再删角色本身, 单事务
    pub async fn delete_cascade(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for table in [
            "stats",
            "abilities",
            "spells",
            "inventory_items",
            "conditions",
            "journal_entries",
            "decisions",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE character_id = ?"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM character_relationships WHERE source_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// 加载角色的全部子资源
    pub async fn detail(self, pool: &SqlitePool) -> Result<CharacterDetail, sqlx::Error> {
        let stats = Stat::list_for_character(pool, self.id).await?;
        let abilities = Ability::list_for_character(pool, self.id).await?;
        let spells = Spell::list_for_character(pool, self.id).await?;
        let inventory_items = InventoryItem::list_for_character(pool, self.id).await?;
        let conditions = Condition::list_for_character(pool, self.id).await?;
        let relationships = CharacterRelationship::list_for_character(pool, self.id).await?;
        let decisions = Decision::list_for_character(pool, self.id).await?;
        let journal_entries = JournalEntry::list_for_character(pool, self.id).await?;

        Ok(CharacterDetail {
            character: self,
            stats,
            abilities,
            spells,
            inventory_items,
            conditions,
            relationships,
            decisions,
            journal_entries,
        })
    }
}

impl Stat {
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Stat>(
            r#"
            SELECT id, character_id, name, value
            FROM stats
            WHERE character_id = ?
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_name(
        pool: &SqlitePool,
        character_id: i64,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Stat>(
            r#"
            SELECT id, character_id, name, value
            FROM stats
            WHERE character_id = ? AND name = ?
            "#,
        )
        .bind(character_id)
        .bind(name)
        .fetch_optional(pool)
        .await
    }
}
