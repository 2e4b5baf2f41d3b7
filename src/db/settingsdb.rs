// db/settingsdb.rs
use async_trait::async_trait;
use sqlx::{types::Json, PgConnection};
use uuid::Uuid;

use super::db::DBClient;

use crate::{dtos::settingsdtos::UpsertSettingDto, models::settingsmodel::Setting};

#[async_trait]
pub trait SettingsExt {
    /// All settings when `include_private`, otherwise only the public ones.
    async fn get_settings(&self, include_private: bool) -> Result<Vec<Setting>, sqlx::Error>;

    async fn upsert_setting(
        &self,
        updated_by: Uuid,
        setting: UpsertSettingDto,
    ) -> Result<Setting, sqlx::Error>;

    /// Upserts every entry inside one transaction.
    async fn upsert_settings(
        &self,
        updated_by: Uuid,
        settings: Vec<UpsertSettingDto>,
    ) -> Result<Vec<Setting>, sqlx::Error>;

    async fn delete_setting(&self, key: &str) -> Result<bool, sqlx::Error>;
}

async fn upsert(
    conn: &mut PgConnection,
    updated_by: Uuid,
    setting: UpsertSettingDto,
) -> Result<Setting, sqlx::Error> {
    sqlx::query_as::<_, Setting>(
        r#"
        INSERT INTO settings (key, value, category, description, is_public, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (key) DO UPDATE SET
            value = EXCLUDED.value,
            category = EXCLUDED.category,
            description = EXCLUDED.description,
            is_public = EXCLUDED.is_public,
            updated_by = EXCLUDED.updated_by,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(setting.key)
    .bind(Json(setting.value))
    .bind(setting.category)
    .bind(setting.description)
    .bind(setting.is_public)
    .bind(updated_by)
    .fetch_one(conn)
    .await
}

#[async_trait]
impl SettingsExt for DBClient {
    async fn get_settings(&self, include_private: bool) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>(
            "SELECT * FROM settings WHERE ($1 = TRUE OR is_public = TRUE) ORDER BY key",
        )
        .bind(include_private)
        .fetch_all(&self.pool)
        .await
    }

    async fn upsert_setting(
        &self,
        updated_by: Uuid,
        setting: UpsertSettingDto,
    ) -> Result<Setting, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        upsert(&mut *conn, updated_by, setting).await
    }

    async fn upsert_settings(
        &self,
        updated_by: Uuid,
        settings: Vec<UpsertSettingDto>,
    ) -> Result<Vec<Setting>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(settings.len());

        for setting in settings {
            saved.push(upsert(&mut *tx, updated_by, setting).await?);
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_setting(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::PgPool;

    use crate::{
        db::fixtures::insert_user,
        models::{settingsmodel::SettingCategory, usermodel::UserRole},
    };

    fn setting(key: &str, value: serde_json::Value, is_public: bool) -> UpsertSettingDto {
        UpsertSettingDto {
            key: key.to_string(),
            value,
            category: SettingCategory::General,
            description: None,
            is_public,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_private_settings_hidden_from_public_reads(pool: PgPool) -> anyhow::Result<()> {
        let db_client = DBClient::new(pool);
        let admin = insert_user(&db_client, "Admin", UserRole::Admin, true).await?;

        db_client
            .upsert_setting(admin.id, setting("siteName", json!("Estate Listings"), true))
            .await?;
        db_client
            .upsert_setting(admin.id, setting("paymentKey", json!("sk_live"), false))
            .await?;

        let public: Vec<String> = db_client
            .get_settings(false)
            .await?
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(public, vec!["siteName".to_string()]);

        let all: Vec<String> = db_client
            .get_settings(true)
            .await?
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(all, vec!["paymentKey".to_string(), "siteName".to_string()]);

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upsert_overwrites_by_key(pool: PgPool) -> anyhow::Result<()> {
        let db_client = DBClient::new(pool);
        let admin = insert_user(&db_client, "Admin", UserRole::Admin, true).await?;

        db_client
            .upsert_setting(admin.id, setting("currency", json!("INR"), true))
            .await?;
        let saved = db_client
            .upsert_settings(
                admin.id,
                vec![
                    setting("currency", json!("USD"), false),
                    setting("itemsPerPage", json!(24), true),
                ],
            )
            .await?;
        assert_eq!(saved.len(), 2);

        let settings = db_client.get_settings(true).await?;
        assert_eq!(settings.len(), 2);
        let currency = settings
            .iter()
            .find(|s| s.key == "currency")
            .ok_or_else(|| anyhow::anyhow!("currency missing"))?;
        assert_eq!(currency.value.0, json!("USD"));
        assert!(!currency.is_public);
        assert_eq!(currency.updated_by, Some(admin.id));

        assert!(db_client.delete_setting("currency").await?);
        assert!(!db_client.delete_setting("currency").await?);
        assert_eq!(db_client.get_settings(false).await?.len(), 1);

        Ok(())
    }
}
