use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, warn};

use crate::errors::{Result, RotatorError};

use migration::entities::{banner, rotation, slot, social_group, statistic};
use migration::{Migrator, MigratorTrait};

use super::models::{Banner, BannerId, Counter, GroupId, SlotId};
use super::Storage;

/// 从 URL 自动推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:") {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("postgres:") || database_url.starts_with("postgresql:") {
        Ok("postgres".to_string())
    } else if database_url.starts_with("mysql:") {
        Ok("mysql".to_string())
    } else {
        Err(RotatorError::database_config(format!(
            "无法从 URL 推断数据库类型: {}",
            database_url
        )))
    }
}

/// SQL counter store backed by sea-orm.
///
/// Increments are single `UPDATE ... SET x = x + 1` statements, so the
/// database's row lock is the per-key mutual exclusion and a dropped
/// request either applied the statement or never sent it.
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(RotatorError::database_config("DATABASE_URL 未设置".to_string()));
        }

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        // 运行迁移
        storage.run_migrations().await?;

        warn!("{} storage initialized.", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    /// 连接 SQLite 数据库（带自动创建和性能优化）
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::SqlxSqliteConnector;
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RotatorError::database_config(format!("SQLite URL 解析失败: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            RotatorError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 连接通用数据库（MySQL/PostgreSQL）
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            RotatorError::database_connection(format!(
                "无法连接到 {} 数据库: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| RotatorError::database_operation(format!("迁移失败: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    fn model_to_counter(model: statistic::Model) -> Counter {
        Counter {
            banner_id: model.banner_id,
            slot_id: model.slot_id,
            group_id: model.group_id,
            shows: Ord::max(model.shows, 0) as u64,
            clicks: Ord::max(model.clicks, 0) as u64,
        }
    }

    /// `ON CONFLICT DO NOTHING` 把全部行吞掉时 sea-orm 返回
    /// `RecordNotInserted`，对幂等写入而言它就是成功
    fn ignore_conflict<T>(result: std::result::Result<T, DbErr>) -> Result<()> {
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn increment_column(
        &self,
        column: statistic::Column,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()> {
        let result = statistic::Entity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(statistic::Column::BannerId.eq(banner_id))
            .filter(statistic::Column::SlotId.eq(slot_id))
            .filter(statistic::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RotatorError::not_found(format!(
                "no counter for banner {} in slot {} / group {}",
                banner_id, slot_id, group_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_banner(&self, description: &str) -> Result<BannerId> {
        let model = banner::ActiveModel {
            description: Set(description.to_string()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.id)
    }

    async fn create_slot(&self, description: &str) -> Result<SlotId> {
        let model = slot::ActiveModel {
            description: Set(description.to_string()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(inserted.id)
    }

    async fn create_group(&self, description: &str) -> Result<GroupId> {
        let txn = self.db.begin().await?;

        let model = social_group::ActiveModel {
            description: Set(description.to_string()),
            ..Default::default()
        };
        let inserted = model.insert(&txn).await?;

        // 为所有已有轮换补零值计数器
        let rotations = rotation::Entity::find().all(&txn).await?;
        if !rotations.is_empty() {
            let rows: Vec<statistic::ActiveModel> = rotations
                .into_iter()
                .map(|r| statistic::ActiveModel {
                    banner_id: Set(r.banner_id),
                    slot_id: Set(r.slot_id),
                    group_id: Set(inserted.id),
                    shows: Set(0),
                    clicks: Set(0),
                })
                .collect();

            Self::ignore_conflict(
                statistic::Entity::insert_many(rows)
                    .on_conflict(
                        OnConflict::columns([
                            statistic::Column::BannerId,
                            statistic::Column::SlotId,
                            statistic::Column::GroupId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await,
            )?;
        }

        txn.commit().await?;
        Ok(inserted.id)
    }

    async fn get_banner(&self, banner_id: BannerId) -> Result<Option<Banner>> {
        let model = banner::Entity::find_by_id(banner_id).one(&self.db).await?;
        Ok(model.map(|m| Banner {
            id: m.id,
            description: m.description,
        }))
    }

    async fn group_ids(&self) -> Result<Vec<GroupId>> {
        let groups = social_group::Entity::find()
            .order_by_asc(social_group::Column::Id)
            .all(&self.db)
            .await?;
        Ok(groups.into_iter().map(|g| g.id).collect())
    }

    async fn banners_for_slot(&self, slot_id: SlotId) -> Result<Vec<BannerId>> {
        let rows = rotation::Entity::find()
            .filter(rotation::Column::SlotId.eq(slot_id))
            .order_by_asc(rotation::Column::BannerId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| r.banner_id).collect())
    }

    async fn get_counters(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        banner_ids: &[BannerId],
    ) -> Result<Vec<Counter>> {
        if banner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = statistic::Entity::find()
            .filter(statistic::Column::SlotId.eq(slot_id))
            .filter(statistic::Column::GroupId.eq(group_id))
            .filter(statistic::Column::BannerId.is_in(banner_ids.to_vec()))
            .order_by_asc(statistic::Column::BannerId)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::model_to_counter).collect())
    }

    async fn increment_show(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()> {
        self.increment_column(statistic::Column::Shows, banner_id, slot_id, group_id)
            .await
    }

    async fn increment_click(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()> {
        self.increment_column(statistic::Column::Clicks, banner_id, slot_id, group_id)
            .await
    }

    async fn attach_banner_to_slot(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        all_group_ids: &[GroupId],
    ) -> Result<()> {
        let txn = self.db.begin().await?;

        Self::ignore_conflict(
            rotation::Entity::insert(rotation::ActiveModel {
                banner_id: Set(banner_id),
                slot_id: Set(slot_id),
            })
            .on_conflict(
                OnConflict::columns([rotation::Column::BannerId, rotation::Column::SlotId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&txn)
            .await,
        )?;

        if !all_group_ids.is_empty() {
            let rows: Vec<statistic::ActiveModel> = all_group_ids
                .iter()
                .map(|group_id| statistic::ActiveModel {
                    banner_id: Set(banner_id),
                    slot_id: Set(slot_id),
                    group_id: Set(*group_id),
                    shows: Set(0),
                    clicks: Set(0),
                })
                .collect();

            Self::ignore_conflict(
                statistic::Entity::insert_many(rows)
                    .on_conflict(
                        OnConflict::columns([
                            statistic::Column::BannerId,
                            statistic::Column::SlotId,
                            statistic::Column::GroupId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await,
            )?;
        }

        txn.commit().await?;
        info!("banner {} attached to slot {}", banner_id, slot_id);
        Ok(())
    }

    async fn detach_banner_from_slot(&self, banner_id: BannerId, slot_id: SlotId) -> Result<()> {
        rotation::Entity::delete_many()
            .filter(rotation::Column::BannerId.eq(banner_id))
            .filter(rotation::Column::SlotId.eq(slot_id))
            .exec(&self.db)
            .await?;

        // 历史统计保留，不随轮换一起删除
        info!("banner {} detached from slot {}", banner_id, slot_id);
        Ok(())
    }

    async fn get_backend_name(&self) -> String {
        self.backend_name.clone()
    }
}
