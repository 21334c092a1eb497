use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 rotations 表，复合主键保证 (banner, slot) 唯一
        manager
            .create_table(
                Table::create()
                    .table(Rotation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rotation::BannerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rotation::SlotId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Rotation::BannerId)
                            .col(Rotation::SlotId),
                    )
                    .to_owned(),
            )
            .await?;

        // slot 查询走这个索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rotations_slot_id")
                    .table(Rotation::Table)
                    .col(Rotation::SlotId)
                    .to_owned(),
            )
            .await?;

        // 创建 statistics 表，每行一个 (banner, slot, group) 计数器
        manager
            .create_table(
                Table::create()
                    .table(Statistic::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Statistic::BannerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Statistic::SlotId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Statistic::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Statistic::Shows)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Statistic::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(Statistic::BannerId)
                            .col(Statistic::SlotId)
                            .col(Statistic::GroupId),
                    )
                    .to_owned(),
            )
            .await?;

        // Selector 的批量读按 (slot, group) 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_statistics_slot_group")
                    .table(Statistic::Table)
                    .col(Statistic::SlotId)
                    .col(Statistic::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_statistics_slot_group").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Statistic::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_rotations_slot_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rotation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rotation {
    #[sea_orm(iden = "rotations")]
    Table,
    BannerId,
    SlotId,
}

#[derive(DeriveIden)]
enum Statistic {
    #[sea_orm(iden = "statistics")]
    Table,
    BannerId,
    SlotId,
    GroupId,
    Shows,
    Clicks,
}
