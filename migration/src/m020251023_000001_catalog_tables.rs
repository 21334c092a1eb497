use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 banners 表
        manager
            .create_table(
                Table::create()
                    .table(Banner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Banner::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Banner::Description)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 slots 表
        manager
            .create_table(
                Table::create()
                    .table(Slot::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Slot::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Slot::Description)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 social_groups 表
        manager
            .create_table(
                Table::create()
                    .table(SocialGroup::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialGroup::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialGroup::Description)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SocialGroup::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Slot::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Banner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Banner {
    #[sea_orm(iden = "banners")]
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum Slot {
    #[sea_orm(iden = "slots")]
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum SocialGroup {
    #[sea_orm(iden = "social_groups")]
    Table,
    Id,
    Description,
}
