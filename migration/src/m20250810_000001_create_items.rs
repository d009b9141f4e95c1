use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Description).text().not_null())
                    .col(ColumnDef::new(Items::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Items::ThumbnailUrl).string().null())
                    .col(ColumnDef::new(Items::Status).string().not_null())
                    .col(ColumnDef::new(Items::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Items::ReservedByName).string().null())
                    .col(ColumnDef::new(Items::ReservedByEmail).string().null())
                    .col(ColumnDef::new(Items::RetrievedByName).string().null())
                    .col(ColumnDef::new(Items::RetrievedByEmail).string().null())
                    .col(
                        ColumnDef::new(Items::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // fetch_all filters on status + created_at and orders by created_at
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_status")
                    .table(Items::Table)
                    .col(Items::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_created_at")
                    .table(Items::Table)
                    .col(Items::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Description,
    ImageUrl,
    ThumbnailUrl,
    Status,
    CreatedAt,
    ReservedByName,
    ReservedByEmail,
    RetrievedByName,
    RetrievedByEmail,
    IsArchived,
}
