use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_vendor_declarations_table::Migration),
            Box::new(m20250601_000002_create_receiver_shipments_table::Migration),
            Box::new(m20250601_000003_create_shipment_updates_table::Migration),
            Box::new(m20250601_000004_create_containers_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250601_000001_create_vendor_declarations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000001_create_vendor_declarations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create vendor_declarations table aligned with entities::vendor_declaration Model
            manager
                .create_table(
                    Table::create()
                        .table(VendorDeclarations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VendorDeclarations::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::VendorDeclId)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorDeclarations::VendorId).string().null())
                        .col(
                            ColumnDef::new(VendorDeclarations::TrackingId)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::ItemName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::WeightKg)
                                .double()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorDeclarations::HsCode).string().null())
                        .col(
                            ColumnDef::new(VendorDeclarations::ConsigneeName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::ConsigneeAddress)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::ConsigneeEmail)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::ConsigneePhone)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::QrCodeUrl)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::InvoicePdfUrl)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::PackingListPdfUrl)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorDeclarations::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Unique business identifier plus lookup indexes
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendor_declarations_vendor_decl_id")
                        .table(VendorDeclarations::Table)
                        .col(VendorDeclarations::VendorDeclId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendor_declarations_vendor_id")
                        .table(VendorDeclarations::Table)
                        .col(VendorDeclarations::VendorId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendor_declarations_created_at")
                        .table(VendorDeclarations::Table)
                        .col(VendorDeclarations::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VendorDeclarations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum VendorDeclarations {
        Table,
        Id,
        VendorDeclId,
        VendorId,
        TrackingId,
        ItemName,
        Quantity,
        WeightKg,
        HsCode,
        ConsigneeName,
        ConsigneeAddress,
        ConsigneeEmail,
        ConsigneePhone,
        QrCodeUrl,
        InvoicePdfUrl,
        PackingListPdfUrl,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250601_000002_create_receiver_shipments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000002_create_receiver_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create receiver_shipments table aligned with entities::receiver_shipment Model
            manager
                .create_table(
                    Table::create()
                        .table(ReceiverShipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReceiverShipments::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::TrackingId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::VendorDeclId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::CustomerEmail)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::Status)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::DispatchDate)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::ContainerId)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceiverShipments::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Both business identifiers are unique: one shipment per declaration,
            // one declaration per tracking ID. Raced duplicate inserts surface
            // as constraint violations.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_receiver_shipments_tracking_id")
                        .table(ReceiverShipments::Table)
                        .col(ReceiverShipments::TrackingId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_receiver_shipments_vendor_decl_id")
                        .table(ReceiverShipments::Table)
                        .col(ReceiverShipments::VendorDeclId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_receiver_shipments_container_id")
                        .table(ReceiverShipments::Table)
                        .col(ReceiverShipments::ContainerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_receiver_shipments_status")
                        .table(ReceiverShipments::Table)
                        .col(ReceiverShipments::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ReceiverShipments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ReceiverShipments {
        Table,
        Id,
        TrackingId,
        VendorDeclId,
        CustomerEmail,
        Status,
        DispatchDate,
        ContainerId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250601_000003_create_shipment_updates_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000003_create_shipment_updates_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create shipment_updates table aligned with entities::shipment_update Model
            manager
                .create_table(
                    Table::create()
                        .table(ShipmentUpdates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShipmentUpdates::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentUpdates::TrackingId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentUpdates::Status)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentUpdates::Location).string().null())
                        .col(ColumnDef::new(ShipmentUpdates::Notes).string().null())
                        .col(
                            ColumnDef::new(ShipmentUpdates::Timestamp)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipment_updates_tracking_id")
                        .table(ShipmentUpdates::Table)
                        .col(ShipmentUpdates::TrackingId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipment_updates_timestamp")
                        .table(ShipmentUpdates::Table)
                        .col(ShipmentUpdates::Timestamp)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ShipmentUpdates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ShipmentUpdates {
        Table,
        Id,
        TrackingId,
        Status,
        Location,
        Notes,
        Timestamp,
    }
}

mod m20250601_000004_create_containers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000004_create_containers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create containers table aligned with entities::container Model
            manager
                .create_table(
                    Table::create()
                        .table(Containers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Containers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Containers::ContainerId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Containers::ContainerName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Containers::Status).string().not_null())
                        .col(
                            ColumnDef::new(Containers::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Containers::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_containers_container_id")
                        .table(Containers::Table)
                        .col(Containers::ContainerId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Containers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Containers {
        Table,
        Id,
        ContainerId,
        ContainerName,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}
