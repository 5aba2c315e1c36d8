use async_trait::async_trait;
use machine_core_api::domain::{
    Actor, NewStatusType, StatusChange, StatusHistoryEntry, StatusType, StatusTypeUpdate,
};
use machine_core_api::error::{AccessError, AccessResult};
use machine_core_api::guard::{authorize, Mutation};
use machine_core_api::service::StatusService;
use machine_core_db::models::status::StatusTypeModel;
use machine_core_db::repository::create::Create;
use machine_core_db::repository::delete::Delete;
use machine_core_db::repository::load::Load;
use machine_core_db::repository::update::Update;
use uuid::Uuid;

use crate::access::service::MachineCoreService;
use crate::utils::map_db_error;

#[async_trait]
impl StatusService for MachineCoreService {
    async fn list_status_types(
        &self,
        actor: Actor,
        active_only: bool,
    ) -> AccessResult<Vec<StatusType>> {
        let ctx = self.context(&actor).await?;
        let unit = self.begin(&ctx).await?;
        let result = async {
            let types = unit
                .status_type_repository
                .list_ordered(active_only)
                .await
                .map_err(map_db_error)?;
            Ok(types.into_iter().map(StatusType::from).collect())
        }
        .await;
        self.finish(unit, result).await
    }

    async fn create_status_type(
        &self,
        actor: Actor,
        status_type: NewStatusType,
    ) -> AccessResult<StatusType> {
        Self::validated(&status_type)?;
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::CreateStatusType)?;

        let model = StatusTypeModel {
            id: Uuid::new_v4(),
            name: Self::bounded(&status_type.name, "name")?,
            color: Self::bounded(&status_type.color, "color")?,
            is_default: status_type.is_default,
            is_active: true,
            display_order: status_type.display_order,
        };

        let unit = self.begin(&ctx).await?;
        let result = async {
            let saved = unit
                .status_type_repository
                .create(model)
                .await
                .map_err(map_db_error)?;
            Ok(StatusType::from(saved))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn update_status_type(
        &self,
        actor: Actor,
        status_type_id: Uuid,
        update: StatusTypeUpdate,
    ) -> AccessResult<StatusType> {
        Self::validated(&update)?;
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::UpdateStatusType)?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let existing = unit
                .status_type_repository
                .load(status_type_id)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("status type {status_type_id}")))?;

            let model = StatusTypeModel {
                id: existing.id,
                name: Self::bounded(&update.name, "name")?,
                color: Self::bounded(&update.color, "color")?,
                is_default: existing.is_default,
                is_active: update.is_active,
                display_order: update.display_order,
            };
            let saved = unit
                .status_type_repository
                .update(model)
                .await
                .map_err(map_db_error)?;
            Ok(StatusType::from(saved))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn delete_status_type(&self, actor: Actor, status_type_id: Uuid) -> AccessResult<()> {
        let ctx = self.context(&actor).await?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let existing = unit
                .status_type_repository
                .load(status_type_id)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("status type {status_type_id}")))?;

            // The guard rejects default entries with ConstraintViolation;
            // the schema trigger backs it up server-side.
            authorize(&ctx, &Mutation::DeleteStatusType { is_default: existing.is_default })?;

            unit.status_type_repository
                .delete(status_type_id)
                .await
                .map_err(map_db_error)?;
            Ok(())
        }
        .await;
        self.finish(unit, result).await
    }

    async fn change_status(
        &self,
        actor: Actor,
        change: StatusChange,
    ) -> AccessResult<StatusHistoryEntry> {
        Self::validated(&change)?;
        let ctx = self.context(&actor).await?;
        let changed_by = ctx
            .actor
            .identity()
            .ok_or_else(|| AccessError::denied("change machine status"))?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let machine = unit
                .machine_repository
                .load(change.machine_id)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("machine {}", change.machine_id)))?;

            authorize(
                &ctx,
                &Mutation::ChangeStatus {
                    machine_id: machine.id,
                    department_id: machine.department_id,
                },
            )?;

            // Uncatalogued statuses are accepted by policy; they are worth
            // a trace for operators reviewing the catalog.
            let catalogued = unit
                .status_type_repository
                .is_active_name(&change.status)
                .await
                .map_err(map_db_error)?;
            if !catalogued {
                tracing::warn!(
                    machine = %machine.code,
                    status = %change.status,
                    "status value is not in the active status-type catalog"
                );
            }

            let record = unit
                .status_history_repository
                .append(
                    change.machine_id,
                    &change.status,
                    change.comment.as_deref(),
                    changed_by,
                )
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("machine {}", change.machine_id)))?;

            Ok(StatusHistoryEntry::from(record))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn list_history(
        &self,
        actor: Actor,
        machine_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> AccessResult<Vec<StatusHistoryEntry>> {
        let ctx = self.context(&actor).await?;
        let filter = ctx.scope.history_filter();

        let unit = self.begin(&ctx).await?;
        let result = async {
            let records = unit
                .status_history_repository
                .list_in_scope(&filter, machine_id, limit)
                .await
                .map_err(map_db_error)?;
            Ok(records.into_iter().map(StatusHistoryEntry::from).collect())
        }
        .await;
        self.finish(unit, result).await
    }
}

#[cfg(test)]
mod tests {
    use machine_core_api::domain::{NewMachine, Role, StatusChange};
    use machine_core_api::error::AccessError;
    use machine_core_api::service::{MachineService, StatusService};
    use serial_test::serial;

    use crate::test_helper::{seed_profile, setup_test_context, unique_name};

    fn change(machine_id: uuid::Uuid, status: &str) -> StatusChange {
        StatusChange {
            machine_id,
            status: status.to_string(),
            comment: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn status_changes_chain_previous_status(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;

        let machine = service
            .create_machine(
                admin,
                NewMachine {
                    code: unique_name("M500"),
                    name: "Lathe".to_string(),
                    description: None,
                    department_id: None,
                },
            )
            .await?;

        let first = service.change_status(admin, change(machine.id, "Running")).await?;
        assert_eq!(first.previous_status, machine.current_status);
        assert_eq!(first.status, "Running");

        let second = service.change_status(admin, change(machine.id, "Fault")).await?;
        assert_eq!(second.previous_status, "Running");

        let reloaded = service.get_machine(admin, machine.id).await?;
        assert_eq!(reloaded.current_status, "Fault");
        assert_eq!(reloaded.last_updated_by, admin.identity());

        let history = service.list_history(admin, Some(machine.id), None).await?;
        assert_eq!(history.len(), 2);
        // Newest first, and the machine's status matches the newest record.
        assert_eq!(history[0].status, reloaded.current_status);

        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database"]
    async fn concurrent_changes_serialize_under_row_lock(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;

        let machine = service
            .create_machine(
                admin,
                NewMachine {
                    code: unique_name("M510"),
                    name: "Mill".to_string(),
                    description: None,
                    department_id: None,
                },
            )
            .await?;
        service.change_status(admin, change(machine.id, "Running")).await?;

        let (a, b) = tokio::join!(
            service.change_status(admin, change(machine.id, "Idle")),
            service.change_status(admin, change(machine.id, "Fault")),
        );
        let (a, b) = (a?, b?);

        // The row lock serializes the two writes: one observed "Running",
        // the other observed the first writer's status.
        let (first, second) = if a.previous_status == "Running" { (&a, &b) } else { (&b, &a) };
        assert_eq!(first.previous_status, "Running");
        assert_eq!(second.previous_status, first.status);

        let reloaded = service.get_machine(admin, machine.id).await?;
        assert_eq!(reloaded.current_status, second.status);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn uncatalogued_status_is_accepted(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;

        let machine = service
            .create_machine(
                admin,
                NewMachine {
                    code: unique_name("M520"),
                    name: "Bench".to_string(),
                    description: None,
                    department_id: None,
                },
            )
            .await?;

        let entry = service
            .change_status(admin, change(machine.id, "Waiting on parts"))
            .await?;
        assert_eq!(entry.status, "Waiting on parts");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn default_status_types_survive_deletion_attempts(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;

        let catalog = service.list_status_types(admin, true).await?;
        let default = catalog
            .iter()
            .find(|s| s.is_default)
            .ok_or("seeded catalog has no default entry")?;

        let result = service.delete_status_type(admin, default.id).await;
        assert!(matches!(result, Err(AccessError::ConstraintViolation(_))));

        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database"]
    async fn history_is_append_only_even_for_admins(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;

        let machine = service
            .create_machine(
                admin,
                NewMachine {
                    code: unique_name("M530"),
                    name: "Saw".to_string(),
                    description: None,
                    department_id: None,
                },
            )
            .await?;
        let entry = service.change_status(admin, change(machine.id, "Running")).await?;

        let mut tx = ctx.pool.begin().await?;
        sqlx::query(
            r#"SELECT set_config('app.actor_id', $1, true),
                      set_config('app.actor_role', 'admin', true)"#,
        )
        .bind(admin.identity().unwrap().to_string())
        .execute(&mut *tx)
        .await?;

        let update = sqlx::query(r#"UPDATE status_history SET status = 'Forged' WHERE id = $1"#)
            .bind(entry.id)
            .execute(&mut *tx)
            .await;
        assert!(update.is_err());
        tx.rollback().await?;

        let mut tx = ctx.pool.begin().await?;
        sqlx::query(
            r#"SELECT set_config('app.actor_id', $1, true),
                      set_config('app.actor_role', 'admin', true)"#,
        )
        .bind(admin.identity().unwrap().to_string())
        .execute(&mut *tx)
        .await?;

        let delete = sqlx::query(r#"DELETE FROM status_history WHERE id = $1"#)
            .bind(entry.id)
            .execute(&mut *tx)
            .await;
        assert!(delete.is_err());
        tx.rollback().await?;

        Ok(())
    }
}
