use serde::Serialize;
use sqlx::postgres::PgListener;
use sqlx::PgPool;

/// A change notification. Carries only the table name; consumers must
/// re-read state rather than trust any payload, and ordering across
/// notifications is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub table: String,
}

/// Subscribes to the `machine_core_changes` channel fed by the statement
/// triggers on machine, status_history, department, and status_type.
pub struct ChangeListener {
    listener: PgListener,
}

impl ChangeListener {
    pub const CHANNEL: &'static str = "machine_core_changes";

    pub async fn connect(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener.listen(Self::CHANNEL).await?;
        tracing::debug!(channel = Self::CHANNEL, "change listener subscribed");
        Ok(Self { listener })
    }

    /// Wait for the next change. Reconnects are handled by PgListener;
    /// a notification may be lost across a reconnect, which is acceptable
    /// because events are pure re-fetch triggers.
    pub async fn recv(&mut self) -> Result<ChangeEvent, sqlx::Error> {
        let notification = self.listener.recv().await?;
        Ok(ChangeEvent {
            table: notification.payload().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use machine_core_api::domain::{NewDepartment, Role};
    use machine_core_api::service::DirectoryService;

    use super::ChangeListener;
    use crate::test_helper::{seed_profile, setup_test_context, unique_name};

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn department_writes_notify_the_change_channel(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;

        let mut listener = ChangeListener::connect(&ctx.pool).await?;

        ctx.service()
            .create_department(
                admin,
                NewDepartment { name: unique_name("Press shop"), description: None },
            )
            .await?;

        // Other tests may be notifying concurrently; drain until the
        // department event arrives.
        let event = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let event = listener.recv().await?;
                if event.table == "department" {
                    return Ok::<_, sqlx::Error>(event);
                }
            }
        })
        .await
        .map_err(|_| "timed out waiting for a department change event")??;

        assert_eq!(event.table, "department");
        Ok(())
    }
}
