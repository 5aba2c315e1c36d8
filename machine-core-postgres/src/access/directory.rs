use async_trait::async_trait;
use chrono::Utc;
use machine_core_api::domain::{
    AccessContext, Actor, Department, DepartmentUpdate, Identity, NewDepartment, Profile,
    ProfileUpdate, ProfileVisibility, Role,
};
use machine_core_api::error::{AccessError, AccessResult};
use machine_core_api::guard::{authorize, Mutation};
use machine_core_api::service::DirectoryService;
use machine_core_db::models::directory::{DepartmentModel, LeaderAssignmentModel, ProfileModel};
use machine_core_db::repository::create::Create;
use machine_core_db::repository::delete::Delete;
use machine_core_db::repository::load::Load;
use machine_core_db::repository::update::Update;
use uuid::Uuid;

use crate::access::service::MachineCoreService;
use crate::utils::map_db_error;

#[async_trait]
impl DirectoryService for MachineCoreService {
    async fn list_departments(&self, actor: Actor) -> AccessResult<Vec<Department>> {
        let ctx = self.context(&actor).await?;
        let unit = self.begin(&ctx).await?;
        let result = async {
            let departments = unit
                .department_repository
                .list_all()
                .await
                .map_err(map_db_error)?;
            Ok(departments.into_iter().map(Department::from).collect())
        }
        .await;
        self.finish(unit, result).await
    }

    async fn create_department(
        &self,
        actor: Actor,
        dept: NewDepartment,
    ) -> AccessResult<Department> {
        Self::validated(&dept)?;
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::CreateDepartment)?;

        let model = DepartmentModel {
            id: Uuid::new_v4(),
            name: Self::bounded(&dept.name, "name")?,
            description: dept.description,
        };

        let unit = self.begin(&ctx).await?;
        let result = async {
            let saved = unit
                .department_repository
                .create(model)
                .await
                .map_err(map_db_error)?;
            Ok(Department::from(saved))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn update_department(
        &self,
        actor: Actor,
        department_id: Uuid,
        update: DepartmentUpdate,
    ) -> AccessResult<Department> {
        Self::validated(&update)?;
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::UpdateDepartment)?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let existing = unit
                .department_repository
                .load(department_id)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("department {department_id}")))?;

            let model = DepartmentModel {
                id: existing.id,
                name: Self::bounded(&update.name, "name")?,
                description: update.description,
            };
            let saved = unit
                .department_repository
                .update(model)
                .await
                .map_err(map_db_error)?;
            Ok(Department::from(saved))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn delete_department(&self, actor: Actor, department_id: Uuid) -> AccessResult<()> {
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::DeleteDepartment)?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let removed = unit
                .department_repository
                .delete(department_id)
                .await
                .map_err(map_db_error)?;
            if removed {
                Ok(())
            } else {
                Err(AccessError::NotFound(format!("department {department_id}")))
            }
        }
        .await;
        self.finish(unit, result).await
    }

    async fn assign_leader(
        &self,
        actor: Actor,
        department_id: Uuid,
        leader: Identity,
    ) -> AccessResult<()> {
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::AssignLeader)?;

        let model = LeaderAssignmentModel {
            id: Uuid::new_v4(),
            department_id,
            profile_id: leader,
            assigned_at: Utc::now(),
        };

        let unit = self.begin(&ctx).await?;
        let result = async {
            unit.leader_assignment_repository
                .create(model)
                .await
                .map_err(map_db_error)?;
            Ok(())
        }
        .await;
        self.finish(unit, result).await
    }

    async fn unassign_leader(
        &self,
        actor: Actor,
        department_id: Uuid,
        leader: Identity,
    ) -> AccessResult<()> {
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::UnassignLeader)?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let removed = unit
                .leader_assignment_repository
                .delete_pair(department_id, leader)
                .await
                .map_err(map_db_error)?;
            if removed {
                Ok(())
            } else {
                Err(AccessError::NotFound(format!(
                    "leader assignment ({department_id}, {leader})"
                )))
            }
        }
        .await;
        self.finish(unit, result).await
    }

    async fn list_profiles(&self, actor: Actor) -> AccessResult<Vec<Profile>> {
        let ctx = self.context(&actor).await?;
        let visibility = ctx.profile_visibility();
        if visibility == ProfileVisibility::Denied {
            return Err(AccessError::denied("list profiles"));
        }

        let unit = self.begin(&ctx).await?;
        let result = async {
            let profiles = unit
                .profile_repository
                .list_visible(visibility)
                .await
                .map_err(map_db_error)?;
            Ok(profiles.into_iter().map(Profile::from).collect())
        }
        .await;
        self.finish(unit, result).await
    }

    async fn sign_in(&self, identity: Identity, display_name: &str) -> AccessResult<Profile> {
        // No profile exists yet on first sign-in, so the resolver cannot
        // run; the context is the signing identity itself with the default
        // role. The insert policy only admits id = app_actor_id().
        let ctx = AccessContext::new(
            Actor::user(identity, Role::Operator),
            machine_core_api::domain::Scope::Empty,
        );

        let model = ProfileModel {
            id: identity,
            display_name: Self::bounded(display_name, "display_name")?,
            role: Role::Operator,
            created_at: Utc::now(),
        };

        let unit = self.begin(&ctx).await?;
        let result = async {
            let saved = unit
                .profile_repository
                .upsert(model)
                .await
                .map_err(map_db_error)?;
            Ok(Profile::from(saved))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn update_profile(
        &self,
        actor: Actor,
        target: Identity,
        update: ProfileUpdate,
    ) -> AccessResult<Profile> {
        Self::validated(&update)?;
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::UpdateProfile { target })?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let updated = unit
                .profile_repository
                .update_display_name(target, &update.display_name)
                .await
                .map_err(map_db_error)?;
            if !updated {
                return Err(AccessError::NotFound(format!("profile {target}")));
            }
            let profile = unit
                .profile_repository
                .load(target)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("profile {target}")))?;
            Ok(Profile::from(profile))
        }
        .await;
        self.finish(unit, result).await
    }

    async fn set_role(&self, actor: Actor, target: Identity, role: Role) -> AccessResult<Profile> {
        let ctx = self.context(&actor).await?;
        authorize(&ctx, &Mutation::SetRole)?;

        let unit = self.begin(&ctx).await?;
        let result = async {
            let updated = unit
                .profile_repository
                .set_role(target, role)
                .await
                .map_err(map_db_error)?;
            if !updated {
                return Err(AccessError::NotFound(format!("profile {target}")));
            }
            let profile = unit
                .profile_repository
                .load(target)
                .await
                .map_err(map_db_error)?
                .ok_or_else(|| AccessError::NotFound(format!("profile {target}")))?;
            Ok(Profile::from(profile))
        }
        .await;
        self.finish(unit, result).await
    }
}

#[cfg(test)]
mod tests {
    use machine_core_api::domain::{NewDepartment, NewMachine, ProfileUpdate, Role};
    use machine_core_api::error::AccessError;
    use machine_core_api::service::{DirectoryService, MachineService};

    use crate::test_helper::{seed_profile, setup_test_context, unique_name};

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn deleting_a_department_detaches_machines_and_leaders(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;
        let leader = seed_profile(&ctx.pool, "Leader", Role::TeamLeader).await?;

        let dept = service
            .create_department(
                admin,
                NewDepartment { name: unique_name("Paint"), description: None },
            )
            .await?;
        service
            .assign_leader(admin, dept.id, leader.identity().unwrap())
            .await?;
        let machine = service
            .create_machine(
                admin,
                NewMachine {
                    code: unique_name("M600"),
                    name: "Booth".to_string(),
                    description: None,
                    department_id: Some(dept.id),
                },
            )
            .await?;

        service.delete_department(admin, dept.id).await?;

        // Machine survives but no longer references the department.
        let reloaded = service.get_machine(admin, machine.id).await?;
        assert_eq!(reloaded.department_id, None);

        // Leader assignments went with the department, so the leader's
        // scope is empty again.
        assert!(service.list_machines(leader).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn anonymous_reads_but_never_writes(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use machine_core_api::domain::Actor;

        let ctx = setup_test_context().await?;
        let service = ctx.service();

        service.list_departments(Actor::Anonymous).await?;
        service.list_machines(Actor::Anonymous).await?;

        let denied = service
            .create_department(
                Actor::Anonymous,
                NewDepartment { name: unique_name("Ghost"), description: None },
            )
            .await;
        assert!(matches!(denied, Err(AccessError::AuthorizationDenied(_))));

        let listing = service.list_profiles(Actor::Anonymous).await;
        assert!(matches!(listing, Err(AccessError::AuthorizationDenied(_))));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn profile_listing_follows_role_visibility(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;
        let leader = seed_profile(&ctx.pool, "Leader", Role::TeamLeader).await?;
        let operator = seed_profile(&ctx.pool, "Operator", Role::Operator).await?;

        let all = service.list_profiles(admin).await?;
        assert!(all.iter().any(|p| p.role == Role::TeamLeader));

        let visible_to_leader = service.list_profiles(leader).await?;
        assert!(visible_to_leader.iter().all(|p| p.role == Role::Operator));
        assert!(visible_to_leader
            .iter()
            .any(|p| Some(p.id) == operator.identity()));

        let denied = service.list_profiles(operator).await;
        assert!(matches!(denied, Err(AccessError::AuthorizationDenied(_))));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn sign_in_is_idempotent_and_starts_as_operator(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();

        let identity = uuid::Uuid::new_v4();
        let first = service.sign_in(identity, "New User").await?;
        assert_eq!(first.role, Role::Operator);

        // A second sign-in returns the stored profile untouched.
        let second = service.sign_in(identity, "Renamed User").await?;
        assert_eq!(second.id, first.id);
        assert_eq!(second.display_name, "New User");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn profiles_are_self_service_only(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let service = ctx.service();
        let admin = seed_profile(&ctx.pool, "Admin", Role::Admin).await?;
        let operator = seed_profile(&ctx.pool, "Operator", Role::Operator).await?;

        let target = operator.identity().unwrap();
        let update = ProfileUpdate { display_name: "Renamed".to_string() };

        // Even admins do not edit someone else's profile.
        let denied = service.update_profile(admin, target, update.clone()).await;
        assert!(matches!(denied, Err(AccessError::AuthorizationDenied(_))));

        let renamed = service.update_profile(operator, target, update).await?;
        assert_eq!(renamed.display_name, "Renamed");

        // Role changes stay admin-only.
        let denied = service.set_role(operator, target, Role::Admin).await;
        assert!(matches!(denied, Err(AccessError::AuthorizationDenied(_))));

        let promoted = service.set_role(admin, target, Role::TeamLeader).await?;
        assert_eq!(promoted.role, Role::TeamLeader);

        Ok(())
    }
}
