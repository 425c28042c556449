use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::ClientResult,
    models::{
        domain::Group,
        dto::request::{
            CreateGroupRequest, GroupOrderRequest, OrderEntry, RenameGroupRequest,
            UpdateGroupColorRequest,
        },
    },
    services::http_client::{HttpClient, RequestScope},
};

/// Dashboard groups of the signed-in account.
pub struct GroupService {
    http: Arc<HttpClient>,
}

impl GroupService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list_groups(&self) -> ClientResult<Vec<Group>> {
        let mut groups: Vec<Group> = self.http.get("/groups/", RequestScope::Account).await?;
        groups.sort_by_key(|g| g.order);
        Ok(groups)
    }

    pub async fn create_group(&self, request: CreateGroupRequest) -> ClientResult<Group> {
        request.validate()?;
        let group: Group = self
            .http
            .post("/groups/", &request, RequestScope::Account)
            .await?;
        log::info!("Created group {} ('{}')", group.id, group.name);
        Ok(group)
    }

    pub async fn rename_group(&self, group_id: &str, name: &str) -> ClientResult<Group> {
        let request = RenameGroupRequest {
            name: name.to_string(),
        };
        request.validate()?;
        self.http
            .put(
                &format!("/groups/{}/rename/", group_id),
                &request,
                RequestScope::Account,
            )
            .await
    }

    pub async fn update_group_color(&self, group_id: &str, color: &str) -> ClientResult<Group> {
        let request = UpdateGroupColorRequest {
            color: color.to_string(),
        };
        request.validate()?;
        self.http
            .put(&format!("/groups/{}/", group_id), &request, RequestScope::Account)
            .await
    }

    /// Quizzes of a deleted group fall back to ungrouped on the backend.
    pub async fn delete_group(&self, group_id: &str) -> ClientResult<()> {
        self.http
            .delete(&format!("/groups/{}/", group_id), RequestScope::Account)
            .await?;
        log::info!("Deleted group {}", group_id);
        Ok(())
    }

    pub async fn update_order(&self, group_orders: Vec<OrderEntry>) -> ClientResult<()> {
        let request = GroupOrderRequest { group_orders };
        self.http
            .put_unit("/groups/update-order/", &request, RequestScope::Account)
            .await
    }
}
