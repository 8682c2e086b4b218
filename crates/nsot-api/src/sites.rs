// Site, user, and value endpoints.
//
// Sites are never site-scoped, so these build their paths directly.

use crate::client::{ListQuery, NsotClient};
use crate::error::Error;
use crate::types::{Page, SiteResponse, UserResponse, ValueResponse};

impl NsotClient {
    pub async fn list_sites(&self) -> Result<Page<SiteResponse>, Error> {
        self.get("sites/").await
    }

    pub async fn get_site(&self, id: u64) -> Result<SiteResponse, Error> {
        self.get(&format!("sites/{id}/")).await
    }

    /// `GET /api/users/0/` resolves to the authenticated user.
    pub async fn current_user(&self) -> Result<UserResponse, Error> {
        self.get("users/0/").await
    }

    pub async fn list_values(&self, query: &ListQuery) -> Result<Page<ValueResponse>, Error> {
        self.get_with_params(&self.collection("values"), &query.to_params())
            .await
    }
}
