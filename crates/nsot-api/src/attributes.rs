// Attribute endpoints: /attributes/

use crate::client::{ListQuery, NsotClient};
use crate::error::Error;
use crate::types::{AttributeCreate, AttributeResponse, AttributeUpdate, Page};

impl NsotClient {
    pub async fn list_attributes(
        &self,
        query: &ListQuery,
    ) -> Result<Page<AttributeResponse>, Error> {
        self.get_with_params(&self.collection("attributes"), &query.to_params())
            .await
    }

    pub async fn get_attribute(&self, id: u64) -> Result<AttributeResponse, Error> {
        self.get(&self.detail("attributes", id)).await
    }

    pub async fn create_attribute(
        &self,
        body: &AttributeCreate,
    ) -> Result<AttributeResponse, Error> {
        self.post(&self.collection("attributes"), body).await
    }

    /// Attribute `name` and `resource_name` are immutable server-side;
    /// only flags and description can change.
    pub async fn update_attribute(
        &self,
        id: u64,
        body: &AttributeUpdate,
    ) -> Result<AttributeResponse, Error> {
        self.patch(&self.detail("attributes", id), body).await
    }

    pub async fn delete_attribute(&self, id: u64) -> Result<(), Error> {
        self.delete(&self.detail("attributes", id)).await
    }
}
