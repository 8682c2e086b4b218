// Change endpoints: /changes/ (read-only audit log)

use crate::client::{ListQuery, NsotClient};
use crate::error::Error;
use crate::types::{ChangeResponse, Page};

impl NsotClient {
    pub async fn list_changes(&self, query: &ListQuery) -> Result<Page<ChangeResponse>, Error> {
        self.get_with_params(&self.collection("changes"), &query.to_params())
            .await
    }

    pub async fn get_change(&self, id: u64) -> Result<ChangeResponse, Error> {
        self.get(&self.detail("changes", id)).await
    }
}
