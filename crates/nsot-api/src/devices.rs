// Device endpoints: /devices/ and /devices/:id/interfaces/

use crate::client::{ListQuery, NsotClient};
use crate::error::Error;
use crate::types::{DeviceCreate, DeviceResponse, DeviceUpdate, InterfaceResponse, Page};

impl NsotClient {
    pub async fn list_devices(&self, query: &ListQuery) -> Result<Page<DeviceResponse>, Error> {
        self.get_with_params(&self.collection("devices"), &query.to_params())
            .await
    }

    pub async fn get_device(&self, id: u64) -> Result<DeviceResponse, Error> {
        self.get(&self.detail("devices", id)).await
    }

    pub async fn create_device(&self, body: &DeviceCreate) -> Result<DeviceResponse, Error> {
        self.post(&self.collection("devices"), body).await
    }

    /// Partial update (`PATCH`): only fields that are `Some` are sent.
    pub async fn update_device(
        &self,
        id: u64,
        body: &DeviceUpdate,
    ) -> Result<DeviceResponse, Error> {
        self.patch(&self.detail("devices", id), body).await
    }

    pub async fn delete_device(&self, id: u64) -> Result<(), Error> {
        self.delete(&self.detail("devices", id)).await
    }

    /// Interfaces attached to a device.
    pub async fn device_interfaces(&self, id: u64) -> Result<Page<InterfaceResponse>, Error> {
        self.get(&self.nested("devices", id, "interfaces")).await
    }

    /// Set query, e.g. `"vendor=juniper -owner=neteng"`.
    pub async fn query_devices(&self, query: &str) -> Result<Page<DeviceResponse>, Error> {
        self.get_with_params(
            &format!("{}query/", self.collection("devices")),
            &[("query".to_owned(), query.to_owned())],
        )
        .await
    }
}
