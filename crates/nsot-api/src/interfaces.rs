// Interface endpoints: /interfaces/ and nested address/network lookups.

use crate::client::{ListQuery, NsotClient};
use crate::error::Error;
use crate::types::{AssignmentResponse, InterfaceResponse, NetworkResponse, Page};

impl NsotClient {
    pub async fn list_interfaces(
        &self,
        query: &ListQuery,
    ) -> Result<Page<InterfaceResponse>, Error> {
        self.get_with_params(&self.collection("interfaces"), &query.to_params())
            .await
    }

    pub async fn get_interface(&self, id: u64) -> Result<InterfaceResponse, Error> {
        self.get(&self.detail("interfaces", id)).await
    }

    pub async fn delete_interface(&self, id: u64) -> Result<(), Error> {
        self.delete(&self.detail("interfaces", id)).await
    }

    /// Host addresses (`/32` or `/128` networks) assigned to an interface.
    pub async fn interface_addresses(&self, id: u64) -> Result<Page<NetworkResponse>, Error> {
        self.get(&self.nested("interfaces", id, "addresses")).await
    }

    /// Networks containing the interface's addresses.
    pub async fn interface_networks(&self, id: u64) -> Result<Page<NetworkResponse>, Error> {
        self.get(&self.nested("interfaces", id, "networks")).await
    }

    pub async fn interface_assignments(
        &self,
        id: u64,
    ) -> Result<Page<AssignmentResponse>, Error> {
        self.get(&self.nested("interfaces", id, "assignments")).await
    }
}
