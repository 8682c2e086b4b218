// Network endpoints: /networks/ plus the tree-walking sub-resources.

use std::fmt;

use crate::client::{ListQuery, NsotClient};
use crate::error::Error;
use crate::types::{AssignmentResponse, NetworkCreate, NetworkResponse, NetworkUpdate, Page};

/// Tree relations exposed as `/networks/:id/<relation>/`, each answering
/// a list of networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkRelation {
    Ancestors,
    Children,
    Descendants,
    Siblings,
    Subnets,
    Supernets,
}

impl NetworkRelation {
    pub const ALL: [Self; 6] = [
        Self::Ancestors,
        Self::Children,
        Self::Descendants,
        Self::Siblings,
        Self::Subnets,
        Self::Supernets,
    ];

    /// URL path segment. The server spells it `descendents`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Ancestors => "ancestors",
            Self::Children => "children",
            Self::Descendants => "descendents",
            Self::Siblings => "siblings",
            Self::Subnets => "subnets",
            Self::Supernets => "supernets",
        }
    }
}

impl fmt::Display for NetworkRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Descendants => "descendants",
            other => other.path_segment(),
        };
        f.write_str(label)
    }
}

impl NsotClient {
    pub async fn list_networks(&self, query: &ListQuery) -> Result<Page<NetworkResponse>, Error> {
        self.get_with_params(&self.collection("networks"), &query.to_params())
            .await
    }

    pub async fn get_network(&self, id: u64) -> Result<NetworkResponse, Error> {
        self.get(&self.detail("networks", id)).await
    }

    pub async fn create_network(&self, body: &NetworkCreate) -> Result<NetworkResponse, Error> {
        self.post(&self.collection("networks"), body).await
    }

    pub async fn update_network(
        &self,
        id: u64,
        body: &NetworkUpdate,
    ) -> Result<NetworkResponse, Error> {
        self.patch(&self.detail("networks", id), body).await
    }

    pub async fn delete_network(&self, id: u64) -> Result<(), Error> {
        self.delete(&self.detail("networks", id)).await
    }

    pub async fn network_relatives(
        &self,
        id: u64,
        relation: NetworkRelation,
    ) -> Result<Page<NetworkResponse>, Error> {
        self.get(&self.nested("networks", id, relation.path_segment()))
            .await
    }

    /// Immediate parent, or `None` for a root network (the server answers 404).
    pub async fn network_parent(&self, id: u64) -> Result<Option<NetworkResponse>, Error> {
        match self.get(&self.nested("networks", id, "parent")).await {
            Ok(parent) => Ok(Some(parent)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Interface assignments of the network's host addresses.
    pub async fn network_assignments(&self, id: u64) -> Result<Page<AssignmentResponse>, Error> {
        self.get(&self.nested("networks", id, "assignments")).await
    }

    /// Most specific existing network containing `cidr`, which need not exist itself.
    pub async fn closest_parent(&self, cidr: &str) -> Result<Option<NetworkResponse>, Error> {
        let path = format!("{}closest_parent/", self.collection("networks"));
        match self
            .get_with_params(&path, &[("cidr".to_owned(), cidr.to_owned())])
            .await
        {
            Ok(parent) => Ok(Some(parent)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set query, e.g. `"owner=neteng -state=reserved"`.
    pub async fn query_networks(&self, query: &str) -> Result<Page<NetworkResponse>, Error> {
        self.get_with_params(
            &format!("{}query/", self.collection("networks")),
            &[("query".to_owned(), query.to_owned())],
        )
        .await
    }

    pub async fn network_root(&self, id: u64) -> Result<NetworkResponse, Error> {
        self.get(&self.nested("networks", id, "root")).await
    }

    /// Next `num` free host addresses within the network.
    pub async fn next_addresses(&self, id: u64, num: u32) -> Result<Vec<String>, Error> {
        self.get_with_params(
            &self.nested("networks", id, "next_address"),
            &[("num".to_owned(), num.to_string())],
        )
        .await
    }

    /// Next `num` free child networks of the given prefix length.
    pub async fn next_networks(
        &self,
        id: u64,
        prefix_length: u8,
        num: u32,
    ) -> Result<Vec<String>, Error> {
        self.get_with_params(
            &self.nested("networks", id, "next_network"),
            &[
                ("prefix_length".to_owned(), prefix_length.to_string()),
                ("num".to_owned(), num.to_string()),
            ],
        )
        .await
    }
}
