// ── Controller ──
//
// The side-effect half of the store: owns the API client, executes
// `Command` descriptors, and dispatches request -> success | failure for
// each. Screen-level flows (mount fetches, form submission + redirect,
// delete + leave) are built on top of `execute`.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use nsot_api::transport::{TlsMode, TransportConfig};
use nsot_api::{Credentials, ListQuery, NsotClient};

use crate::command::{self, Command, CommandResult, ListParams};
use crate::config::{AuthCredentials, ClientConfig, TlsVerification};
use crate::error::CoreError;
use crate::forms::{AttributeForm, DeviceForm, NetworkForm, SubmissionError};
use crate::model::{Attribute, Change, Device, EntityId, Interface, Network, Page, Site, User};
use crate::pagination::PageRequest;
use crate::router::Route;
use crate::store::{
    Action, RelatedAction, Resource, ResourceAction, ResourceError, ResourceKind, Store,
    UiAction, selectors,
};

// ── ConnectionState ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

// ── Controller ───────────────────────────────────────────────────

/// Entry point for the UI.
///
/// Cheaply cloneable. Holds the [`Store`] it dispatches into and, once
/// connected, an authenticated [`NsotClient`].
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    store: Arc<Store>,
    connection_state: watch::Sender<ConnectionState>,
    client: Mutex<Option<NsotClient>>,
}

impl Controller {
    /// Create a controller with a fresh store. Does NOT connect.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_store(config, Arc::new(Store::new()))
    }

    pub fn with_store(config: ClientConfig, store: Arc<Store>) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                connection_state,
                client: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.inner.store
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Authenticate and build the API client.
    ///
    /// Secret-key credentials are exchanged for an auth token first. The
    /// current user and configured site are looked up for the header bar;
    /// failures there are logged and otherwise ignored.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner.connection_state.send_replace(ConnectionState::Connecting);

        let client = match self.build_client().await {
            Ok(client) => client,
            Err(e) => {
                self.inner.connection_state.send_replace(ConnectionState::Failed(e.to_string()));
                return Err(e);
            }
        };

        let user: Option<User> = match client.current_user().await {
            Ok(user) => Some(user.into()),
            Err(e) => {
                debug!(error = %e, "current user lookup failed (non-fatal)");
                None
            }
        };
        let site: Option<Site> = match self.inner.config.site_id {
            Some(id) => match client.get_site(id.get()).await {
                Ok(site) => Some(site.into()),
                Err(e) => {
                    warn!(site = %id, error = %e, "site lookup failed");
                    None
                }
            },
            None => None,
        };

        *self.inner.client.lock().await = Some(client);
        self.inner
            .store
            .dispatch(Action::Ui(UiAction::SessionEstablished { user, site }));

        self.inner.connection_state.send_replace(ConnectionState::Connected);
        info!(url = %self.inner.config.url, "connected to NSoT");
        Ok(())
    }

    async fn build_client(&self) -> Result<NsotClient, CoreError> {
        let config = &self.inner.config;
        let transport = build_transport(config);

        let credentials = match &config.auth {
            AuthCredentials::Anonymous => Credentials::Anonymous,
            AuthCredentials::AuthHeader { email } => Credentials::AuthHeader {
                email: email.clone(),
            },
            AuthCredentials::AuthToken { email, token } => Credentials::AuthToken {
                email: email.clone(),
                token: token.clone(),
            },
            AuthCredentials::SecretKey { email, secret_key } => {
                let token =
                    NsotClient::authenticate(config.url.as_str(), email, secret_key, &transport)
                        .await?;
                debug!("exchanged secret key for auth token");
                Credentials::AuthToken {
                    email: email.clone(),
                    token,
                }
            }
        };

        let client = NsotClient::new(config.url.as_str(), &credentials, &transport)?
            .with_site(config.site_id.map(EntityId::get));
        Ok(client)
    }

    /// Use an already-built client (tests, embedding).
    pub async fn attach_client(&self, client: NsotClient) {
        *self.inner.client.lock().await = Some(client);
        self.inner.connection_state.send_replace(ConnectionState::Connected);
    }

    /// Drop the client. In-flight requests still complete and land in
    /// the store.
    pub async fn disconnect(&self) {
        *self.inner.client.lock().await = None;
        self.inner.connection_state.send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    async fn client(&self) -> Result<NsotClient, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::NotConnected)
    }

    // ── Command execution ────────────────────────────────────────

    /// Perform one API call, dispatching its lifecycle actions.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let client = self.client().await?;
        if cmd.is_mutation() {
            info!(?cmd, "executing mutation");
        } else {
            debug!(?cmd, "executing command");
        }
        route_command(&client, &self.inner.store, cmd).await
    }

    /// Fetch `page` of `T` unless the store already holds it.
    pub async fn fetch_if_needed<T: Resource>(
        &self,
        page: PageRequest,
    ) -> Result<Option<CommandResult>, CoreError> {
        if selectors::needs_page::<T>(&self.inner.store.state(), page) {
            self.execute(T::fetch(page)).await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Fetch entity `id` of `T` unless it is already the selected item.
    pub async fn ensure_item<T: Resource>(
        &self,
        id: EntityId,
    ) -> Result<Option<CommandResult>, CoreError> {
        if selectors::needs_item::<T>(&self.inner.store.state(), id) {
            self.execute(T::get(id)).await.map(Some)
        } else {
            Ok(None)
        }
    }

    // ── Routing ──────────────────────────────────────────────────

    /// Move to `route` and load what its screen needs.
    pub async fn navigate(&self, route: Route) -> Result<(), CoreError> {
        self.inner.store.dispatch(Action::Navigate(route.clone()));
        self.mount(&route).await
    }

    pub async fn go_back(&self) -> Result<(), CoreError> {
        self.inner.store.dispatch(Action::GoBack);
        let route = self.inner.store.state().route().clone();
        self.mount(&route).await
    }

    /// Initial fetches for a screen. Lists load their first page if the
    /// store doesn't have it; detail screens load the entity only when
    /// the selected item isn't already `id`.
    pub async fn mount(&self, route: &Route) -> Result<(), CoreError> {
        let first = PageRequest::first(self.inner.config.page_size);
        match route {
            Route::Home => {
                let (devices, networks, attributes, changes) = tokio::join!(
                    self.fetch_if_needed::<Device>(first),
                    self.fetch_if_needed::<Network>(first),
                    self.fetch_if_needed::<Attribute>(first),
                    self.fetch_if_needed::<Change>(first),
                );
                devices?;
                networks?;
                attributes?;
                changes?;
            }
            Route::Devices => {
                self.fetch_if_needed::<Device>(first).await?;
            }
            Route::Networks => {
                self.fetch_if_needed::<Network>(first).await?;
            }
            Route::Attributes => {
                self.fetch_if_needed::<Attribute>(first).await?;
            }
            Route::Changes => {
                self.fetch_if_needed::<Change>(first).await?;
            }
            Route::Device(id) => {
                let (device, interfaces) = tokio::join!(
                    self.ensure_item::<Device>(*id),
                    self.execute(command::fetch_device_interfaces(*id)),
                );
                device?;
                interfaces?;
            }
            Route::Network(id) => {
                let (network, children) = tokio::join!(
                    self.ensure_item::<Network>(*id),
                    self.execute(command::fetch_related_networks(
                        *id,
                        nsot_api::NetworkRelation::Children
                    )),
                );
                network?;
                children?;
            }
            Route::Attribute(id) => {
                self.ensure_item::<Attribute>(*id).await?;
            }
            Route::Change(id) => {
                self.ensure_item::<Change>(*id).await?;
            }
            Route::NotFound(path) => {
                debug!(%path, "no route matched");
            }
        }
        Ok(())
    }

    /// Load `page` of `T`, whatever the store holds.
    pub async fn change_page<T: Resource>(&self, page: PageRequest) -> Result<(), CoreError> {
        self.execute(T::fetch(page)).await.map(|_| ())
    }

    // ── Form submission ──────────────────────────────────────────

    pub async fn submit_device(&self, form: &DeviceForm) -> Result<EntityId, SubmissionError> {
        let request = form.to_request(self.inner.config.create_site_id())?;
        self.submit(command::create_device(request)).await
    }

    pub async fn submit_network(&self, form: &NetworkForm) -> Result<EntityId, SubmissionError> {
        let request = form.to_request(self.inner.config.create_site_id())?;
        self.submit(command::create_network(request)).await
    }

    pub async fn submit_attribute(
        &self,
        form: &AttributeForm,
    ) -> Result<EntityId, SubmissionError> {
        let request = form.to_request(self.inner.config.create_site_id())?;
        self.submit(command::create_attribute(request)).await
    }

    pub async fn update_device(
        &self,
        id: EntityId,
        form: &DeviceForm,
    ) -> Result<EntityId, SubmissionError> {
        let request = form.to_update()?;
        self.submit_update(command::update_device(id, request)).await
    }

    pub async fn update_network(
        &self,
        id: EntityId,
        form: &NetworkForm,
    ) -> Result<EntityId, SubmissionError> {
        let request = form.to_update()?;
        self.submit_update(command::update_network(id, request)).await
    }

    pub async fn update_attribute(
        &self,
        id: EntityId,
        form: &AttributeForm,
    ) -> Result<EntityId, SubmissionError> {
        self.submit_update(command::update_attribute(id, form.to_update()))
            .await
    }

    /// Run an update command. The route stays on the edited entity.
    async fn submit_update(&self, cmd: Command) -> Result<EntityId, SubmissionError> {
        let kind = cmd.kind();
        let store = &self.inner.store;

        store.dispatch(Action::Ui(UiAction::SubmitStarted));
        let result = self.execute(cmd).await;
        store.dispatch(Action::Ui(UiAction::SubmitFinished));

        let id = result?.entity_id().ok_or_else(|| {
            CoreError::Internal(format!("update {kind} returned no entity"))
        })?;

        store.dispatch(Action::Ui(UiAction::info(format!("Updated {kind} {id}"))));
        Ok(id)
    }

    /// Run a create command; on success redirect to the new entity's
    /// detail route.
    async fn submit(&self, cmd: Command) -> Result<EntityId, SubmissionError> {
        let kind = cmd.kind();
        let store = &self.inner.store;

        store.dispatch(Action::Ui(UiAction::SubmitStarted));
        let result = self.execute(cmd).await;
        store.dispatch(Action::Ui(UiAction::SubmitFinished));

        let id = result?.entity_id().ok_or_else(|| {
            CoreError::Internal(format!("create {kind} returned no entity"))
        })?;

        store.dispatch(Action::Navigate(Route::detail(kind, id)));
        store.dispatch(Action::Ui(UiAction::info(format!("Created {kind} {id}"))));
        Ok(id)
    }

    // ── Deletion ─────────────────────────────────────────────────

    /// Delete an entity. A detail screen showing it falls back to its list.
    pub async fn delete(&self, kind: ResourceKind, id: EntityId) -> Result<(), CoreError> {
        let cmd = command::delete(kind, id).ok_or_else(|| CoreError::ValidationFailed {
            field: "kind".into(),
            reason: format!("{kind} records cannot be deleted"),
        })?;

        if let Err(e) = self.execute(cmd).await {
            self.inner
                .store
                .dispatch(Action::Ui(UiAction::error(format!("Delete failed: {e}"))));
            return Err(e);
        }

        let store = &self.inner.store;
        if *store.state().route() == Route::detail(kind, id) {
            store.dispatch(Action::Navigate(Route::list(kind)));
        }
        store.dispatch(Action::Ui(UiAction::info(format!("Deleted {kind} {id}"))));
        Ok(())
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Dispatch `request`, await `call`, then dispatch the success action
/// built by `on_success` or the failure action built by `on_failure`.
async fn lifecycle<T, W, Fut>(
    store: &Store,
    request: ResourceAction<T>,
    call: Fut,
    on_success: impl FnOnce(W) -> (ResourceAction<T>, CommandResult),
    on_failure: impl FnOnce(ResourceError) -> ResourceAction<T>,
) -> Result<CommandResult, CoreError>
where
    T: Resource,
    Fut: Future<Output = Result<W, nsot_api::Error>>,
{
    store.dispatch(T::wrap(request));
    match call.await {
        Ok(raw) => {
            let (action, result) = on_success(raw);
            store.dispatch(T::wrap(action));
            Ok(result)
        }
        Err(e) => {
            let err = CoreError::from(e);
            warn!(resource = %T::KIND, error = %err, "command failed");
            store.dispatch(T::wrap(on_failure(ResourceError::from(&err))));
            Err(err)
        }
    }
}

fn listed<T: Resource + From<W>, W>(raw: nsot_api::Page<W>) -> (ResourceAction<T>, CommandResult) {
    let page: Page<T> = raw.into();
    let count = page.info.count;
    (ResourceAction::ListSuccess(page), CommandResult::Listed { count })
}

fn fetched<T: Resource + From<W>, W>(raw: W) -> (ResourceAction<T>, CommandResult) {
    let entity = T::from(raw);
    (ResourceAction::GetSuccess(entity.clone()), entity.into_result())
}

fn created<T: Resource + From<W>, W>(raw: W) -> (ResourceAction<T>, CommandResult) {
    let entity = T::from(raw);
    (ResourceAction::CreateSuccess(entity.clone()), entity.into_result())
}

fn updated<T: Resource + From<W>, W>(raw: W) -> (ResourceAction<T>, CommandResult) {
    let entity = T::from(raw);
    (ResourceAction::UpdateSuccess(entity.clone()), entity.into_result())
}

fn deleted<T: Resource>(id: EntityId) -> impl FnOnce(()) -> (ResourceAction<T>, CommandResult) {
    move |()| {
        (
            ResourceAction::DeleteSuccess(id),
            CommandResult::Deleted { kind: T::KIND, id },
        )
    }
}

fn list_query(params: &ListParams) -> ListQuery {
    ListQuery::page(params.page.limit, params.page.offset())
}

#[allow(clippy::too_many_lines)]
async fn route_command(
    client: &NsotClient,
    store: &Store,
    cmd: Command,
) -> Result<CommandResult, CoreError> {
    match cmd {
        // ── Devices ──────────────────────────────────────────────
        Command::FetchDevices(params) => {
            let call = async {
                match &params.query {
                    Some(query) => client.query_devices(query).await,
                    None => client.list_devices(&list_query(&params)).await,
                }
            };
            lifecycle::<Device, _, _>(
                store,
                ResourceAction::ListRequest,
                call,
                listed,
                ResourceAction::ListFailure,
            )
            .await
        }
        Command::GetDevice(id) => {
            lifecycle::<Device, _, _>(
                store,
                ResourceAction::GetRequest(id),
                client.get_device(id.get()),
                fetched,
                |e| ResourceAction::GetFailure(id, e),
            )
            .await
        }
        Command::CreateDevice(request) => {
            let body = (&request).into();
            lifecycle::<Device, _, _>(
                store,
                ResourceAction::CreateRequest,
                client.create_device(&body),
                created,
                ResourceAction::CreateFailure,
            )
            .await
        }
        Command::UpdateDevice { id, request } => {
            let body = (&request).into();
            lifecycle::<Device, _, _>(
                store,
                ResourceAction::UpdateRequest(id),
                client.update_device(id.get(), &body),
                updated,
                ResourceAction::UpdateFailure,
            )
            .await
        }
        Command::DeleteDevice(id) => {
            lifecycle::<Device, _, _>(
                store,
                ResourceAction::DeleteRequest(id),
                client.delete_device(id.get()),
                deleted(id),
                ResourceAction::DeleteFailure,
            )
            .await
        }
        Command::FetchDeviceInterfaces(id) => {
            lifecycle::<Interface, _, _>(
                store,
                ResourceAction::ListRequest,
                client.device_interfaces(id.get()),
                listed,
                ResourceAction::ListFailure,
            )
            .await
        }

        // ── Networks ─────────────────────────────────────────────
        Command::FetchNetworks(params) => {
            let call = async {
                match &params.query {
                    Some(query) => client.query_networks(query).await,
                    None => client.list_networks(&list_query(&params)).await,
                }
            };
            lifecycle::<Network, _, _>(
                store,
                ResourceAction::ListRequest,
                call,
                listed,
                ResourceAction::ListFailure,
            )
            .await
        }
        Command::GetNetwork(id) => {
            lifecycle::<Network, _, _>(
                store,
                ResourceAction::GetRequest(id),
                client.get_network(id.get()),
                fetched,
                |e| ResourceAction::GetFailure(id, e),
            )
            .await
        }
        Command::CreateNetwork(request) => {
            let body = (&request).into();
            lifecycle::<Network, _, _>(
                store,
                ResourceAction::CreateRequest,
                client.create_network(&body),
                created,
                ResourceAction::CreateFailure,
            )
            .await
        }
        Command::UpdateNetwork { id, request } => {
            let body = (&request).into();
            lifecycle::<Network, _, _>(
                store,
                ResourceAction::UpdateRequest(id),
                client.update_network(id.get(), &body),
                updated,
                ResourceAction::UpdateFailure,
            )
            .await
        }
        Command::DeleteNetwork(id) => {
            lifecycle::<Network, _, _>(
                store,
                ResourceAction::DeleteRequest(id),
                client.delete_network(id.get()),
                deleted(id),
                ResourceAction::DeleteFailure,
            )
            .await
        }
        Command::FetchRelatedNetworks { id, relation } => {
            store.dispatch(Action::Related(RelatedAction::Request {
                network_id: id,
                relation,
            }));
            match client.network_relatives(id.get(), relation).await {
                Ok(raw) => {
                    let page: Page<Network> = raw.into();
                    store.dispatch(Action::Related(RelatedAction::Success {
                        network_id: id,
                        relation,
                        networks: page.items.clone(),
                    }));
                    Ok(CommandResult::Related(page.items))
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    warn!(network = %id, %relation, error = %err, "related lookup failed");
                    store.dispatch(Action::Related(RelatedAction::Failure {
                        network_id: id,
                        relation,
                        error: ResourceError::from(&err),
                    }));
                    Err(err)
                }
            }
        }

        // ── Attributes ───────────────────────────────────────────
        Command::FetchAttributes(params) => {
            lifecycle::<Attribute, _, _>(
                store,
                ResourceAction::ListRequest,
                client.list_attributes(&list_query(&params)),
                listed,
                ResourceAction::ListFailure,
            )
            .await
        }
        Command::GetAttribute(id) => {
            lifecycle::<Attribute, _, _>(
                store,
                ResourceAction::GetRequest(id),
                client.get_attribute(id.get()),
                fetched,
                |e| ResourceAction::GetFailure(id, e),
            )
            .await
        }
        Command::CreateAttribute(request) => {
            let body = (&request).into();
            lifecycle::<Attribute, _, _>(
                store,
                ResourceAction::CreateRequest,
                client.create_attribute(&body),
                created,
                ResourceAction::CreateFailure,
            )
            .await
        }
        Command::UpdateAttribute { id, request } => {
            let body = (&request).into();
            lifecycle::<Attribute, _, _>(
                store,
                ResourceAction::UpdateRequest(id),
                client.update_attribute(id.get(), &body),
                updated,
                ResourceAction::UpdateFailure,
            )
            .await
        }
        Command::DeleteAttribute(id) => {
            lifecycle::<Attribute, _, _>(
                store,
                ResourceAction::DeleteRequest(id),
                client.delete_attribute(id.get()),
                deleted(id),
                ResourceAction::DeleteFailure,
            )
            .await
        }

        // ── Changes ──────────────────────────────────────────────
        Command::FetchChanges(params) => {
            lifecycle::<Change, _, _>(
                store,
                ResourceAction::ListRequest,
                client.list_changes(&list_query(&params)),
                listed,
                ResourceAction::ListFailure,
            )
            .await
        }
        Command::GetChange(id) => {
            lifecycle::<Change, _, _>(
                store,
                ResourceAction::GetRequest(id),
                client.get_change(id.get()),
                fetched,
                |e| ResourceAction::GetFailure(id, e),
            )
            .await
        }

        // ── Interfaces ───────────────────────────────────────────
        Command::FetchInterfaces(params) => {
            lifecycle::<Interface, _, _>(
                store,
                ResourceAction::ListRequest,
                client.list_interfaces(&list_query(&params)),
                listed,
                ResourceAction::ListFailure,
            )
            .await
        }
        Command::GetInterface(id) => {
            lifecycle::<Interface, _, _>(
                store,
                ResourceAction::GetRequest(id),
                client.get_interface(id.get()),
                fetched,
                |e| ResourceAction::GetFailure(id, e),
            )
            .await
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ClientConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new(
            "http://localhost:8990".parse().unwrap(),
            AuthCredentials::Anonymous,
        )
    }

    #[tokio::test]
    async fn execute_without_client_is_not_connected() {
        let controller = Controller::new(config());
        let err = controller
            .execute(command::get_device(EntityId::new(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotConnected));
        // Nothing was dispatched: the request never started.
        assert!(!controller.store().state().devices.is_fetching_item);
    }

    #[tokio::test]
    async fn change_records_cannot_be_deleted() {
        let controller = Controller::new(config());
        let err = controller
            .delete(ResourceKind::Change, EntityId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn invalid_form_never_marks_submitting() {
        let controller = Controller::new(config());
        let err = controller
            .submit_device(&DeviceForm::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Invalid(_)));
        assert!(!controller.store().state().ui.submitting);
    }

    #[test]
    fn tls_modes_map_through() {
        assert!(matches!(
            tls_to_transport(&TlsVerification::DangerAcceptInvalid),
            TlsMode::DangerAcceptInvalid
        ));
        assert!(matches!(
            tls_to_transport(&TlsVerification::SystemDefaults),
            TlsMode::System
        ));
    }
}
