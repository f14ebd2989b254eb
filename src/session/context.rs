use std::sync::Arc;

use http::Method;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::client::HttpClient;
use crate::dtos::user::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiError;
use crate::session::role::Role;
use crate::session::storage::{LocalStorage, StorageEvent, TabId};

pub const ROLE_KEY: &str = "role";
pub const TOKEN_KEY: &str = "token";
pub const COOKIE_KEY: &str = "session_cookie";

const LOGIN_FALLBACK: &str = "Invalid login credentials";
const REGISTER_FALLBACK: &str = "Error registering user";

/// Who is signed in, as seen by one tab.
///
/// Contexts built on the same [`LocalStorage`] behave like browser tabs of the
/// same origin: a login or logout in one is picked up by the others through
/// the storage change feed. Dropping a context stops its listener.
pub struct SessionContext {
    tab: TabId,
    storage: Arc<LocalStorage>,
    client: HttpClient,
    role_tx: Arc<watch::Sender<Option<Role>>>,
    listener: JoinHandle<()>,
}

impl SessionContext {
    /// Restores whatever the storage holds and starts following other tabs.
    /// Must be called from within a tokio runtime.
    pub fn new(storage: Arc<LocalStorage>, client: HttpClient) -> Self {
        let tab = TabId::next();
        let role = storage.get_item(ROLE_KEY).as_deref().and_then(Role::parse);
        client.set_bearer_token(storage.get_item(TOKEN_KEY));
        if let Some(cookies) = storage.get_item(COOKIE_KEY) {
            client.restore_session_cookies(&cookies);
        }

        let (role_tx, _) = watch::channel(role);
        let role_tx = Arc::new(role_tx);
        let listener = tokio::spawn(follow_other_tabs(
            tab,
            storage.subscribe(),
            storage.clone(),
            client.clone(),
            role_tx.clone(),
        ));

        Self { tab, storage, client, role_tx, listener }
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn role(&self) -> Option<Role> {
        self.role_tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.role_tx.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role_tx.borrow().as_ref().is_some_and(Role::is_admin)
    }

    /// Role changes from this tab or any other. Drop the receiver to
    /// unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Option<Role>> {
        self.role_tx.subscribe()
    }

    /// On failure nothing changes and the error carries a displayable message.
    pub async fn login(&self, username: &str, password: &str) -> Result<Role, ApiError> {
        if username.trim().is_empty() {
            return Err(ApiError::missing_field("username"));
        }
        if password.is_empty() {
            return Err(ApiError::missing_field("password"));
        }

        let body = LoginRequest { username: username.trim().to_string(), password: password.to_string() };
        let value = self.client.send_json(Method::POST, "login", &body, LOGIN_FALLBACK).await?;
        let response: LoginResponse = serde_json::from_value(value)?;
        let role = Role::parse(&response.user.role)
            .ok_or_else(|| ApiError::Decode("login response carried an empty role".to_string()))?;

        // credentials first: other tabs wake on the role
        self.client.set_bearer_token(response.token.clone());
        match response.token {
            Some(token) => self.storage.set_item(self.tab, TOKEN_KEY, token),
            None => self.storage.remove_item(self.tab, TOKEN_KEY),
        }
        match self.client.session_cookies() {
            Some(cookies) => self.storage.set_item(self.tab, COOKIE_KEY, cookies),
            None => self.storage.remove_item(self.tab, COOKIE_KEY),
        }
        self.storage.set_item(self.tab, ROLE_KEY, role.as_str());
        publish(&self.role_tx, Some(role.clone()));

        tracing::info!(username = %body.username, role = %role, "logged in");
        Ok(role)
    }

    /// Safe to call when already signed out.
    pub fn logout(&self) {
        let was_signed_in = self.is_authenticated();
        self.storage.remove_item(self.tab, ROLE_KEY);
        self.storage.remove_item(self.tab, TOKEN_KEY);
        self.storage.remove_item(self.tab, COOKIE_KEY);
        if let Err(e) = self.client.reset_credentials() {
            tracing::warn!(error = %e, "failed to reset HTTP credentials");
        }
        publish(&self.role_tx, None);

        if was_signed_in {
            tracing::info!("logged out");
        }
    }

    /// Creates an account. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        if let Some(field) = request.first_missing() {
            return Err(ApiError::missing_field(field));
        }
        self.client
            .send_json(Method::POST, "register", request, REGISTER_FALLBACK)
            .await?;
        tracing::info!(username = %request.username, role = %request.role, "registered user");
        Ok(())
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

fn publish(role_tx: &watch::Sender<Option<Role>>, role: Option<Role>) {
    role_tx.send_if_modified(|current| {
        if *current == role {
            return false;
        }
        *current = role;
        true
    });
}

async fn follow_other_tabs(
    tab: TabId,
    mut events: broadcast::Receiver<StorageEvent>,
    storage: Arc<LocalStorage>,
    client: HttpClient,
    role_tx: Arc<watch::Sender<Option<Role>>>,
) {
    loop {
        match events.recv().await {
            Ok(event) if event.origin == tab => {}
            Ok(event) => apply(&event.key, event.new_value.as_deref(), &storage, &client, &role_tx),
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "storage feed lagged, resyncing");
                for key in [ROLE_KEY, TOKEN_KEY, COOKIE_KEY] {
                    apply(key, storage.get_item(key).as_deref(), &storage, &client, &role_tx);
                }
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn apply(
    key: &str,
    value: Option<&str>,
    storage: &LocalStorage,
    client: &HttpClient,
    role_tx: &watch::Sender<Option<Role>>,
) {
    match key {
        ROLE_KEY => publish(role_tx, value.and_then(Role::parse)),
        TOKEN_KEY => client.set_bearer_token(value.map(str::to_string)),
        COOKIE_KEY => match value {
            Some(cookies) => client.restore_session_cookies(cookies),
            // the jar cannot drop single cookies; start over and keep any bearer
            None => {
                if let Err(e) = client.reset_credentials() {
                    tracing::warn!(error = %e, "failed to reset HTTP credentials");
                }
                client.set_bearer_token(storage.get_item(TOKEN_KEY));
            }
        },
        _ => {}
    }
}
