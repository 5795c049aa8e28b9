use std::mem;

use tracing::{info, warn};

use chirkut_types::models::PublicUser;

use crate::api::{ApiClient, Message};
use crate::error::ClientError;
use crate::router::{AppState, Effect, Event, View, reduce};
use crate::session::{SESSION_KEY, SessionStore};
use crate::util::{profile_link, sanitize_username};

/// Drives the router: feeds it events from user actions and server replies,
/// and carries out the effects it asks for.
pub struct App<S: SessionStore> {
    api: ApiClient,
    store: S,
    state: AppState,
    fragment: String,
}

impl<S: SessionStore> App<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            state: AppState::default(),
            fragment: String::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.state.view
    }

    pub fn session(&self) -> Option<&PublicUser> {
        self.state.session.as_ref()
    }

    /// Current URL fragment, without the leading `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Restore any saved session, then route the initial fragment.
    pub fn start(&mut self, fragment: &str) -> Result<(), ClientError> {
        if let Some(raw) = self.store.load(SESSION_KEY)? {
            match serde_json::from_str::<PublicUser>(&raw) {
                Ok(user) => {
                    info!("Restored session for '{}'", user.username);
                    self.apply(Event::SessionRestored(user))?;
                }
                Err(e) => {
                    warn!("Discarding unreadable session record: {}", e);
                    self.store.remove(SESSION_KEY)?;
                }
            }
        }
        self.navigate(fragment)
    }

    pub fn navigate(&mut self, fragment: &str) -> Result<(), ClientError> {
        self.fragment = fragment.strip_prefix('#').unwrap_or(fragment).to_string();
        self.apply(Event::FragmentChanged(self.fragment.clone()))
    }

    /// The username is cleaned up the same way `register` stores it.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let username = sanitize_username(username);
        if username.is_empty() || password.trim().is_empty() {
            return Err(ClientError::MissingCredentials);
        }
        let user = self.api.login(&username, password).await?;
        self.apply(Event::SignedIn(user))
    }

    /// Create the account and sign straight into it. A failed sign-in after a
    /// successful registration is reported as `LoginAfterRegister`.
    pub async fn register(
        &mut self,
        username: &str,
        full_name: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let username = sanitize_username(username);
        if username.is_empty() || password.trim().is_empty() {
            return Err(ClientError::MissingCredentials);
        }

        self.api.register(&username, full_name, password).await?;

        match self.api.login(&username, password).await {
            Ok(user) => self.apply(Event::SignedIn(user)),
            Err(e) => {
                warn!("Registered '{}' but sign-in failed: {}", username, e);
                Err(ClientError::LoginAfterRegister(e.to_string()))
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.apply(Event::SignedOut)
    }

    /// Offered after a successful send on someone's profile. Same transition
    /// as logging out.
    pub fn start_own_inbox(&mut self) -> Result<(), ClientError> {
        self.apply(Event::SignedOut)
    }

    /// An empty `password` keeps the current one.
    pub async fn update_profile(&mut self, full_name: &str, password: &str) -> Result<(), ClientError> {
        let username = self.signed_in_username()?;
        self.api.update_profile(&username, full_name, password).await?;
        self.apply(Event::FullNameChanged(full_name.to_string()))
    }

    pub async fn inbox(&self) -> Result<Vec<Message>, ClientError> {
        let username = self.signed_in_username()?;
        self.api.get_messages(&username).await
    }

    /// Delete a message and return the refreshed inbox.
    pub async fn delete_message(&self, id: i64) -> Result<Vec<Message>, ClientError> {
        self.api.delete_message(id).await?;
        self.inbox().await
    }

    /// Post to the profile being viewed. Blank content is not sent; the
    /// return value says whether anything went out.
    pub async fn send_to_profile(&self, content: &str) -> Result<bool, ClientError> {
        let to = self.state.profile_username().ok_or(ClientError::NoProfile)?;
        if content.trim().is_empty() {
            return Ok(false);
        }
        self.api.send_message(to, content).await?;
        Ok(true)
    }

    pub fn profile_link(&self, origin: &str) -> Option<String> {
        self.session().map(|user| profile_link(origin, &user.username))
    }

    fn signed_in_username(&self) -> Result<String, ClientError> {
        self.session()
            .map(|user| user.username.clone())
            .ok_or(ClientError::NotSignedIn)
    }

    fn apply(&mut self, event: Event) -> Result<(), ClientError> {
        let transition = reduce(mem::take(&mut self.state), event);
        self.state = transition.state;

        for effect in transition.effects {
            match effect {
                Effect::PersistSession(user) => {
                    self.store.save(SESSION_KEY, &serde_json::to_string(&user)?)?;
                }
                Effect::ClearSession => self.store.remove(SESSION_KEY)?,
                Effect::SetFragment(fragment) => self.fragment = fragment,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    // Nothing listens here; tests below never reach the network.
    fn app() -> App<MemorySessionStore> {
        App::new(ApiClient::new("http://127.0.0.1:9/api"), MemorySessionStore::new())
    }

    fn stored_user() -> PublicUser {
        PublicUser {
            username: "nil".into(),
            full_name: "Nil Noman".into(),
            created_at: "2026-10-16 12:00:00".into(),
        }
    }

    #[test]
    fn start_without_session_lands_home() {
        let mut app = app();
        app.start("").unwrap();
        assert_eq!(app.view(), &View::Home);
        assert!(app.session().is_none());
    }

    #[test]
    fn start_restores_session_before_routing() {
        let mut app = app();
        app.store
            .save(SESSION_KEY, &serde_json::to_string(&stored_user()).unwrap())
            .unwrap();

        app.start("#/").unwrap();
        assert_eq!(app.view(), &View::Dashboard);
        assert_eq!(app.session(), Some(&stored_user()));
    }

    #[test]
    fn start_on_profile_link_ignores_session() {
        let mut app = app();
        app.store
            .save(SESSION_KEY, &serde_json::to_string(&stored_user()).unwrap())
            .unwrap();

        app.start("#/@alice").unwrap();
        assert_eq!(app.view(), &View::Profile("alice".into()));
        assert!(app.session().is_some());
    }

    #[test]
    fn corrupt_session_record_is_dropped() {
        let mut app = app();
        app.store.save(SESSION_KEY, "{not json").unwrap();

        app.start("").unwrap();
        assert_eq!(app.view(), &View::Home);
        assert_eq!(app.store().load(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn logout_clears_storage_and_resets_fragment() {
        let mut app = app();
        app.store
            .save(SESSION_KEY, &serde_json::to_string(&stored_user()).unwrap())
            .unwrap();
        app.start("").unwrap();
        assert_eq!(app.view(), &View::Dashboard);

        app.logout().unwrap();
        assert_eq!(app.view(), &View::Home);
        assert!(app.session().is_none());
        assert_eq!(app.fragment(), "/");
        assert_eq!(app.store().load(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn start_own_inbox_leaves_profile_for_home() {
        let mut app = app();
        app.start("#/@alice").unwrap();
        app.start_own_inbox().unwrap();
        assert_eq!(app.view(), &View::Home);
        assert_eq!(app.fragment(), "/");
    }

    #[test]
    fn profile_link_needs_session() {
        let mut app = app();
        assert_eq!(app.profile_link("https://chirkut.app"), None);

        app.store
            .save(SESSION_KEY, &serde_json::to_string(&stored_user()).unwrap())
            .unwrap();
        app.start("").unwrap();
        assert_eq!(
            app.profile_link("https://chirkut.app").as_deref(),
            Some("https://chirkut.app/#/@nil")
        );
    }

    #[tokio::test]
    async fn blank_credentials_never_hit_the_network() {
        let mut app = app();
        assert!(matches!(
            app.login("nil", "   ").await,
            Err(ClientError::MissingCredentials)
        ));
        assert!(matches!(
            app.login("!!!", "pw").await,
            Err(ClientError::MissingCredentials)
        ));
        assert!(matches!(
            app.register("!!!", "Nil", "pw").await,
            Err(ClientError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn signed_out_calls_are_refused() {
        let mut app = app();
        app.start("").unwrap();
        assert!(matches!(app.inbox().await, Err(ClientError::NotSignedIn)));
        assert!(matches!(
            app.update_profile("x", "").await,
            Err(ClientError::NotSignedIn)
        ));
        assert!(matches!(
            app.send_to_profile("hi").await,
            Err(ClientError::NoProfile)
        ));
    }

    #[tokio::test]
    async fn blank_message_is_not_sent() {
        let mut app = app();
        app.start("#/@alice").unwrap();
        assert!(!app.send_to_profile("   ").await.unwrap());
    }
}
