use chirkut_types::models::PublicUser;

/// Which top-level screen is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Dashboard,
    /// Public composer for the named user.
    Profile(String),
}

/// The shape of a URL fragment, as far as routing cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Profile(String),
    Root,
    Other,
}

impl Route {
    /// Accepts the fragment with or without its leading `#`.
    pub fn parse(fragment: &str) -> Self {
        let path = fragment.strip_prefix('#').unwrap_or(fragment);
        if let Some(rest) = path.strip_prefix("/@") {
            // "#/@a#/@b" names "a"
            let username = rest.split("#/@").next().unwrap_or_default();
            if !username.is_empty() {
                return Route::Profile(username.to_string());
            }
        }
        match path {
            "" | "/" => Route::Root,
            _ => Route::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub view: View,
    pub session: Option<PublicUser>,
}

impl AppState {
    pub fn profile_username(&self) -> Option<&str> {
        match &self.view {
            View::Profile(username) => Some(username),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Session read back from storage at startup.
    SessionRestored(PublicUser),
    FragmentChanged(String),
    SignedIn(PublicUser),
    FullNameChanged(String),
    /// Logout, and "create your own inbox" after sending.
    SignedOut,
}

/// Side effects the driver must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistSession(PublicUser),
    ClearSession,
    SetFragment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

pub fn reduce(state: AppState, event: Event) -> Transition {
    match event {
        Event::SessionRestored(user) => Transition::quiet(AppState {
            session: Some(user),
            ..state
        }),
        Event::FragmentChanged(fragment) => Transition::quiet(route(state, &fragment)),
        Event::SignedIn(user) => Transition {
            effects: vec![Effect::PersistSession(user.clone())],
            state: AppState {
                view: View::Dashboard,
                session: Some(user),
            },
        },
        Event::FullNameChanged(full_name) => match state.session {
            Some(mut user) => {
                user.full_name = full_name;
                Transition {
                    effects: vec![Effect::PersistSession(user.clone())],
                    state: AppState {
                        session: Some(user),
                        ..state
                    },
                }
            }
            None => Transition::quiet(state),
        },
        // One step: there is never a dashboard without a session.
        Event::SignedOut => Transition {
            state: AppState {
                view: View::Home,
                session: None,
            },
            effects: vec![Effect::ClearSession, Effect::SetFragment("/".into())],
        },
    }
}

fn route(state: AppState, fragment: &str) -> AppState {
    let view = match Route::parse(fragment) {
        Route::Profile(username) => View::Profile(username),
        Route::Root if state.session.is_some() => View::Dashboard,
        Route::Root => View::Home,
        Route::Other => return state,
    };
    AppState { view, ..state }
}
