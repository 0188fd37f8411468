pub mod browse;

/// Top-level views of the application, keyed by their URL path.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Route {
    Home,
    Browse,
    Editor,
    Piano,
    Message,
    About,
    NotFound,
}

impl Route {
    pub fn id(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Browse => "browse",
            Route::Editor => "editor",
            Route::Piano => "piano",
            Route::Message => "message",
            Route::About => "about",
            Route::NotFound => "not-found",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Browse => "Browse",
            Route::Editor => "Editor",
            Route::Piano => "Piano",
            Route::Message => "Message",
            Route::About => "About",
            Route::NotFound => "Not Found",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Browse => "/browse",
            Route::Editor => "/editor",
            Route::Piano => "/piano",
            Route::Message => "/message",
            Route::About => "/about",
            Route::NotFound => "/404",
        }
    }

    /// Resolves a URL path; anything unknown maps to [`Route::NotFound`].
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        Route::all()
            .into_iter()
            .find(|route| route.path() == trimmed)
            .unwrap_or(Route::NotFound)
    }

    /// Routes shown in the sidebar, in display order.
    pub fn sidebar() -> Vec<Route> {
        vec![
            Route::Home,
            Route::Browse,
            Route::Editor,
            Route::Piano,
            Route::Message,
            Route::About,
        ]
    }

    pub fn all() -> Vec<Route> {
        let mut routes = Route::sidebar();
        routes.push(Route::NotFound);
        routes
    }
}
