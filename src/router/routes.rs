use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// Screens the client can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    QuizDashboard,
    CreateQuiz,
    QuizManagement,
    QuizEvent,
    CompletedQuiz,
    Auth,
    ParticipantDetails,
    MyProfile,
    Account,
    Users,
    AccessGate,
    Error,
    NotFound,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What has to hold before a route may render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteGuard {
    None,
    /// A verified account-holder session.
    AccountRequired,
    /// The access resolver must allow the `:id` quiz.
    QuizAccess,
    /// Signed-in owner of the `:id` quiz, or an admin.
    QuizOwner,
}

#[derive(Clone, Debug)]
pub struct Route {
    pattern: &'static str,
    view: View,
    guard: RouteGuard,
}

impl Route {
    pub const fn new(pattern: &'static str, view: View, guard: RouteGuard) -> Self {
        Route {
            pattern,
            view,
            guard,
        }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn guard(&self) -> RouteGuard {
        self.guard
    }

    fn capture(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let expected = segments(self.pattern);
        let actual = segments(path);
        if expected.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (pattern, value) in expected.iter().zip(actual.iter()) {
            match pattern.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), value.to_string());
                }
                None if pattern == value => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// A route resolved against a concrete path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub view: View,
    pub guard: RouteGuard,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route matching `path`. Query strings and fragments are ignored.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = strip_query(path);
        self.routes.iter().find_map(|route| {
            route.capture(path).map(|params| RouteMatch {
                view: route.view,
                guard: route.guard,
                params,
            })
        })
    }

    /// Concrete path of `view`, filling `:id` with `id`.
    pub fn path_for(&self, view: View, id: Option<&str>) -> Option<String> {
        let route = self.routes.iter().find(|route| route.view == view)?;
        let mut parts = Vec::new();
        for segment in segments(route.pattern) {
            if segment.starts_with(':') {
                parts.push(id?.to_string());
            } else {
                parts.push(segment.to_string());
            }
        }
        Some(format!("/{}", parts.join("/")))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        RouteTable::new(vec![
            Route::new("/", View::QuizDashboard, RouteGuard::AccountRequired),
            Route::new("/create-quiz", View::CreateQuiz, RouteGuard::AccountRequired),
            Route::new("/quiz/:id/manage", View::QuizManagement, RouteGuard::QuizOwner),
            Route::new("/quiz/:id", View::QuizEvent, RouteGuard::QuizAccess),
            Route::new("/quiz-results/:id", View::CompletedQuiz, RouteGuard::AccountRequired),
            Route::new("/auth", View::Auth, RouteGuard::None),
            Route::new(
                "/participant/:id",
                View::ParticipantDetails,
                RouteGuard::AccountRequired,
            ),
            Route::new("/profile", View::MyProfile, RouteGuard::AccountRequired),
            Route::new("/account", View::Account, RouteGuard::AccountRequired),
            Route::new("/users", View::Users, RouteGuard::AccountRequired),
            Route::new("/access/:id", View::AccessGate, RouteGuard::None),
            Route::new("/error", View::Error, RouteGuard::None),
        ])
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
