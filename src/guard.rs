//! Route table of the member application and its navigation guard
//!
//! Protected routes need an unexpired token; `/admin` additionally needs the
//! `admin` role. Both facts come from the same [`TokenProvider`] the request
//! pipeline uses.

use crate::events::login_redirect_url;
use crate::token_store::TokenProvider;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/curriculums";
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_role: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Pattern; segments starting with `:` match any single segment
    pub path: &'static str,
    pub name: &'static str,
    pub meta: RouteMeta,
    /// Routes that only forward somewhere else
    pub redirect: Option<&'static str>,
}

const fn protected(path: &'static str, name: &'static str) -> Route {
    Route {
        path,
        name,
        meta: RouteMeta {
            requires_auth: true,
            requires_role: None,
        },
        redirect: None,
    }
}

pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        name: "Root",
        meta: RouteMeta {
            requires_auth: false,
            requires_role: None,
        },
        redirect: Some(HOME_PATH),
    },
    Route {
        path: LOGIN_PATH,
        name: "Login",
        meta: RouteMeta {
            requires_auth: false,
            requires_role: None,
        },
        redirect: None,
    },
    protected("/curriculums", "Curriculums"),
    protected("/curriculums/new", "CurriculumNew"),
    protected("/curriculums/:id", "CurriculumEdit"),
    protected("/ratings", "Ratings"),
    protected("/ratings/new", "RatingNew"),
    protected("/ratings/:id", "RatingEdit"),
    protected("/reviews", "Reviews"),
    protected("/reviews/new", "ReviewNew"),
    protected("/reviews/:id", "ReviewEdit"),
    protected("/events", "Events"),
    protected("/events/new", "EventNew"),
    protected("/events/:id", "EventView"),
    protected("/resources", "Resources"),
    protected("/resources/:id", "ResourceView"),
    protected("/paths", "Paths"),
    protected("/paths/:id", "PathView"),
    Route {
        path: "/admin",
        name: "Admin",
        meta: RouteMeta {
            requires_auth: true,
            requires_role: Some(ADMIN_ROLE),
        },
        redirect: None,
    },
];

fn path_only(full_path: &str) -> &str {
    let end = full_path.find(['?', '#']).unwrap_or(full_path.len());
    &full_path[..end]
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl Route {
    pub fn matches(&self, path: &str) -> bool {
        let pattern = segments(self.path);
        let actual = segments(path_only(path));

        pattern.len() == actual.len()
            && pattern
                .iter()
                .zip(&actual)
                .all(|(p, a)| p.starts_with(':') || p == a)
    }
}

/// First route whose pattern matches `full_path` (query and fragment ignored)
pub fn resolve(full_path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.matches(full_path))
}

/// Document title shown for `path`
pub fn page_title(path: &str) -> &'static str {
    if path_only(path) == LOGIN_PATH {
        "Question Queue Login"
    } else {
        "Member"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the named route
    Proceed { route: &'static str },
    /// Go to `path` instead
    Redirect { path: String },
    /// Not authenticated; go to the login route and come back to `redirect`
    Login { redirect: String },
    NotFound,
}

impl GuardDecision {
    /// Where the host should navigate, if anywhere
    pub fn target(&self) -> Option<String> {
        match self {
            GuardDecision::Redirect { path } => Some(path.clone()),
            GuardDecision::Login { redirect } => Some(login_redirect_url(LOGIN_PATH, redirect)),
            GuardDecision::Proceed { .. } | GuardDecision::NotFound => None,
        }
    }
}

/// Decides whether a navigation may proceed
#[derive(Clone)]
pub struct Guard {
    tokens: Arc<dyn TokenProvider>,
}

impl Guard {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self { tokens }
    }

    pub fn check(&self, full_path: &str) -> GuardDecision {
        self.check_at(full_path, Utc::now())
    }

    pub fn check_at(&self, full_path: &str, now: DateTime<Utc>) -> GuardDecision {
        let Some(route) = resolve(full_path) else {
            return GuardDecision::NotFound;
        };

        if let Some(target) = route.redirect {
            return GuardDecision::Redirect {
                path: target.to_string(),
            };
        }

        if route.meta.requires_auth && !self.tokens.is_authenticated(now) {
            debug!(path = %full_path, "Navigation requires login");
            return GuardDecision::Login {
                redirect: full_path.to_string(),
            };
        }

        if let Some(role) = route.meta.requires_role {
            if !self.tokens.has_role(role) {
                debug!(path = %full_path, role = %role, "Navigation requires role");
                return GuardDecision::Redirect {
                    path: HOME_PATH.to_string(),
                };
            }
        }

        GuardDecision::Proceed { route: route.name }
    }
}
