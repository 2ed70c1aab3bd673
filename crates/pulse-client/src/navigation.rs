use pulse_types::Role;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::session::{Action, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Contact,
    HelpCenter,
    Privacy,
    Terms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Landing,
    RoleSelection,
    Login(Role),
    Signup(Role),
    UserHome,
    MovieDetails(String),
    AnalystDashboard,
    ProducerDashboard,
    AdminDashboard,
    SignOut,
    Static(StaticPage),
}

/// Who may open a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    SignedIn,
    Role(Role),
}

impl Page {
    pub fn access(&self) -> Access {
        match self {
            Self::Landing
            | Self::RoleSelection
            | Self::Login(_)
            | Self::Signup(_)
            | Self::Static(_) => Access::Public,
            Self::SignOut => Access::SignedIn,
            Self::UserHome | Self::MovieDetails(_) => Access::Role(Role::User),
            Self::AnalystDashboard => Access::Role(Role::Analyst),
            Self::ProducerDashboard => Access::Role(Role::Producer),
            Self::AdminDashboard => Access::Role(Role::Admin),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Page,
    previous: Option<Page>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Page::Landing,
            previous: None,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on the signed-in role's home page, or the landing page.
    pub fn resume(session: &Session) -> Self {
        Self {
            current: session.role().map_or(Page::Landing, Self::home_for),
            previous: None,
        }
    }

    pub fn current(&self) -> &Page {
        &self.current
    }

    pub fn previous(&self) -> Option<&Page> {
        self.previous.as_ref()
    }

    pub fn home_for(role: Role) -> Page {
        match role {
            Role::User => Page::UserHome,
            Role::Producer => Page::ProducerDashboard,
            Role::Analyst => Page::AnalystDashboard,
            Role::Admin => Page::AdminDashboard,
        }
    }

    /// Move to `page` if the session may see it. Audience members asking for
    /// the landing page are sent to their home instead.
    pub fn navigate(&mut self, page: Page, session: &Session) -> Result<&Page> {
        let page = match (page, session.role()) {
            (Page::Landing, Some(Role::User)) => Page::UserHome,
            (page, _) => page,
        };

        match page.access() {
            Access::Public => {}
            Access::SignedIn => {
                session.identity().ok_or(AppError::NotSignedIn)?;
            }
            Access::Role(required) => {
                let role = session.role().ok_or(AppError::NotSignedIn)?;
                if role != required {
                    return Err(AppError::Forbidden {
                        role,
                        action: required_action(required),
                    });
                }
            }
        }

        debug!(from = ?self.current, to = ?page, "navigate");
        self.previous = Some(std::mem::replace(&mut self.current, page));
        Ok(&self.current)
    }

    /// Movie details fall back to the user home; everything else to landing.
    pub fn back(&mut self) -> &Page {
        let target = match self.current {
            Page::MovieDetails(_) => Page::UserHome,
            _ => Page::Landing,
        };
        self.previous = Some(std::mem::replace(&mut self.current, target));
        &self.current
    }

    /// Leave the sign-out confirmation without signing out.
    pub fn cancel_sign_out(&mut self) -> &Page {
        if self.current == Page::SignOut {
            self.current = self.previous.take().unwrap_or(Page::Landing);
        }
        &self.current
    }

    /// Forget history after sign-out.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn required_action(role: Role) -> Action {
    match role {
        Role::User => Action::SubmitFeedback,
        Role::Producer => Action::ViewProducerReports,
        Role::Analyst => Action::ViewAnalytics,
        Role::Admin => Action::ViewAdminConsole,
    }
}
