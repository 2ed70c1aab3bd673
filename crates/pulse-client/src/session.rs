use std::fmt;

use pulse_types::validation::{
    display_name_from_email, validate_email, validate_name, validate_password,
};
use pulse_types::{Identity, Role};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Everything a role may or may not be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SubmitFeedback,
    EditOwnFeedback,
    DeleteOwnFeedback,
    DeleteAnyFeedback,
    ToggleCatalogOverlay,
    ViewAnalytics,
    ViewProducerReports,
    ViewAdminConsole,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SubmitFeedback => "submit feedback",
            Self::EditOwnFeedback => "edit feedback",
            Self::DeleteOwnFeedback => "delete own feedback",
            Self::DeleteAnyFeedback => "delete any feedback",
            Self::ToggleCatalogOverlay => "change catalog visibility",
            Self::ViewAnalytics => "view analytics",
            Self::ViewProducerReports => "view producer reports",
            Self::ViewAdminConsole => "open the admin console",
        };
        f.write_str(s)
    }
}

/// Role-based permission table.
pub trait RolePolicy {
    fn permits(self, action: Action) -> bool;
}

impl RolePolicy for Role {
    fn permits(self, action: Action) -> bool {
        use Action::*;
        match self {
            Role::User => matches!(action, SubmitFeedback | EditOwnFeedback | DeleteOwnFeedback),
            Role::Producer => matches!(action, ViewProducerReports),
            Role::Analyst => matches!(action, ViewAnalytics),
            Role::Admin => matches!(
                action,
                DeleteAnyFeedback | ToggleCatalogOverlay | ViewAdminConsole | ViewAnalytics
            ),
        }
    }
}

/// Partial profile edit from the navbar settings panel.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the avatar.
    pub photo: Option<Option<String>>,
    pub notifications_enabled: Option<bool>,
}

/// The active identity, fixed from sign-in until sign-out.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(identity: Option<Identity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|i| i.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Check `action` against the active role before anything is mutated.
    pub fn authorize(&self, action: Action) -> Result<&Identity> {
        let identity = self.identity.as_ref().ok_or(AppError::NotSignedIn)?;
        if identity.role.permits(action) {
            Ok(identity)
        } else {
            Err(AppError::Forbidden {
                role: identity.role,
                action,
            })
        }
    }

    /// Sign in with the role picked on the role-selection page. The display
    /// name is derived from the email address.
    pub fn login(&mut self, role: Role, email: &str, password: &str) -> Result<&Identity> {
        self.ensure_signed_out()?;
        validate_email(email)?;
        validate_password(password)?;

        let name = display_name_from_email(email);
        Ok(self.start(role, name, email))
    }

    pub fn signup(&mut self, role: Role, name: &str, email: &str, password: &str) -> Result<&Identity> {
        self.ensure_signed_out()?;
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password)?;

        Ok(self.start(role, name.trim().to_string(), email))
    }

    pub fn sign_out(&mut self) -> Option<Identity> {
        let previous = self.identity.take();
        if let Some(identity) = &previous {
            info!(user_id = %identity.id, role = %identity.role, "signed out");
        }
        previous
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Identity> {
        let identity = self.identity.as_mut().ok_or(AppError::NotSignedIn)?;
        if let Some(name) = update.name {
            validate_name(&name)?;
            identity.name = name.trim().to_string();
        }
        if let Some(photo) = update.photo {
            identity.photo = photo;
        }
        if let Some(enabled) = update.notifications_enabled {
            identity.notifications_enabled = enabled;
        }
        Ok(identity)
    }

    fn ensure_signed_out(&self) -> Result<()> {
        if self.identity.is_some() {
            return Err(AppError::AlreadySignedIn);
        }
        Ok(())
    }

    fn start(&mut self, role: Role, name: String, email: &str) -> &Identity {
        let identity = Identity {
            id: user_id_for(email),
            name,
            email: email.to_string(),
            photo: None,
            role,
            notifications_enabled: true,
        };
        info!(user_id = %identity.id, role = %role, "signed in");
        self.identity.insert(identity)
    }
}

const USER_NAMESPACE: Uuid = Uuid::from_u128(0x6c1d_4f0e_93a2_4b7c_a1e5_2f8d_90c3_b417);

/// Same email, same id, so a returning member still owns their reviews.
fn user_id_for(email: &str) -> String {
    Uuid::new_v5(&USER_NAMESPACE, email.trim().to_lowercase().as_bytes()).to_string()
}
