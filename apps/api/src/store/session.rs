use crate::models::user::User;

/// Caller-owned cache of the current user.
///
/// Each request starts with an empty session. Once a user is cached the
/// session does not re-read the store, so it can go stale if another caller
/// replaces the stored user in the meantime.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn cache(&mut self, user: User) {
        self.user = Some(user);
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
    }
}
