//! Role capabilities, evaluated once at the API boundary.

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// See every influencer's proposals, with owner names.
    ViewAllProposals,
    /// See every influencer's meetings, with owner names.
    ViewAllMeetings,
}

impl Role {
    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::ViewAllProposals | Capability::ViewAllMeetings => self == Role::Admin,
        }
    }
}

/// Which records a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Owner(i64),
    Nobody,
}

impl ListScope {
    /// Resolve a caller's claimed role and user id against `capability`.
    /// A caller without the capability only ever sees its own records.
    pub fn resolve(role: Role, user_id: Option<i64>, capability: Capability) -> Self {
        if role.allows(capability) {
            return Self::All;
        }
        match user_id {
            Some(id) => Self::Owner(id),
            None => Self::Nobody,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_sees_everything() {
        assert!(Role::Admin.allows(Capability::ViewAllProposals));
        assert!(Role::Admin.allows(Capability::ViewAllMeetings));
        assert!(!Role::Influencer.allows(Capability::ViewAllProposals));
        assert!(!Role::Influencer.allows(Capability::ViewAllMeetings));
    }

    #[test]
    fn scope_resolution() {
        assert_eq!(
            ListScope::resolve(Role::Admin, None, Capability::ViewAllProposals),
            ListScope::All
        );
        // An admin's own id does not narrow the view.
        assert_eq!(
            ListScope::resolve(Role::Admin, Some(1), Capability::ViewAllMeetings),
            ListScope::All
        );
        assert_eq!(
            ListScope::resolve(Role::Influencer, Some(7), Capability::ViewAllProposals),
            ListScope::Owner(7)
        );
        assert_eq!(
            ListScope::resolve(Role::Influencer, None, Capability::ViewAllProposals),
            ListScope::Nobody
        );
    }
}
