use db::types::MemberRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TicketError};

/// The authenticated caller of an engine operation. Every read and write is
/// scoped to `org_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: MemberRole,
}

impl Actor {
    pub fn new(user_id: Uuid, org_id: Uuid, role: MemberRole) -> Self {
        Self {
            user_id,
            org_id,
            role,
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(TicketError::Forbidden(
                "Only owners and admins can perform this action".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_owner_and_admin_pass_the_gate() {
        let org = Uuid::new_v4();
        for (role, allowed) in [
            (MemberRole::Owner, true),
            (MemberRole::Admin, true),
            (MemberRole::Agent, false),
            (MemberRole::Viewer, false),
        ] {
            let actor = Actor::new(Uuid::new_v4(), org, role);
            assert_eq!(actor.require_admin().is_ok(), allowed, "{role}");
        }
    }
}
