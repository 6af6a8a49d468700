// Squad members and leadership roles.

use serde::{Deserialize, Serialize};

/// Leadership role in a fantasy XI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Captain,
    ViceCaptain,
}

impl Role {
    /// Short tag shown next to the player and sent back by the estimator.
    pub fn tag(self) -> &'static str {
        match self {
            Role::Captain => "C",
            Role::ViceCaptain => "VC",
        }
    }

    /// The other role (a member may hold only one).
    pub fn other(self) -> Role {
        match self {
            Role::Captain => Role::ViceCaptain,
            Role::ViceCaptain => Role::Captain,
        }
    }
}

/// Playing role and franchise, as reported by the player-info lookup.
///
/// Both fields are empty when the lookup failed or has not returned yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub team: String,
}

/// One chosen player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadMember {
    pub name: String,
    pub captain: bool,
    pub vice_captain: bool,
    #[serde(default)]
    pub profile: PlayerProfile,
    /// True while a player-info lookup for this member is outstanding.
    #[serde(default)]
    pub profile_pending: bool,
}

impl SquadMember {
    pub fn new(name: impl Into<String>) -> Self {
        SquadMember {
            name: name.into(),
            captain: false,
            vice_captain: false,
            profile: PlayerProfile::default(),
            profile_pending: false,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Captain => self.captain,
            Role::ViceCaptain => self.vice_captain,
        }
    }

    pub(crate) fn set_flag(&mut self, role: Role, value: bool) {
        match role {
            Role::Captain => self.captain = value,
            Role::ViceCaptain => self.vice_captain = value,
        }
    }

    /// The role this member holds, if any.
    pub fn role(&self) -> Option<Role> {
        if self.captain {
            Some(Role::Captain)
        } else if self.vice_captain {
            Some(Role::ViceCaptain)
        } else {
            None
        }
    }

    /// Tag for display: "C", "VC", or "".
    pub fn tag(&self) -> &'static str {
        self.role().map_or("", Role::tag)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tags() {
        assert_eq!(Role::Captain.tag(), "C");
        assert_eq!(Role::ViceCaptain.tag(), "VC");
    }

    #[test]
    fn other_role_swaps() {
        assert_eq!(Role::Captain.other(), Role::ViceCaptain);
        assert_eq!(Role::ViceCaptain.other(), Role::Captain);
    }

    #[test]
    fn new_member_has_no_role() {
        let m = SquadMember::new("Jasprit Bumrah");
        assert_eq!(m.role(), None);
        assert_eq!(m.tag(), "");
        assert!(!m.profile_pending);
        assert_eq!(m.profile, PlayerProfile::default());
    }

    #[test]
    fn tag_reflects_flags() {
        let mut m = SquadMember::new("Hardik Pandya");
        m.set_flag(Role::ViceCaptain, true);
        assert_eq!(m.tag(), "VC");
        assert!(m.has_role(Role::ViceCaptain));
        assert!(!m.has_role(Role::Captain));
    }

    #[test]
    fn profile_deserializes_with_missing_fields() {
        let p: PlayerProfile = serde_json::from_str(r#"{"name":"X","role":"Bowler"}"#).unwrap();
        assert_eq!(p.role, "Bowler");
        assert_eq!(p.team, "");
    }
}
