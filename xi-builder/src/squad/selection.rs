// Squad selection: bounded, duplicate-free, ordered list of chosen players.

use thiserror::Error;
use tracing::warn;

use super::member::{Role, SquadMember};
use crate::typeahead::matcher::ExclusionSet;
use crate::typeahead::CommitSink;

/// A cricket playing XI.
pub const DEFAULT_MAX_SIZE: usize = 11;

/// Why a player could not be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("squad is full ({max} players)")]
    CapacityExceeded { max: usize },
    #[error("player is already in the squad")]
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    members: Vec<SquadMember>,
    max_size: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new(DEFAULT_MAX_SIZE)
    }
}

impl Selection {
    pub fn new(max_size: usize) -> Self {
        Selection {
            members: Vec::with_capacity(max_size),
            max_size,
        }
    }

    pub fn members(&self) -> &[SquadMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_size
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut SquadMember> {
        self.members.iter_mut().find(|m| m.name == name)
    }

    /// Append a player.
    ///
    /// Capacity is checked before uniqueness, so a full squad always reports
    /// `CapacityExceeded`.
    pub fn add(&mut self, name: &str) -> Result<&mut SquadMember, Rejection> {
        if self.is_full() {
            return Err(Rejection::CapacityExceeded { max: self.max_size });
        }
        if self.contains(name) {
            return Err(Rejection::Duplicate);
        }
        self.members.push(SquadMember::new(name));
        let last = self.members.len() - 1;
        Ok(&mut self.members[last])
    }

    /// Remove the member at `position`.
    ///
    /// Callers must pass a valid position; an out-of-range position is logged
    /// and leaves the squad unchanged.
    pub fn remove(&mut self, position: usize) -> Option<SquadMember> {
        if position >= self.members.len() {
            warn!(
                "remove called with position {} on a squad of {}",
                position,
                self.members.len()
            );
            return None;
        }
        Some(self.members.remove(position))
    }

    /// Toggle `role` on the member at `position`.
    ///
    /// Turning a role on clears it from every other member and clears the
    /// other role from this member. Turning it off (the member already held
    /// it) only clears it. Returns `false` for an out-of-range position.
    pub fn set_role(&mut self, position: usize, role: Role) -> bool {
        let Some(target) = self.members.get(position) else {
            warn!(
                "set_role called with position {} on a squad of {}",
                position,
                self.members.len()
            );
            return false;
        };
        let enable = !target.has_role(role);

        for (i, member) in self.members.iter_mut().enumerate() {
            if i == position {
                member.set_flag(role, enable);
                if enable {
                    member.set_flag(role.other(), false);
                }
            } else if enable {
                member.set_flag(role, false);
            }
        }
        true
    }

    pub fn count_with(&self, role: Role) -> usize {
        self.members.iter().filter(|m| m.has_role(role)).count()
    }

    /// Full XI with exactly one captain and exactly one vice-captain.
    pub fn is_complete(&self) -> bool {
        self.members.len() == self.max_size
            && self.count_with(Role::Captain) == 1
            && self.count_with(Role::ViceCaptain) == 1
    }
}

impl ExclusionSet for Selection {
    fn excludes(&self, candidate: &str) -> bool {
        self.contains(candidate)
    }
}

impl CommitSink for Selection {
    type Error = Rejection;

    fn accept(&mut self, candidate: &str) -> Result<(), Self::Error> {
        self.add(candidate).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn full_xi() -> Selection {
        let mut s = Selection::new(DEFAULT_MAX_SIZE);
        for i in 0..DEFAULT_MAX_SIZE {
            s.add(&format!("Player {i}")).unwrap();
        }
        s
    }

    fn assert_roles_exclusive(s: &Selection) {
        assert!(s.count_with(Role::Captain) <= 1);
        assert!(s.count_with(Role::ViceCaptain) <= 1);
        for m in s.members() {
            assert!(!(m.captain && m.vice_captain), "{} holds both roles", m.name);
        }
    }

    #[test]
    fn add_appends_in_order() {
        let mut s = Selection::default();
        s.add("Rohit Sharma").unwrap();
        s.add("Virat Kohli").unwrap();
        let names: Vec<&str> = s.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Rohit Sharma", "Virat Kohli"]);
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut s = Selection::default();
        s.add("Rohit Sharma").unwrap();
        assert_eq!(s.add("Rohit Sharma").unwrap_err(), Rejection::Duplicate);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn add_at_capacity_is_rejected_without_mutation() {
        let mut s = full_xi();
        let before = s.clone();
        for _ in 0..3 {
            assert_eq!(
                s.add("Extra Player").unwrap_err(),
                Rejection::CapacityExceeded { max: 11 }
            );
        }
        // Capacity wins over duplicate.
        assert_eq!(
            s.add("Player 0").unwrap_err(),
            Rejection::CapacityExceeded { max: 11 }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn remove_by_position() {
        let mut s = Selection::default();
        s.add("A").unwrap();
        s.add("B").unwrap();
        s.add("C").unwrap();
        let removed = s.remove(1).unwrap();
        assert_eq!(removed.name, "B");
        let names: Vec<&str> = s.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn remove_out_of_range_changes_nothing() {
        let mut s = Selection::default();
        s.add("A").unwrap();
        assert!(s.remove(5).is_none());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn captain_moves_between_members() {
        let mut s = full_xi();
        s.set_role(0, Role::Captain);
        s.set_role(3, Role::Captain);
        assert!(s.members()[3].captain);
        assert_eq!(s.count_with(Role::Captain), 1);
        assert!(!s.members()[0].captain);
    }

    #[test]
    fn toggling_held_role_clears_it() {
        let mut s = full_xi();
        s.set_role(2, Role::ViceCaptain);
        s.set_role(2, Role::ViceCaptain);
        assert_eq!(s.count_with(Role::ViceCaptain), 0);
    }

    #[test]
    fn captain_replaces_vice_captain_on_same_member() {
        let mut s = full_xi();
        s.set_role(4, Role::ViceCaptain);
        s.set_role(4, Role::Captain);
        let m = &s.members()[4];
        assert!(m.captain);
        assert!(!m.vice_captain);
        assert_eq!(s.count_with(Role::ViceCaptain), 0);
    }

    #[test]
    fn roles_stay_exclusive_under_arbitrary_toggles() {
        let mut s = full_xi();
        let script = [
            (0, Role::Captain),
            (1, Role::ViceCaptain),
            (1, Role::Captain),
            (0, Role::ViceCaptain),
            (5, Role::ViceCaptain),
            (5, Role::Captain),
            (5, Role::Captain),
            (7, Role::ViceCaptain),
            (10, Role::Captain),
        ];
        for (pos, role) in script {
            assert!(s.set_role(pos, role));
            assert_roles_exclusive(&s);
        }
    }

    #[test]
    fn set_role_out_of_range_returns_false() {
        let mut s = Selection::default();
        assert!(!s.set_role(0, Role::Captain));
    }

    #[test]
    fn complete_requires_full_squad_and_both_roles() {
        let mut s = full_xi();
        assert!(!s.is_complete());
        s.set_role(0, Role::Captain);
        assert!(!s.is_complete());
        s.set_role(1, Role::ViceCaptain);
        assert!(s.is_complete());
    }

    #[test]
    fn removing_a_member_breaks_completeness() {
        let mut s = full_xi();
        s.set_role(0, Role::Captain);
        s.set_role(1, Role::ViceCaptain);
        s.remove(6);
        assert!(!s.is_complete());
    }

    #[test]
    fn clearing_captain_breaks_completeness() {
        let mut s = full_xi();
        s.set_role(0, Role::Captain);
        s.set_role(1, Role::ViceCaptain);
        s.set_role(0, Role::Captain);
        assert!(!s.is_complete());
    }

    #[test]
    fn commit_sink_reports_rejection() {
        let mut s = full_xi();
        assert_eq!(
            s.accept("Someone New"),
            Err(Rejection::CapacityExceeded { max: 11 })
        );
        assert!(s.excludes("Player 3"));
        assert!(!s.excludes("Someone New"));
    }

    #[test]
    fn rejection_messages_are_readable() {
        assert_eq!(
            Rejection::CapacityExceeded { max: 11 }.to_string(),
            "squad is full (11 players)"
        );
        assert_eq!(Rejection::Duplicate.to_string(), "player is already in the squad");
    }
}
