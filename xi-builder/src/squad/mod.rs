// Squad building: chosen players, leadership roles, completeness.

pub mod member;
pub mod selection;

pub use member::{PlayerProfile, Role, SquadMember};
pub use selection::{Rejection, Selection, DEFAULT_MAX_SIZE};
