//! Cleanup system: drops communities destroyed during the tick.

use crate::roster::Roster;

/// Remove dead communities. Returns how many remain.
pub fn run(roster: &mut Roster) -> usize {
    roster.communities.retain(|c| c.alive);
    roster.communities.len()
}
