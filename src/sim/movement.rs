//! Move-and-slide against solid obstacles
//!
//! The mover is displaced first, then pushed out of whatever it overlaps one
//! obstacle at a time. After every push the scan starts over, so resolving
//! one overlap can never leave the mover inside an obstacle that was already
//! checked.

use glam::Vec2;

use super::collision::rectangle_intersect;
use super::entity::Entity;
use super::error::SimError;
use super::rect::Rect;

/// Extra pushes allowed on top of one per obstacle
pub const MOVE_RESOLVE_SLACK: usize = 4;

/// Displace `mover` and resolve it against `solids`
///
/// Returns `Ok(true)` if at least one overlap was resolved. If the pushes
/// exceed `solids.len() + MOVE_RESOLVE_SLACK` the obstacles contradict each
/// other; the mover is restored to its position before the call and
/// [`SimError::UnresolvableCollision`] is returned.
pub fn try_move(mover: &mut Entity, solids: &[Rect], displacement: Vec2) -> Result<bool, SimError> {
    let start = mover.position;
    mover.position += displacement;

    let limit = solids.len() + MOVE_RESOLVE_SLACK;
    let mut pushes = 0;

    'scan: loop {
        for obstacle in solids {
            if let Some(hit) = rectangle_intersect(mover.bounds(), *obstacle) {
                if pushes == limit {
                    mover.position = start;
                    return Err(SimError::UnresolvableCollision { iterations: pushes });
                }
                mover.position += hit.mtv();
                pushes += 1;
                continue 'scan;
            }
        }
        return Ok(pushes > 0);
    }
}
