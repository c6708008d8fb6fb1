//! Point awards for passed turns.

use super::session::GameSession;

/// Weight ceiling under which a pass counts as hard-mode.
const HARD_MODE_MAX_G: u64 = 1000;

/// Active-rule count at which a pass counts as hard-mode.
const HARD_MODE_RULES: usize = 2;

/// Points awarded for a pass against the current session state.
///
/// A tight window or a stacked rule set pays triple; failed turns award
/// nothing and the cumulative score never decreases.
pub fn award_for_pass(session: &GameSession) -> u64 {
    if session.max_weight_g() <= HARD_MODE_MAX_G
        || session.active_rules().len() >= HARD_MODE_RULES
    {
        3
    } else {
        1
    }
}
