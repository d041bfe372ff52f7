//! Dispatcher: decides which pending request the elevator serves next.
//!
//! The decision runs over a [`SystemState`] snapshot and the pending
//! requests of that system, in this order:
//!
//! 1. no current floor, or nothing pending: stay idle;
//! 2. **sweep**: keep going in the current direction towards the nearest
//!    effective target ahead, or reverse once towards the nearest one behind;
//! 3. **starvation escalation**: when the sweep finds nothing, the oldest
//!    request skipped `starvation_threshold` times or more picks the
//!    direction, and a starved request on the other side is skipped again;
//! 4. **global direction**: without starved requests, the bottom floor goes
//!    up, the top floor goes down, anywhere else heads to the side that has
//!    requests (with requests on both sides, towards the nearer boundary,
//!    down when both are equally far);
//! 5. the stop is the nearest request whose *origin* lies in that direction.
//!
//! Requests at the same floor are ordered oldest first.
//!
//! [`Dispatcher::decide`] never fails and never touches storage. The skip
//! bump from step 3 is returned in [`Decision::skipped`] and must be
//! persisted together with the move.

use std::cmp::Reverse;

use crate::direction::Direction;
use crate::floor::Floor;
use crate::id::RequestId;
use crate::request::Request;
use crate::system::SystemState;

/// Skip count from which a request is considered starved.
pub const DEFAULT_STARVATION_THRESHOLD: u32 = 3;

/// Outcome of one dispatch round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Request to serve next; `None` means idle.
    pub request: Option<Request>,
    /// Direction to travel in. Unchanged when idle.
    pub direction: Direction,
    /// Starved request passed over this round; its `skip_count` must be
    /// incremented by the caller.
    pub skipped: Option<RequestId>,
}

impl Decision {
    fn idle(direction: Direction) -> Self {
        Self {
            request: None,
            direction,
            skipped: None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.request.is_none()
    }

    /// Floor the elevator stops at when this decision is applied.
    #[must_use]
    pub fn stop(&self) -> Option<Floor> {
        self.request.as_ref().map(Request::effective_target)
    }
}

/// Direction forced by a starved request, plus the request skipped for it.
struct Escalation {
    direction: Direction,
    skipped: Option<RequestId>,
}

/// The dispatch policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    starvation_threshold: u32,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            starvation_threshold: DEFAULT_STARVATION_THRESHOLD,
        }
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(starvation_threshold: u32) -> Self {
        Self {
            starvation_threshold,
        }
    }

    #[must_use]
    pub fn starvation_threshold(&self) -> u32 {
        self.starvation_threshold
    }

    /// Decide the next stop and direction.
    ///
    /// `pending` must only contain requests that are unserved and whose
    /// effective target station is in service; maintenance is not checked
    /// here.
    #[must_use]
    pub fn decide(&self, state: &SystemState, pending: &[Request]) -> Decision {
        let Some(current) = state.current_floor else {
            return Decision::idle(state.current_direction);
        };
        if pending.is_empty() {
            return Decision::idle(state.current_direction);
        }

        if let Some((request, direction)) = sweep(current, state.current_direction, pending) {
            return Decision {
                request: Some(request.clone()),
                direction,
                skipped: None,
            };
        }

        let escalation = match self.escalate(current, pending) {
            Some(escalation) => escalation,
            None => match global_direction(state, current, pending) {
                Some(direction) => Escalation {
                    direction,
                    skipped: None,
                },
                None => return Decision::idle(state.current_direction),
            },
        };

        // Nothing originates in the chosen direction: idle, and the
        // escalation's skip is not recorded.
        match nearest_by_origin(current, escalation.direction, pending) {
            Some(request) => Decision {
                request: Some(request.clone()),
                direction: escalation.direction,
                skipped: escalation.skipped,
            },
            None => Decision::idle(state.current_direction),
        }
    }

    fn is_starved(&self, request: &Request) -> bool {
        request.skip_count >= self.starvation_threshold
    }

    fn escalate(&self, current: Floor, pending: &[Request]) -> Option<Escalation> {
        let priority = pending
            .iter()
            .filter(|r| self.is_starved(r))
            .min_by_key(|r| r.created)?;

        let direction = if priority.origin < current {
            Direction::Down
        } else {
            Direction::Up
        };

        let skipped = pending
            .iter()
            .filter(|r| r.id != priority.id && self.is_starved(r))
            .filter(|r| match direction {
                Direction::Down => r.origin > current,
                Direction::Up => r.origin < current,
            })
            .min_by_key(|r| r.created)
            .map(|r| r.id);

        Some(Escalation { direction, skipped })
    }
}

/// SCAN step on effective targets.
fn sweep(
    current: Floor,
    direction: Direction,
    pending: &[Request],
) -> Option<(&Request, Direction)> {
    let above = || {
        pending
            .iter()
            .filter(|r| r.effective_target() > current)
            .min_by_key(|r| (r.effective_target(), r.created))
    };
    let below = || {
        pending
            .iter()
            .filter(|r| r.effective_target() < current)
            .min_by_key(|r| (Reverse(r.effective_target()), r.created))
    };

    match direction {
        Direction::Up => above()
            .map(|r| (r, Direction::Up))
            .or_else(|| below().map(|r| (r, Direction::Down))),
        Direction::Down => below()
            .map(|r| (r, Direction::Down))
            .or_else(|| above().map(|r| (r, Direction::Up))),
    }
}

fn global_direction(
    state: &SystemState,
    current: Floor,
    pending: &[Request],
) -> Option<Direction> {
    if current == Floor::GROUND {
        return Some(Direction::Up);
    }
    if state.is_top(current) {
        return Some(Direction::Down);
    }

    let has_above = pending.iter().any(|r| r.origin > current);
    let has_below = pending.iter().any(|r| r.origin < current);

    match (has_above, has_below) {
        (false, false) => None,
        (true, false) => Some(Direction::Up),
        (false, true) => Some(Direction::Down),
        (true, true) => {
            let up_sweep = state.stations_count.saturating_sub(current.value());
            let down_sweep = current.distance(Floor::GROUND);
            if up_sweep < down_sweep {
                Some(Direction::Up)
            } else {
                Some(Direction::Down)
            }
        }
    }
}

fn nearest_by_origin(
    current: Floor,
    direction: Direction,
    pending: &[Request],
) -> Option<&Request> {
    match direction {
        Direction::Up => pending
            .iter()
            .filter(|r| r.origin > current)
            .min_by_key(|r| (r.origin, r.created)),
        Direction::Down => pending
            .iter()
            .filter(|r| r.origin < current)
            .min_by_key(|r| (Reverse(r.origin), r.created)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SystemId;
    use crate::time::{Timestamp, now};
    use chrono::Duration;

    fn floor(n: u32) -> Floor {
        Floor::new(n).unwrap()
    }

    fn state(current: u32, direction: Direction) -> SystemState {
        SystemState {
            stations_count: 10,
            current_floor: Some(floor(current)),
            current_direction: direction,
        }
    }

    /// Requests created `age` seconds after a common origin of time, so
    /// smaller `age` means older.
    struct Factory {
        system_id: SystemId,
        epoch: Timestamp,
    }

    impl Factory {
        fn new() -> Self {
            Self {
                system_id: SystemId::new(),
                epoch: now(),
            }
        }

        fn call(&self, origin: u32, age: i64) -> Request {
            Request::builder()
                .system_id(self.system_id)
                .origin(floor(origin))
                .created(self.epoch + Duration::seconds(age))
                .build()
                .unwrap()
        }

        fn trip(&self, origin: u32, destination: u32, skip_count: u32, age: i64) -> Request {
            Request::builder()
                .system_id(self.system_id)
                .origin(floor(origin))
                .destination(floor(destination))
                .skip_count(skip_count)
                .created(self.epoch + Duration::seconds(age))
                .build()
                .unwrap()
        }
    }

    fn chosen(decision: &Decision) -> RequestId {
        decision.request.as_ref().expect("a request should be chosen").id
    }

    #[test]
    fn should_stay_idle_without_current_floor() {
        let f = Factory::new();
        let state = SystemState {
            stations_count: 10,
            current_floor: None,
            current_direction: Direction::Down,
        };

        let decision = Dispatcher::default().decide(&state, &[f.call(3, 0)]);

        assert!(decision.is_idle());
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_stay_idle_with_unchanged_direction_when_nothing_pending() {
        let dispatcher = Dispatcher::default();
        for (current, direction) in [
            (1, Direction::Down),
            (10, Direction::Up),
            (5, Direction::Up),
            (5, Direction::Down),
        ] {
            let decision = dispatcher.decide(&state(current, direction), &[]);
            assert!(decision.is_idle());
            assert_eq!(decision.direction, direction);
            assert_eq!(decision.skipped, None);
        }
    }

    #[test]
    fn should_pick_nearest_target_ahead_when_going_up() {
        let f = Factory::new();
        let far = f.call(9, 0);
        let near = f.call(7, 1);
        let behind = f.call(3, 2);

        let decision =
            Dispatcher::default().decide(&state(5, Direction::Up), &[far, near.clone(), behind]);

        assert_eq!(chosen(&decision), near.id);
        assert_eq!(decision.direction, Direction::Up);
        assert_eq!(decision.stop(), Some(floor(7)));
    }

    #[test]
    fn should_pick_nearest_target_ahead_when_going_down() {
        let f = Factory::new();
        let far = f.call(2, 0);
        let near = f.call(4, 1);
        let behind = f.call(8, 2);

        let decision =
            Dispatcher::default().decide(&state(5, Direction::Down), &[far, behind, near.clone()]);

        assert_eq!(chosen(&decision), near.id);
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_reverse_once_towards_nearest_target_behind() {
        let f = Factory::new();
        let nearest_below = f.call(3, 0);
        let lowest = f.call(1, 1);

        let decision = Dispatcher::default()
            .decide(&state(5, Direction::Up), &[lowest, nearest_below.clone()]);

        assert_eq!(chosen(&decision), nearest_below.id);
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_reverse_up_when_nothing_below() {
        let f = Factory::new();
        let highest = f.call(9, 0);
        let nearest_above = f.call(6, 1);

        let decision = Dispatcher::default()
            .decide(&state(5, Direction::Down), &[highest, nearest_above.clone()]);

        assert_eq!(chosen(&decision), nearest_above.id);
        assert_eq!(decision.direction, Direction::Up);
    }

    #[test]
    fn should_sweep_on_destination_for_routed_requests() {
        let f = Factory::new();
        // Picked up below, but headed above the cabin.
        let routed = f.trip(2, 8, 0, 0);
        let behind = f.call(4, 1);

        let decision =
            Dispatcher::default().decide(&state(5, Direction::Up), &[behind, routed.clone()]);

        assert_eq!(chosen(&decision), routed.id);
        assert_eq!(decision.direction, Direction::Up);
        assert_eq!(decision.stop(), Some(floor(8)));
    }

    #[test]
    fn should_prefer_oldest_request_on_same_floor() {
        let f = Factory::new();
        let newer = f.call(7, 5);
        let older = f.call(7, 1);

        let decision =
            Dispatcher::default().decide(&state(5, Direction::Up), &[newer, older.clone()]);

        assert_eq!(chosen(&decision), older.id);
    }

    #[test]
    fn should_serve_calls_in_sweep_order_then_reverse() {
        let f = Factory::new();
        let at_seven = f.call(7, 0);
        let at_three = f.call(3, 1);
        let dispatcher = Dispatcher::default();

        let first = dispatcher.decide(
            &state(5, Direction::Up),
            &[at_seven.clone(), at_three.clone()],
        );
        assert_eq!(chosen(&first), at_seven.id);
        assert_eq!(first.direction, Direction::Up);

        let second = dispatcher.decide(&state(7, first.direction), &[at_three.clone()]);
        assert_eq!(chosen(&second), at_three.id);
        assert_eq!(second.direction, Direction::Down);
    }

    #[test]
    fn should_head_down_to_lone_starved_request() {
        let f = Factory::new();
        let mut starved = f.call(2, 0);
        starved.skip_count = 3;

        let decision = Dispatcher::default().decide(&state(5, Direction::Up), &[starved.clone()]);

        assert_eq!(chosen(&decision), starved.id);
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_escalate_direction_and_skip_opposite_starved_request() {
        let f = Factory::new();
        // Every target is the current floor, so the sweep finds nothing.
        let priority = f.trip(2, 5, 3, 0);
        let opposite = f.trip(8, 5, 4, 1);
        let closer = f.trip(4, 5, 0, 2);

        let decision = Dispatcher::default().decide(
            &state(5, Direction::Up),
            &[opposite.clone(), closer.clone(), priority],
        );

        assert_eq!(decision.direction, Direction::Down);
        // The starved request only chooses the direction.
        assert_eq!(chosen(&decision), closer.id);
        assert_eq!(decision.skipped, Some(opposite.id));
    }

    #[test]
    fn should_escalate_for_oldest_starved_request() {
        let f = Factory::new();
        let newer_below = f.trip(2, 5, 5, 10);
        let older_above = f.trip(8, 5, 3, 0);

        let decision = Dispatcher::default().decide(
            &state(5, Direction::Down),
            &[newer_below.clone(), older_above.clone()],
        );

        assert_eq!(decision.direction, Direction::Up);
        assert_eq!(chosen(&decision), older_above.id);
        assert_eq!(decision.skipped, Some(newer_below.id));
    }

    #[test]
    fn should_not_skip_when_no_starved_request_on_other_side() {
        let f = Factory::new();
        let priority = f.trip(2, 5, 3, 0);
        let fresh_above = f.trip(8, 5, 0, 1);

        let decision = Dispatcher::default()
            .decide(&state(5, Direction::Up), &[priority.clone(), fresh_above]);

        assert_eq!(decision.direction, Direction::Down);
        assert_eq!(chosen(&decision), priority.id);
        assert_eq!(decision.skipped, None);
    }

    #[test]
    fn should_stay_idle_without_skip_when_escalated_direction_is_empty() {
        let f = Factory::new();
        // The oldest starved request waits at the current floor, which
        // points the escalation up, where no request originates.
        let mut here = f.call(5, 0);
        here.skip_count = 3;
        let below = f.trip(2, 5, 3, 1);

        let decision = Dispatcher::default().decide(&state(5, Direction::Down), &[here, below]);

        assert!(decision.is_idle());
        assert_eq!(decision.direction, Direction::Down);
        assert_eq!(decision.skipped, None);
    }

    #[test]
    fn should_honour_custom_starvation_threshold() {
        let f = Factory::new();
        // Both sides have requests; from floor 8 the top is closer.
        let below = f.trip(2, 8, 3, 0);
        let above = f.trip(9, 8, 0, 1);
        let pending = [below.clone(), above.clone()];
        let at_eight = state(8, Direction::Down);

        let strict = Dispatcher::new(3).decide(&at_eight, &pending);
        assert_eq!(chosen(&strict), below.id);
        assert_eq!(strict.direction, Direction::Down);

        let lenient = Dispatcher::new(5).decide(&at_eight, &pending);
        assert_eq!(chosen(&lenient), above.id);
        assert_eq!(lenient.direction, Direction::Up);
    }

    #[test]
    fn should_go_up_from_ground_floor() {
        let f = Factory::new();
        let coming_down = f.trip(4, 1, 0, 0);

        let decision =
            Dispatcher::default().decide(&state(1, Direction::Down), &[coming_down.clone()]);

        assert_eq!(chosen(&decision), coming_down.id);
        assert_eq!(decision.direction, Direction::Up);
    }

    #[test]
    fn should_go_down_from_top_floor() {
        let f = Factory::new();
        let coming_up = f.trip(3, 10, 0, 0);

        let decision = Dispatcher::default().decide(&state(10, Direction::Up), &[coming_up.clone()]);

        assert_eq!(chosen(&decision), coming_up.id);
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_head_to_only_side_with_requests() {
        let f = Factory::new();
        let below = f.trip(3, 5, 0, 0);

        let decision = Dispatcher::default().decide(&state(5, Direction::Up), &[below.clone()]);

        assert_eq!(chosen(&decision), below.id);
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_prefer_shorter_sweep_when_both_sides_have_requests() {
        let f = Factory::new();
        let above = f.trip(9, 8, 0, 0);
        let below = f.trip(2, 8, 0, 1);

        let decision =
            Dispatcher::default().decide(&state(8, Direction::Down), &[below, above.clone()]);

        assert_eq!(chosen(&decision), above.id);
        assert_eq!(decision.direction, Direction::Up);
    }

    #[test]
    fn should_break_equal_sweeps_towards_down() {
        let f = Factory::new();
        let above = f.trip(6, 5, 0, 0);
        let below = f.trip(3, 5, 0, 1);
        let nine_floors = SystemState {
            stations_count: 9,
            current_floor: Some(floor(5)),
            current_direction: Direction::Up,
        };

        let decision = Dispatcher::default().decide(&nine_floors, &[above, below.clone()]);

        assert_eq!(chosen(&decision), below.id);
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_stay_idle_when_only_requests_are_at_current_floor() {
        let f = Factory::new();
        let here = f.call(5, 0);

        let decision = Dispatcher::default().decide(&state(5, Direction::Down), &[here]);

        assert!(decision.is_idle());
        assert_eq!(decision.direction, Direction::Down);
    }

    #[test]
    fn should_decide_identically_on_unchanged_snapshot() {
        let f = Factory::new();
        let pending = [
            f.trip(2, 5, 3, 0),
            f.trip(8, 5, 3, 1),
            f.call(5, 2),
            f.trip(6, 5, 0, 3),
        ];
        let snapshot = state(5, Direction::Up);
        let dispatcher = Dispatcher::default();

        let first = dispatcher.decide(&snapshot, &pending);
        let second = dispatcher.decide(&snapshot, &pending);

        assert_eq!(first, second);
    }
}
