//! Single-phase combat.
//!
//! Orders strike groups by speed, pairs every live striking archetype with
//! every live enemy archetype, and applies the resulting casualties.

use rand::Rng;

use crate::army::{BattleState, PieceArchetype, PieceType, Side, ALL_PIECE_TYPES, PIECE_TYPE_COUNT};
use crate::config::ResolutionMode;
use crate::protocol::Salvo;

/// All live units of one archetype on one side, striking together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeGroup {
    pub side: Side,
    pub piece: PieceType,
}

impl StrikeGroup {
    fn speed(&self) -> f64 {
        self.piece.archetype().speed
    }
}

/// Share of a striker's kill rate delivered in one phase against a target.
///
/// `2 * s_striker / (s_striker + s_target)`: 1.0 between equal speeds,
/// rising towards 2.0 as the striker outpaces the target.
pub fn phase_factor(striker: &PieceArchetype, target: &PieceArchetype) -> f64 {
    2.0 * striker.speed / (striker.speed + target.speed)
}

/// Computes one salvo from `count` strikers against `target_count` targets.
///
/// Kills are the floor of the expected hits, clamped to the targets present.
/// A non-zero fractional remainder against a surviving group counts as one
/// wound; wounds are informational and carry no state between phases.
pub fn compute_salvo(
    group: StrikeGroup,
    count: u32,
    target: PieceType,
    target_count: u32,
) -> Salvo {
    let striker = group.piece.archetype();
    let hits = count as f64 * striker.kill_rate() * phase_factor(striker, target.archetype());
    let whole = hits.floor();
    let kills = (whole as u64).min(target_count as u64);
    let wounds = if kills < target_count as u64 && hits > whole {
        1
    } else {
        0
    };

    Salvo {
        striker_side: group.side,
        striker: group.piece,
        target_side: group.side.opponent(),
        target,
        kills,
        wounds,
    }
}

/// Orders the live strike groups of both sides for one phase.
///
/// The initiative side's groups are listed first, then a stable sort puts
/// faster archetypes ahead. Equal speeds only occur when both sides field
/// the same archetype. In simultaneous mode each such pair is swapped on a
/// fresh coin flip. In staggered mode the initiative side keeps the first
/// shot.
pub fn strike_order<R: Rng>(
    state: &BattleState,
    initiative: Side,
    mode: ResolutionMode,
    rng: &mut R,
) -> Vec<StrikeGroup> {
    let mut groups: Vec<StrikeGroup> = Vec::with_capacity(2 * PIECE_TYPE_COUNT);
    for side in [initiative, initiative.opponent()] {
        for (piece, _) in state.troup(side).alive() {
            groups.push(StrikeGroup { side, piece });
        }
    }

    groups.sort_by(|a, b| b.speed().total_cmp(&a.speed()));
    if mode == ResolutionMode::Staggered {
        return groups;
    }

    for i in 1..groups.len() {
        if groups[i - 1].speed() == groups[i].speed() && rng.gen_bool(0.5) {
            groups.swap(i - 1, i);
        }
    }

    groups
}

const fn side_slot(side: Side) -> usize {
    match side {
        Side::Attacker => 0,
        Side::Defender => 1,
    }
}

/// Runs one phase, mutating `state` in place and returning the salvos fired.
///
/// In simultaneous mode every salvo is computed from the pre-phase snapshot
/// and losses are applied together at the end. In staggered mode each salvo
/// is applied as soon as it is fired.
pub fn run_phase<R: Rng>(
    state: &mut BattleState,
    initiative: Side,
    mode: ResolutionMode,
    rng: &mut R,
) -> Vec<Salvo> {
    let snapshot = *state;
    let order = strike_order(&snapshot, initiative, mode, rng);
    let mut losses = [[0u64; PIECE_TYPE_COUNT]; 2];
    let mut salvos = Vec::new();

    for group in order {
        let view = match mode {
            ResolutionMode::Simultaneous => snapshot,
            ResolutionMode::Staggered => *state,
        };
        let count = view.troup(group.side).count(group.piece);
        if count == 0 {
            continue;
        }

        let target_side = group.side.opponent();
        for (target, target_count) in view.troup(target_side).alive() {
            let salvo = compute_salvo(group, count, target, target_count);
            tracing::trace!(
                striker = group.piece.label(),
                target = target.label(),
                kills = salvo.kills,
                wounds = salvo.wounds,
                "salvo fired"
            );
            match mode {
                ResolutionMode::Simultaneous => {
                    let slot = &mut losses[side_slot(target_side)][target.index()];
                    *slot = slot.saturating_add(salvo.kills);
                }
                ResolutionMode::Staggered => {
                    state.troup_mut(target_side).remove(target, salvo.kills);
                }
            }
            salvos.push(salvo);
        }
    }

    if mode == ResolutionMode::Simultaneous {
        for side in [Side::Attacker, Side::Defender] {
            let troup = state.troup_mut(side);
            for (idx, &lost) in losses[side_slot(side)].iter().enumerate() {
                if lost > 0 {
                    troup.remove(ALL_PIECE_TYPES[idx], lost);
                }
            }
        }
    }

    salvos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::Troup;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn one(pt: PieceType, n: u32) -> Troup {
        let mut t = Troup::empty();
        t.set_count(pt, n);
        t
    }

    #[test]
    fn phase_factor_is_one_for_equal_speed() {
        let p1 = PieceType::P1.archetype();
        assert!((phase_factor(p1, p1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn phase_factor_grows_with_striker_speed() {
        let target = PieceType::P1.archetype();
        let slow = PieceType::P5.archetype();
        let fast = PieceType::P6.archetype();
        assert!(phase_factor(fast, target) > phase_factor(slow, target));
        assert!(phase_factor(fast, target) < 2.0);
    }

    #[test]
    fn salvo_clamps_kills_to_targets_present() {
        let group = StrikeGroup { side: Side::Attacker, piece: PieceType::P5 };
        let salvo = compute_salvo(group, 1, PieceType::P5, 1);
        assert_eq!(salvo.kills, 1);
        assert_eq!(salvo.wounds, 0);
        assert_eq!(salvo.target_side, Side::Defender);
    }

    #[test]
    fn salvo_below_one_kill_wounds() {
        let group = StrikeGroup { side: Side::Defender, piece: PieceType::P1 };
        let salvo = compute_salvo(group, 1, PieceType::P1, 1);
        assert_eq!(salvo.kills, 0);
        assert_eq!(salvo.wounds, 1);
    }

    #[test]
    fn salvo_kills_floor_expected_hits() {
        // 10 P5 against P5: 10 * 2.25 * 1.0 = 22.5
        let group = StrikeGroup { side: Side::Attacker, piece: PieceType::P5 };
        let salvo = compute_salvo(group, 10, PieceType::P5, 100);
        assert_eq!(salvo.kills, 22);
        assert_eq!(salvo.wounds, 1);
    }

    #[test]
    fn strike_order_puts_faster_archetypes_first() {
        let state = BattleState::new(one(PieceType::P5, 1), one(PieceType::P6, 1));
        let mut rng = SmallRng::seed_from_u64(7);
        let order = strike_order(&state, Side::Attacker, ResolutionMode::Simultaneous, &mut rng);
        assert_eq!(
            order,
            vec![
                StrikeGroup { side: Side::Defender, piece: PieceType::P6 },
                StrikeGroup { side: Side::Attacker, piece: PieceType::P5 },
            ]
        );
    }

    #[test]
    fn strike_order_coin_flips_equal_speeds() {
        let state = BattleState::new(one(PieceType::P3, 1), one(PieceType::P3, 1));
        let mut attacker_first = 0;
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let order = strike_order(&state, Side::Attacker, ResolutionMode::Simultaneous, &mut rng);
            assert_eq!(order.len(), 2);
            if order[0].side == Side::Attacker {
                attacker_first += 1;
            }
        }
        assert!(attacker_first > 50 && attacker_first < 150, "got {}", attacker_first);
    }

    #[test]
    fn staggered_strike_order_gives_initiative_the_tie() {
        let state = BattleState::new(one(PieceType::P3, 1), one(PieceType::P3, 1));
        let mut rng = SmallRng::seed_from_u64(11);
        for initiative in [Side::Attacker, Side::Defender] {
            for _ in 0..50 {
                let order = strike_order(&state, initiative, ResolutionMode::Staggered, &mut rng);
                assert_eq!(order[0].side, initiative);
                assert_eq!(order[1].side, initiative.opponent());
            }
        }
    }

    #[test]
    fn simultaneous_phase_uses_pre_phase_counts() {
        let mut state = BattleState::new(one(PieceType::P5, 1), one(PieceType::P5, 1));
        let mut rng = SmallRng::seed_from_u64(1);
        let salvos = run_phase(&mut state, Side::Attacker, ResolutionMode::Simultaneous, &mut rng);
        assert_eq!(salvos.len(), 2);
        assert!(state.attacker.is_annihilated());
        assert!(state.defender.is_annihilated());
    }

    #[test]
    fn staggered_phase_lets_first_striker_silence_target() {
        // P6 (speed 98) fires before P5 (speed 80) and kills it outright.
        let mut state = BattleState::new(one(PieceType::P6, 1), one(PieceType::P5, 1));
        let mut rng = SmallRng::seed_from_u64(1);
        let salvos = run_phase(&mut state, Side::Defender, ResolutionMode::Staggered, &mut rng);
        assert_eq!(salvos.len(), 1);
        assert_eq!(salvos[0].striker, PieceType::P6);
        assert_eq!(state.attacker.count(PieceType::P6), 1);
        assert!(state.defender.is_annihilated());
    }

    #[test]
    fn phase_never_creates_units() {
        let before = BattleState::new(
            Troup::new([995, 20, 600, 400, 30, 0, 60, 20]),
            Troup::new([10, 200, 6, 40, 300, 7, 6, 2]),
        );
        let mut after = before;
        let mut rng = SmallRng::seed_from_u64(3);
        run_phase(&mut after, Side::Attacker, ResolutionMode::Simultaneous, &mut rng);
        for i in 0..PIECE_TYPE_COUNT {
            assert!(after.attacker.counts[i] <= before.attacker.counts[i]);
            assert!(after.defender.counts[i] <= before.defender.counts[i]);
        }
    }
}
