#[cfg(test)]
mod tests {
    use crate::battle::ai::ThresholdAI;
    use crate::battle::engine::{execute_ai_turn, execute_player_attack, execute_player_switch};
    use crate::battle::state::{BattleRng, BattleSession, EventBus, Outcome};
    use crate::battle::tests::common::{constant_rng, create_test_session, mixed_roster, water_roster};
    use pretty_assertions::assert_eq;

    fn won_session() -> BattleSession {
        let mut session = create_test_session(water_roster());
        session.enemy_index = 4;
        session.enemy_active = crate::combatant::ActiveCombatant::activate(session.enemy_roster[4].clone());
        session.enemy_active.set_health(1);
        let mut bus = EventBus::new();
        execute_player_attack(&mut session, &mut bus, &mut constant_rng(20)).unwrap();
        assert_eq!(session.outcome, Outcome::PlayerWin);
        session
    }

    #[test]
    fn actions_on_a_finished_battle_leave_it_unchanged() {
        let mut session = won_session();
        let log_len = session.log.len();
        let player_health = session.player_active.current_health();
        let enemy_health = session.enemy_active.current_health();
        let player_index = session.player_index;
        let mut bus = EventBus::new();
        let mut rng = constant_rng(50);

        assert_eq!(execute_player_attack(&mut session, &mut bus, &mut rng), Ok(()));
        assert_eq!(execute_player_switch(&mut session, 3, &mut bus), Ok(()));
        execute_ai_turn(&mut session, &ThresholdAI::new(), &mut bus, &mut rng);

        assert!(bus.is_empty());
        assert_eq!(session.log.len(), log_len);
        assert_eq!(session.player_active.current_health(), player_health);
        assert_eq!(session.enemy_active.current_health(), enemy_health);
        assert_eq!(session.player_index, player_index);
        assert_eq!(session.outcome, Outcome::PlayerWin);
    }

    /// Plays attack/response pairs until the battle ends, checking health
    /// invariants after every transition. Returns the number of rounds.
    fn play_out(mut session: BattleSession, mut rng: BattleRng) -> (Outcome, usize) {
        let ai = ThresholdAI::new();
        let mut rounds = 0;

        while !session.is_terminal() {
            rounds += 1;
            assert!(rounds <= 100, "battle did not terminate");

            let (player_before, enemy_before) = (session.player_index, session.enemy_index);
            let (player_hp, enemy_hp) = (
                session.player_active.current_health(),
                session.enemy_active.current_health(),
            );

            let mut bus = EventBus::new();
            execute_player_attack(&mut session, &mut bus, &mut rng).unwrap();
            if session.enemy_index == enemy_before && !session.is_terminal() {
                assert!(session.enemy_active.current_health() < enemy_hp);
            }

            execute_ai_turn(&mut session, &ai, &mut bus, &mut rng);
            if session.player_index == player_before {
                assert!(session.player_active.current_health() <= player_hp);
            }
            assert!(session.player_active.current_health() <= 100);
            assert!(session.enemy_active.current_health() <= 100);
        }

        (session.outcome, rounds)
    }

    #[test]
    fn seeded_battles_always_reach_an_outcome() {
        for seed in 0..200 {
            let session = create_test_session(mixed_roster());
            let (outcome, _) = play_out(session, BattleRng::seeded(seed));
            assert!(outcome.is_terminal(), "seed {} ended undetermined", seed);
        }
    }

    #[test]
    fn strong_matchup_wins_in_bounded_rounds() {
        // water against the fixed draw with maximum rolls; charizard and rhydon fall in one hit
        let session = create_test_session(water_roster());
        let (outcome, rounds) = play_out(session, constant_rng(50));
        assert_eq!(outcome, Outcome::PlayerWin);
        assert!(rounds <= 15, "took {} rounds", rounds);
    }
}
