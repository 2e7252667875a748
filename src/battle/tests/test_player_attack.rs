#[cfg(test)]
mod tests {
    use crate::battle::engine::execute_player_attack;
    use crate::battle::state::{BattleEvent, BattleRng, EventBus, Outcome, Side};
    use crate::battle::damage::Effectiveness;
    use crate::battle::tests::common::{constant_rng, create_test_session, mixed_roster, water_roster};
    use pretty_assertions::assert_eq;

    #[test]
    fn water_attack_on_charizard_with_roll_twenty_deals_forty() {
        let mut session = create_test_session(water_roster());
        let mut bus = EventBus::new();
        let mut rng = BattleRng::new_for_test(vec![20]);

        assert_eq!(session.enemy_active.name(), "charizard");
        execute_player_attack(&mut session, &mut bus, &mut rng).unwrap();

        assert_eq!(session.enemy_active.current_health(), 60);
        assert_eq!(
            bus.events(),
            &[BattleEvent::AttackLanded {
                side: Side::Player,
                attacker: "squirtle".to_string(),
                defender: "charizard".to_string(),
                damage: 40,
                effectiveness: Effectiveness::SuperEffective,
                remaining_health: 60,
            }]
        );
        assert_eq!(session.narration(), vec!["You attacked for 40 damage! Super effective!".to_string()]);
        assert!(session.awaiting_ai);
        assert_eq!(session.outcome, Outcome::Undetermined);
    }

    #[test]
    fn neutral_attack_has_no_label() {
        // eevee (normal) against charizard
        let mut session = create_test_session(mixed_roster());
        session.player_active = crate::combatant::ActiveCombatant::activate(session.player_roster.pokemon[4].clone());
        session.player_index = 4;
        let mut bus = EventBus::new();
        let mut rng = BattleRng::new_for_test(vec![33]);

        execute_player_attack(&mut session, &mut bus, &mut rng).unwrap();

        assert_eq!(session.narration(), vec!["You attacked for 33 damage!".to_string()]);
        assert_eq!(session.enemy_active.current_health(), 67);
    }

    #[test]
    fn fainted_enemy_is_replaced_by_the_next_entry() {
        let mut session = create_test_session(water_roster());
        let mut bus = EventBus::new();
        let mut rng = constant_rng(50);

        // 50 * 2 = 100 against charizard
        execute_player_attack(&mut session, &mut bus, &mut rng).unwrap();

        bus.print_debug_with_message("Events for fainted_enemy_is_replaced_by_the_next_entry:");
        assert_eq!(session.enemy_index, 1);
        assert_eq!(session.enemy_active.name(), "venusaur");
        assert_eq!(session.enemy_active.current_health(), 100);
        assert!(session.enemy_fainted[0]);
        assert_eq!(
            session.narration(),
            vec![
                "You attacked for 100 damage! Super effective!".to_string(),
                "Enemy charizard fainted! Enemy switched to venusaur!".to_string(),
            ]
        );
        assert!(session.awaiting_ai, "the new enemy still responds");
    }

    #[test]
    fn defeating_the_last_enemy_wins_without_scheduling_a_response() {
        let mut session = create_test_session(water_roster());
        session.enemy_index = 4;
        session.enemy_active = crate::combatant::ActiveCombatant::activate(session.enemy_roster[4].clone());
        session.enemy_active.set_health(10);
        let mut bus = EventBus::new();
        let mut rng = constant_rng(20);

        execute_player_attack(&mut session, &mut bus, &mut rng).unwrap();

        assert_eq!(session.outcome, Outcome::PlayerWin);
        assert!(!session.awaiting_ai);
        assert_eq!(session.enemy_active.current_health(), 0);
        assert_eq!(
            bus.formatted(),
            vec![
                "You attacked for 40 damage! Super effective!".to_string(),
                "You won the battle!".to_string(),
            ]
        );
    }
}
