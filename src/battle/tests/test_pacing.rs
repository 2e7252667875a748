#[cfg(test)]
mod tests {
    use crate::battle::pacing::PacedBattle;
    use crate::battle::runner::{ArenaPhase, BattleRunner};
    use crate::battle::tests::common::{constant_rng, fixed_enemy_roster, mixed_roster, water_roster};
    use crate::errors::{ActionError, ArenaError};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(1000);

    async fn paced_battle() -> PacedBattle {
        let mut paced = PacedBattle::new(BattleRunner::with_rng(constant_rng(20)), DELAY);
        paced.start_battle_against(water_roster(), fixed_enemy_roster()).await.unwrap();
        paced
    }

    #[tokio::test(start_paused = true)]
    async fn enemy_responds_only_after_the_delay() {
        let mut paced = paced_battle().await;

        let attack = paced.player_attack().await.unwrap();
        assert!(attack.awaiting_ai);
        assert!(paced.has_pending_turn());

        tokio::time::sleep(DELAY / 2).await;
        let info = paced.battle_info().await.unwrap();
        assert!(info.awaiting_ai);
        assert_eq!(info.player.active.current_health, Some(100));

        let response = paced.settle().await.unwrap();
        assert_eq!(response.narration(), vec!["Enemy attacked for 10 damage! Not very effective...".to_string()]);

        let info = paced.battle_info().await.unwrap();
        assert!(!info.awaiting_ai);
        assert_eq!(info.player.active.current_health, Some(90));
    }

    #[tokio::test(start_paused = true)]
    async fn second_action_during_the_delay_is_rejected() {
        let mut paced = paced_battle().await;
        paced.player_attack().await.unwrap();

        let err = paced.switch_pokemon(1).await.unwrap_err();
        assert!(matches!(err, ArenaError::Action(ActionError::AwaitingOpponent)));

        paced.settle().await;
        let switched = paced.switch_pokemon(1).await.unwrap();
        assert_eq!(switched.narration(), vec!["You switched to psyduck!".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_the_pending_response() {
        let mut paced = paced_battle().await;
        paced.player_attack().await.unwrap();

        paced.reset_battle().await;
        tokio::time::sleep(DELAY * 2).await;

        assert!(paced.settle().await.is_none());
        assert!(paced.battle_info().await.is_none());
        assert_eq!(paced.runner().lock().await.phase(), ArenaPhase::Select);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_leaves_the_new_battle_untouched() {
        let mut paced = paced_battle().await;
        paced.player_attack().await.unwrap();

        paced.start_battle_against(mixed_roster(), fixed_enemy_roster()).await.unwrap();
        tokio::time::sleep(DELAY * 2).await;

        let info = paced.battle_info().await.unwrap();
        assert!(info.log.is_empty());
        assert_eq!(info.player.active.name, "bulbasaur");
        assert_eq!(info.player.active.current_health, Some(100));
    }

    #[tokio::test(start_paused = true)]
    async fn winning_blow_schedules_nothing() {
        let mut paced = PacedBattle::new(BattleRunner::with_rng(constant_rng(50)), DELAY);
        paced
            .start_battle_against(water_roster(), vec![fixed_enemy_roster().remove(0)])
            .await
            .unwrap();

        let result = paced.player_attack().await.unwrap();

        assert!(result.battle_ended());
        assert!(!paced.has_pending_turn());
        assert!(paced.settle().await.is_none());
    }
}
