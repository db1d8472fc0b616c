#[cfg(test)]
mod tests {
    use crate::*;
    use std::sync::Arc;
    use winger_event_system::{
        Actor, ActorContext, ActorId, Behavior, DirectiveOutbox, Lifecycle, PlayerId, ReplicationSession,
        Role, Transform, Vec3,
    };

    const DT: f64 = 0.05;

    /// Drives a boss behavior directly, without an actor or a session.
    struct Harness {
        id: ActorId,
        role: Role,
        boss: BossBehavior,
        transform: Transform,
        outbox: DirectiveOutbox,
    }

    impl Harness {
        fn new(boss: BossBehavior, role: Role, position: Vec3) -> Self {
            let id = ActorId::new();
            Self {
                id,
                role,
                boss,
                transform: Transform::at(position),
                outbox: DirectiveOutbox::new(id, role),
            }
        }

        fn authority(boss: BossBehavior) -> Self {
            Self::new(boss, Role::Authority, Vec3::zero())
        }

        fn enter(&mut self, now: f64) {
            let mut ctx = ActorContext::new(self.id, self.role, &mut self.transform, &mut self.outbox);
            self.boss.on_enter_combat(&mut ctx, now).unwrap();
        }

        fn tick(&mut self, now: f64) {
            let mut ctx = ActorContext::new(self.id, self.role, &mut self.transform, &mut self.outbox);
            self.boss.on_tick(&mut ctx, DT, now).unwrap();
        }

        fn issue(&mut self, directive: BossDirective, now: f64) {
            let mut ctx = ActorContext::new(self.id, self.role, &mut self.transform, &mut self.outbox);
            self.boss.issue(&mut ctx, directive, now).unwrap();
        }

        fn published(&mut self) -> Vec<String> {
            self.outbox.drain().into_iter().map(|e| e.name).collect()
        }
    }

    /// Moves a fixed distance toward the target every step.
    struct FixedStep(f64);

    impl MotionSmoother for FixedStep {
        fn step(
            &self,
            current: Vec3,
            target: Vec3,
            _velocity: &mut Vec3,
            _smooth_time: f64,
            _max_speed: f64,
            _delta: f64,
        ) -> Vec3 {
            current + (target - current).clamp_length(self.0)
        }
    }

    fn seeded(seed: u64) -> BossBehaviorBuilder {
        BossBehavior::builder(BossConfig::default()).seed(Some(seed))
    }

    fn roster(count: usize) -> (SceneRoster, Vec<Arc<ScenePlayer>>) {
        let players: Vec<Arc<ScenePlayer>> = (0..count)
            .map(|i| ScenePlayer::new(PlayerId::new(), Vec3::new(i as f64 * 4.0, 0.0, 10.0)))
            .collect();
        (SceneRoster::new(players.clone()), players)
    }

    fn pool(capacity: usize) -> MissileSpawnFacade {
        let mut facade = MissileSpawnFacade::new();
        facade.register(Box::new(MissilePool::new("chase", capacity, 4.0)));
        facade
    }

    fn pool_launches(boss: &BossBehavior) -> Vec<MissileLaunch> {
        boss.missiles()
            .source(0)
            .map(|source| source.launches().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_enter_combat_anchors_at_current_position() {
        let mut h = Harness::new(seeded(1).build(), Role::Authority, Vec3::new(1.0, 2.0, 3.0));
        h.enter(0.0);

        let state = h.boss.state();
        assert_eq!(state.phase(), BattlePhase::Firing);
        assert_eq!(*state.move_start_position.get(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(state.fire_remaining, 3);
        assert_eq!(state.fire_rotation.get().z, -30.0);
        assert!(!state.special_attack);
        assert!(h.published().is_empty());
    }

    #[test]
    fn test_set_battle_move_targets_half_height_from_anchor() {
        let mut h = Harness::new(seeded(1).build(), Role::Authority, Vec3::new(0.0, 2.0, 0.0));
        h.enter(0.0);
        h.issue(
            BossDirective::SetBattleMove {
                half_pingpong_height: 5.0,
                move_length: 20.0,
            },
            0.5,
        );

        let state = h.boss.state();
        assert_eq!(state.phase(), BattlePhase::Moving);
        assert_eq!(*state.move_target.get(), Vec3::new(0.0, 7.0, 0.0));
        assert_eq!(*state.move_remaining_distance.get(), 20.0);
        assert_eq!(state.current_speed, 0.0);
        assert_eq!(h.boss.stats().legs_started, 1);
        assert_eq!(h.published(), vec!["set_battle_move"]);
    }

    #[test]
    fn test_leg_ends_once_remaining_distance_is_used_up() {
        let boss = seeded(1).smoother(Box::new(FixedStep(3.0))).build();
        let mut h = Harness::authority(boss);
        h.enter(0.0);
        h.boss.state.fire_remaining = 0;
        h.issue(
            BossDirective::SetBattleMove {
                half_pingpong_height: 5.0,
                move_length: 2.0,
            },
            0.5,
        );
        h.published();
        let special_before = h.boss.state().special_attack;

        h.tick(1.0);

        let state = h.boss.state();
        assert!((*state.move_remaining_distance.get() + 1.0).abs() < 1e-9);
        assert_eq!(state.phase(), BattlePhase::Firing);
        assert_eq!(state.fire_remaining, 3);
        assert_ne!(state.special_attack, special_before);
        assert_eq!(h.published(), vec!["set_battle_fire"]);
    }

    #[test]
    fn test_firing_waits_for_action_interval() {
        let mut h = Harness::authority(seeded(1).build());
        h.enter(0.0);

        h.tick(1.0);
        assert_eq!(h.boss.state().fire_remaining, 3);
        assert!(h.published().is_empty());

        h.tick(1.05);
        assert_eq!(h.boss.state().fire_remaining, 2);
        assert_eq!(h.boss.stats().shots_fired, 1);
        assert_eq!(h.boss.weapon().shots_fired(), 1);
        assert_eq!(h.boss.state().fire_rotation.get().z, -15.0);
        assert_eq!(h.published(), vec!["rotate_fire_origin"]);
    }

    #[test]
    fn test_exhausted_burst_starts_a_leg_on_the_next_action() {
        let mut h = Harness::authority(seeded(5).build());
        h.enter(0.0);

        for now in [1.05, 2.1, 3.15] {
            h.tick(now);
        }
        assert_eq!(h.boss.state().fire_remaining, 0);
        assert_eq!(h.boss.stats().bursts_completed, 1);
        assert_eq!(h.boss.phase(), BattlePhase::Firing);
        h.published();

        h.tick(4.2);
        let state = h.boss.state();
        assert_eq!(state.phase(), BattlePhase::Moving);
        let offset = state.move_target.get().y - state.move_start_position.get().y;
        assert!(offset == 5.0 || offset == -5.0);
        let length = *state.move_remaining_distance.get();
        assert!((10.0..=30.0).contains(&length));
        assert_eq!(h.published(), vec!["set_battle_move"]);
    }

    #[test]
    fn test_authority_cycle_alternates_phases() {
        let mut h = Harness::authority(seeded(11).build());
        h.enter(0.0);

        let mut transitions = Vec::new();
        let mut last_remaining = f64::INFINITY;
        for i in 1..=6000 {
            let now = i as f64 * DT;
            let special_before = h.boss.state().special_attack;
            h.tick(now);

            let published = h.published();
            let state = h.boss.state();
            for name in &published {
                match name.as_str() {
                    "set_battle_move" => {
                        assert_eq!(state.fire_remaining, 0);
                        assert_eq!(state.special_attack, special_before);
                        transitions.push("move");
                        last_remaining = *state.move_remaining_distance.get();
                    }
                    "set_battle_fire" => {
                        assert_eq!(state.fire_remaining, 3);
                        assert_ne!(state.special_attack, special_before);
                        transitions.push("fire");
                    }
                    "rotate_fire_origin" | "change_battle_move_target" => {}
                    other => panic!("unexpected directive {other}"),
                }
            }

            if state.phase() == BattlePhase::Moving {
                let remaining = *state.move_remaining_distance.get();
                assert!(remaining <= last_remaining);
                last_remaining = remaining;
            }
        }

        assert!(transitions.len() >= 10, "only {} transitions", transitions.len());
        for (i, kind) in transitions.iter().enumerate() {
            let expected = if i % 2 == 0 { "move" } else { "fire" };
            assert_eq!(*kind, expected, "transition #{i}");
        }
        assert!(h.boss.stats().bounces > 0);
    }

    #[test]
    fn test_chase_burst_without_players_skips_but_counts_down() {
        let mut h = Harness::authority(seeded(1).missiles(pool(4)).build());
        h.enter(0.0);
        h.boss.state.special_attack = true;

        h.tick(1.05);

        assert_eq!(h.boss.state().fire_remaining, 2);
        assert_eq!(h.boss.stats().chase_skipped, 1);
        assert_eq!(h.boss.stats().missiles_launched, 0);
        assert_eq!(h.boss.stats().shots_fired, 0);
        assert!(pool_launches(&h.boss).is_empty());
        let pool = h.boss.missiles().source(0).unwrap().as_any();
        let pool = pool.downcast_ref::<MissilePool>().unwrap();
        assert_eq!(pool.available(), pool.capacity());
        assert!(h.published().is_empty());
    }

    #[test]
    fn test_chase_launches_from_slot_matching_shots_left() {
        let (scene, players) = roster(2);
        let boss = seeded(3).scene(Box::new(scene)).missiles(pool(8)).build();
        let mut h = Harness::new(boss, Role::Authority, Vec3::new(0.0, 10.0, 0.0));
        h.enter(0.0);
        h.boss.state.special_attack = true;

        h.tick(1.05);

        let launches = pool_launches(&h.boss);
        assert_eq!(launches.len(), 1);
        let launch = &launches[0];
        let slot = h.boss.config().missiles.slots[2];
        assert_eq!(launch.position, Vec3::new(0.0, 10.0, 0.0) + slot.position);
        assert_eq!(launch.spawner, h.id);
        assert!(players.iter().any(|p| p.id() == launch.target));
        assert_eq!(launch.speed, h.boss.config().missiles.speed);
        assert_eq!(h.boss.stats().missiles_launched, 1);
        assert_eq!(h.boss.state().fire_rotation.get().z, -30.0);
    }

    #[test]
    fn test_chase_only_targets_alive_players() {
        let (scene, players) = roster(3);
        players[0].kill();
        players[2].kill();
        let boss = seeded(8).scene(Box::new(scene)).missiles(pool(8)).build();
        let mut h = Harness::authority(boss);
        h.enter(0.0);
        h.boss.state.special_attack = true;

        for now in [1.05, 2.1, 3.15] {
            h.tick(now);
        }

        let launches = pool_launches(&h.boss);
        assert_eq!(launches.len(), 3);
        assert!(launches.iter().all(|l| l.target == players[1].id()));
    }

    #[test]
    fn test_exhausted_pool_skips_the_action() {
        let (scene, _players) = roster(1);
        let boss = seeded(2).scene(Box::new(scene)).missiles(pool(1)).build();
        let mut h = Harness::authority(boss);
        h.enter(0.0);
        h.boss.state.special_attack = true;

        h.tick(1.05);
        h.tick(2.1);

        assert_eq!(h.boss.stats().missiles_launched, 1);
        assert_eq!(h.boss.stats().chase_skipped, 1);
        assert_eq!(h.boss.state().fire_remaining, 1);
    }

    #[test]
    fn test_observer_counts_down_without_deciding() {
        let mut h = Harness::new(seeded(1).build(), Role::Observer, Vec3::zero());
        h.enter(0.0);

        for now in [1.05, 2.1, 3.15, 4.2, 5.25] {
            h.tick(now);
        }

        let state = h.boss.state();
        assert_eq!(state.fire_remaining, 0);
        assert_eq!(state.phase(), BattlePhase::Firing);
        assert_eq!(h.boss.stats().shots_fired, 0);
        assert_eq!(h.boss.weapon().shots_fired(), 0);
        assert!(h.published().is_empty());
    }

    fn session(observers: usize, seed: u64, config: BossConfig) -> ReplicationSession {
        let id = ActorId::new();
        let spawn = Transform::at(Vec3::new(0.0, 8.0, 0.0));
        let make = |role: Role, seed: u64| {
            let boss = BossBehavior::builder(config.clone()).seed(Some(seed)).build();
            Actor::new(id, role, spawn, Box::new(boss))
        };

        let authority = make(Role::Authority, seed);
        let copies = (0..observers)
            .map(|i| make(Role::Observer, seed + 100 + i as u64))
            .collect();
        ReplicationSession::new(authority, copies).unwrap()
    }

    fn boss_of(actor: &Actor) -> &BossBehavior {
        actor.behavior_as::<BossBehavior>().unwrap()
    }

    #[test]
    fn test_observers_follow_the_authority_cycle() {
        let mut session = session(2, 3, BossConfig::default());
        session.enter_combat(0.0);

        for i in 1..=6000 {
            session.step(DT, i as f64 * DT);

            let authority = boss_of(session.authority());
            for observer in session.observers() {
                let copy = boss_of(observer);
                let (a, o) = (authority.state(), copy.state());
                assert_eq!(o.phase(), a.phase(), "step {i}");
                assert_eq!(o.fire_remaining, a.fire_remaining, "step {i}");
                assert_eq!(o.special_attack, a.special_attack, "step {i}");
                assert_eq!(o.move_target.get(), a.move_target.get(), "step {i}");
                assert_eq!(o.fire_rotation.get(), a.fire_rotation.get(), "step {i}");
                assert_eq!(
                    o.move_remaining_distance.get(),
                    a.move_remaining_distance.get(),
                    "step {i}"
                );

                let drift = observer
                    .transform()
                    .position
                    .distance(session.authority().transform().position);
                assert!(drift < 0.5, "step {i}: observer drifted {drift}");
            }
        }

        let authority = boss_of(session.authority());
        assert!(authority.stats().legs_started >= 5);
        for observer in session.observers() {
            assert_eq!(boss_of(observer).stats().legs_started, authority.stats().legs_started);
            assert_eq!(boss_of(observer).stats().bounces, authority.stats().bounces);
            assert_eq!(boss_of(observer).stats().shots_fired, 0);
        }
        assert_eq!(session.stats().delivery_errors, 0);
    }

    #[test]
    fn test_observers_freeze_decisions_after_authority_loss() {
        let mut session = session(1, 4, BossConfig::default());
        session.enter_combat(0.0);
        session.disconnect_authority();

        for i in 1..=400 {
            session.step(DT, i as f64 * DT);
        }

        let observer = session.observer(0).unwrap();
        let copy = boss_of(observer);
        assert_eq!(copy.phase(), BattlePhase::Firing);
        assert_eq!(copy.state().fire_remaining, 0);
        assert_eq!(copy.stats().legs_started, 0);
        assert!(session.stats().messages_dropped > 0);
        assert!(boss_of(session.authority()).stats().legs_started > 0);
    }

    #[test]
    fn test_invalid_config_disables_every_copy() {
        let mut config = BossConfig::default();
        config.max_speed = 0.0;
        let mut session = session(1, 1, config);
        session.enter_combat(0.0);
        session.step(DT, 1.05);

        assert_eq!(session.authority().lifecycle(), Lifecycle::Disabled);
        assert_eq!(session.observer(0).unwrap().lifecycle(), Lifecycle::Disabled);
        assert_eq!(session.stats().directives_delivered, 0);
    }
}
