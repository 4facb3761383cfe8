//! Fixed timestep simulation tick
//!
//! One call advances the rule engine by `dt`: steering, camera, modifier
//! countdown, contacts reported by the physics collaborator, scoring, and
//! the phase machine. Deterministic for identical inputs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{ItemId, classify};
use super::modifier::ModifierTick;
use super::movement::{
    Direction, EnemyKind, compute_velocity, follower_velocity_x, sample_direction, steer,
};
use super::state::{GameEvent, GamePhase, GameState, Prompt, RunSummary, TouchVisual};
use super::touched::ItemRef;
use crate::consts::*;
use crate::format_elapsed;
use crate::persistence::PersistentStore;
use crate::platform::{InputSource, Key, KeyState};
use crate::tuning::EffectKind;

/// Body taking part in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityId {
    Hero,
    Enemy(u32),
}

/// What a body touched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContactTarget {
    /// Map cell with its tile index and top-left corner
    Tile {
        index: u32,
        col: u32,
        row: u32,
        origin: Vec2,
    },
    /// Placed object with its type name
    Object { id: u32, name: String },
    /// Edge of the world
    WorldBounds,
}

impl ContactTarget {
    /// Tracker identity and classifier id, if this is a touchable item
    fn item(&self) -> Option<(ItemRef, ItemId)> {
        match self {
            ContactTarget::Tile { index, col, row, .. } => Some((
                ItemRef::Tile {
                    col: *col,
                    row: *row,
                },
                ItemId::Tile(*index),
            )),
            ContactTarget::Object { id, name } => {
                Some((ItemRef::Object { id: *id }, ItemId::Object(name.clone())))
            }
            ContactTarget::WorldBounds => None,
        }
    }
}

/// Overlap reported by the physics collaborator this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub entity: EntityId,
    pub target: ContactTarget,
}

impl Contact {
    pub fn hero(target: ContactTarget) -> Self {
        Self {
            entity: EntityId::Hero,
            target,
        }
    }

    pub fn enemy(id: u32, target: ContactTarget) -> Self {
        Self {
            entity: EntityId::Enemy(id),
            target,
        }
    }
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held keys, sampled once
    pub keys: KeyState,
    /// Overlaps since the previous tick
    pub contacts: Vec<Contact>,
    /// The hero's entry animation has finished
    pub respawn_finished: bool,
}

impl TickInput {
    /// Snapshot an input source
    pub fn from_source(source: &impl InputSource) -> Self {
        let mut keys = KeyState::default();
        for key in [
            Key::Up,
            Key::Down,
            Key::Left,
            Key::Right,
            Key::Confirm,
            Key::Start,
        ] {
            keys.set(key, source.is_pressed(key));
        }
        Self {
            keys,
            ..Default::default()
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, store: &mut dyn PersistentStore, dt: f32) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Menu | GamePhase::Checkpoint => {
            if input.respawn_finished && !state.hero.in_position {
                finish_respawn(state);
            }
            // finish_respawn may already have resumed play
            if matches!(state.phase, GamePhase::Menu | GamePhase::Checkpoint)
                && state.hero.in_position
                && input.keys.is_pressed(Key::Start)
            {
                begin_play(state);
            }
        }
        GamePhase::Playing => play(state, input, store, dt),
        GamePhase::LifeLost | GamePhase::GameOver => {
            if input.keys.is_pressed(Key::Confirm) {
                reset(state);
            }
        }
    }
}

fn finish_respawn(state: &mut GameState) {
    state.hero.in_position = true;
    match state.phase {
        GamePhase::Checkpoint if !state.config.show_start_prompt_on_respawn => begin_play(state),
        _ => state.push(GameEvent::ShowPrompt(Prompt::Start)),
    }
}

fn begin_play(state: &mut GameState) {
    state.push(GameEvent::HidePrompt);
    if state.hero.direction.is_none() {
        state.hero.direction = Some(Direction::Down);
    }
    state.set_phase(GamePhase::Playing);
}

fn play(state: &mut GameState, input: &TickInput, store: &mut dyn PersistentStore, dt: f32) {
    let pressed = sample_direction(&input.keys);
    if steer(&mut state.hero.direction, pressed, &mut state.rules) {
        let at = state.hero.position;
        state.push(GameEvent::TrailSample { at });
    }
    if let Some(direction) = state.hero.direction {
        state.hero.velocity = compute_velocity(direction, &state.rules);
    }
    state.hero.position += state.hero.velocity * dt;

    steer_followers(state);

    let hero_y = state.hero.position.y;
    let (trigger_y, game_speed) = (state.rules.camera_trigger_y, state.rules.game_speed);
    if state.camera.follow(hero_y, trigger_y, true, game_speed) {
        let y = state.camera.y;
        state.push(GameEvent::ScrollCamera { y });
    }

    tick_modifier(state, dt);
    state.play_time_ms += dt as f64 * 1000.0;
    refresh_score(state);

    for contact in &input.contacts {
        if state.phase != GamePhase::Playing {
            break;
        }
        apply_contact(state, contact, store);
    }

    if state.phase == GamePhase::Playing
        && state
            .camera
            .hero_left_view(state.hero.position.y, state.hero.size)
    {
        lose_life(state, store, "left the view");
    }
}

/// Point followers at the hero while it moves sideways
fn steer_followers(state: &mut GameState) {
    let Some(direction) = state.hero.direction else {
        return;
    };
    let Some(velocity_x) =
        follower_velocity_x(direction, state.hero.position.x, state.hero.velocity.x)
    else {
        return;
    };
    let mut changed = Vec::new();
    for enemy in state
        .enemies
        .iter_mut()
        .filter(|e| e.kind == EnemyKind::Follower)
    {
        if enemy.velocity_x != velocity_x {
            enemy.velocity_x = velocity_x;
            changed.push(GameEvent::EnemyVelocity {
                id: enemy.id,
                velocity_x,
            });
        }
    }
    for event in changed {
        state.push(event);
    }
}

fn tick_modifier(state: &mut GameState, dt: f32) {
    let shown = state.modifier.countdown_secs();
    match state.modifier.tick(dt, &mut state.rules) {
        ModifierTick::Idle => {}
        ModifierTick::Running => {
            if state.modifier.countdown_secs() != shown {
                push_countdown(state);
            }
        }
        ModifierTick::Expired(kind) => {
            log::debug!("{:?} expired", kind);
            state.push(GameEvent::RemoveNotification);
        }
    }
}

fn push_countdown(state: &mut GameState) {
    let kind = state.modifier.active_kind();
    if let (Some(kind), Some(text)) = (kind, state.modifier.countdown_text()) {
        state.push(GameEvent::ModifierCountdown { kind, text });
    }
}

fn refresh_score(state: &mut GameState) {
    let hero_y = state.hero.position.y;
    let spawn_y = state.hero.start_position.y;
    let origin_y = state.config.hero_start.y;
    state.scores.update_from_position(hero_y, spawn_y, origin_y);
}

fn apply_contact(state: &mut GameState, contact: &Contact, store: &mut dyn PersistentStore) {
    match contact.entity {
        EntityId::Enemy(id) => bounce_enemy(state, id, &contact.target),
        EntityId::Hero => match contact.target.item() {
            None => lose_life(state, store, "out of bounds"),
            Some((item, id)) => {
                let origin = match contact.target {
                    ContactTarget::Tile { origin, .. } => origin,
                    _ => state.hero.position,
                };
                touch_item(state, item, &id, origin, store);
            }
        },
    }
}

/// Patrols turn around at walls and obstacle tiles
fn bounce_enemy(state: &mut GameState, id: u32, target: &ContactTarget) {
    let blocking = match target {
        ContactTarget::WorldBounds => true,
        ContactTarget::Tile { index, .. } => matches!(
            state.config.effects.tiles.get(index),
            Some(EffectKind::Obstacle)
        ),
        ContactTarget::Object { .. } => false,
    };
    if !blocking {
        return;
    }
    let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) else {
        log::trace!("Contact for unknown enemy {}", id);
        return;
    };
    if enemy.kind == EnemyKind::Follower || enemy.velocity_x == 0.0 {
        return;
    }
    enemy.velocity_x = -enemy.velocity_x;
    let velocity_x = enemy.velocity_x;
    state.push(GameEvent::EnemyVelocity { id, velocity_x });
}

fn touch_item(
    state: &mut GameState,
    item: ItemRef,
    id: &ItemId,
    origin: Vec2,
    store: &mut dyn PersistentStore,
) {
    if state.touched.is_consumed(&item) {
        return;
    }
    let effect = classify(&state.config.effects, id);
    if effect.is_noop() {
        return;
    }
    if effect.is_fatal {
        lose_life(state, store, "obstacle");
        return;
    }
    log::debug!("Touched {:?} ({:?})", item, effect.kind);

    if let Some((text, lifespan_ms)) = &effect.text {
        state.show_text(text.clone(), *lifespan_ms);
    }
    if effect.score_delta > 0 {
        state.scores.add_bonus(effect.score_delta);
        refresh_score(state);
    }
    state.hero.lives += effect.life_delta;

    if let Some(kind) = effect.speed_override {
        let magnitude = state.rules.speed_for(kind);
        let duration = state.rules.modifier_duration_secs;
        if state.modifier.start(kind, magnitude, duration, &mut state.rules) {
            state.push(GameEvent::ShowNotification {
                kind,
                text: kind.notification_text().to_string(),
            });
            push_countdown(state);
        }
    }
    if effect.is_reverse_toggle {
        state.rules.reverse_active = true;
    }
    if effect.is_checkpoint {
        let centring = state.config.tile_size / 2.0 - state.hero.size / 2.0;
        state.hero.start_position = origin + Vec2::splat(centring);
        log::info!("Checkpoint set at {:?}", state.hero.start_position);
    }
    if effect.is_collectible {
        state.items_collected += 1;
    }

    // Speed objects are tracked even when their modifier was rejected
    if let Some(category) = effect.reset_category {
        state.touched.mark_touched(item, category);
        let visual = effect.visual.unwrap_or(TouchVisual::Keep);
        state.push(GameEvent::ItemTouched { item, visual });
    }
}

fn lose_life(state: &mut GameState, store: &mut dyn PersistentStore, cause: &str) {
    state.hero.lives = state.hero.lives.saturating_sub(1);
    log::info!("Life lost ({}), {} left", cause, state.hero.lives);

    state.hero.direction = None;
    state.hero.velocity = Vec2::ZERO;
    state.hero.in_position = false;
    if state.modifier.cancel() {
        state.push(GameEvent::RemoveNotification);
    }
    set_enemy_speeds(state, 0.0);

    state.show_text("OUCH", BANNER_TEXT_MS);
    state.push(GameEvent::ShakeCamera {
        intensity: SHAKE_INTENSITY,
        duration_ms: SHAKE_DURATION_MS,
    });

    state.set_phase(GamePhase::LifeLost);
    if state.hero.lives == 0 {
        game_over(state, store);
    }
    state.push(GameEvent::ShowPrompt(Prompt::Reset));
}

fn game_over(state: &mut GameState, store: &mut dyn PersistentStore) {
    let score = state.scores.score;
    let high_score = state.scores.record_attempt_end(score, store);
    let elapsed_ms = state.play_time_ms.max(0.0) as u64;
    let summary = RunSummary {
        score,
        high_score,
        elapsed_ms,
        elapsed_text: format_elapsed(elapsed_ms),
        items_collected: state.items_collected,
        items_total: state.config.collectible_count,
    };
    state.summary = Some(summary.clone());
    state.set_phase(GamePhase::GameOver);
    state.push(GameEvent::RunSummary(summary));
}

/// Set every enemy's speed; patrols restart in their initial heading
fn set_enemy_speeds(state: &mut GameState, speed: f32) {
    let mut events = Vec::with_capacity(state.enemies.len());
    for enemy in &mut state.enemies {
        enemy.velocity_x = enemy.kind.patrol_velocity_x(speed);
        events.push(GameEvent::EnemyVelocity {
            id: enemy.id,
            velocity_x: enemy.velocity_x,
        });
    }
    for event in events {
        state.push(event);
    }
}

fn reset(state: &mut GameState) {
    let game_over = state.phase == GamePhase::GameOver;
    state.push(GameEvent::HidePrompt);

    state.hero.direction = Some(Direction::Down);
    state.rules.restore_default_speed();
    state.rules.reverse_active = false;
    state.modifier.cancel();

    let mut restored = state.touched.reset_resettable();
    if game_over {
        state.hero.lives = state.config.initial_lives;
        state.hero.start_position = state.config.hero_start;
        state.camera.reset();
        state.scores.reset_run();
        state.play_time_ms = 0.0;
        state.items_collected = 0;
        state.summary = None;
        restored.extend(state.touched.reset_persistent());
    } else {
        let spawn_y = state.hero.start_position.y;
        let origin_y = state.config.hero_start.y;
        let bonus = state.scores.bonus_points;
        state.camera.place_for_respawn(spawn_y);
        state.scores.update(spawn_y, origin_y, bonus);
    }
    let y = state.camera.y;
    state.push(GameEvent::ScrollCamera { y });
    if !restored.is_empty() {
        state.push(GameEvent::ItemsRestored(restored));
    }

    let start = state.hero.start_position;
    state.hero.position = start;
    state.hero.velocity = Vec2::ZERO;
    state.hero.in_position = false;

    let x = start.x - 10.0;
    let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
    for id in ids {
        state.push(GameEvent::EnemyReset { id, x });
    }
    let respawn_speed = state.config.enemy_respawn_speed;
    set_enemy_speeds(state, respawn_speed);

    state.push(GameEvent::RespawnHero { at: start });
    state.set_phase(if game_over {
        GamePhase::Menu
    } else {
        GamePhase::Checkpoint
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PersistentStore};
    use crate::sim::modifier::ModifierKind;
    use crate::tuning::LevelConfig;

    fn keys(key: Key) -> TickInput {
        TickInput {
            keys: KeyState::default().with(key),
            ..Default::default()
        }
    }

    fn touching(contacts: Vec<Contact>) -> TickInput {
        TickInput {
            contacts,
            ..Default::default()
        }
    }

    fn object(id: u32, name: &str) -> Contact {
        Contact::hero(ContactTarget::Object {
            id,
            name: name.to_string(),
        })
    }

    fn wall() -> Contact {
        object(900, "smallWall")
    }

    /// Finish the entry animation and press Start
    fn resume(state: &mut GameState, store: &mut MemoryStore) {
        let finished = TickInput {
            respawn_finished: true,
            ..Default::default()
        };
        tick(state, &finished, store, SIM_DT);
        tick(state, &keys(Key::Start), store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    fn playing_with(config: LevelConfig) -> (GameState, MemoryStore) {
        let mut state = GameState::new(config);
        let mut store = MemoryStore::new();
        resume(&mut state, &mut store);
        state.drain_events();
        (state, store)
    }

    fn playing() -> (GameState, MemoryStore) {
        playing_with(LevelConfig::default())
    }

    fn run(state: &mut GameState, store: &mut MemoryStore, ticks: usize) {
        for _ in 0..ticks {
            tick(state, &TickInput::default(), store, SIM_DT);
        }
    }

    #[test]
    fn test_menu_waits_for_entry_animation() {
        let mut state = GameState::new(LevelConfig::default());
        let mut store = MemoryStore::new();

        // Start before the hero is in position does nothing
        tick(&mut state, &keys(Key::Start), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);

        let finished = TickInput {
            respawn_finished: true,
            ..Default::default()
        };
        tick(&mut state, &finished, &mut store, SIM_DT);
        assert!(state.hero.in_position);
        assert!(state.events().contains(&GameEvent::ShowPrompt(Prompt::Start)));

        tick(&mut state, &keys(Key::Start), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_hero_moves_down_at_base_speed() {
        let (mut state, mut store) = playing();
        let start_y = state.hero.position.y;
        run(&mut state, &mut store, 60);
        assert!((state.hero.position.y - start_y - state.rules.base_speed).abs() < 0.1);
        assert_eq!(state.hero.position.x, state.config.hero_start.x);
        assert!(state.scores.score > 0);
    }

    #[test]
    fn test_scenario_a_three_hits_end_the_run() {
        let (mut state, mut store) = playing();
        let mut lives = Vec::new();

        for hit in 0..3 {
            if hit > 0 {
                tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
                assert_eq!(state.phase, GamePhase::Checkpoint);
                resume(&mut state, &mut store);
            }
            tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
            lives.push(state.hero.lives);
        }

        assert_eq!(lives, vec![2, 1, 0]);
        assert_eq!(state.phase, GamePhase::GameOver);
        let summary = state.summary.clone().unwrap();
        assert_eq!(summary.high_score, summary.score);
        assert_eq!(store.get("highScore"), Some(summary.score.to_string()));
    }

    #[test]
    fn test_life_loss_freezes_play() {
        let (mut state, mut store) = playing();
        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);

        assert_eq!(state.phase, GamePhase::LifeLost);
        assert_eq!(state.hero.direction, None);
        assert_eq!(state.hero.velocity, Vec2::ZERO);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ShowText { text, lifespan_ms: 1000, .. } if text == "OUCH"
        )));
        assert!(events.contains(&GameEvent::ShakeCamera {
            intensity: 0.01,
            duration_ms: 500
        }));
        assert!(events.contains(&GameEvent::ShowPrompt(Prompt::Reset)));

        let (y, time) = (state.hero.position.y, state.play_time_ms);
        run(&mut state, &mut store, 30);
        assert_eq!(state.hero.position.y, y);
        assert_eq!(state.play_time_ms, time);
    }

    #[test]
    fn test_scenario_b_bonuses_add_to_distance() {
        let (mut state, mut store) = playing();
        run(&mut state, &mut store, 5);
        tick(&mut state, &touching(vec![object(10, "bonus1")]), &mut store, SIM_DT);
        tick(&mut state, &touching(vec![object(11, "bonus2")]), &mut store, SIM_DT);

        assert_eq!(state.scores.bonus_points, 150);
        let distance = (state.hero.position.y - state.config.hero_start.y).floor() as u64;
        assert_eq!(state.scores.score, distance + 150);
        assert_eq!(state.items_collected, 2);

        // Collected pickups are inert
        tick(&mut state, &touching(vec![object(10, "bonus1")]), &mut store, SIM_DT);
        assert_eq!(state.scores.bonus_points, 150);
        assert_eq!(state.items_collected, 2);
    }

    #[test]
    fn test_scenario_c_modifier_lifecycle() {
        let (mut state, mut store) = playing();
        tick(&mut state, &touching(vec![object(20, "slow")]), &mut store, SIM_DT);
        assert_eq!(state.rules.current_speed, state.rules.slow_speed);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShowNotification {
            kind: ModifierKind::SlowDown,
            text: "SLOW DOWN".to_string()
        }));
        assert!(events.contains(&GameEvent::ModifierCountdown {
            kind: ModifierKind::SlowDown,
            text: "Slowed for: 3s".to_string()
        }));

        // A second modifier while one runs is rejected
        tick(
            &mut state,
            &touching(vec![object(21, "slow"), object(22, "fast")]),
            &mut store,
            SIM_DT,
        );
        assert_eq!(state.rules.current_speed, state.rules.slow_speed);

        let mut expired_at = None;
        for i in 0..240 {
            tick(&mut state, &TickInput::default(), &mut store, SIM_DT);
            if state.rules.current_speed == state.rules.base_speed {
                expired_at = Some(i);
                break;
            }
        }
        let ticks = expired_at.expect("modifier never expired");
        assert!((170..=185).contains(&ticks), "expired after {} ticks", ticks);
        assert!(!state.modifier.is_active());
        assert!(state.drain_events().contains(&GameEvent::RemoveNotification));
    }

    #[test]
    fn test_life_loss_cancels_modifier() {
        let (mut state, mut store) = playing();
        tick(&mut state, &touching(vec![object(20, "fast")]), &mut store, SIM_DT);
        assert!(state.modifier.is_active());
        state.drain_events();

        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        assert!(!state.modifier.is_active());
        assert!(state.events().contains(&GameEvent::RemoveNotification));

        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        assert_eq!(state.rules.current_speed, state.rules.base_speed);

        // Speed objects come back every life
        resume(&mut state, &mut store);
        tick(&mut state, &touching(vec![object(20, "fast")]), &mut store, SIM_DT);
        assert_eq!(state.rules.current_speed, state.rules.fast_speed);
    }

    #[test]
    fn test_scenario_d_checkpoint_and_full_reset() {
        let (mut state, mut store) = playing();
        let checkpoint = Contact::hero(ContactTarget::Tile {
            index: 4,
            col: 4,
            row: 10,
            origin: Vec2::new(180.0, 450.0),
        });
        tick(&mut state, &touching(vec![checkpoint.clone()]), &mut store, SIM_DT);
        let spawn = Vec2::new(180.0 + 14.5, 450.0 + 14.5);
        assert_eq!(state.hero.start_position, spawn);

        // Non-final reset: back to the checkpoint, lives and checkpoint kept
        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Checkpoint);
        assert_eq!(state.hero.position, spawn);
        assert_eq!(state.hero.lives, 2);
        assert!(state.touched.is_consumed(&ItemRef::Tile { col: 4, row: 10 }));
        assert_eq!(state.scores.score, 409);
        assert_eq!(state.camera.y, spawn.y - 20.0);

        // Checkpoint text only on the first touch
        resume(&mut state, &mut store);
        state.drain_events();
        tick(&mut state, &touching(vec![checkpoint]), &mut store, SIM_DT);
        assert!(
            !state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShowText { .. }))
        );

        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        resume(&mut state, &mut store);
        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Final reset: absolute start, full lives, persistent touches cleared
        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.hero.position, state.config.hero_start);
        assert_eq!(state.hero.lives, state.config.initial_lives);
        assert!(state.touched.is_empty());
        assert_eq!(state.scores.score, 0);
        assert_eq!(state.camera.y, 0.0);
        assert_eq!(state.play_time_ms, 0.0);
    }

    #[test]
    fn test_game_over_only_exits_via_confirm() {
        let (mut state, mut store) = playing_with(LevelConfig {
            initial_lives: 1,
            ..LevelConfig::default()
        });
        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let noise = [
            keys(Key::Start),
            keys(Key::Left),
            TickInput {
                respawn_finished: true,
                contacts: vec![object(10, "bonus1"), wall()],
                ..Default::default()
            },
        ];
        for input in &noise {
            tick(&mut state, input, &mut store, SIM_DT);
            assert_eq!(state.phase, GamePhase::GameOver);
            assert_eq!(state.hero.lives, 0);
        }

        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_reverse_tile_until_turn() {
        let (mut state, mut store) = playing();
        let reverse = Contact::hero(ContactTarget::Tile {
            index: 3,
            col: 4,
            row: 2,
            origin: Vec2::new(180.0, 90.0),
        });
        tick(&mut state, &touching(vec![reverse]), &mut store, SIM_DT);
        assert!(state.rules.reverse_active);

        // Still heading down, but moving up
        tick(&mut state, &keys(Key::Down), &mut store, SIM_DT);
        assert!(state.hero.velocity.y < 0.0);

        state.drain_events();
        tick(&mut state, &keys(Key::Left), &mut store, SIM_DT);
        assert!(!state.rules.reverse_active);
        assert!(state.hero.velocity.x < 0.0);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::TrailSample { .. }))
        );
    }

    #[test]
    fn test_leaving_the_view_costs_a_life() {
        let (mut state, mut store) = playing();
        state.camera.y = state.hero.position.y;
        tick(&mut state, &TickInput::default(), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::LifeLost);
    }

    #[test]
    fn test_world_bounds_costs_a_life() {
        let (mut state, mut store) = playing();
        tick(
            &mut state,
            &touching(vec![Contact::hero(ContactTarget::WorldBounds)]),
            &mut store,
            SIM_DT,
        );
        assert_eq!(state.hero.lives, 2);
    }

    #[test]
    fn test_passage_and_unknown_tiles_are_harmless() {
        let (mut state, mut store) = playing();
        let tunnel = Contact::hero(ContactTarget::Tile {
            index: 2,
            col: 1,
            row: 1,
            origin: Vec2::ZERO,
        });
        let mystery = Contact::hero(ContactTarget::Tile {
            index: 42,
            col: 2,
            row: 1,
            origin: Vec2::ZERO,
        });
        tick(&mut state, &touching(vec![tunnel, mystery]), &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events().contains(&GameEvent::ItemTouched {
            item: ItemRef::Tile { col: 1, row: 1 },
            visual: TouchVisual::Dim(0.9)
        }));
        assert!(!state.touched.is_consumed(&ItemRef::Tile { col: 2, row: 1 }));
    }

    #[test]
    fn test_enemies_freeze_and_rearm() {
        let (mut state, mut store) = playing();
        let follower = state.spawn_enemy(EnemyKind::Follower);
        let patrol = state.spawn_enemy(EnemyKind::PatrolLeft);

        tick(&mut state, &keys(Key::Left), &mut store, SIM_DT);
        let expected = follower_velocity_x(
            Direction::Left,
            state.hero.position.x,
            state.hero.velocity.x,
        );
        assert_eq!(Some(state.enemies[0].velocity_x), expected);

        tick(
            &mut state,
            &touching(vec![Contact::enemy(patrol, ContactTarget::WorldBounds)]),
            &mut store,
            SIM_DT,
        );
        assert_eq!(state.enemies[1].velocity_x, state.config.enemy_speed);

        tick(&mut state, &touching(vec![object(901, "badguy")]), &mut store, SIM_DT);
        assert!(state.enemies.iter().all(|e| e.velocity_x == 0.0));

        state.drain_events();
        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        let x = state.hero.start_position.x - 10.0;
        assert!(state.events().contains(&GameEvent::EnemyReset { id: follower, x }));
        assert_eq!(state.enemies[0].velocity_x, 0.0);
        assert_eq!(state.enemies[1].velocity_x, -state.config.enemy_respawn_speed);
    }

    #[test]
    fn test_respawn_without_prompt_resumes_play() {
        let (mut state, mut store) = playing_with(LevelConfig {
            show_start_prompt_on_respawn: false,
            ..LevelConfig::default()
        });
        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        let finished = TickInput {
            respawn_finished: true,
            ..Default::default()
        };
        tick(&mut state, &finished, &mut store, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.events().contains(&GameEvent::ShowPrompt(Prompt::Start)));
    }

    #[test]
    fn test_extra_life_and_summary_counts() {
        let (mut state, mut store) = playing_with(LevelConfig {
            initial_lives: 1,
            collectible_count: 5,
            ..LevelConfig::default()
        });
        tick(&mut state, &touching(vec![object(30, "1up")]), &mut store, SIM_DT);
        assert_eq!(state.hero.lives, 2);

        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);
        tick(&mut state, &keys(Key::Confirm), &mut store, SIM_DT);
        resume(&mut state, &mut store);
        tick(&mut state, &touching(vec![wall()]), &mut store, SIM_DT);

        let summary = state.summary.clone().unwrap();
        assert_eq!(summary.items_collected, 1);
        assert_eq!(summary.items_total, 5);
        assert_eq!(summary.elapsed_text, format_elapsed(summary.elapsed_ms));
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(LevelConfig::default());
        let mut b = GameState::new(LevelConfig::default());
        let (mut store_a, mut store_b) = (MemoryStore::new(), MemoryStore::new());

        let inputs = [
            TickInput {
                respawn_finished: true,
                ..Default::default()
            },
            keys(Key::Start),
            keys(Key::Right),
            touching(vec![object(10, "bonus1")]),
            keys(Key::Down),
            TickInput::default(),
        ];
        for input in &inputs {
            tick(&mut a, input, &mut store_a, SIM_DT);
            tick(&mut b, input, &mut store_b, SIM_DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.hero, b.hero);
        assert_eq!(a.scores.score, b.scores.score);
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
