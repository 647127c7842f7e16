//! Hand-controller navigation: drag, fly, and two-hand pinch scaling of one
//! shared manipulation target.
//!
//! The coordinator owns every hand record and the optional scaling session.
//! Hosts drive it through `set_hand_state`, `remove_hand`, `axis_move` and
//! `tick`; nothing else mutates the records.

use glam::Vec3;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::hand::{Gesture, HandRecord, HandState};
use super::scaling::ScalingSession;

/// Tuning knobs for release behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationConfig {
    /// Multiplier applied to the drag velocity when a drag is released ("throw").
    pub throw_gain: f32,
    /// Multiplier applied to the flight velocity when flight ends.
    pub flight_release_gain: f32,
    /// Drag releases this soon after a scaling session ends inject no velocity.
    pub scale_release_window_ms: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            throw_gain: 2.0,
            flight_release_gain: 0.5,
            scale_release_window_ms: 500.0,
        }
    }
}

/// Per-hand gesture state machine plus the coordinator-level scaling mode.
#[derive(Debug, Default)]
pub struct ManipulationCoordinator {
    config: NavigationConfig,
    /// Entity being dragged, flown and scaled.
    target: Option<EntityId>,
    /// Hand records in registration order.
    hands: Vec<HandRecord>,
    scaling: Option<ScalingSession>,
    scaling_ended_at: Option<f64>,
    /// Frame clock in milliseconds, used to stamp scaling ends.
    now_ms: f64,
}

impl ManipulationCoordinator {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Advance the clock used for scaling-end timestamps without running a frame.
    pub fn set_clock(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    // -- Queries --

    pub fn record(&self, hand: EntityId) -> Option<&HandRecord> {
        self.hands.iter().find(|r| r.hand == hand)
    }

    pub fn gesture(&self, hand: EntityId) -> Option<Gesture> {
        self.record(hand).map(|r| r.gesture())
    }

    pub fn hands(&self) -> impl Iterator<Item = &HandRecord> {
        self.hands.iter()
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    pub fn dragging_count(&self) -> usize {
        self.hands.iter().filter(|r| r.is_dragging()).count()
    }

    pub fn scaling(&self) -> Option<&ScalingSession> {
        self.scaling.as_ref()
    }

    pub fn is_scaling(&self) -> bool {
        self.scaling.is_some()
    }

    pub fn last_scaling_end(&self) -> Option<f64> {
        self.scaling_ended_at
    }

    // -- Transitions --

    /// Move `hand` into `gesture`, running exit effects of the old record
    /// before entry effects of the new one.
    ///
    /// Unknown hands are registered; the first call (usually `Gesture::None`
    /// at controller init) creates their record.
    pub fn set_hand_state(&mut self, scene: &mut Scene, hand: EntityId, gesture: Gesture) {
        let current = self.gesture(hand);
        if current == Some(gesture) {
            return;
        }
        let leaving_drag = current == Some(Gesture::Dragging);

        if gesture == Gesture::Dragging && self.scaling.is_none() {
            if let Some(other) = self.sole_other_drag(hand) {
                if !self.begin_scaling(scene, other, hand) {
                    return;
                }
            }
        }

        if leaving_drag && self.scaling.is_some_and(|s| s.involves(hand)) {
            self.end_scaling(scene, hand);
        }

        log::debug!("hand {:?}: {:?} -> {:?}", hand, current, gesture);

        let slot = self.hands.iter().position(|r| r.hand == hand);
        if let Some(idx) = slot {
            let old = self.hands[idx];
            self.end_state(scene, &old);
        }
        let record = self.start_state(scene, hand, gesture);
        match slot {
            Some(idx) => self.hands[idx] = record,
            None => self.hands.push(record),
        }
    }

    /// Deregister a hand. Runs its exit effects exactly once; unknown hands are a no-op.
    pub fn remove_hand(&mut self, scene: &mut Scene, hand: EntityId) {
        if self.record(hand).is_none() {
            return;
        }
        self.set_hand_state(scene, hand, Gesture::None);
        self.hands.retain(|r| r.hand != hand);
        log::debug!("hand {:?} removed", hand);
    }

    /// Joystick input. Only a flying hand listens; `axes[1]` is vertical.
    pub fn axis_move(&mut self, hand: EntityId, axes: [f32; 2]) {
        let value = if axes[1].is_finite() { axes[1].clamp(-1.0, 1.0) } else { 0.0 };
        if let Some(record) = self.hands.iter_mut().find(|r| r.hand == hand) {
            if let HandState::Flying { vertical_axis, .. } = &mut record.state {
                *vertical_axis = value;
            }
        }
    }

    /// The one other hand currently dragging, if there is exactly one.
    fn sole_other_drag(&self, hand: EntityId) -> Option<EntityId> {
        let mut others = self.hands.iter().filter(|r| r.hand != hand && r.is_dragging());
        match (others.next(), others.next()) {
            (Some(only), None) => Some(only.hand),
            _ => None,
        }
    }

    /// Start a pinch between two dragging hands. Returns false, leaving the
    /// caller to refuse the drag, when either hand has no world position.
    fn begin_scaling(&mut self, scene: &Scene, left: EntityId, right: EntityId) -> bool {
        let (Some(left_pos), Some(right_pos)) =
            (scene.world_position(left), scene.world_position(right))
        else {
            log::warn!(
                "cannot scale: hand {:?} or {:?} is not in the scene, drag by {:?} refused",
                left, right, right
            );
            return false;
        };
        let (scale0, position0) = self
            .target
            .and_then(|t| scene.get(t))
            .map(|e| (e.transform.scale, e.transform.translation))
            .unwrap_or((Vec3::ONE, Vec3::ZERO));

        let session = ScalingSession::begin(left, left_pos, right, right_pos, scale0, position0);
        log::info!(
            "scaling started by {:?} and {:?} (distance {:.3})",
            left, right, session.distance0
        );
        self.scaling = Some(session);
        true
    }

    /// End the session because `leaving` stopped dragging. Every hand still
    /// dragging is re-anchored so it continues from the post-scale target.
    fn end_scaling(&mut self, scene: &Scene, leaving: EntityId) {
        let target_pos = self.target.and_then(|t| scene.position(t));
        for record in self.hands.iter_mut().filter(|r| r.hand != leaving) {
            if let HandState::Dragging { offset, velocity } = &mut record.state {
                if let (Some(target_pos), Some(hand_pos)) =
                    (target_pos, scene.world_position(record.hand))
                {
                    *offset = target_pos - hand_pos;
                }
                *velocity = Vec3::ZERO;
            }
        }
        self.scaling = None;
        self.scaling_ended_at = Some(self.now_ms);
        log::info!("scaling ended by {:?} at {:.0}ms", leaving, self.now_ms);
    }

    fn scaled_recently(&self) -> bool {
        self.scaling_ended_at
            .is_some_and(|t| self.now_ms - t <= self.config.scale_release_window_ms)
    }

    /// Entry effects for a fresh record.
    fn start_state(&self, scene: &mut Scene, hand: EntityId, gesture: Gesture) -> HandRecord {
        match gesture {
            Gesture::None => HandRecord::idle(hand),
            Gesture::Dragging => {
                let offset = self
                    .target
                    .and_then(|t| scene.position(t))
                    .zip(scene.world_position(hand))
                    .map(|(target_pos, hand_pos)| target_pos - hand_pos)
                    .unwrap_or(Vec3::ZERO);
                self.zero_target_velocity(scene);
                HandRecord::dragging(hand, offset)
            }
            Gesture::Flying => {
                self.zero_target_velocity(scene);
                HandRecord::flying(hand)
            }
        }
    }

    /// Exit effects for the record being replaced.
    fn end_state(&self, scene: &mut Scene, record: &HandRecord) {
        let Some(target) = self.target else { return };
        if !scene.supports_velocity(target) {
            return;
        }
        match record.state {
            HandState::Idle => {}
            HandState::Dragging { velocity, .. } => {
                if self.scaled_recently() {
                    log::debug!("drag release by {:?} suppressed after scaling", record.hand);
                    return;
                }
                let release = velocity * self.config.throw_gain;
                log::debug!("drag release by {:?}: {}", record.hand, release);
                scene.set_velocity(target, release);
            }
            HandState::Flying { velocity, .. } => {
                let release = velocity * self.config.flight_release_gain;
                log::debug!("flight release by {:?}: {}", record.hand, release);
                scene.set_velocity(target, release);
            }
        }
    }

    fn zero_target_velocity(&self, scene: &mut Scene) {
        if let Some(target) = self.target {
            scene.set_velocity(target, Vec3::ZERO);
        }
    }

    // -- Frame update --

    /// Per-frame update. `time_ms` is the frame clock, `dt_ms` the frame delta.
    pub fn tick(&mut self, scene: &mut Scene, time_ms: f64, dt_ms: f32) {
        self.now_ms = time_ms;
        let Some(target) = self.target.filter(|&t| scene.contains(t)) else {
            return;
        };

        if let Some(session) = self.scaling {
            match (
                scene.world_position(session.left_hand),
                scene.world_position(session.right_hand),
            ) {
                (Some(left), Some(right)) => {
                    if let Some((scale, position)) = session.apply(left, right) {
                        scene.set_scale(target, scale);
                        scene.set_position(target, position);
                    }
                    return;
                }
                (left, _) => {
                    let lost = if left.is_none() { session.left_hand } else { session.right_hand };
                    log::warn!("hand {:?} left the scene mid-pinch, ending scaling", lost);
                    self.set_hand_state(scene, lost, Gesture::None);
                }
            }
        }

        for record in self.hands.iter_mut() {
            let Some(hand_pos) = scene.world_position(record.hand) else {
                continue;
            };
            match &mut record.state {
                HandState::Idle => {}
                HandState::Dragging { offset, velocity } => {
                    let new_pos = hand_pos + *offset;
                    if dt_ms > 0.0 {
                        if let Some(target_pos) = scene.position(target) {
                            *velocity = (new_pos - target_pos) * (1000.0 / dt_ms);
                        }
                    }
                    scene.set_position(target, new_pos);
                }
                HandState::Flying { velocity, vertical_axis } => {
                    let Some(ahead) =
                        scene.local_to_world(record.hand, Vec3::new(0.0, 0.0, -*vertical_axis))
                    else {
                        continue;
                    };
                    *velocity = ahead - hand_pos;
                    if let Some(target_pos) = scene.position(target) {
                        scene.set_position(target, target_pos + *velocity * (dt_ms / 1000.0));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::body::KinematicBody;
    use crate::components::entity::Entity;

    const EPS: f32 = 1e-4;

    struct Rig {
        scene: Scene,
        nav: ManipulationCoordinator,
        target: EntityId,
        left: EntityId,
        right: EntityId,
    }

    fn rig() -> Rig {
        let mut scene = Scene::new();
        let target = scene.next_id();
        let left = scene.next_id();
        let right = scene.next_id();
        scene.spawn(
            Entity::new(target)
                .with_tag("solar-system")
                .with_pos(Vec3::new(0.0, 1.0, -2.0))
                .with_body(KinematicBody::new()),
        );
        scene.spawn(Entity::new(left).with_pos(Vec3::new(-0.2, 1.0, -0.5)));
        scene.spawn(Entity::new(right).with_pos(Vec3::new(0.2, 1.0, -0.5)));
        let mut nav = ManipulationCoordinator::new(NavigationConfig::default()).with_target(target);
        nav.set_hand_state(&mut scene, left, Gesture::None);
        nav.set_hand_state(&mut scene, right, Gesture::None);
        Rig { scene, nav, target, left, right }
    }

    fn move_hand(scene: &mut Scene, hand: EntityId, delta: Vec3) {
        let pos = scene.position(hand).unwrap();
        scene.set_position(hand, pos + delta);
    }

    /// Session exists iff exactly two hands drag.
    fn assert_scaling_invariant(r: &Rig) {
        assert_eq!(r.nav.is_scaling(), r.nav.dragging_count() == 2);
    }

    #[test]
    fn init_registers_idle_hands() {
        let r = rig();
        assert_eq!(r.nav.hand_count(), 2);
        assert_eq!(r.nav.gesture(r.left), Some(Gesture::None));
        assert!(!r.nav.is_scaling());
    }

    #[test]
    fn duplicate_state_is_noop() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        let before = *r.nav.record(r.left).unwrap();
        move_hand(&mut r.scene, r.left, Vec3::X);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        assert_eq!(*r.nav.record(r.left).unwrap(), before);
    }

    #[test]
    fn drag_follows_hand_without_drift() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        let offset = r.nav.record(r.left).unwrap().offset().unwrap();
        assert!(offset.abs_diff_eq(Vec3::new(0.2, 0.0, -1.5), EPS));

        for frame in 1..=10 {
            move_hand(&mut r.scene, r.left, Vec3::new(0.01, 0.0, 0.0));
            r.nav.tick(&mut r.scene, frame as f64 * 10.0, 10.0);
        }
        let pos = r.scene.position(r.target).unwrap();
        assert!(pos.abs_diff_eq(Vec3::new(0.1, 1.0, -2.0), EPS), "pos = {pos}");
        // 0.01 units per 10ms
        let v = r.nav.record(r.left).unwrap().velocity();
        assert!(v.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-2), "v = {v}");
    }

    #[test]
    fn release_without_moving_has_no_jump_or_velocity() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::None);

        let pos = r.scene.position(r.target).unwrap();
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 1.0, -2.0), EPS));
        assert!(r.scene.velocity(r.target).abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn drag_release_throws_with_double_velocity() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        move_hand(&mut r.scene, r.left, Vec3::new(0.0, 0.0, 0.02));
        r.nav.tick(&mut r.scene, 20.0, 20.0);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::None);
        let v = r.scene.velocity(r.target);
        assert!(v.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-3), "v = {v}");
    }

    #[test]
    fn drag_start_cancels_momentum() {
        let mut r = rig();
        r.scene.set_velocity(r.target, Vec3::splat(3.0));
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        assert_eq!(r.scene.velocity(r.target), Vec3::ZERO);
    }

    #[test]
    fn second_drag_starts_scaling() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        assert_scaling_invariant(&r);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        assert_scaling_invariant(&r);

        let s = r.nav.scaling().unwrap();
        assert_eq!(s.left_hand, r.left);
        assert_eq!(s.right_hand, r.right);
        assert!((s.distance0 - 0.4).abs() < EPS);
        assert!(s.midpoint0.abs_diff_eq(Vec3::new(0.0, 1.0, -0.5), EPS));
        assert_eq!(r.nav.gesture(r.right), Some(Gesture::Dragging));
    }

    #[test]
    fn pinch_scales_with_hand_distance() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        let s = *r.nav.scaling().unwrap();

        move_hand(&mut r.scene, r.left, Vec3::new(-0.2, 0.0, 0.0));
        move_hand(&mut r.scene, r.right, Vec3::new(0.2, 0.0, 0.0));
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        let scale = r.scene.scale(r.target).unwrap();
        assert!(scale.abs_diff_eq(s.scale0 * 2.0, EPS), "scale = {scale}");

        move_hand(&mut r.scene, r.left, Vec3::new(0.2, 0.0, 0.0));
        move_hand(&mut r.scene, r.right, Vec3::new(-0.2, 0.0, 0.0));
        r.nav.tick(&mut r.scene, 32.0, 16.0);
        assert!(r.scene.scale(r.target).unwrap().abs_diff_eq(s.scale0, EPS));
        assert!(r.scene.position(r.target).unwrap().abs_diff_eq(s.position0, EPS));
    }

    #[test]
    fn coincident_hands_never_corrupt_scale() {
        let mut r = rig();
        r.scene.set_position(r.right, Vec3::new(-0.2, 1.0, -0.5));
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        move_hand(&mut r.scene, r.right, Vec3::X);
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        assert_eq!(r.scene.scale(r.target), Some(Vec3::ONE));
    }

    #[test]
    fn leaving_scale_reanchors_remaining_hand() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        move_hand(&mut r.scene, r.right, Vec3::new(0.4, 0.0, 0.0));
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        let scaled_pos = r.scene.position(r.target).unwrap();

        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::None);
        assert_scaling_invariant(&r);
        assert_eq!(r.nav.last_scaling_end(), Some(16.0));

        let left = r.nav.record(r.left).unwrap();
        assert_eq!(left.velocity(), Vec3::ZERO);
        // Next frame with a still hand leaves the target where scaling put it
        r.nav.tick(&mut r.scene, 32.0, 16.0);
        assert!(r.scene.position(r.target).unwrap().abs_diff_eq(scaled_pos, EPS));
    }

    #[test]
    fn drag_release_right_after_scaling_is_suppressed() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        r.nav.set_clock(1000.0);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::None);
        assert_eq!(r.scene.velocity(r.target), Vec3::ZERO);

        move_hand(&mut r.scene, r.left, Vec3::new(0.016, 0.0, 0.0));
        r.nav.tick(&mut r.scene, 1016.0, 16.0);
        r.nav.set_clock(1400.0);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::None);
        assert_eq!(r.scene.velocity(r.target), Vec3::ZERO);
    }

    #[test]
    fn drag_release_after_window_throws() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        r.nav.set_clock(1000.0);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::None);

        move_hand(&mut r.scene, r.left, Vec3::new(0.016, 0.0, 0.0));
        r.nav.tick(&mut r.scene, 1016.0, 16.0);
        let v = r.nav.record(r.left).unwrap().velocity();
        r.nav.set_clock(1600.0);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::None);
        assert!(r.scene.velocity(r.target).abs_diff_eq(v * 2.0, EPS));
        assert!(v.x > 0.9, "v = {v}");
    }

    #[test]
    fn third_hand_is_refused_escalation() {
        let mut r = rig();
        let third = r.scene.next_id();
        r.scene.spawn(Entity::new(third).with_pos(Vec3::new(0.0, 1.5, -0.5)));
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        let session = *r.nav.scaling().unwrap();

        r.nav.set_hand_state(&mut r.scene, third, Gesture::Dragging);
        assert_eq!(r.nav.gesture(third), Some(Gesture::Dragging));
        assert_eq!(r.nav.scaling(), Some(&session));

        // Third hand moves; only the pinch drives the target
        move_hand(&mut r.scene, third, Vec3::splat(5.0));
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        assert!(r.scene.position(r.target).unwrap().abs_diff_eq(session.position0, EPS));
    }

    #[test]
    fn pinch_release_with_third_hand_dragging_reanchors_both() {
        let mut r = rig();
        let third = r.scene.next_id();
        r.scene.spawn(Entity::new(third).with_pos(Vec3::new(0.0, 1.5, -0.5)));
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, third, Gesture::Dragging);
        move_hand(&mut r.scene, r.right, Vec3::new(0.4, 0.0, 0.0));
        move_hand(&mut r.scene, third, Vec3::new(0.0, 0.3, 0.0));
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        let scaled_pos = r.scene.position(r.target).unwrap();

        r.nav.set_clock(32.0);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::None);
        assert!(!r.nav.is_scaling());
        assert_eq!(r.nav.last_scaling_end(), Some(32.0));

        for hand in [r.right, third] {
            let record = r.nav.record(hand).unwrap();
            let expected = scaled_pos - r.scene.world_position(hand).unwrap();
            assert!(record.offset().unwrap().abs_diff_eq(expected, EPS));
            assert_eq!(record.velocity(), Vec3::ZERO);
        }

        // Both hands hold still: neither drags the target away
        r.nav.tick(&mut r.scene, 48.0, 16.0);
        assert!(r.scene.position(r.target).unwrap().abs_diff_eq(scaled_pos, EPS));
        assert!(r.nav.record(r.right).unwrap().velocity().abs_diff_eq(Vec3::ZERO, 1e-2));
        assert!(r.nav.record(third).unwrap().velocity().abs_diff_eq(Vec3::ZERO, 1e-2));
    }

    #[test]
    fn non_participant_release_keeps_scaling() {
        let mut r = rig();
        let third = r.scene.next_id();
        r.scene.spawn(Entity::new(third).with_pos(Vec3::new(0.0, 1.5, -0.5)));
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        let session = *r.nav.scaling().unwrap();
        r.nav.set_hand_state(&mut r.scene, third, Gesture::Dragging);

        r.nav.set_clock(100.0);
        r.nav.set_hand_state(&mut r.scene, third, Gesture::None);
        assert_eq!(r.nav.gesture(third), Some(Gesture::None));
        assert_eq!(r.nav.scaling(), Some(&session));
        assert_eq!(r.nav.last_scaling_end(), None);
        assert_scaling_invariant(&r);
    }

    #[test]
    fn pinch_participant_leaving_scene_ends_scaling() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        r.scene.despawn(r.right);

        r.nav.tick(&mut r.scene, 16.0, 16.0);
        assert!(!r.nav.is_scaling());
        assert_eq!(r.nav.gesture(r.right), Some(Gesture::None));
        assert_scaling_invariant(&r);

        let before = r.scene.position(r.target).unwrap();
        move_hand(&mut r.scene, r.left, Vec3::new(0.1, 0.0, 0.0));
        r.nav.tick(&mut r.scene, 32.0, 16.0);
        let moved = r.scene.position(r.target).unwrap() - before;
        assert!(moved.abs_diff_eq(Vec3::new(0.1, 0.0, 0.0), EPS), "moved = {moved}");
    }

    #[test]
    fn drag_is_refused_when_partner_left_the_scene() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.scene.despawn(r.left);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        assert_eq!(r.nav.gesture(r.right), Some(Gesture::None));
        assert!(!r.nav.is_scaling());
        assert_scaling_invariant(&r);
    }

    #[test]
    fn pinch_can_restart_with_a_different_pair() {
        let mut r = rig();
        let third = r.scene.next_id();
        r.scene.spawn(Entity::new(third));
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::None);
        r.nav.set_hand_state(&mut r.scene, third, Gesture::Dragging);
        // left + third dragging: escalates again
        assert!(r.nav.is_scaling());
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        // right joins a running session: refused
        assert_eq!(r.nav.scaling().unwrap().right_hand, third);
    }

    #[test]
    fn switching_drag_to_fly_ends_scaling() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Flying);
        assert_scaling_invariant(&r);
        assert!(!r.nav.is_scaling());
    }

    #[test]
    fn scaling_invariant_holds_over_sequences() {
        let mut r = rig();
        let steps = [
            (r.left, Gesture::Dragging),
            (r.right, Gesture::Flying),
            (r.right, Gesture::Dragging),
            (r.left, Gesture::Flying),
            (r.left, Gesture::Dragging),
            (r.left, Gesture::None),
            (r.right, Gesture::None),
            (r.right, Gesture::Dragging),
            (r.left, Gesture::Dragging),
            (r.left, Gesture::Dragging),
            (r.right, Gesture::None),
        ];
        for (i, (hand, gesture)) in steps.into_iter().enumerate() {
            r.nav.set_clock(i as f64 * 100.0);
            r.nav.set_hand_state(&mut r.scene, hand, gesture);
            assert_scaling_invariant(&r);
        }
    }

    #[test]
    fn flying_moves_target_along_hand_forward() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Flying);
        r.nav.axis_move(r.right, [0.0, 1.0]);
        r.nav.tick(&mut r.scene, 500.0, 500.0);
        let pos = r.scene.position(r.target).unwrap();
        // Forward is -Z for an unrotated hand; half a second at one unit/s
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 1.0, -2.5), EPS), "pos = {pos}");
    }

    #[test]
    fn axis_only_reaches_flying_hands() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.axis_move(r.left, [0.0, 1.0]);
        assert_eq!(r.nav.record(r.left).unwrap().vertical_axis(), None);

        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Flying);
        r.nav.axis_move(r.right, [0.3, 7.0]);
        assert_eq!(r.nav.record(r.right).unwrap().vertical_axis(), Some(1.0));
    }

    #[test]
    fn removing_flying_hand_releases_once() {
        let mut r = rig();
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Flying);
        r.nav.axis_move(r.right, [0.0, -1.0]);
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        let last = r.nav.record(r.right).unwrap().velocity();
        assert!(last.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPS));

        r.nav.remove_hand(&mut r.scene, r.right);
        assert!(r.scene.velocity(r.target).abs_diff_eq(last * 0.5, EPS));
        assert!(r.nav.record(r.right).is_none());

        // A second removal and later frames never touch the target again
        r.scene.set_velocity(r.target, Vec3::ZERO);
        r.nav.remove_hand(&mut r.scene, r.right);
        r.nav.tick(&mut r.scene, 32.0, 16.0);
        assert_eq!(r.scene.velocity(r.target), Vec3::ZERO);
        assert_eq!(r.nav.hand_count(), 1);
    }

    #[test]
    fn removing_unknown_hand_is_noop() {
        let mut r = rig();
        r.nav.remove_hand(&mut r.scene, EntityId(99));
        assert_eq!(r.nav.hand_count(), 2);
    }

    #[test]
    fn missing_target_disables_navigation() {
        let mut r = rig();
        r.scene.despawn(r.target);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        r.nav.set_hand_state(&mut r.scene, r.right, Gesture::Dragging);
        move_hand(&mut r.scene, r.left, Vec3::X);
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        r.nav.remove_hand(&mut r.scene, r.left);
        assert_eq!(r.nav.hand_count(), 1);
    }

    #[test]
    fn target_without_body_gets_no_velocity() {
        let mut r = rig();
        r.scene.get_mut(r.target).unwrap().body = None;
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::Dragging);
        move_hand(&mut r.scene, r.left, Vec3::X);
        r.nav.tick(&mut r.scene, 16.0, 16.0);
        r.nav.set_hand_state(&mut r.scene, r.left, Gesture::None);
        assert!(!r.scene.supports_velocity(r.target));
    }
}
