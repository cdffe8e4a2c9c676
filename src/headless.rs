//! In-memory host
//!
//! A minimal stand-in for the GUI/physics/audio layer so the core can run
//! without a window: spheres on a ground plane, Euler integration,
//! top-down hit testing and contact-begin detection. Not a physics engine.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{BALL_NODE_NAME, CAMERA_RIG_NODE_NAME, MUSIC_FILE};
use crate::error::{SetupError, SetupResult};
use crate::sim::host::{
    AudioBackend, ClipId, EntityId, HitInfo, MotionSampler, SceneHost, TiltSample,
};
use crate::sim::registry::{NodeDescriptor, SceneRegistry};

/// Downward acceleration (units/s²)
pub const DEFAULT_GRAVITY: f32 = 9.8;

#[derive(Debug, Clone)]
struct Node {
    desc: NodeDescriptor,
    position: Vec3,
    /// Bounding sphere; 0 for nodes without geometry
    radius: f32,
    hidden: bool,
}

/// Scene made of spheres
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    nodes: Vec<Node>,
    index: HashMap<EntityId, usize>,
    ball: usize,
    rig: usize,
    ball_velocity: Vec3,
    gravity: f32,
    contact_reports: Option<(EntityId, u32)>,
    touching: HashSet<EntityId>,
    velocity_deltas: Vec<Vec3>,
    impulses: Vec<Vec3>,
}

impl HeadlessScene {
    /// Build from node descriptors with positions and radii.
    /// Nodes named `ball` and `selfieStick` must be present.
    pub fn new(nodes: Vec<(NodeDescriptor, Vec3, f32)>) -> SetupResult<Self> {
        let nodes: Vec<Node> = nodes
            .into_iter()
            .map(|(desc, position, radius)| Node {
                desc,
                position,
                radius,
                hidden: false,
            })
            .collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.desc.id, i))
            .collect();
        let ball = nodes
            .iter()
            .position(|n| n.desc.name == BALL_NODE_NAME)
            .ok_or(SetupError::MissingNode(BALL_NODE_NAME))?;
        let rig = nodes
            .iter()
            .position(|n| n.desc.name == CAMERA_RIG_NODE_NAME)
            .ok_or(SetupError::MissingNode(CAMERA_RIG_NODE_NAME))?;

        Ok(Self {
            nodes,
            index,
            ball,
            rig,
            ball_velocity: Vec3::ZERO,
            gravity: DEFAULT_GRAVITY,
            contact_reports: None,
            touching: HashSet::new(),
            velocity_deltas: Vec::new(),
            impulses: Vec::new(),
        })
    }

    /// Small course: a ball on a floor with three trees ahead of it.
    /// Trees carry `obstacle_category` as their physics category.
    pub fn demo_course(obstacle_category: u32) -> SetupResult<Self> {
        let nodes = vec![
            (NodeDescriptor::new(1, "ball", 1), Vec3::new(0.0, 0.5, 0.0), 0.5),
            (NodeDescriptor::new(2, "floor", 4), Vec3::new(0.0, -50.0, 0.0), 50.0),
            (NodeDescriptor::new(3, "selfieStick", 0), Vec3::new(0.0, 5.0, 5.0), 0.0),
            (
                NodeDescriptor::new(10, "tree", obstacle_category),
                Vec3::new(0.0, 0.5, -8.0),
                0.6,
            ),
            (
                NodeDescriptor::new(11, "tree", obstacle_category),
                Vec3::new(3.0, 0.5, -14.0),
                0.6,
            ),
            (
                NodeDescriptor::new(12, "tree", obstacle_category),
                Vec3::new(-3.0, 0.5, -20.0),
                0.6,
            ),
        ];
        Self::new(nodes)
    }

    pub fn descriptors(&self) -> Vec<NodeDescriptor> {
        self.nodes.iter().map(|n| n.desc.clone()).collect()
    }

    /// Resolve roles; pass the same category the game loop reports contacts for
    pub fn registry(&self, obstacle_category: u32) -> SetupResult<SceneRegistry> {
        SceneRegistry::resolve(&self.descriptors(), obstacle_category)
    }

    pub fn set_ball(&mut self, position: Vec3, velocity: Vec3) {
        self.nodes[self.ball].position = position;
        self.ball_velocity = velocity;
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn ball_velocity(&self) -> Vec3 {
        self.ball_velocity
    }

    pub fn node_position(&self, id: EntityId) -> Option<Vec3> {
        self.index.get(&id).map(|i| self.nodes[*i].position)
    }

    pub fn is_hidden(&self, id: EntityId) -> bool {
        self.index.get(&id).is_some_and(|i| self.nodes[*i].hidden)
    }

    /// Top-down projection: screen (u, v) is world (x, z)
    pub fn screen_point_of(&self, id: EntityId) -> Option<Vec2> {
        self.node_position(id).map(|p| Vec2::new(p.x, p.z))
    }

    pub fn contact_reports(&self) -> Option<(EntityId, u32)> {
        self.contact_reports
    }

    /// Every velocity delta applied so far
    pub fn velocity_deltas(&self) -> &[Vec3] {
        &self.velocity_deltas
    }

    /// Every impulse applied so far
    pub fn impulses(&self) -> &[Vec3] {
        &self.impulses
    }

    /// Integrate the ball and return contact begins as (ball, other) pairs
    pub fn step(&mut self, dt: f32) -> Vec<(EntityId, EntityId)> {
        self.ball_velocity.y -= self.gravity * dt;

        let ball = &mut self.nodes[self.ball];
        ball.position += self.ball_velocity * dt;
        if ball.position.y < ball.radius {
            ball.position.y = ball.radius;
            self.ball_velocity.y = self.ball_velocity.y.max(0.0);
        }

        let Some((reporter, mask)) = self.contact_reports else {
            return Vec::new();
        };
        let ball = &self.nodes[self.ball];
        let mut begins = Vec::new();
        let mut touching = HashSet::new();
        for node in &self.nodes {
            if node.desc.id == reporter || node.hidden || node.desc.category & mask == 0 {
                continue;
            }
            let reach = ball.radius + node.radius;
            if ball.position.distance_squared(node.position) <= reach * reach {
                touching.insert(node.desc.id);
                if !self.touching.contains(&node.desc.id) {
                    begins.push((reporter, node.desc.id));
                }
            }
        }
        self.touching = touching;
        begins
    }
}

impl SceneHost for HeadlessScene {
    fn ball_position(&self) -> Vec3 {
        self.nodes[self.ball].position
    }

    fn rig_position(&self) -> Vec3 {
        self.nodes[self.rig].position
    }

    fn set_rig_position(&mut self, pos: Vec3) {
        self.nodes[self.rig].position = pos;
    }

    fn apply_velocity_delta(&mut self, delta: Vec3) {
        self.ball_velocity += delta;
        self.velocity_deltas.push(delta);
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        // Unit mass
        self.ball_velocity += impulse;
        self.impulses.push(impulse);
    }

    fn set_hidden(&mut self, entity: EntityId, hidden: bool) {
        if let Some(i) = self.index.get(&entity) {
            self.nodes[*i].hidden = hidden;
        }
    }

    fn hit_test(&self, screen_point: Vec2) -> Option<HitInfo> {
        self.nodes
            .iter()
            .filter(|n| !n.hidden && n.radius > 0.0)
            .filter(|n| Vec2::new(n.position.x, n.position.z).distance(screen_point) <= n.radius)
            .max_by(|a, b| {
                (a.position.y + a.radius)
                    .partial_cmp(&(b.position.y + b.radius))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|n| HitInfo {
                entity: n.desc.id,
                point: n.position + Vec3::Y * n.radius,
            })
    }

    fn enable_contact_reports(&mut self, entity: EntityId, category: u32) {
        self.contact_reports = Some((entity, category));
    }
}

/// Audio backend that records instead of playing
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    available: Vec<String>,
    loaded: Vec<String>,
    /// (file, volume, looping) per play call
    pub plays: Vec<(String, f32, bool)>,
}

impl RecordingAudio {
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            available: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_all_assets() -> Self {
        Self::with_files(&["chainsaw.wav", "jump.wav", MUSIC_FILE])
    }

    pub fn plays_of(&self, file: &str) -> usize {
        self.plays.iter().filter(|(f, _, _)| f == file).count()
    }
}

impl AudioBackend for RecordingAudio {
    fn load(&mut self, file_name: &str) -> Option<ClipId> {
        if !self.available.iter().any(|f| f == file_name) {
            return None;
        }
        self.loaded.push(file_name.to_string());
        Some(ClipId(self.loaded.len() as u32 - 1))
    }

    fn play(&mut self, clip: ClipId, volume: f32, looping: bool) {
        if let Some(file) = self.loaded.get(clip.0 as usize) {
            self.plays.push((file.clone(), volume, looping));
        }
    }
}

/// Replays a fixed list of polls, then stays silent
#[derive(Debug, Clone, Default)]
pub struct ScriptedMotion {
    script: std::collections::VecDeque<Option<TiltSample>>,
}

impl ScriptedMotion {
    pub fn new(script: Vec<Option<TiltSample>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }
}

impl MotionSampler for ScriptedMotion {
    fn poll(&mut self) -> Option<TiltSample> {
        self.script.pop_front().flatten()
    }
}

/// Noisy tilt around a base reading, delivered every `interval` polls
#[derive(Debug, Clone)]
pub struct JitterMotion {
    base: TiltSample,
    amplitude: f32,
    interval: u32,
    polls: u32,
    rng: Pcg32,
}

impl JitterMotion {
    pub fn new(seed: u64, base: TiltSample, amplitude: f32, interval: u32) -> Self {
        Self {
            base,
            amplitude: amplitude.abs(),
            interval: interval.max(1),
            polls: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_base(&mut self, base: TiltSample) {
        self.base = base;
    }

    fn noise(&mut self) -> f32 {
        if self.amplitude == 0.0 {
            0.0
        } else {
            self.rng.random_range(-self.amplitude..=self.amplitude)
        }
    }
}

impl MotionSampler for JitterMotion {
    fn poll(&mut self) -> Option<TiltSample> {
        self.polls += 1;
        if self.polls % self.interval != 0 {
            return None;
        }
        Some(TiltSample::new(
            self.base.x + self.noise(),
            self.base.y + self.noise(),
            self.base.z + self.noise(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CATEGORY_OBSTACLE;

    #[test]
    fn test_hit_test_prefers_ball_over_floor() {
        let scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        let hit = scene.hit_test(Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(hit.entity, EntityId(1));
        let floor = scene.hit_test(Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(floor.entity, EntityId(2));
        assert!(scene.hit_test(Vec2::new(-1000.0, -1000.0)).is_none());
    }

    #[test]
    fn test_hidden_nodes_are_not_hit() {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        let p = scene.screen_point_of(EntityId(10)).unwrap();
        assert_eq!(scene.hit_test(p).unwrap().entity, EntityId(10));
        scene.set_hidden(EntityId(10), true);
        assert_eq!(scene.hit_test(p).unwrap().entity, EntityId(2));
    }

    #[test]
    fn test_missing_rig_fails_fast() {
        let nodes = vec![(NodeDescriptor::new(1, "ball", 1), Vec3::ZERO, 0.5)];
        assert!(matches!(
            HeadlessScene::new(nodes),
            Err(SetupError::MissingNode("selfieStick"))
        ));
    }

    #[test]
    fn test_demo_course_uses_given_category() {
        let scene = HeadlessScene::demo_course(8).unwrap();
        let registry = scene.registry(8).unwrap();
        assert_eq!(registry.obstacles(), &[EntityId(10), EntityId(11), EntityId(12)]);
        assert!(scene.registry(CATEGORY_OBSTACLE).unwrap().obstacles().is_empty());
    }

    #[test]
    fn test_ball_rests_on_ground() {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        for _ in 0..60 {
            scene.step(1.0 / 60.0);
        }
        assert!((scene.ball_position().y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_contacts_only_on_begin() {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        scene.enable_contact_reports(EntityId(1), CATEGORY_OBSTACLE);
        scene.set_gravity(0.0);
        scene.set_ball(Vec3::new(0.0, 0.5, -7.5), Vec3::ZERO);
        assert_eq!(scene.step(0.01), vec![(EntityId(1), EntityId(10))]);
        assert!(scene.step(0.01).is_empty());
    }

    #[test]
    fn test_no_contacts_without_reports() {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        scene.set_ball(Vec3::new(0.0, 0.5, -7.5), Vec3::ZERO);
        assert!(scene.step(0.01).is_empty());
    }

    #[test]
    fn test_jitter_motion_lags_and_is_deterministic() {
        let base = TiltSample::new(0.1, -0.8, 0.0);
        let mut a = JitterMotion::new(7, base, 0.05, 3);
        let mut b = JitterMotion::new(7, base, 0.05, 3);
        let polls_a: Vec<_> = (0..9).map(|_| a.poll()).collect();
        let polls_b: Vec<_> = (0..9).map(|_| b.poll()).collect();
        assert_eq!(polls_a, polls_b);
        assert_eq!(polls_a.iter().filter(|p| p.is_some()).count(), 3);
        for sample in polls_a.into_iter().flatten() {
            assert!((sample.x - base.x).abs() <= 0.05 + 1e-6);
        }
    }
}
