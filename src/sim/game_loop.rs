//! Per-frame orchestration
//!
//! Driven by the host's render callback. Tilt samples and contact begins may
//! arrive at any point between frames; they are only recorded when pushed
//! and acted on during the next [`GameLoop::tick`].

use glam::{Vec2, Vec3};

use super::camera::CameraRig;
use super::contact::{ContactEvent, ContactOutcome, ContactResolver, ObstacleState};
use super::host::{AudioBackend, EntityId, MotionSampler, SceneHost, TiltSample};
use super::input::{Action, InputHandler};
use super::registry::SceneRegistry;
use super::tilt::TiltForceMapper;
use crate::audio::AudioManager;
use crate::error::{SetupError, SetupResult};
use crate::settings::Settings;

/// Things that happened since events were last taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ObstacleHidden(EntityId),
    ObstacleRevealed(EntityId),
    Jumped,
}

pub struct GameLoop {
    registry: SceneRegistry,
    tilt: TiltForceMapper,
    rig: CameraRig,
    contacts: ContactResolver,
    input: InputHandler,
    audio: AudioManager,
    /// Velocity delta applied every tick; overwritten by each new sample
    force: Vec3,
    /// Last rig position written to the host
    camera: Vec3,
    pending_contacts: Vec<ContactEvent>,
    events: Vec<GameEvent>,
    frame: u64,
}

impl GameLoop {
    /// Wire the core to a resolved scene; fails fast on bad settings,
    /// missing sounds, or a registry resolved with a different obstacle
    /// category than the one contacts are reported for
    pub fn new(
        registry: SceneRegistry,
        settings: &Settings,
        scene: &mut dyn SceneHost,
        backend: &mut dyn AudioBackend,
    ) -> SetupResult<Self> {
        settings.validate()?;
        if registry.obstacle_category() != settings.obstacles.category {
            return Err(SetupError::InvalidSetting {
                field: "obstacles.category",
                reason: format!(
                    "scene resolved with category {} but settings use {}",
                    registry.obstacle_category(),
                    settings.obstacles.category
                ),
            });
        }
        let audio = AudioManager::load(backend, &settings.audio)?;

        scene.enable_contact_reports(registry.ball(), settings.obstacles.category);
        for id in registry.obstacles() {
            scene.set_hidden(*id, false);
        }

        let contacts = ContactResolver::new(&registry, settings.obstacles.reveal_delay);
        let input = InputHandler::new(registry.ball(), &settings.jump);

        log::info!(
            "Game loop ready ({} obstacles, reveal after {}s)",
            registry.obstacles().len(),
            settings.obstacles.reveal_delay
        );

        Ok(Self {
            registry,
            tilt: TiltForceMapper::new(&settings.tilt),
            rig: CameraRig::new(&settings.camera),
            contacts,
            input,
            audio,
            force: Vec3::ZERO,
            camera: scene.rig_position(),
            pending_contacts: Vec::new(),
            events: Vec::new(),
            frame: 0,
        })
    }

    /// Tilt callback: the newest sample replaces the current force
    pub fn push_tilt(&mut self, sample: TiltSample) {
        self.force = self.tilt.compute_force(sample);
    }

    /// Contact-begin callback: queued until the next tick
    pub fn push_contact(&mut self, a: EntityId, b: EntityId) {
        self.pending_contacts.push(ContactEvent::new(a, b));
    }

    /// Advance one rendered frame
    pub fn tick(
        &mut self,
        scene: &mut dyn SceneHost,
        motion: &mut dyn MotionSampler,
        backend: &mut dyn AudioBackend,
        dt: f32,
    ) {
        self.frame += 1;

        // Trailing camera
        self.camera = self.rig.update(scene.rig_position(), scene.ball_position());
        scene.set_rig_position(self.camera);

        // A missing sample keeps the previous force in effect
        if let Some(sample) = motion.poll() {
            self.push_tilt(sample);
        }
        scene.apply_velocity_delta(self.force);

        for event in std::mem::take(&mut self.pending_contacts) {
            let outcome = self
                .contacts
                .handle(event, &self.registry, scene, &self.audio, backend);
            if let ContactOutcome::Hid(id) = outcome {
                self.events.push(GameEvent::ObstacleHidden(id));
            }
        }

        for id in self.contacts.advance(dt, scene) {
            self.events.push(GameEvent::ObstacleRevealed(id));
        }
    }

    /// Tap gesture at a screen point; impulse and sound are applied together
    pub fn on_tap(
        &mut self,
        scene: &mut dyn SceneHost,
        backend: &mut dyn AudioBackend,
        point: Vec2,
    ) -> Option<Action> {
        let action = self.input.on_tap(scene.hit_test(point))?;
        scene.apply_impulse(action.impulse);
        self.audio.play(backend, action.sound);
        self.events.push(GameEvent::Jumped);
        log::debug!("Jump at frame {}", self.frame);
        Some(action)
    }

    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Rig position written by the latest tick (the host's value before the first)
    pub fn camera_position(&self) -> Vec3 {
        self.camera
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain events recorded by ticks and taps since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn obstacle_state(&self, id: EntityId) -> Option<ObstacleState> {
        self.contacts.state(id)
    }

    pub fn hidden_obstacles(&self) -> usize {
        self.contacts.hidden_count()
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CATEGORY_OBSTACLE, FRAME_DT};
    use crate::headless::{HeadlessScene, RecordingAudio, ScriptedMotion};
    use crate::sim::registry::NodeDescriptor;

    const BALL: EntityId = EntityId(1);
    const TREE: EntityId = EntityId(10);

    fn setup() -> (GameLoop, HeadlessScene, RecordingAudio) {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        let mut audio = RecordingAudio::with_all_assets();
        let registry = scene.registry(CATEGORY_OBSTACLE).unwrap();
        let game = GameLoop::new(registry, &Settings::default(), &mut scene, &mut audio).unwrap();
        audio.plays.clear();
        (game, scene, audio)
    }

    #[test]
    fn test_setup_enables_contact_reports() {
        let (_game, scene, _audio) = setup();
        assert_eq!(scene.contact_reports(), Some((BALL, 2)));
    }

    #[test]
    fn test_setup_fails_without_sounds() {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        let mut audio = RecordingAudio::with_files(&["jump.wav"]);
        let registry = scene.registry(CATEGORY_OBSTACLE).unwrap();
        assert!(GameLoop::new(registry, &Settings::default(), &mut scene, &mut audio).is_err());
    }

    #[test]
    fn test_tick_moves_camera_toward_ball() {
        let (mut game, mut scene, mut audio) = setup();
        scene.set_ball(Vec3::ZERO, Vec3::ZERO);
        scene.set_rig_position(Vec3::ZERO);
        game.tick(&mut scene, &mut ScriptedMotion::silent(), &mut audio, FRAME_DT);
        let rig = scene.rig_position();
        assert!((rig.y - 1.5).abs() < 1e-6);
        assert!((rig.z - 1.5).abs() < 1e-6);
        assert_eq!(game.camera_position(), rig);
    }

    #[test]
    fn test_camera_position_starts_at_host_rig() {
        let (game, scene, _audio) = setup();
        assert_eq!(game.camera_position(), scene.rig_position());
        assert_eq!(game.camera_position(), Vec3::new(0.0, 5.0, 5.0));
    }

    #[test]
    fn test_category_mismatch_rejected() {
        let mut scene = HeadlessScene::demo_course(CATEGORY_OBSTACLE).unwrap();
        let mut audio = RecordingAudio::with_all_assets();
        let registry = scene.registry(CATEGORY_OBSTACLE).unwrap();
        let settings = Settings::from_json(r#"{ "obstacles": { "category": 8 } }"#).unwrap();
        let err = GameLoop::new(registry, &settings, &mut scene, &mut audio).err();
        assert!(matches!(
            err,
            Some(SetupError::InvalidSetting {
                field: "obstacles.category",
                ..
            })
        ));
    }

    #[test]
    fn test_custom_category_trees_are_cut() {
        let settings = Settings::from_json(r#"{ "obstacles": { "category": 8 } }"#).unwrap();
        let mut scene = HeadlessScene::demo_course(8).unwrap();
        let mut audio = RecordingAudio::with_all_assets();
        let registry = scene.registry(settings.obstacles.category).unwrap();
        assert_eq!(registry.obstacles().len(), 3);
        let mut game = GameLoop::new(registry, &settings, &mut scene, &mut audio).unwrap();
        assert_eq!(scene.contact_reports(), Some((BALL, 8)));

        let tree = scene.node_position(TREE).unwrap();
        scene.set_gravity(0.0);
        scene.set_ball(tree + Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -6.0));
        let mut motion = ScriptedMotion::silent();
        for _ in 0..120 {
            game.tick(&mut scene, &mut motion, &mut audio, FRAME_DT);
            for (a, b) in scene.step(FRAME_DT) {
                game.push_contact(a, b);
            }
        }
        assert!(scene.is_hidden(TREE));
        assert_eq!(game.obstacle_state(TREE), Some(ObstacleState::Hidden));
    }

    #[test]
    fn test_scene_without_ball_fails_setup() {
        let nodes = vec![
            (NodeDescriptor::new(3, "selfieStick", 0), Vec3::ZERO, 0.0),
            (NodeDescriptor::new(10, "tree", CATEGORY_OBSTACLE), Vec3::ZERO, 0.6),
        ];
        assert!(matches!(
            HeadlessScene::new(nodes),
            Err(SetupError::MissingNode("ball"))
        ));
    }

    #[test]
    fn test_latest_sample_wins() {
        let (mut game, mut scene, mut audio) = setup();
        scene.set_ball(Vec3::ZERO, Vec3::ZERO);

        game.push_tilt(TiltSample::new(1.0, 0.0, 0.0));
        game.push_tilt(TiltSample::new(-1.0, 0.4, 0.0));
        game.push_tilt(TiltSample::new(0.5, -0.8, 0.0));
        game.tick(&mut scene, &mut ScriptedMotion::silent(), &mut audio, FRAME_DT);

        let expected = TiltForceMapper::default().compute_force(TiltSample::new(0.5, -0.8, 0.0));
        assert_eq!(game.force(), expected);
        assert_eq!(scene.velocity_deltas(), &[expected]);
    }

    #[test]
    fn test_stale_force_is_carried_forward() {
        let (mut game, mut scene, mut audio) = setup();
        let sample = TiltSample::new(1.0, 0.0, 0.0);
        let mut motion = ScriptedMotion::new(vec![Some(sample), None, None]);

        for _ in 0..3 {
            game.tick(&mut scene, &mut motion, &mut audio, FRAME_DT);
        }

        let force = TiltForceMapper::default().compute_force(sample);
        assert_eq!(scene.velocity_deltas(), &[force, force, force]);
    }

    #[test]
    fn test_velocity_accumulates_across_ticks() {
        let (mut game, mut scene, mut audio) = setup();
        scene.set_ball(Vec3::ZERO, Vec3::ZERO);
        scene.set_gravity(0.0);
        game.push_tilt(TiltSample::new(1.0, -0.8, 0.0));
        for _ in 0..4 {
            game.tick(&mut scene, &mut ScriptedMotion::silent(), &mut audio, FRAME_DT);
        }
        assert!((scene.ball_velocity().x - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_contact_hides_then_reveals() {
        let (mut game, mut scene, mut audio) = setup();
        let mut motion = ScriptedMotion::silent();

        game.push_contact(TREE, BALL);
        game.push_contact(BALL, TREE);
        game.tick(&mut scene, &mut motion, &mut audio, FRAME_DT);

        assert_eq!(game.events(), &[GameEvent::ObstacleHidden(TREE)]);
        assert_eq!(game.obstacle_state(TREE), Some(ObstacleState::Hidden));
        assert!(scene.is_hidden(TREE));
        assert_eq!(audio.plays_of("chainsaw.wav"), 1);

        let mut revealed = 0;
        for _ in 0..(16 * 60) {
            game.tick(&mut scene, &mut motion, &mut audio, FRAME_DT);
            revealed += game
                .take_events()
                .iter()
                .filter(|e| **e == GameEvent::ObstacleRevealed(TREE))
                .count();
        }
        assert_eq!(revealed, 1);
        assert_eq!(game.obstacle_state(TREE), Some(ObstacleState::Visible));
        assert!(!scene.is_hidden(TREE));
    }

    #[test]
    fn test_tap_on_ball_applies_whole_action() {
        let (mut game, mut scene, mut audio) = setup();
        let point = scene.screen_point_of(BALL).unwrap();

        let action = game.on_tap(&mut scene, &mut audio, point).unwrap();
        assert_eq!(action.impulse, Vec3::new(0.0, 4.0, -2.0));
        assert_eq!(scene.impulses(), &[Vec3::new(0.0, 4.0, -2.0)]);
        assert_eq!(audio.plays_of("jump.wav"), 1);
        assert_eq!(game.events(), &[GameEvent::Jumped]);
    }

    #[test]
    fn test_tap_on_empty_space_does_nothing() {
        let (mut game, mut scene, mut audio) = setup();
        assert!(game.on_tap(&mut scene, &mut audio, Vec2::new(-1000.0, -1000.0)).is_none());
        assert!(scene.impulses().is_empty());
        assert!(audio.plays.is_empty());
    }

    #[test]
    fn test_rolling_into_tree_hides_it() {
        let (mut game, mut scene, mut audio) = setup();
        let tree = scene.node_position(TREE).unwrap();
        scene.set_gravity(0.0);
        scene.set_ball(tree + Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -6.0));
        let mut motion = ScriptedMotion::silent();

        for _ in 0..120 {
            game.tick(&mut scene, &mut motion, &mut audio, FRAME_DT);
            for (a, b) in scene.step(FRAME_DT) {
                game.push_contact(a, b);
            }
        }
        assert!(scene.is_hidden(TREE));
        assert_eq!(audio.plays_of("chainsaw.wav"), 1);
    }
}
