//! Tilt Ball headless entry point
//!
//! Runs the control core against the in-memory host: the player holds the
//! device tilted left and forward, taps the ball once, and rolls through the
//! demo course for a fixed number of frames.
//!
//! Usage: `tilt-ball [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use glam::Vec3;
    use tilt_ball::consts::FRAME_DT;
    use tilt_ball::headless::{HeadlessScene, JitterMotion, RecordingAudio};
    use tilt_ball::sim::{GameEvent, GameLoop, SceneHost, TiltSample};
    use tilt_ball::Settings;

    /// Frames to simulate (20 seconds at 60 Hz, long enough for a reveal)
    const FRAMES: u32 = 20 * 60;
    /// Frame on which the ball is tapped
    const TAP_FRAME: u32 = 90;
    /// Motion updates arrive at a third of the display rate
    const MOTION_INTERVAL: u32 = 3;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tilt Ball (headless) starting...");

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref());

    let category = settings.obstacles.category;
    let mut audio = RecordingAudio::with_all_assets();

    let mut scene = match HeadlessScene::demo_course(category) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Scene setup failed: {}", e);
            std::process::exit(1);
        }
    };
    let registry = match scene.registry(category) {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("Scene setup failed: {}", e);
            std::process::exit(1);
        }
    };
    let mut game = match GameLoop::new(registry, &settings, &mut scene, &mut audio) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Game setup failed: {}", e);
            std::process::exit(1);
        }
    };

    // Forward tilt steers the ball down the course toward the trees
    let mut motion = JitterMotion::new(42, TiltSample::new(0.0, 0.2, 0.0), 0.05, MOTION_INTERVAL);

    let ball_id = game.registry().ball();
    for frame in 0..FRAMES {
        if frame == TAP_FRAME {
            if let Some(point) = scene.screen_point_of(ball_id) {
                game.on_tap(&mut scene, &mut audio, point);
            }
        }

        game.tick(&mut scene, &mut motion, &mut audio, FRAME_DT);
        for (a, b) in scene.step(FRAME_DT) {
            game.push_contact(a, b);
        }

        for event in game.take_events() {
            match event {
                GameEvent::ObstacleHidden(id) => {
                    log::info!("Frame {}: obstacle {:?} cut down", frame, id)
                }
                GameEvent::ObstacleRevealed(id) => {
                    log::info!("Frame {}: obstacle {:?} regrown", frame, id)
                }
                GameEvent::Jumped => log::info!("Frame {}: jump", frame),
            }
        }
    }

    let ball = scene.ball_position();
    let rig = scene.rig_position();
    log::info!(
        "After {} frames: ball={:?} velocity={:?} rig={:?} force={:?}",
        game.frame(),
        ball,
        scene.ball_velocity(),
        rig,
        game.force()
    );
    log::info!(
        "Hidden obstacles: {}, sounds played: {}, camera lag: {:.3}",
        game.hidden_obstacles(),
        audio.plays.len(),
        rig.distance(ball + Vec3::new(0.0, settings.camera.offset_y, settings.camera.offset_z))
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `tilt_ball::sim::GameLoop` from their own render callback
}
