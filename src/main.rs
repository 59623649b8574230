//! Tile Hop entry point
//!
//! Headless host: loads settings, runs the fixed-timestep loop with a
//! scripted input track and records draw calls instead of presenting them.
//!
//! Usage: `tile-hop [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use tile_hop::consts::SIM_DT;
    use tile_hop::render::RecordingTarget;
    use tile_hop::{FrameInput, FsAssets, Scene, Settings};

    /// Host frame length, deliberately off the sim rate
    const HOST_DT: f32 = 1.0 / 50.0;
    const DEFAULT_FRAMES: u32 = 600;

    struct Game {
        scene: Scene,
        target: RecordingTarget,
        accumulator: f32,
        max_substeps: u32,
        time: f32,
    }

    impl Game {
        fn new(settings: &Settings) -> Self {
            let assets = FsAssets::new(settings.asset_dir.clone());
            let mut scene = Scene::with_settings(assets, settings);
            scene.request_load(settings.start_level.clone());
            Self {
                scene,
                target: RecordingTarget::new(settings.view),
                accumulator: 0.0,
                max_substeps: settings.max_substeps,
                time: 0.0,
            }
        }

        /// Walk right, hop every two seconds
        fn scripted_input(&self) -> FrameInput {
            FrameInput {
                left: false,
                right: true,
                jump: self.time % 2.0 < 0.25,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.time += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < self.max_substeps {
                self.scene.set_input(self.scripted_input());
                if let Err(err) = self.scene.update(SIM_DT) {
                    log::error!("Frame {}: {}", self.scene.frame(), err);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        fn render(&mut self) {
            self.target.clear();
            self.scene.render(&mut self.target);
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings_path = PathBuf::from(args.next().unwrap_or_else(|| "settings.json".into()));
        let frames = match args.next().map(|s| s.parse::<u32>()) {
            Some(Ok(frames)) => frames,
            Some(Err(err)) => {
                log::warn!("Bad frame count ({}), using {}", err, DEFAULT_FRAMES);
                DEFAULT_FRAMES
            }
            None => DEFAULT_FRAMES,
        };

        let settings = Settings::load(&settings_path);
        let mut game = Game::new(&settings);
        for _ in 0..frames {
            game.update(HOST_DT);
            game.render();
        }

        log::info!(
            "Ran {} host frames ({} sim frames) on level {:?}",
            frames,
            game.scene.frame(),
            game.scene.current_level()
        );
        if let Some(hero) = game.scene.hero() {
            log::info!("Hero at {}", hero.position);
        }
        log::info!(
            "Coins: {}, last frame drew {} sprites",
            game.scene.coins().unwrap_or(0),
            game.target.sprite_count()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Hop (headless) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by the embedding page
}
