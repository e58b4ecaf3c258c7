use brickyard_assets::Prop;
use brickyard_hud::{HudRenderer, HudText, RenderView, Renderer};
use brickyard_input::{Action, InputState, Key, KeyBindings};
use brickyard_kernel::{ConfigError, GameConfig, GameEvent, MoveIntent, ObstacleKind, World};

use crate::script::Step;

/// Which camera the renderer should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Overview,
    Follow,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Overview => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Overview,
        }
    }
}

/// The single game-loop driver. Owns the world and everything that feeds it.
pub struct Session {
    world: World,
    bindings: KeyBindings,
    input: InputState,
    camera: CameraMode,
    // Fixed timestep
    tick_accumulator: f64,
    tick_rate: f64,
}

/// Ticks one `update` may run; any backlog beyond is dropped.
const MAX_TICKS_PER_UPDATE: u32 = 15;

impl Session {
    pub fn new(config: GameConfig, bindings: KeyBindings) -> Result<Self, ConfigError> {
        Ok(Self {
            world: World::new(config)?,
            bindings,
            input: InputState::new(),
            camera: CameraMode::default(),
            tick_accumulator: 0.0,
            tick_rate: f64::from(1.0f32 / 60.0),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> CameraMode {
        self.camera
    }

    /// Seconds per fixed tick.
    pub fn tick_rate(&self) -> f32 {
        self.tick_rate as f32
    }

    pub fn view(&self) -> RenderView {
        match self.camera {
            CameraMode::Overview => RenderView::overview(),
            CameraMode::Follow => RenderView::follow(self.world.player()),
        }
    }

    pub fn hud(&self) -> HudText {
        HudRenderer.render(&self.world, &self.view())
    }

    /// Register a loaded model as a static obstacle.
    pub fn add_prop(&mut self, prop: &Prop) {
        self.world.add_obstacle(prop.bounds, ObstacleKind::Prop);
        tracing::info!(name = %prop.name, "prop placed");
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if !pressed {
            self.input.release(key);
            return;
        }
        let Some(action) = self.input.press(key, &self.bindings) else {
            return;
        };
        match action {
            // Rejections are logged by the kernel.
            Action::Interact => {
                let _ = self.world.primary_action();
            }
            Action::ToggleWheelbarrow => {
                let _ = self.world.toggle_wheelbarrow();
            }
            Action::ToggleCamera => {
                self.camera = self.camera.toggled();
                tracing::info!(camera = ?self.camera, "camera switched");
            }
            Action::Restart => {
                self.world.reset();
                self.input.clear();
                self.tick_accumulator = 0.0;
            }
            Action::MoveForward | Action::MoveBackward | Action::TurnLeft | Action::TurnRight => {}
        }
        self.log_events();
    }

    /// Advance by `dt` seconds in fixed ticks. Returns the number of ticks run.
    ///
    /// At most [`MAX_TICKS_PER_UPDATE`] ticks run per call.
    pub fn update(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let axes = self.input.axes(&self.bindings);
        let intent = MoveIntent::new(axes.forward, axes.turn);
        self.tick_accumulator += f64::from(dt);
        let step = self.tick_rate as f32;
        let mut ticks = 0;
        while self.tick_accumulator >= self.tick_rate {
            if ticks == MAX_TICKS_PER_UPDATE {
                tracing::debug!(dropped = self.tick_accumulator, "frame backlog dropped");
                self.tick_accumulator = 0.0;
                break;
            }
            self.tick_accumulator -= self.tick_rate;
            let outcome = self.world.step(step, intent);
            tracing::trace!(?outcome, "tick");
            ticks += 1;
        }
        self.log_events();
        ticks
    }

    /// Run one script step, one fixed tick per counted tick.
    pub fn apply(&mut self, step: Step) {
        let dt = self.tick_rate();
        match step {
            Step::Tap(key) => {
                self.handle_key(key, true);
                self.update(dt);
                self.handle_key(key, false);
            }
            Step::Hold(key, n) => {
                self.handle_key(key, true);
                for _ in 0..n {
                    self.update(dt);
                }
                self.handle_key(key, false);
            }
            Step::Wait(n) => {
                for _ in 0..n {
                    self.update(dt);
                }
            }
        }
    }

    fn log_events(&mut self) {
        for event in self.world.drain_events() {
            match event {
                GameEvent::GameWon { delivered } => {
                    tracing::info!(delivered, "wall finished")
                }
                other => tracing::debug!(event = ?other, "event"),
            }
        }
    }
}
