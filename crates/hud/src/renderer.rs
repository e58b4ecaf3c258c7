use glam::Vec3;

use brickyard_kernel::{BrickPlacement, Player, World};

use crate::hud::{HudInput, HudText, project};

/// Where an external renderer should put its camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::overview()
    }
}

impl RenderView {
    /// Drone view over the whole yard: orbit angles (1.3 pi, pi / 3) at
    /// radius 30 around (0, 2, 0).
    pub fn overview() -> Self {
        let target = Vec3::new(0.0, 2.0, 0.0);
        let (alpha, beta, radius) = (std::f32::consts::PI * 1.3, std::f32::consts::FRAC_PI_3, 30.0);
        let offset = Vec3::new(
            radius * alpha.cos() * beta.sin(),
            radius * beta.cos(),
            radius * alpha.sin() * beta.sin(),
        );
        Self {
            eye: target + offset,
            target,
            fov_degrees: 60.0,
        }
    }

    /// Third-person camera behind and above the player.
    pub fn follow(player: &Player) -> Self {
        let forward = player.forward();
        Self {
            eye: player.position - forward * 6.0 + Vec3::new(0.0, 3.5, 0.0),
            target: player.position + forward * 2.0,
            fov_degrees: 60.0,
        }
    }
}

/// Read-only view of the world turned into some output.
///
/// Implementations never mutate the world.
pub trait Renderer {
    type Output;

    fn render(&self, world: &World, view: &RenderView) -> Self::Output;
}

/// Status line and hint text. The camera does not matter to the HUD.
#[derive(Debug, Default)]
pub struct HudRenderer;

impl Renderer for HudRenderer {
    type Output = HudText;

    fn render(&self, world: &World, _view: &RenderView) -> HudText {
        project(&HudInput::from_world(world))
    }
}

/// Human-readable scene dump for the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn v3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &RenderView) -> String {
        let mut out = String::new();
        let state = world.state();
        let player = world.player();
        let barrow = world.wheelbarrow();
        out.push_str(&format!(
            "=== Brick yard (tick={}, state={:?}) ===\n",
            world.tick(),
            world.carry_state()
        ));
        out.push_str(&format!(
            "Camera: eye={} target={} fov={:.0}\n",
            v3(view.eye),
            v3(view.target),
            view.fov_degrees
        ));
        out.push_str(&format!("Player: pos={} yaw={:.2}\n", v3(player.position), player.yaw));
        out.push_str(&format!(
            "Wheelbarrow: pos={} yaw={:.2} attached={}\n",
            v3(barrow.position),
            barrow.yaw,
            barrow.attached
        ));
        out.push_str(&format!(
            "Pile: {} | Carried: {} | Delivered: {} / {} | Obstacles: {}\n",
            world.pickup_pile().len(),
            world.carried().len(),
            state.delivered,
            state.target,
            world.obstacles().len()
        ));
        for (id, brick) in world.bricks() {
            let Some(t) = world.brick_transform(*id) else {
                continue;
            };
            let place = match brick.placement {
                BrickPlacement::Pile { .. } => "pile".to_string(),
                BrickPlacement::Wheelbarrow { slot } => format!("slot {slot}"),
                BrickPlacement::Delivered { index } => format!("wall {index}"),
            };
            out.push_str(&format!("  [{id}] {place} pos={}\n", v3(t.position)));
        }
        out
    }
}
