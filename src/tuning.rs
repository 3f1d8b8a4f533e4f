//! Live-tunable gameplay parameters
//!
//! Everything the parameter panel can change. Values are clamped to their
//! slider ranges whenever they are set or loaded.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::platform::{self, Slot};
use crate::sim::{ParticleParams, TurretParams};

/// How a parameter is edited on the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    Slider { min: f32, max: f32 },
    Toggle,
}

/// One panel row
///
/// Particle spawn rate has no row: explosions are one-shot 50-particle
/// bursts rather than a continuous emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TuningParam {
    TurretRate,
    TurretLife,
    VelocityX,
    VelocityY,
    DrawHeading,
    DrawPath,
    PathScale,
    PathCycles,
    ParticleVelocityX,
    ParticleVelocityY,
    Damping,
    Gravity,
    Radius,
    Lifespan,
    TurbulenceMinX,
    TurbulenceMinY,
    TurbulenceMaxX,
    TurbulenceMaxY,
    RadialForce,
    Clamping,
}

impl TuningParam {
    /// Panel order
    pub const ALL: [TuningParam; 20] = [
        TuningParam::TurretRate,
        TuningParam::TurretLife,
        TuningParam::VelocityX,
        TuningParam::VelocityY,
        TuningParam::DrawHeading,
        TuningParam::DrawPath,
        TuningParam::PathScale,
        TuningParam::PathCycles,
        TuningParam::ParticleVelocityX,
        TuningParam::ParticleVelocityY,
        TuningParam::Damping,
        TuningParam::Gravity,
        TuningParam::Radius,
        TuningParam::Lifespan,
        TuningParam::TurbulenceMinX,
        TuningParam::TurbulenceMinY,
        TuningParam::TurbulenceMaxX,
        TuningParam::TurbulenceMaxY,
        TuningParam::RadialForce,
        TuningParam::Clamping,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TuningParam::TurretRate => "Rate",
            TuningParam::TurretLife => "Life",
            TuningParam::VelocityX => "Velocity X",
            TuningParam::VelocityY => "Velocity Y",
            TuningParam::DrawHeading => "Draw heading",
            TuningParam::DrawPath => "Draw path",
            TuningParam::PathScale => "Path scale",
            TuningParam::PathCycles => "Path cycles",
            TuningParam::ParticleVelocityX => "Particle vel X",
            TuningParam::ParticleVelocityY => "Particle vel Y",
            TuningParam::Damping => "Damping",
            TuningParam::Gravity => "Gravity",
            TuningParam::Radius => "Radius",
            TuningParam::Lifespan => "Lifespan",
            TuningParam::TurbulenceMinX => "Turbulence min X",
            TuningParam::TurbulenceMinY => "Turbulence min Y",
            TuningParam::TurbulenceMaxX => "Turbulence max X",
            TuningParam::TurbulenceMaxY => "Turbulence max Y",
            TuningParam::RadialForce => "Radial force",
            TuningParam::Clamping => "Clamping",
        }
    }

    pub fn kind(&self) -> ParamKind {
        use ParamKind::{Slider, Toggle};
        match self {
            TuningParam::TurretRate => Slider { min: 1.0, max: 10.0 },
            TuningParam::TurretLife => Slider { min: 0.1, max: 10.0 },
            TuningParam::VelocityX | TuningParam::VelocityY => Slider {
                min: -1000.0,
                max: 1000.0,
            },
            TuningParam::DrawHeading | TuningParam::DrawPath => Toggle,
            TuningParam::PathScale => Slider { min: 1.0, max: 400.0 },
            TuningParam::PathCycles => Slider { min: 1.0, max: 10.0 },
            TuningParam::ParticleVelocityX | TuningParam::ParticleVelocityY => {
                Slider { min: 0.0, max: 100.0 }
            }
            TuningParam::Damping => Slider { min: 0.1, max: 1.0 },
            TuningParam::Gravity => Slider { min: 1.0, max: 20.0 },
            TuningParam::Radius => Slider { min: 1.0, max: 8.0 },
            TuningParam::Lifespan => Slider { min: 0.1, max: 5.0 },
            TuningParam::TurbulenceMinX
            | TuningParam::TurbulenceMinY
            | TuningParam::TurbulenceMaxX
            | TuningParam::TurbulenceMaxY => Slider {
                min: -20.0,
                max: 20.0,
            },
            TuningParam::RadialForce => Slider {
                min: 100.0,
                max: 5000.0,
            },
            TuningParam::Clamping => Slider { min: 0.0, max: 100.0 },
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self.kind(), ParamKind::Toggle)
    }

    /// Clamp a raw value into this parameter's range
    pub fn clamp(&self, value: f32) -> f32 {
        match self.kind() {
            ParamKind::Slider { min, max } => {
                if value.is_nan() {
                    min
                } else {
                    value.clamp(min, max)
                }
            }
            ParamKind::Toggle => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Panel-editable values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Shots per second
    pub turret_rate: f32,
    /// Missile life in seconds
    pub turret_life: f32,
    pub velocity: Vec2,
    pub draw_heading: bool,
    pub draw_path: bool,
    pub path_scale: f32,
    pub path_cycles: f32,
    pub particle_velocity: Vec2,
    pub damping: f32,
    pub gravity: f32,
    /// Particle radius in pixels
    pub radius: f32,
    /// Particle life in seconds
    pub lifespan: f32,
    pub turbulence_min: Vec2,
    pub turbulence_max: Vec2,
    pub radial_force: f32,
    pub clamping: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            turret_rate: 10.0,
            turret_life: 2.5,
            velocity: Vec2::new(0.0, -500.0),
            draw_heading: false,
            draw_path: false,
            path_scale: 200.0,
            path_cycles: 4.0,
            particle_velocity: Vec2::new(100.0, 100.0),
            damping: 0.99,
            gravity: 10.0,
            radius: 3.0,
            lifespan: 1.0,
            turbulence_min: Vec2::ZERO,
            turbulence_max: Vec2::ZERO,
            radial_force: 1000.0,
            clamping: 10.0,
        }
    }
}

impl Tuning {
    const SLOT: Slot = Slot {
        local_storage_key: "tri_invaders_tuning",
        file_name: "tuning.json",
    };

    pub fn get(&self, param: TuningParam) -> f32 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match param {
            TuningParam::TurretRate => self.turret_rate,
            TuningParam::TurretLife => self.turret_life,
            TuningParam::VelocityX => self.velocity.x,
            TuningParam::VelocityY => self.velocity.y,
            TuningParam::DrawHeading => flag(self.draw_heading),
            TuningParam::DrawPath => flag(self.draw_path),
            TuningParam::PathScale => self.path_scale,
            TuningParam::PathCycles => self.path_cycles,
            TuningParam::ParticleVelocityX => self.particle_velocity.x,
            TuningParam::ParticleVelocityY => self.particle_velocity.y,
            TuningParam::Damping => self.damping,
            TuningParam::Gravity => self.gravity,
            TuningParam::Radius => self.radius,
            TuningParam::Lifespan => self.lifespan,
            TuningParam::TurbulenceMinX => self.turbulence_min.x,
            TuningParam::TurbulenceMinY => self.turbulence_min.y,
            TuningParam::TurbulenceMaxX => self.turbulence_max.x,
            TuningParam::TurbulenceMaxY => self.turbulence_max.y,
            TuningParam::RadialForce => self.radial_force,
            TuningParam::Clamping => self.clamping,
        }
    }

    /// Set a value, clamped to the parameter's range
    pub fn set(&mut self, param: TuningParam, value: f32) {
        let v = param.clamp(value);
        match param {
            TuningParam::TurretRate => self.turret_rate = v,
            TuningParam::TurretLife => self.turret_life = v,
            TuningParam::VelocityX => self.velocity.x = v,
            TuningParam::VelocityY => self.velocity.y = v,
            TuningParam::DrawHeading => self.draw_heading = v > 0.5,
            TuningParam::DrawPath => self.draw_path = v > 0.5,
            TuningParam::PathScale => self.path_scale = v,
            TuningParam::PathCycles => self.path_cycles = v,
            TuningParam::ParticleVelocityX => self.particle_velocity.x = v,
            TuningParam::ParticleVelocityY => self.particle_velocity.y = v,
            TuningParam::Damping => self.damping = v,
            TuningParam::Gravity => self.gravity = v,
            TuningParam::Radius => self.radius = v,
            TuningParam::Lifespan => self.lifespan = v,
            TuningParam::TurbulenceMinX => self.turbulence_min.x = v,
            TuningParam::TurbulenceMinY => self.turbulence_min.y = v,
            TuningParam::TurbulenceMaxX => self.turbulence_max.x = v,
            TuningParam::TurbulenceMaxY => self.turbulence_max.y = v,
            TuningParam::RadialForce => self.radial_force = v,
            TuningParam::Clamping => self.clamping = v,
        }
    }

    /// Flip a toggle parameter; sliders are left alone
    pub fn toggle(&mut self, param: TuningParam) {
        if param.is_toggle() {
            let current = self.get(param);
            self.set(param, 1.0 - current);
        }
    }

    /// Re-clamp every value
    pub fn sanitized(mut self) -> Self {
        for param in TuningParam::ALL {
            let v = self.get(param);
            self.set(param, v);
        }
        self
    }

    pub fn turret_params(&self) -> TurretParams {
        TurretParams {
            rate: self.turret_rate,
            lifespan_ms: self.turret_life * 1000.0,
            velocity: self.velocity,
        }
    }

    pub fn particle_params(&self) -> ParticleParams {
        ParticleParams {
            velocity: self.particle_velocity,
            damping: self.damping,
            gravity: self.gravity,
            radius: self.radius,
            lifespan_ms: self.lifespan * 1000.0,
            turbulence_min: self.turbulence_min,
            turbulence_max: self.turbulence_max,
            radial_force: self.radial_force,
            clamping: self.clamping,
        }
    }

    /// Load tuning, falling back to defaults
    pub fn load() -> Self {
        match platform::load_json::<Self>(Self::SLOT) {
            Some(tuning) => {
                log::info!("Loaded tuning");
                tuning.sanitized()
            }
            None => Self::default(),
        }
    }

    pub fn save(&self) {
        if let Err(e) = platform::save_json(Self::SLOT, self) {
            log::warn!("Failed to save tuning: {}", e);
        }
    }
}
