//! Platform-agnostic host loop
//!
//! `Game` sits between the platform event loop (winit or the browser) and the
//! simulation: it turns raw input into commands, steps the sim at a fixed
//! rate, feeds events to audio and the leaderboard, and assembles frames.

use glam::Vec2;

use crate::assets::Assets;
use crate::audio::{AudioManager, Sample};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::hud::{self, HudLine};
use crate::platform;
use crate::renderer::{Frame, ImageSizes, Scene, TextRenderer, build_frame};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GameState, SpriteSizes, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::Panel;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Up,
    Down,
    Left,
    Right,
    /// Fullscreen toggle
    F,
    /// Panel toggle
    H,
}

/// Game instance holding all state
pub struct Game {
    pub state: GameState,
    pub tuning: Tuning,
    pub settings: Settings,
    pub panel: Panel,
    pub high_scores: HighScores,
    pub audio: AudioManager,
    pending: Vec<Command>,
    accumulator: f32,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    pub fps: u32,
    fullscreen_requested: bool,
    tuning_dirty: bool,
    /// Write tuning and high scores back to storage
    persist: bool,
}

impl Game {
    pub fn new(
        seed: u64,
        settings: Settings,
        tuning: Tuning,
        high_scores: HighScores,
        sizes: SpriteSizes,
    ) -> Self {
        let mut audio = AudioManager::new();
        audio.configure(&settings);
        let fullscreen_requested = settings.fullscreen;
        if let Some(best) = high_scores.best() {
            log::info!("Best score so far: {}", best);
        }

        Self {
            state: GameState::new(
                seed,
                settings.window_width as f32,
                settings.window_height as f32,
                sizes,
            ),
            tuning,
            panel: Panel::new(settings.show_panel),
            settings,
            high_scores,
            audio,
            pending: Vec::new(),
            accumulator: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            fullscreen_requested,
            tuning_dirty: false,
            persist: true,
        }
    }

    /// Hand the loaded sound files to the audio backend
    pub fn load_sounds(&mut self, assets: &Assets) {
        self.audio.load_sample(Sample::Shoot, &assets.shoot_sound);
        self.audio.load_sample(Sample::Explosion, &assets.explosion_sound);
        self.audio.load_sample(Sample::Music, &assets.music);
    }

    /// Keep everything in memory (tests, demos)
    pub fn set_persistence(&mut self, enabled: bool) {
        self.persist = enabled;
    }

    pub fn key_down(&mut self, key: Key) {
        self.audio.resume();
        let command = match key {
            Key::Space => Command::Fire,
            Key::Up => Command::ThrustUp,
            Key::Down => Command::ThrustDown,
            Key::Left => Command::RotateLeft,
            Key::Right => Command::RotateRight,
            Key::F => {
                self.fullscreen_requested = !self.fullscreen_requested;
                return;
            }
            Key::H => {
                self.panel.toggle_visible();
                return;
            }
        };
        self.pending.push(command);
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.pending.push(Command::ReleaseThrustUp),
            Key::Down => self.pending.push(Command::ReleaseThrustDown),
            _ => {}
        }
    }

    /// Whether the window should be fullscreen
    pub fn fullscreen_requested(&self) -> bool {
        self.fullscreen_requested
    }

    /// Pointer pressed; the panel gets first refusal
    pub fn pointer_down(&mut self, pos: Vec2) {
        self.audio.resume();
        if self.panel.press(pos, &mut self.tuning) {
            self.tuning_dirty = true;
            return;
        }
        self.pending.push(Command::PointerPress(pos));
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.panel.drag(pos, &mut self.tuning) {
            self.tuning_dirty = true;
            return;
        }
        if self.state.drag.is_some() {
            self.pending.push(Command::PointerDrag(pos));
        }
    }

    pub fn pointer_up(&mut self) {
        self.panel.release();
        if std::mem::take(&mut self.tuning_dirty) && self.persist {
            self.tuning.save();
        }
        self.pending.push(Command::PointerRelease);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        log::info!("Resized to {}x{}", width, height);
        self.state.resize(width as f32, height as f32);
    }

    /// Run simulation ticks for `dt_secs` of wall time
    pub fn update(&mut self, dt_secs: f32, now_ms: f64) {
        let dt = dt_secs.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                commands: std::mem::take(&mut self.pending),
                turret: self.tuning.turret_params(),
                particles: self.tuning.particle_params(),
            };
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.track_fps(now_ms);

        for event in self.state.drain_events() {
            self.audio.handle(&event);
            if let GameEvent::GameOver { score, .. } = event {
                self.record_round(score);
            }
        }
    }

    fn track_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (60000.0 / elapsed).round() as u32;
            }
        }
    }

    fn record_round(&mut self, score: u32) {
        let rank = self.high_scores.record(score, platform::now_ms());
        if let Some(summary) = self.state.summary.as_mut() {
            summary.rank = rank;
        }
        match rank {
            Some(1) => log::info!("New best score: {}", score),
            Some(r) => log::info!("Score {} ranked #{}", score, r),
            None => {}
        }
        if rank.is_some() && self.persist {
            self.high_scores.save();
        }
    }

    pub fn hud(&self) -> Vec<HudLine> {
        hud::hud_lines(&self.state)
    }

    pub fn title(&self) -> String {
        hud::window_title(&self.state)
    }

    pub fn build_frame(&self, images: &ImageSizes, text: Option<&mut TextRenderer>) -> Frame {
        let hud = self.hud();
        let scene = Scene {
            state: &self.state,
            tuning: &self.tuning,
            panel: &self.panel,
            hud: &hud,
            images,
        };
        build_frame(&scene, text)
    }
}
