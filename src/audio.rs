//! Sound effects and background music
//!
//! The browser build decodes the loaded sample files with Web Audio and plays
//! them through buffer sources, looping the music. A sample that fails to
//! decode falls back to a synthesised oscillator tone. The native build has no
//! output device and only logs what would play.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sample volume applied on top of the user's volume settings
pub const SAMPLE_VOLUME: f32 = 0.2;

/// Loaded sound files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sample {
    Shoot,
    Explosion,
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Laser fired
    Shoot,
    /// Invader destroyed
    Explosion,
}

impl SoundEffect {
    /// Sound (if any) a simulation event makes
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
            GameEvent::RoundStarted | GameEvent::GameOver { .. } => None,
        }
    }

    pub fn sample(self) -> Sample {
        match self {
            SoundEffect::Shoot => Sample::Shoot,
            SoundEffect::Explosion => Sample::Explosion,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Backend,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
    /// Samples handed to the backend
    loaded: Vec<Sample>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            backend: Backend::new(),
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            music_playing: false,
            loaded: Vec::new(),
        }
    }

    /// Pick up volume and mute settings
    pub fn configure(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_muted(settings.muted);
    }

    /// Hand a sound file to the backend. Empty data is ignored.
    pub fn load_sample(&mut self, sample: Sample, bytes: &[u8]) {
        if bytes.is_empty() {
            log::warn!("No data for {:?}; using the fallback tone", sample);
            return;
        }
        self.backend.load(sample, bytes);
        if !self.loaded.contains(&sample) {
            self.loaded.push(sample);
        }
    }

    pub fn has_sample(&self, sample: Sample) -> bool {
        self.loaded.contains(&sample)
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted && self.music_playing {
            self.backend.stop_music();
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume * SAMPLE_VOLUME
        }
    }

    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume * SAMPLE_VOLUME
        }
    }

    /// Resume audio context (required after user gesture on the web)
    pub fn resume(&self) {
        self.backend.resume();
    }

    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    /// (Re)start the looping background track
    pub fn start_music(&mut self) {
        self.music_playing = true;
        let vol = self.effective_music_volume();
        if vol > 0.0 {
            self.backend.start_music(vol);
        }
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.backend.stop_music();
        }
        self.music_playing = false;
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted => self.start_music(),
            GameEvent::GameOver { .. } => self.stop_music(),
            _ => {}
        }
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
struct Backend;

#[cfg(not(target_arch = "wasm32"))]
impl Backend {
    fn new() -> Self {
        log::info!("No audio output on this platform; sounds are logged only");
        Backend
    }

    fn load(&self, sample: Sample, bytes: &[u8]) {
        log::debug!("sample {:?}: {} bytes", sample, bytes.len());
    }

    fn resume(&self) {}

    fn play(&self, effect: SoundEffect, vol: f32) {
        log::debug!("sound {:?} at {:.2}", effect, vol);
    }

    fn start_music(&self, vol: f32) {
        log::debug!("music start at {:.2}", vol);
    }

    fn stop_music(&self) {
        log::debug!("music stop");
    }
}

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode, OscillatorNode, OscillatorType,
};

#[cfg(target_arch = "wasm32")]
struct Backend {
    ctx: Option<AudioContext>,
    /// Decoded samples, filled asynchronously
    buffers: Rc<RefCell<HashMap<Sample, AudioBuffer>>>,
    music: RefCell<Option<AudioBufferSourceNode>>,
    /// Synthesised fallback track
    fallback_music: RefCell<Option<OscillatorNode>>,
}

#[cfg(target_arch = "wasm32")]
impl Backend {
    fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            buffers: Rc::new(RefCell::new(HashMap::new())),
            music: RefCell::new(None),
            fallback_music: RefCell::new(None),
        }
    }

    /// Decode in the background; until (or unless) it finishes the fallback tone plays
    fn load(&self, sample: Sample, bytes: &[u8]) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let Some(ctx) = self.ctx.clone() else { return };
        let data = js_sys::Uint8Array::from(bytes).buffer();
        let buffers = self.buffers.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let promise = match ctx.decode_audio_data(&data) {
                Ok(promise) => promise,
                Err(e) => {
                    log::warn!("Cannot decode {:?}: {:?}", sample, e);
                    return;
                }
            };
            match JsFuture::from(promise).await.map(|v| v.dyn_into::<AudioBuffer>()) {
                Ok(Ok(buffer)) => {
                    log::info!("Decoded {:?} ({:.1}s)", sample, buffer.duration());
                    buffers.borrow_mut().insert(sample, buffer);
                }
                Ok(Err(_)) => log::warn!("Decoding {:?} gave no audio buffer", sample),
                Err(e) => log::warn!("Failed to decode {:?}, using fallback tone: {:?}", sample, e),
            }
        });
    }

    fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    fn buffer(&self, sample: Sample) -> Option<AudioBuffer> {
        self.buffers.borrow().get(&sample).cloned()
    }

    fn play_buffer(
        ctx: &AudioContext,
        buffer: &AudioBuffer,
        vol: f32,
        looping: bool,
    ) -> Option<AudioBufferSourceNode> {
        let source = ctx.create_buffer_source().ok()?;
        let gain = ctx.create_gain().ok()?;

        source.set_buffer(Some(buffer));
        source.set_loop(looping);
        gain.gain().set_value(vol);
        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()?;

        Some(source)
    }

    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play(&self, effect: SoundEffect, vol: f32) {
        let Some(ctx) = self.context() else { return };
        if let Some(buffer) = self.buffer(effect.sample()) {
            Self::play_buffer(ctx, &buffer, vol, false);
            return;
        }
        match effect {
            SoundEffect::Shoot => Self::play_shoot(ctx, vol),
            SoundEffect::Explosion => Self::play_explosion(ctx, vol),
        }
    }

    /// Fallback laser - fast downward chirp
    fn play_shoot(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 1200.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(1200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.12)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Fallback explosion - low rumble plus a crack
    fn play_explosion(ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        if let Some((osc, gain)) = Self::create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.8, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }
        if let Some((osc, gain)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    fn start_music(&self, vol: f32) {
        self.stop_music();
        let Some(ctx) = self.context() else { return };

        if let Some(buffer) = self.buffer(Sample::Music) {
            *self.music.borrow_mut() = Self::play_buffer(ctx, &buffer, vol, true);
            return;
        }

        // Fallback: a looping bass line until the round ends
        let Some((osc, gain)) = Self::create_osc(ctx, 110.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();
        let pattern = [110.0, 110.0, 165.0, 147.0, 110.0, 131.0, 147.0, 98.0];
        let step = 0.25;
        let steps = (f64::from(crate::consts::ROUND_DURATION_SECS) / step) as usize;
        for i in 0..steps {
            let at = t + i as f64 * step;
            osc.frequency()
                .set_value_at_time(pattern[i % pattern.len()], at)
                .ok();
        }
        gain.gain().set_value_at_time(vol, t).ok();
        osc.start().ok();
        *self.fallback_music.borrow_mut() = Some(osc);
    }

    fn stop_music(&self) {
        if let Some(source) = self.music.borrow_mut().take() {
            source.stop().ok();
        }
        if let Some(osc) = self.fallback_music.borrow_mut().take() {
            osc.stop().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_shots_and_explosions_have_sounds() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Shot), Some(SoundEffect::Shoot));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Explosion { pos: Vec2::ZERO }),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::RoundStarted), None);
        assert_eq!(SoundEffect::Explosion.sample(), Sample::Explosion);
    }

    #[test]
    fn test_volumes_include_sample_factor() {
        let mut audio = AudioManager::new();
        audio.configure(&Settings {
            master_volume: 0.5,
            ..Default::default()
        });
        assert!((audio.effective_sfx_volume() - 0.1).abs() < 1e-6);
        audio.set_muted(true);
        assert_eq!(audio.effective_sfx_volume(), 0.0);
        assert_eq!(audio.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_music_follows_round() {
        let mut audio = AudioManager::new();
        audio.handle(&GameEvent::RoundStarted);
        assert!(audio.is_music_playing());
        audio.handle(&GameEvent::GameOver {
            score: 3,
            elapsed_secs: 30.0,
        });
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_load_sample_skips_empty_data() {
        let mut audio = AudioManager::new();
        audio.load_sample(Sample::Shoot, &[1, 2, 3]);
        audio.load_sample(Sample::Music, &[]);
        assert!(audio.has_sample(Sample::Shoot));
        assert!(!audio.has_sample(Sample::Music));
    }
}
