//! Disturbance escalation
//!
//! Two independent tracks per session:
//!
//! - **Exposure track**: levels derived from the exposure count, checked in
//!   ascending order. Several can be active at once.
//! - **Infection track**: switched on once an infected account is bound.
//!
//! Neither track is ever downgraded within a session. The escalation owns
//! no timers; the presentation layer polls [`Escalation::schedule`] and
//! calls [`Escalation::tick`] on its own clock.

use crate::config::EscalationConfig;
use crate::messages::{INFECTION_BANNER, INFECTION_FLASHES, MODERATE_FLASHES};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// Constant hue shift while only the mild level is active
pub const MILD_HUE_ROTATE_DEG: u16 = 5;

/// Saturation multiplier on the infection track
pub const INFECTED_SATURATE: f32 = 1.5;

/// Contrast multiplier on the infection track
pub const INFECTED_CONTRAST: f32 = 1.2;

/// Exposure-driven disturbance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisturbanceLevel {
    /// Continuous low-intensity color shift
    Mild,
    /// Recurring probabilistic flash
    Moderate,
    /// Permanent heavy glitch
    Severe,
}

impl DisturbanceLevel {
    /// All levels, ascending
    pub const ASCENDING: [DisturbanceLevel; 3] = [
        DisturbanceLevel::Mild,
        DisturbanceLevel::Moderate,
        DisturbanceLevel::Severe,
    ];
}

impl Display for DisturbanceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisturbanceLevel::Mild => "mild",
            DisturbanceLevel::Moderate => "moderate",
            DisturbanceLevel::Severe => "severe",
        };
        f.write_str(name)
    }
}

/// Recurring tick the presentation layer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    /// Moderate track flash roll
    ModerateFlash,
    /// Infection track flash roll
    InfectionFlash,
    /// Infection hue advance
    ColorCycle,
}

/// Transient overlay to show for `duration_ms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    /// Track that produced it
    pub kind: TickKind,
    /// Overlay text
    pub message: String,
    /// Lifetime in milliseconds
    pub duration_ms: u64,
}

/// One-shot banner shown when the infection track starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionBanner {
    /// Banner lines, top to bottom
    pub lines: Vec<String>,
    /// Delay before it appears
    pub delay_ms: u64,
    /// Time fully visible
    pub visible_ms: u64,
    /// Fade-out length
    pub fade_ms: u64,
}

/// Continuous visual parameters for the current tracks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Hue rotation in degrees
    pub hue_rotate_deg: u16,
    /// Saturation multiplier
    pub saturate: f32,
    /// Contrast multiplier
    pub contrast: f32,
    /// Severe level active
    pub heavy_glitch: bool,
    /// Infection track active
    pub infected: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            hue_rotate_deg: 0,
            saturate: 1.0,
            contrast: 1.0,
            heavy_glitch: false,
            infected: false,
        }
    }
}

/// Per-session escalation state
#[derive(Debug, Clone)]
pub struct Escalation {
    config: EscalationConfig,
    active: BTreeSet<DisturbanceLevel>,
    infected: bool,
    hue: u16,
}

impl Escalation {
    /// Fresh escalation with no track active
    #[must_use]
    pub fn new(config: EscalationConfig) -> Self {
        Self {
            config,
            active: BTreeSet::new(),
            infected: false,
            hue: 0,
        }
    }

    /// Parameters in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    fn threshold(&self, level: DisturbanceLevel) -> u32 {
        match level {
            DisturbanceLevel::Mild => self.config.mild_threshold,
            DisturbanceLevel::Moderate => self.config.moderate_threshold,
            DisturbanceLevel::Severe => self.config.severe_threshold,
        }
    }

    /// Evaluate thresholds against a new exposure count
    ///
    /// Returns the levels activated by this call, ascending. Levels already
    /// active are never returned again. Each level is tracked on its own
    /// threshold, so a level is never reported active below it.
    pub fn observe_exposure(&mut self, exposure: u32) -> Vec<DisturbanceLevel> {
        let mut newly = Vec::new();
        for level in DisturbanceLevel::ASCENDING {
            if exposure >= self.threshold(level) && self.active.insert(level) {
                tracing::info!(exposure, %level, "Disturbance level reached");
                newly.push(level);
            }
        }
        newly
    }

    /// Whether `level` is active
    #[inline]
    #[must_use]
    pub fn is_active(&self, level: DisturbanceLevel) -> bool {
        self.active.contains(&level)
    }

    /// Highest active level
    #[inline]
    #[must_use]
    pub fn highest_level(&self) -> Option<DisturbanceLevel> {
        self.active.last().copied()
    }

    /// All active levels, ascending
    #[must_use]
    pub fn active_levels(&self) -> Vec<DisturbanceLevel> {
        self.active.iter().copied().collect()
    }

    /// Start the infection track
    ///
    /// Returns the banner the first time only.
    pub fn activate_infection(&mut self) -> Option<InfectionBanner> {
        if self.infected {
            return None;
        }
        self.infected = true;
        tracing::info!("Infection track activated");
        Some(InfectionBanner {
            lines: INFECTION_BANNER.iter().map(|line| (*line).to_string()).collect(),
            delay_ms: self.config.banner_delay_ms,
            visible_ms: self.config.banner_visible_ms,
            fade_ms: self.config.banner_fade_ms,
        })
    }

    /// Whether the infection track is running
    #[inline]
    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infected
    }

    /// Current color-cycle hue in degrees
    #[inline]
    #[must_use]
    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Continuous visual parameters
    #[must_use]
    pub fn visual_state(&self) -> VisualState {
        let heavy_glitch = self.is_active(DisturbanceLevel::Severe);
        if self.infected {
            VisualState {
                hue_rotate_deg: self.hue,
                saturate: INFECTED_SATURATE,
                contrast: INFECTED_CONTRAST,
                heavy_glitch,
                infected: true,
            }
        } else {
            VisualState {
                hue_rotate_deg: if self.is_active(DisturbanceLevel::Mild) {
                    MILD_HUE_ROTATE_DEG
                } else {
                    0
                },
                heavy_glitch,
                ..VisualState::default()
            }
        }
    }

    /// Ticks currently due and their periods
    #[must_use]
    pub fn schedule(&self) -> Vec<(TickKind, Duration)> {
        let mut due = Vec::with_capacity(3);
        if self.is_active(DisturbanceLevel::Moderate) {
            due.push((
                TickKind::ModerateFlash,
                Duration::from_millis(self.config.moderate_tick_ms),
            ));
        }
        if self.infected {
            due.push((
                TickKind::InfectionFlash,
                Duration::from_millis(self.config.infection_tick_ms),
            ));
            due.push((
                TickKind::ColorCycle,
                Duration::from_millis(self.config.color_cycle_tick_ms),
            ));
        }
        due
    }

    /// Advance one tick
    ///
    /// Ticks for inactive tracks do nothing. Color cycle ticks never
    /// produce an overlay.
    pub fn tick<R: Rng + ?Sized>(&mut self, kind: TickKind, rng: &mut R) -> Option<Overlay> {
        match kind {
            TickKind::ModerateFlash => {
                if !self.is_active(DisturbanceLevel::Moderate) {
                    return None;
                }
                roll_flash(
                    kind,
                    self.config.moderate_flash_chance,
                    MODERATE_FLASHES,
                    self.config.moderate_flash_ms,
                    rng,
                )
            }
            TickKind::InfectionFlash => {
                if !self.infected {
                    return None;
                }
                roll_flash(
                    kind,
                    self.config.infection_flash_chance,
                    INFECTION_FLASHES,
                    self.config.infection_flash_ms,
                    rng,
                )
            }
            TickKind::ColorCycle => {
                if self.infected {
                    self.hue = (self.hue + self.config.color_cycle_step_deg % 360) % 360;
                }
                None
            }
        }
    }
}

fn roll_flash<R: Rng + ?Sized>(
    kind: TickKind,
    chance: f64,
    pool: &[&str],
    duration_ms: u64,
    rng: &mut R,
) -> Option<Overlay> {
    if rng.gen::<f64>() >= chance {
        return None;
    }
    let message = pool.choose(rng)?;
    tracing::debug!(?kind, text = *message, "Flash overlay");
    Some(Overlay {
        kind,
        message: (*message).to_string(),
        duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn escalation() -> Escalation {
        Escalation::new(EscalationConfig::default())
    }

    fn certain() -> EscalationConfig {
        EscalationConfig::default().with_flash_chances(1.0, 1.0)
    }

    #[test]
    fn levels_activate_once_in_ascending_order() {
        let mut esc = escalation();
        assert!(esc.observe_exposure(2).is_empty());
        assert_eq!(esc.observe_exposure(3), vec![DisturbanceLevel::Mild]);
        assert!(esc.observe_exposure(3).is_empty());
        assert!(esc.observe_exposure(5).is_empty());
        assert_eq!(esc.observe_exposure(6), vec![DisturbanceLevel::Moderate]);
        assert_eq!(esc.observe_exposure(10), vec![DisturbanceLevel::Severe]);
        assert!(esc.observe_exposure(11).is_empty());
    }

    #[test]
    fn jump_reports_every_crossed_level() {
        let mut esc = escalation();
        assert_eq!(esc.observe_exposure(10), DisturbanceLevel::ASCENDING.to_vec());
        assert_eq!(esc.active_levels(), DisturbanceLevel::ASCENDING.to_vec());
    }

    #[test]
    fn lower_exposure_never_downgrades() {
        let mut esc = escalation();
        esc.observe_exposure(6);
        esc.observe_exposure(0);
        assert_eq!(esc.highest_level(), Some(DisturbanceLevel::Moderate));
    }

    #[test]
    fn unordered_thresholds_activate_only_crossed_levels() {
        let mut esc = Escalation::new(EscalationConfig::default().with_thresholds(5, 2, 10));
        assert_eq!(esc.observe_exposure(2), vec![DisturbanceLevel::Moderate]);
        assert!(!esc.is_active(DisturbanceLevel::Mild));
        assert_eq!(esc.active_levels(), vec![DisturbanceLevel::Moderate]);
        assert_eq!(esc.visual_state().hue_rotate_deg, 0);

        assert_eq!(esc.observe_exposure(5), vec![DisturbanceLevel::Mild]);
        assert_eq!(esc.highest_level(), Some(DisturbanceLevel::Moderate));
    }

    #[test]
    fn infection_banner_is_one_shot() {
        let mut esc = escalation();
        let banner = esc.activate_infection().unwrap();
        assert_eq!(banner.lines.len(), 3);
        assert_eq!(banner.delay_ms, 500);
        assert!(esc.activate_infection().is_none());
        assert!(esc.is_infected());
    }

    #[test]
    fn visual_state_by_track() {
        let mut esc = escalation();
        assert_eq!(esc.visual_state(), VisualState::default());

        esc.observe_exposure(3);
        assert_eq!(esc.visual_state().hue_rotate_deg, MILD_HUE_ROTATE_DEG);
        assert!(!esc.visual_state().heavy_glitch);

        esc.observe_exposure(10);
        assert!(esc.visual_state().heavy_glitch);

        esc.activate_infection();
        let state = esc.visual_state();
        assert!(state.infected);
        assert!(state.heavy_glitch);
        assert_eq!(state.hue_rotate_deg, 0);
        assert!((state.saturate - INFECTED_SATURATE).abs() < f32::EPSILON);
    }

    #[test]
    fn schedule_follows_active_tracks() {
        let mut esc = escalation();
        assert!(esc.schedule().is_empty());

        esc.observe_exposure(6);
        assert_eq!(
            esc.schedule(),
            vec![(TickKind::ModerateFlash, Duration::from_millis(5000))]
        );

        esc.activate_infection();
        let kinds: Vec<_> = esc.schedule().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![TickKind::ModerateFlash, TickKind::InfectionFlash, TickKind::ColorCycle]
        );
    }

    #[test]
    fn ticks_for_inactive_tracks_do_nothing() {
        let mut esc = Escalation::new(certain());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(esc.tick(TickKind::ModerateFlash, &mut rng).is_none());
        assert!(esc.tick(TickKind::InfectionFlash, &mut rng).is_none());
        assert!(esc.tick(TickKind::ColorCycle, &mut rng).is_none());
        assert_eq!(esc.hue(), 0);
    }

    #[test]
    fn certain_flash_draws_from_track_pool() {
        let mut esc = Escalation::new(certain());
        let mut rng = StdRng::seed_from_u64(3);
        esc.observe_exposure(6);
        esc.activate_infection();

        let moderate = esc.tick(TickKind::ModerateFlash, &mut rng).unwrap();
        assert!(MODERATE_FLASHES.contains(&moderate.message.as_str()));
        assert_eq!(moderate.duration_ms, 200);

        let infection = esc.tick(TickKind::InfectionFlash, &mut rng).unwrap();
        assert!(INFECTION_FLASHES.contains(&infection.message.as_str()));
        assert_eq!(infection.duration_ms, 300);
    }

    #[test]
    fn zero_chance_never_flashes() {
        let mut esc = Escalation::new(EscalationConfig::default().with_flash_chances(0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(9);
        esc.observe_exposure(6);
        esc.activate_infection();
        for _ in 0..200 {
            assert!(esc.tick(TickKind::ModerateFlash, &mut rng).is_none());
            assert!(esc.tick(TickKind::InfectionFlash, &mut rng).is_none());
        }
    }

    #[test]
    fn color_cycle_wraps() {
        let mut esc = escalation();
        let mut rng = StdRng::seed_from_u64(0);
        esc.activate_infection();
        for _ in 0..181 {
            esc.tick(TickKind::ColorCycle, &mut rng);
        }
        assert_eq!(esc.hue(), 2);
    }
}
