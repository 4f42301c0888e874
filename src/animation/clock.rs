use crate::{
    animation::{
        sequence::{SequenceCursor, Step},
        timer::{IntervalTimer, TimerBook},
    },
    config::FrameConfig,
    face::model::AnimatedExpression,
    foundation::{core::Millis, error::FlipbookResult},
    render::{compositor::Compositor, surface::Surface},
};

/// What an [`Animator`] is doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Showing a still frame.
    Idle,
    /// Running one playthrough.
    PlayingOnce,
    /// Restarting a playthrough every loop period.
    PlayingLoop,
}

/// Drives an animated expression in virtual time.
///
/// Two timers exist: the once-timer steps through a single playthrough, the loop-timer restarts
/// it every `frame_ms * anim.len()`. Both fire only from [`Animator::advance`].
pub struct Animator<S> {
    compositor: Compositor<S>,
    expression: AnimatedExpression,
    config: FrameConfig,
    once: IntervalTimer,
    looping: IntervalTimer,
    cursor: SequenceCursor,
}

impl<S: Surface> Animator<S> {
    /// Bind an expression and paint its first frame.
    pub fn new(
        compositor: Compositor<S>,
        expression: AnimatedExpression,
        config: FrameConfig,
        timers: &TimerBook,
    ) -> FlipbookResult<Self> {
        let mut animator = Self::bind(compositor, expression, config, timers);
        animator.show_first_frame()?;
        Ok(animator)
    }

    /// Bind an expression without painting anything.
    pub fn bind(
        compositor: Compositor<S>,
        expression: AnimatedExpression,
        config: FrameConfig,
        timers: &TimerBook,
    ) -> Self {
        Self {
            compositor,
            expression,
            config,
            once: timers.timer(),
            looping: timers.timer(),
            cursor: SequenceCursor::START,
        }
    }

    /// Paint the first frame as a still, twice: once to calibrate the surface, once plain.
    pub fn show_first_frame(&mut self) -> FlipbookResult<()> {
        self.draw_first(true)?;
        self.draw_first(false)
    }

    /// Current playback state. A running loop wins over its current playthrough.
    pub fn state(&self) -> PlaybackState {
        if self.looping.is_active() {
            PlaybackState::PlayingLoop
        } else if self.once.is_active() {
            PlaybackState::PlayingOnce
        } else {
            PlaybackState::Idle
        }
    }

    /// Active drawing options.
    pub fn config(&self) -> FrameConfig {
        self.config
    }

    /// Expression being played.
    pub fn expression(&self) -> &AnimatedExpression {
        &self.expression
    }

    /// Replace drawing options: recalibrate, and repaint the first frame unless a playthrough
    /// is running.
    pub fn update_config(&mut self, config: FrameConfig) -> FlipbookResult<()> {
        self.config = config;
        self.draw_first(true)?;
        if !self.once.is_active() {
            self.draw_first(false)?;
        }
        Ok(())
    }

    /// Start one playthrough at `now`. Ignored while one is already running.
    pub fn play_once(&mut self, now: Millis) -> FlipbookResult<()> {
        if self.once.is_active() {
            return Ok(());
        }
        let period = self.expression.frame_duration_ms()?;
        self.cursor = SequenceCursor::START;
        self.once.arm(period, now)?;
        tracing::debug!(period, passes = self.expression.passes(), "play once");
        Ok(())
    }

    /// Start a playthrough now and another every loop period. Ignored while looping.
    pub fn play_loop(&mut self, now: Millis) -> FlipbookResult<()> {
        if self.looping.is_active() {
            return Ok(());
        }
        let period = self.expression.loop_duration_ms()?;
        self.play_once(now)?;
        self.looping.arm(period, now)?;
        tracing::debug!(period, "play loop");
        Ok(())
    }

    /// Cancel the running playthrough, leaving the current frame on screen.
    pub fn stop_once(&mut self) {
        self.once.cancel();
    }

    /// Cancel the loop; the current playthrough runs to its end.
    pub fn stop_loop(&mut self) {
        self.looping.cancel();
    }

    /// Cancel both timers.
    pub fn stop(&mut self) {
        self.stop_loop();
        self.stop_once();
    }

    /// Earliest pending tick.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.once.next_due(), self.looping.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire every tick due at or before `now`, in deadline order; returns how many fired.
    ///
    /// On a tie the playthrough tick goes first, so a loop restart lands after the frame it
    /// coincides with. A loop that fell several periods behind restarts once, from its latest
    /// due tick. Playthrough ticks are never skipped; a playthrough ends on its own.
    pub fn advance(&mut self, now: Millis) -> FlipbookResult<usize> {
        let mut fired = 0;
        loop {
            let once_due = self.once.next_due().filter(|at| *at <= now);
            let loop_due = self.looping.next_due().filter(|at| *at <= now);

            match (once_due, loop_due) {
                (None, None) => break,
                (Some(o), Some(l)) if l < o => self.restart(now)?,
                (Some(_), _) => {
                    self.once.fire_due(now);
                    self.tick()?;
                }
                (None, Some(_)) => self.restart(now)?,
            }
            fired += 1;
        }
        Ok(fired)
    }

    /// Compositor, for inspecting the surface.
    pub fn compositor(&self) -> &Compositor<S> {
        &self.compositor
    }

    /// Stop playback and hand back the compositor.
    pub fn into_compositor(mut self) -> Compositor<S> {
        self.stop();
        self.compositor
    }

    fn restart(&mut self, now: Millis) -> FlipbookResult<()> {
        if let Some(at) = self.looping.fire_latest(now) {
            self.play_once(at)?;
        }
        Ok(())
    }

    fn tick(&mut self) -> FlipbookResult<()> {
        let (cursor, step) = self
            .cursor
            .advance(&self.expression.anim, self.expression.passes());
        self.cursor = cursor;
        match step {
            Step::Next(index) => {
                tracing::trace!(index, pass = cursor.pass, "frame");
                self.draw(index, false)
            }
            Step::Done => {
                self.once.cancel();
                let last = self.expression.last_index()?;
                self.draw(last, false)
            }
        }
    }

    fn draw_first(&mut self, calibrate: bool) -> FlipbookResult<()> {
        let first = self.expression.first_index()?;
        self.draw(first, calibrate)
    }

    fn draw(&mut self, index: usize, calibrate: bool) -> FlipbookResult<()> {
        let names = self.expression.frame(index)?;
        self.compositor.draw_frame(names, &self.config, calibrate)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
