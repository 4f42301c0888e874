//! Faces bound to a surface: still frames, playback and hover looping.

use std::sync::Arc;

use crate::{
    animation::{
        clock::{Animator, PlaybackState},
        timer::TimerBook,
    },
    assets::store::ResolvedFace,
    config::ViewerConfig,
    face::{
        id::CharacterId,
        model::{Expression, Face},
    },
    foundation::{
        core::Millis,
        error::{FlipbookError, FlipbookResult},
    },
    render::{compositor::Compositor, surface::Surface},
};

enum Playback<S> {
    Still(Compositor<S>),
    Animated(Animator<S>),
}

impl<S: Surface> Playback<S> {
    fn into_compositor(self) -> Compositor<S> {
        match self {
            Self::Still(c) => c,
            Self::Animated(a) => a.into_compositor(),
        }
    }

    fn compositor(&self) -> &Compositor<S> {
        match self {
            Self::Still(c) => c,
            Self::Animated(a) => a.compositor(),
        }
    }
}

/// A resolved face bound to one surface, one expression and one viewer config.
///
/// Nothing is painted until [`Individual::render`]. Animated expressions then play once; with
/// `loop_on_hover` set, [`Individual::pointer_enter`] and [`Individual::pointer_leave`] switch
/// looping on and off. Dropping an `Individual` cancels its timers.
pub struct Individual<S> {
    id: CharacterId,
    face: Arc<Face>,
    expression: String,
    config: ViewerConfig,
    timers: TimerBook,
    // `None` only while switching playback modes.
    playback: Option<Playback<S>>,
    hover_bound: bool,
}

impl<S: Surface> Individual<S> {
    /// Bind `resolved` to `surface`. The surface is sized to the face's reference size.
    pub fn new(
        resolved: ResolvedFace,
        surface: S,
        config: ViewerConfig,
        timers: &TimerBook,
    ) -> FlipbookResult<Self> {
        let ResolvedFace {
            id,
            face,
            expression,
            images,
        } = resolved;
        face.expression(&expression)?;

        let compositor = Compositor::new(surface, Arc::clone(&face), images);
        Ok(Self {
            id,
            face,
            expression,
            config,
            timers: timers.clone(),
            playback: Some(Playback::Still(compositor)),
            hover_bound: false,
        })
    }

    /// Character this face belongs to.
    pub fn id(&self) -> &CharacterId {
        &self.id
    }

    /// Name of the bound expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Active viewer config.
    pub fn config(&self) -> ViewerConfig {
        self.config
    }

    /// Return `true` when the bound expression is animated.
    pub fn is_animation(&self) -> bool {
        self.face
            .expression(&self.expression)
            .is_ok_and(Expression::is_animated)
    }

    /// Playback state; always [`PlaybackState::Idle`] for still expressions.
    pub fn state(&self) -> PlaybackState {
        match &self.playback {
            Some(Playback::Animated(a)) => a.state(),
            _ => PlaybackState::Idle,
        }
    }

    /// Return `true` while hovering switches looping.
    pub fn is_hover_bound(&self) -> bool {
        self.hover_bound
    }

    /// Bound surface.
    pub fn surface(&self) -> Option<&S> {
        self.playback.as_ref().map(|p| p.compositor().surface())
    }

    /// Paint the expression. Still expressions draw their frame; animated ones paint the first
    /// frame and start one playthrough at `now`.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(character = %self.id, expression = %self.expression)
    )]
    pub fn render(&mut self, now: Millis) -> FlipbookResult<()> {
        let expression = self.face.expression(&self.expression)?.clone();
        let mut compositor = self.take_compositor()?;

        match expression {
            Expression::Static(still) => {
                let result = still
                    .frame()
                    .and_then(|names| compositor.draw_frame(names, &self.config.frame, true))
                    .map(|_| ());
                self.playback = Some(Playback::Still(compositor));
                result
            }
            Expression::Animated(anim) => {
                let mut animator =
                    Animator::bind(compositor, anim, self.config.frame, &self.timers);
                let result = animator
                    .show_first_frame()
                    .and_then(|()| animator.play_once(now));
                self.playback = Some(Playback::Animated(animator));
                self.hover_bound = self.config.loop_on_hover;
                result
            }
        }
    }

    /// Pointer entered the surface: start looping if hover is bound.
    pub fn pointer_enter(&mut self, now: Millis) -> FlipbookResult<()> {
        match &mut self.playback {
            Some(Playback::Animated(a)) if self.hover_bound => a.play_loop(now),
            _ => Ok(()),
        }
    }

    /// Pointer left the surface: stop looping; the running playthrough finishes.
    pub fn pointer_leave(&mut self) {
        if let Some(Playback::Animated(a)) = &mut self.playback
            && self.hover_bound
        {
            a.stop_loop();
        }
    }

    /// Replace the viewer config and repaint under it.
    pub fn update_config(&mut self, config: ViewerConfig) -> FlipbookResult<()> {
        self.config = config;
        match &mut self.playback {
            Some(Playback::Animated(a)) => {
                self.hover_bound = config.loop_on_hover;
                if !config.loop_on_hover {
                    a.stop_loop();
                }
                a.update_config(config.frame)
            }
            Some(Playback::Still(c)) => match self.face.expression(&self.expression)? {
                Expression::Static(still) => {
                    c.draw_frame(still.frame()?, &config.frame, true)?;
                    Ok(())
                }
                // Not rendered yet; the config applies on the first render.
                Expression::Animated(_) => Ok(()),
            },
            None => Err(detached()),
        }
    }

    /// Tear down playback, switch to `name` and render it at `now`.
    pub fn set_expression(&mut self, name: &str, now: Millis) -> FlipbookResult<()> {
        self.face.expression(name)?;
        self.clean();
        self.expression = name.to_owned();
        self.render(now)
    }

    /// Fire every tick due at `now`; returns how many fired.
    pub fn advance(&mut self, now: Millis) -> FlipbookResult<usize> {
        match &mut self.playback {
            Some(Playback::Animated(a)) => a.advance(now),
            _ => Ok(0),
        }
    }

    /// Earliest pending tick.
    pub fn next_deadline(&self) -> Option<Millis> {
        match &self.playback {
            Some(Playback::Animated(a)) => a.next_deadline(),
            _ => None,
        }
    }

    /// Stop both timers and unbind hover. The current frame stays on the surface.
    pub fn clean(&mut self) {
        if let Some(Playback::Animated(a)) = &mut self.playback {
            a.stop();
        }
        self.hover_bound = false;
    }

    /// Clean up and hand the surface to its next owner.
    pub fn into_surface(mut self) -> FlipbookResult<S> {
        self.clean();
        Ok(self.take_compositor()?.into_surface())
    }

    fn take_compositor(&mut self) -> FlipbookResult<Compositor<S>> {
        self.playback
            .take()
            .map(Playback::into_compositor)
            .ok_or_else(detached)
    }
}

fn detached() -> FlipbookError {
    FlipbookError::precondition("individual has no surface bound")
}

#[cfg(test)]
#[path = "../tests/unit/individual.rs"]
mod tests;
