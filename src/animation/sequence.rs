/// Position within a playthrough: which pass, and which entry of `anim` comes next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceCursor {
    /// Completed passes.
    pub pass: u32,
    /// Next entry of `anim` to show.
    pub frame: usize,
}

/// Outcome of one playthrough tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Show frame `faces[index]`.
    Next(usize),
    /// The playthrough is over.
    Done,
}

impl SequenceCursor {
    /// Cursor at the start of a playthrough.
    pub const START: Self = Self { pass: 0, frame: 0 };

    /// Advance by one tick over `anim`, played `passes` times.
    ///
    /// Yields `anim.len() * passes` frames, then [`Step::Done`] forever after.
    pub fn advance(self, anim: &[usize], passes: u32) -> (Self, Step) {
        if anim.is_empty() || self.pass >= passes {
            return (self, Step::Done);
        }
        let Some(&index) = anim.get(self.frame) else {
            return (self, Step::Done);
        };

        let next = if self.frame + 1 < anim.len() {
            Self {
                pass: self.pass,
                frame: self.frame + 1,
            }
        } else {
            Self {
                pass: self.pass + 1,
                frame: 0,
            }
        };
        (next, Step::Next(index))
    }
}
