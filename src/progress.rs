//! Progress reporting: the synchronous per-page callback the fetchers invoke, and an
//! `indicatif` terminal renderer that plugs into it.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;

/// Which collection a progress event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Venues,
    Checkins,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Venues => "venues",
            Stage::Checkins => "checkins",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(stage, fetched, total)`. Called on the fetcher's own thread at every page
/// boundary, then once more when the stage completes.
pub type ProgressCallback<'a> = dyn FnMut(Stage, usize, usize) + Send + 'a;

#[inline]
pub(crate) fn report_progress(
    progress: &mut Option<&mut ProgressCallback<'_>>,
    stage: Stage,
    fetched: usize,
    total: usize,
) {
    if let Some(cb) = progress.as_deref_mut() {
        cb(stage, fetched, total);
    }
}

fn count_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg:>9} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}",
    )
    .unwrap()
    .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// One count bar per stage; a new stage finishes the previous bar.
/// Use `TerminalProgress::callback()` to hand it to an export run.
#[derive(Default)]
pub struct TerminalProgress {
    current: Option<(Stage, ProgressBar)>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, stage: Stage, fetched: usize, total: usize) {
        let switch = !matches!(&self.current, Some((s, _)) if *s == stage);
        if switch {
            if let Some((prev, pb)) = self.current.take() {
                if !pb.is_finished() {
                    pb.finish_with_message(prev.as_str());
                }
            }
            let pb = ProgressBar::new(total as u64);
            pb.set_style(count_style());
            pb.set_message(stage.as_str());
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            self.current = Some((stage, pb));
        }
        if let Some((_, pb)) = &self.current {
            // Declared totals can be smaller than what actually arrives.
            pb.set_length(total.max(fetched) as u64);
            pb.set_position(fetched as u64);
            if total > 0 && fetched >= total {
                pb.finish_with_message(stage.as_str());
            }
        }
    }

    pub fn callback(&mut self) -> impl FnMut(Stage, usize, usize) + Send + '_ {
        move |stage, fetched, total| self.update(stage, fetched, total)
    }

    pub fn finish(mut self) {
        if let Some((stage, pb)) = self.current.take() {
            if !pb.is_finished() {
                pb.finish_with_message(stage.as_str());
            }
        }
    }
}
