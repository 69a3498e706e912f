use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};

use super::{locate_episode, EpisodeSpan, Located, MetricTracker};
use crate::{memory::ExperienceLog, render::Renderer};

/// Result of an attempt to record a milestone episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The episode was rendered to `path`
    Recorded { path: PathBuf, span: EpisodeSpan },
    /// The episode has not finished yet; the tracker was left untouched so the same milestone is
    /// detected again on a later, longer log
    DeferredIncompleteEpisode,
}

/// Records the episode that produced a new best score
#[derive(Debug, Clone)]
pub struct MilestoneRecorder<R: Renderer> {
    renderer: R,
    video_dir: PathBuf,
    metric_name: String,
    max_episode_steps: u32,
}

impl<R: Renderer> MilestoneRecorder<R> {
    /// Recordings go to `<output_dir>/<exp_name>/videos`
    pub fn new(renderer: R, output_dir: impl AsRef<Path>, exp_name: &str) -> Self {
        Self {
            renderer,
            video_dir: output_dir.as_ref().join(exp_name).join("videos"),
            metric_name: String::from("snake_length"),
            max_episode_steps: u32::MAX,
        }
    }

    /// Name of the tracked metric, used as the recording file prefix
    pub fn with_metric_name(mut self, name: impl Into<String>) -> Self {
        self.metric_name = name.into();
        self
    }

    /// Step ceiling reported when a milestone episode was truncated
    pub fn with_max_episode_steps(mut self, steps: u32) -> Self {
        self.max_episode_steps = steps;
        self
    }

    pub fn video_dir(&self) -> &Path {
        &self.video_dir
    }

    /// Where the recording for `score` is written
    pub fn recording_path(&self, score: u32) -> PathBuf {
        self.video_dir.join(format!(
            "{}_{score}.{}",
            self.metric_name,
            self.renderer.extension()
        ))
    }

    /// Record the episode containing the transition at `i_max`, whose score is the new milestone
    ///
    /// The tracker is only committed once the episode is known to be complete. Errors creating the
    /// output directory or rendering are returned after the commit, so a failed recording is not
    /// retried.
    pub fn record<L: ExperienceLog + ?Sized>(
        &mut self,
        tracker: &mut MetricTracker,
        log: &L,
        i_max: usize,
    ) -> Result<RecordOutcome> {
        ensure!(
            i_max < log.len(),
            "milestone index {i_max} is past the end of a log of length {}",
            log.len()
        );
        let score = log
            .get(i_max)
            .map(|t| t.snake_length)
            .context("milestone transition missing from log")?;

        let span = match locate_episode(log, i_max) {
            Located::Complete(span) => span,
            Located::Incomplete => {
                log::debug!("episode scoring {score} has not finished yet; deferring");
                return Ok(RecordOutcome::DeferredIncompleteEpisode);
            }
        };

        if span.truncated {
            log::warn!(
                "the trajectory which yielded a max score of {score} was truncated at {} steps",
                self.max_episode_steps
            );
        }

        tracker.commit(score);

        let trajectory = log.extract(span.start..=span.end);

        fs::create_dir_all(&self.video_dir).with_context(|| {
            format!("failed to create video directory {}", self.video_dir.display())
        })?;

        let path = self.recording_path(score);
        self.renderer
            .render(&path, &trajectory)
            .with_context(|| format!("failed to render milestone {score}"))?;

        Ok(RecordOutcome::Recorded { path, span })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::memory::{Board, ReplayMemory, Transition};

    /// Keeps rendered trajectories instead of writing them
    #[derive(Default)]
    struct CaptureRenderer {
        rendered: Vec<(PathBuf, Vec<Transition>)>,
        fail: bool,
    }

    impl Renderer for CaptureRenderer {
        fn extension(&self) -> &str {
            "cast"
        }

        fn render(&mut self, path: &Path, trajectory: &[Transition]) -> Result<()> {
            if self.fail {
                bail!("encoder unavailable");
            }
            self.rendered.push((path.to_path_buf(), trajectory.to_vec()));
            Ok(())
        }
    }

    /// `.` mid-episode, `d` done, `t` truncated, with snake lengths from `scores`
    fn log(pattern: &str, scores: &[u32]) -> Vec<Transition> {
        pattern
            .chars()
            .zip(scores)
            .enumerate()
            .map(|(i, (c, &score))| {
                let t = Transition::new(i as u32, 0, 0.0, score, Board::new(2));
                match c {
                    'd' => t.end_episode(),
                    't' => t.truncate(),
                    _ => t,
                }
            })
            .collect()
    }

    #[test]
    fn records_completed_episode() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = MilestoneRecorder::new(CaptureRenderer::default(), dir.path(), "exp");
        let mut tracker = MetricTracker::new(5);
        let log = log("..d....d..", &[1, 2, 3, 1, 4, 9, 9, 9, 1, 1]);

        let outcome = recorder.record(&mut tracker, log.as_slice(), 5).unwrap();

        let expected_path = dir.path().join("exp/videos/snake_length_9.cast");
        assert_eq!(
            outcome,
            RecordOutcome::Recorded {
                path: expected_path.clone(),
                span: EpisodeSpan {
                    start: 3,
                    end: 7,
                    truncated: false
                },
            }
        );
        assert!(recorder.video_dir().is_dir(), "video directory created");
        assert_eq!(tracker.prev_max(), 9, "milestone committed");

        let (path, trajectory) = &recorder.renderer.rendered[0];
        assert_eq!(path, &expected_path);
        assert_eq!(
            trajectory.iter().map(|t| t.step_count).collect::<Vec<_>>(),
            [3, 4, 5, 6, 7],
            "whole episode handed off, end inclusive"
        );
    }

    #[test]
    fn records_from_wrapped_replay_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = MilestoneRecorder::new(CaptureRenderer::default(), dir.path(), "exp");
        let mut tracker = MetricTracker::new(5);
        let mut memory = ReplayMemory::new(5);
        memory.extend(log(".d..d..d", &[1, 2, 3, 4, 5, 6, 9, 7]));
        let i_max = memory.argmax_snake_length().unwrap();

        let outcome = recorder.record(&mut tracker, &memory, i_max).unwrap();

        assert_eq!(
            outcome,
            RecordOutcome::Recorded {
                path: dir.path().join("exp/videos/snake_length_9.cast"),
                span: EpisodeSpan {
                    start: 2,
                    end: 4,
                    truncated: false
                },
            }
        );
        let (_, trajectory) = &recorder.renderer.rendered[0];
        assert_eq!(
            trajectory.iter().map(|t| t.snake_length).collect::<Vec<_>>(),
            [6, 9, 7],
            "episode taken from the retained records"
        );
    }

    #[test]
    fn defers_unfinished_episode_without_commit() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = MilestoneRecorder::new(CaptureRenderer::default(), dir.path(), "exp");
        let mut tracker = MetricTracker::new(5);
        let mut log = log("..d....", &[1, 2, 3, 1, 4, 9, 9]);

        let outcome = recorder.record(&mut tracker, log.as_slice(), 5).unwrap();
        assert_eq!(outcome, RecordOutcome::DeferredIncompleteEpisode);
        assert_eq!(tracker.prev_max(), 0, "tracker untouched");
        assert!(tracker.is_milestone(9), "milestone still pending");
        assert!(recorder.renderer.rendered.is_empty(), "nothing rendered");
        assert!(!recorder.video_dir().exists(), "no directory side effects");

        log.push(Transition::new(7, 0, 0.0, 9, Board::new(2)).end_episode());
        let outcome = recorder.record(&mut tracker, log.as_slice(), 5).unwrap();
        assert!(matches!(outcome, RecordOutcome::Recorded { .. }), "retry succeeds");
        assert!(!tracker.is_milestone(9), "milestone consumed");
    }

    #[test]
    fn records_truncated_episode() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = MilestoneRecorder::new(CaptureRenderer::default(), dir.path(), "exp")
            .with_max_episode_steps(4);
        let mut tracker = MetricTracker::new(0);
        let log = log("d...t", &[1, 6, 7, 7, 7]);

        let outcome = recorder.record(&mut tracker, log.as_slice(), 2).unwrap();
        let RecordOutcome::Recorded { span, .. } = outcome else {
            panic!("expected a recording, got {outcome:?}");
        };
        assert!(span.truncated, "truncation reported");
        assert_eq!(span.len(), 4);
        assert_eq!(recorder.renderer.rendered[0].1.len(), 4, "full span still rendered");
    }

    #[test]
    fn render_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CaptureRenderer {
            fail: true,
            ..Default::default()
        };
        let mut recorder = MilestoneRecorder::new(renderer, dir.path(), "exp");
        let mut tracker = MetricTracker::new(0);
        let log = log(".d", &[3, 3]);

        let err = recorder.record(&mut tracker, log.as_slice(), 0).unwrap_err();
        assert!(format!("{err:#}").contains("encoder unavailable"));
    }

    #[test]
    fn directory_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let mut recorder = MilestoneRecorder::new(CaptureRenderer::default(), &blocker, "exp");
        let mut tracker = MetricTracker::new(0);
        let log = log("d", &[3]);

        assert!(recorder.record(&mut tracker, log.as_slice(), 0).is_err());
        assert!(recorder.renderer.rendered.is_empty());
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = MilestoneRecorder::new(CaptureRenderer::default(), dir.path(), "exp");
        let mut tracker = MetricTracker::new(0);
        let log = log("d", &[3]);

        assert!(recorder.record(&mut tracker, log.as_slice(), 1).is_err());
    }

    #[test]
    fn recording_path_embeds_metric_and_score() {
        let recorder = MilestoneRecorder::new(CaptureRenderer::default(), "output", "run1")
            .with_metric_name("max_len");
        assert_eq!(
            recorder.recording_path(12),
            Path::new("output/run1/videos/max_len_12.cast")
        );
    }
}
