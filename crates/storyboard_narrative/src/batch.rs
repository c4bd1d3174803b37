//! Sequential, paced batches that keep going past failed units.

use crate::StoryboardFrame;
use std::future::Future;
use storyboard_core::{Character, ImageReference, Scene};
use storyboard_error::StoryboardResult;
use storyboard_rate_limit::Pacer;
use tracing::{debug, info, instrument, warn};

/// Anything a batch can process, identified by a stable id.
pub trait BatchUnit {
    /// Identifier reported in outcomes and batch reports.
    fn unit_id(&self) -> &str;
}

impl BatchUnit for Character {
    fn unit_id(&self) -> &str {
        &self.id
    }
}

impl BatchUnit for Scene {
    fn unit_id(&self) -> &str {
        &self.id
    }
}

impl BatchUnit for StoryboardFrame {
    fn unit_id(&self) -> &str {
        self.id()
    }
}

/// Result of one unit, handed to the caller as soon as the unit finishes.
#[derive(Debug)]
pub struct UnitOutcome<T> {
    /// Unit the result belongs to
    pub unit_id: String,
    /// Payload or the unit's terminal error
    pub result: StoryboardResult<T>,
}

/// Which units succeeded and which failed, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Successful unit ids
    pub completed: Vec<String>,
    /// Failed unit ids
    pub failed: Vec<String>,
}

impl BatchReport {
    /// Units processed.
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// True when no unit failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Concept art for one scene.
///
/// The panorama is kept even when the detail grid fails afterwards.
#[derive(Debug)]
pub struct SceneArt {
    /// Wide-angle establishing image
    pub panorama: ImageReference,
    /// Nine-cell detail grid, or the error that ended it
    pub detail_grid: StoryboardResult<ImageReference>,
}

/// Generated panel image and the prompt sent for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRender {
    /// Generated image
    pub image: ImageReference,
    /// Exact prompt used
    pub prompt: String,
}

/// Runs units one at a time behind a [`Pacer`].
#[derive(Debug, Clone)]
pub struct BatchRunner {
    name: &'static str,
    pacer: Pacer,
}

impl BatchRunner {
    /// Create a runner. `name` labels its log events.
    pub fn new(name: &'static str, pacer: Pacer) -> Self {
        Self { name, pacer }
    }

    /// Process every unit in order.
    ///
    /// Each unit waits for the pacer, then runs `operation`; its outcome goes
    /// to `commit` before the next unit starts. A failed unit is logged and
    /// skipped, never aborting the batch.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let runner = BatchRunner::new("characters", Pacer::from_millis(1000));
    /// let report = runner
    ///     .run(&characters, |c| images.generate(&character_sheet_prompt(c), AspectRatio::Widescreen), |outcome| {
    ///         sheets.push(outcome);
    ///     })
    ///     .await;
    /// ```
    #[instrument(skip_all, fields(batch = self.name, units = units.len()))]
    pub async fn run<'a, U, T, F, Fut, C>(
        &self,
        units: &'a [U],
        operation: F,
        mut commit: C,
    ) -> BatchReport
    where
        U: BatchUnit,
        F: Fn(&'a U) -> Fut,
        Fut: Future<Output = StoryboardResult<T>>,
        C: FnMut(UnitOutcome<T>),
    {
        let mut report = BatchReport::default();

        for (index, unit) in units.iter().enumerate() {
            self.pacer.ready().await;
            let unit_id = unit.unit_id().to_string();
            debug!(index, unit_id = %unit_id, "Starting unit");

            let result = operation(unit).await;
            match &result {
                Ok(_) => report.completed.push(unit_id.clone()),
                Err(e) => {
                    warn!(index, unit_id = %unit_id, error = %e, "Unit failed, continuing batch");
                    report.failed.push(unit_id.clone());
                }
            }

            commit(UnitOutcome { unit_id, result });
        }

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "Batch finished"
        );
        report
    }
}
