use std::iter::Enumerate;
use std::slice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, info_span, warn};

use crate::error::{Error, OptionsError};
use crate::imageops_sharpen::loader::{ImageResource, Loader};
use crate::imageops_sharpen::options::{Mode, Overrides, SharpenOptions};
use crate::imageops_sharpen::process::{process_with_loader, ProcessResult};

/// Maximum number of resources processed per batch; extra resources are dropped.
pub const MAX_BATCH_SIZE: usize = 10;

/// Shared flag a host flips to stop a batch between items.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of one batch slot.
#[derive(Debug)]
pub struct BatchItem {
    /// Position in the submitted list.
    pub index: usize,
    pub name: String,
    pub outcome: Result<ProcessResult, Error>,
}

impl BatchItem {
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a batch produced, in submission order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    /// Resources never started because the batch was cancelled.
    pub skipped: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Sequential batch orchestration for one mode and one set of overrides.
///
/// Images are processed one at a time to bound peak memory and CPU. Each
/// failure is recorded for its slot and the batch moves on.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    mode: Mode,
    overrides: Overrides,
    loader: Loader,
    cancellation: Option<CancellationToken>,
    time_budget: Option<Duration>,
}

impl BatchProcessor {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Wall-clock budget per image; overruns are reported as that item's failure.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn max_dimension(&self) -> u32 {
        self.mode.max_dimension()
    }

    /// Options after applying the overrides to the mode preset.
    pub fn options(&self) -> Result<SharpenOptions, OptionsError> {
        self.overrides.resolve(self.mode)
    }

    /// Lazily processes up to [`MAX_BATCH_SIZE`] resources.
    ///
    /// Each call starts a fresh pass over `resources`. Every `next` runs
    /// exactly one image, so control returns to the caller between items.
    pub fn process<'a>(&self, resources: &'a [ImageResource]) -> BatchIter<'a> {
        if resources.len() > MAX_BATCH_SIZE {
            warn!(
                submitted = resources.len(),
                kept = MAX_BATCH_SIZE,
                "batch truncated"
            );
        }
        let resources = &resources[..resources.len().min(MAX_BATCH_SIZE)];
        let options = self.options();
        info!(
            mode = %self.mode,
            count = resources.len(),
            valid_options = options.is_ok(),
            "batch started"
        );

        BatchIter {
            resources: resources.iter().enumerate(),
            options,
            loader: self.loader.clone(),
            max_dim: self.max_dimension(),
            cancellation: self.cancellation.clone(),
            time_budget: self.time_budget,
            started: false,
            stopped: false,
        }
    }
}

/// Processes `resources` with the preset for `mode` and the given overrides.
pub fn process_batch(resources: &[ImageResource], overrides: Overrides, mode: Mode) -> BatchIter<'_> {
    BatchProcessor::new(mode)
        .with_overrides(overrides)
        .process(resources)
}

/// Iterator yielding one [`BatchItem`] per processed resource.
#[derive(Debug)]
pub struct BatchIter<'a> {
    resources: Enumerate<slice::Iter<'a, ImageResource>>,
    options: Result<SharpenOptions, OptionsError>,
    loader: Loader,
    max_dim: u32,
    cancellation: Option<CancellationToken>,
    time_budget: Option<Duration>,
    started: bool,
    stopped: bool,
}

impl BatchIter<'_> {
    /// Resources not yet started.
    pub fn remaining(&self) -> usize {
        self.resources.len()
    }

    /// Drains the iterator into a [`BatchReport`].
    pub fn into_report(mut self) -> BatchReport {
        let items: Vec<BatchItem> = self.by_ref().collect();
        let report = BatchReport {
            items,
            skipped: self.remaining(),
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped,
            "batch finished"
        );
        report
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn run(&self, resource: &ImageResource) -> Result<ProcessResult, Error> {
        let options = self.options.clone()?;
        let started_at = Instant::now();
        let result = process_with_loader(&self.loader, resource, &options, self.max_dim)?;

        let elapsed = started_at.elapsed();
        match self.time_budget {
            Some(budget) if elapsed > budget => Err(Error::TimeBudgetExceeded { elapsed, budget }),
            _ => Ok(result),
        }
    }
}

impl Iterator for BatchIter<'_> {
    type Item = BatchItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        if self.started {
            std::thread::yield_now();
        }
        if self.is_cancelled() {
            warn!(remaining = self.remaining(), "batch cancelled");
            self.stopped = true;
            return None;
        }

        let (index, resource) = self.resources.next()?;
        self.started = true;

        let _span = info_span!("batch_item", index, name = resource.name()).entered();
        let outcome = self.run(resource);
        if let Err(err) = &outcome {
            warn!(error = %err, "batch item failed");
        }

        Some(BatchItem {
            index,
            name: resource.name().to_owned(),
            outcome,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stopped {
            (0, Some(0))
        } else {
            (0, Some(self.remaining()))
        }
    }
}
