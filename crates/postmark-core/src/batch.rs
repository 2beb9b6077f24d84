//! Sequential batch processing with per-item failure isolation.
//!
//! Multi-file uploads and multi-image watermarking run one image at a time so
//! that only one decoded raster is alive at any moment. A failing item is
//! recorded and the batch moves on; a [`CancelToken`] is checked before each
//! item starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::EngineError;

/// Shared flag that stops a batch at the next item boundary.
///
/// Clones share the same flag, so one clone can be handed to the UI while
/// another is passed to the batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of one started item.
#[derive(Debug)]
pub struct BatchItem<T> {
    /// Position in the original input.
    pub index: usize,
    /// Caller-facing name, usually the file name.
    pub label: String,
    pub result: Result<T, EngineError>,
}

impl<T> BatchItem<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered results of a batch.
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Every started item, in input order.
    pub items: Vec<BatchItem<T>>,
    /// Labels of items skipped because the batch was cancelled.
    pub not_started: Vec<String>,
    /// True if the cancel token stopped the batch early.
    pub cancelled: bool,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            not_started: Vec::new(),
            cancelled: false,
        }
    }
}

impl<T> BatchReport<T> {
    /// Successful outputs with their input index.
    pub fn succeeded(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().ok().map(|out| (item.index, out)))
    }

    /// Failed items.
    pub fn failed(&self) -> impl Iterator<Item = &BatchItem<T>> {
        self.items.iter().filter(|item| !item.is_ok())
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }

    /// True if every input was started and none failed.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failure_count() == 0
    }

    /// Keep only successful outputs, dropping failures.
    pub fn into_outputs(self) -> Vec<T> {
        self.items
            .into_iter()
            .filter_map(|item| item.result.ok())
            .collect()
    }
}

/// Run `op` over labelled inputs in order.
///
/// Errors are captured per item; they never abort the batch. Cancellation is
/// only observed between items, so a started item always finishes.
pub fn run_batch<I, T, F>(
    inputs: impl IntoIterator<Item = (String, I)>,
    cancel: Option<&CancelToken>,
    mut op: F,
) -> BatchReport<T>
where
    F: FnMut(I) -> Result<T, EngineError>,
{
    let mut report = BatchReport::default();
    let mut iter = inputs.into_iter().enumerate();

    while let Some((index, (label, input))) = iter.next() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            report.cancelled = true;
            report.not_started.push(label);
            report
                .not_started
                .extend(iter.by_ref().map(|(_, (label, _))| label));
            break;
        }

        let result = op(input);
        if let Err(e) = &result {
            log::warn!("batch item {} ({}) failed: {}", index, label, e);
        }
        report.items.push(BatchItem {
            index,
            label,
            result,
        });
    }

    log::info!(
        "batch finished: {} succeeded, {} failed, {} not started{}",
        report.success_count(),
        report.failure_count(),
        report.not_started.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(values: &[i32]) -> Vec<(String, i32)> {
        values
            .iter()
            .map(|v| (format!("item-{}", v), *v))
            .collect()
    }

    fn reject_negative(v: i32) -> Result<i32, EngineError> {
        if v < 0 {
            Err(EngineError::invalid("value", "negative"))
        } else {
            Ok(v * 10)
        }
    }

    #[test]
    fn test_failures_are_isolated_and_ordered() {
        let report = run_batch(labelled(&[1, 2, -3, 4, 5]), None, reject_negative);

        assert_eq!(report.items.len(), 5);
        assert_eq!(report.success_count(), 4);
        assert_eq!(report.failure_count(), 1);

        let failed: Vec<_> = report.failed().map(|item| item.index).collect();
        assert_eq!(failed, vec![2]);

        let outputs: Vec<_> = report.succeeded().map(|(i, v)| (i, *v)).collect();
        assert_eq!(outputs, vec![(0, 10), (1, 20), (3, 40), (4, 50)]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_cancel_before_start() {
        let token = CancelToken::new();
        token.cancel();

        let report = run_batch(labelled(&[1, 2, 3]), Some(&token), reject_negative);
        assert!(report.cancelled);
        assert!(report.items.is_empty());
        assert_eq!(report.not_started, vec!["item-1", "item-2", "item-3"]);
    }

    #[test]
    fn test_cancel_mid_batch_finishes_current_item() {
        let token = CancelToken::new();
        let handle = token.clone();

        let report = run_batch(labelled(&[1, 2, 3, 4]), Some(&token), |v| {
            if v == 2 {
                handle.cancel();
            }
            reject_negative(v)
        });

        assert!(report.cancelled);
        assert_eq!(report.items.len(), 2);
        assert!(report.items.iter().all(BatchItem::is_ok));
        assert_eq!(report.not_started, vec!["item-3", "item-4"]);
    }

    #[test]
    fn test_empty_batch() {
        let report = run_batch(Vec::<(String, i32)>::new(), None, reject_negative);
        assert!(report.items.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn test_into_outputs_drops_failures() {
        let report = run_batch(labelled(&[-1, 7, -2]), None, reject_negative);
        assert_eq!(report.into_outputs(), vec![70]);
    }

    #[test]
    fn test_token_clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
