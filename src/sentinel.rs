/// Identity of the sentinel row. A new identity means a new watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelTarget {
    /// First line of the sentinel in grid content coordinates.
    pub top: usize,
    /// Items rendered above it.
    pub items: usize,
}

#[derive(Debug)]
struct Watch {
    target: SentinelTarget,
    /// Last reported state; `None` until the first report.
    intersecting: Option<bool>,
}

impl Watch {
    fn new(target: SentinelTarget) -> Self {
        tracing::trace!(top = target.top, items = target.items, "sentinel watch attached");
        Self {
            target,
            intersecting: None,
        }
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        tracing::trace!(top = self.target.top, "sentinel watch disconnected");
    }
}

/// Watches the row below the grid and says when it scrolls into view.
///
/// At most one watch exists; replacing or disconnecting drops the old one.
/// A fresh watch reports the current state once, after that only a
/// transition into view counts.
#[derive(Debug)]
pub struct Sentinel {
    threshold: f32,
    watch: Option<Watch>,
}

impl Sentinel {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            watch: None,
        }
    }

    /// Watch `target`, re-establishing the watch if the identity changed.
    pub fn watch(&mut self, target: SentinelTarget) {
        if self.watch.as_ref().is_some_and(|w| w.target == target) {
            return;
        }
        self.disconnect();
        self.watch = Some(Watch::new(target));
    }

    pub fn disconnect(&mut self) {
        self.watch = None;
    }

    /// Feed the visible fraction of the sentinel. Returns true when the
    /// sentinel has just come into view.
    pub fn report(&mut self, visible_fraction: f32) -> bool {
        let Some(watch) = self.watch.as_mut() else {
            return false;
        };

        let intersecting = visible_fraction >= self.threshold;
        let entered = intersecting && watch.intersecting != Some(true);
        watch.intersecting = Some(intersecting);
        entered
    }
}
