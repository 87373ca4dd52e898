//! Query filtering over the full descriptor dataset, and the session object
//! that couples a query box to one incremental list.

use crate::listview::{BatchReport, ItemSink, ListPhase, ListRenderer};
use crate::schema::VideoDescriptor;

/// Normalizes a raw query: surrounding whitespace dropped, case folded.
/// An empty normalized query means "not searching".
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn descriptor_matches(descriptor: &VideoDescriptor, normalized: &str) -> bool {
    descriptor.title.to_lowercase().contains(normalized)
        || descriptor.channel.to_lowercase().contains(normalized)
        || descriptor.full_description.to_lowercase().contains(normalized)
}

/// Derives the sequence to page through for a query. Empty query returns the
/// full dataset unchanged; otherwise the subset whose title, channel, or
/// untruncated description contains the query, case-insensitively.
pub fn filter_videos(all: &[VideoDescriptor], raw_query: &str) -> Vec<VideoDescriptor> {
    let normalized = normalize_query(raw_query);
    if normalized.is_empty() {
        return all.to_vec();
    }
    all.iter()
        .filter(|descriptor| descriptor_matches(descriptor, &normalized))
        .cloned()
        .collect()
}

/// What the search overlay does to the page after a query change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Number of descriptors in the new source.
    pub result_count: usize,
    pub searching: bool,
    /// The first post-reset batch, rendered immediately.
    pub first_batch: BatchReport,
    /// False when the whole result set fit in that batch; the client hides
    /// the sentinel then, since no further paging is possible.
    pub sentinel_visible: bool,
}

/// Owns the immutable full dataset and the one mutable cursor for a grid.
/// The search box never touches the cursor or the sink directly; it goes
/// through `set_query`, which swaps the source and replays from zero.
pub struct SearchSession {
    all: Vec<VideoDescriptor>,
    renderer: ListRenderer<VideoDescriptor>,
}

impl SearchSession {
    pub fn new(all: Vec<VideoDescriptor>, batch_size: usize) -> anyhow::Result<Self> {
        let renderer = ListRenderer::new(all.clone(), batch_size)?;
        Ok(Self { all, renderer })
    }

    pub fn renderer(&self) -> &ListRenderer<VideoDescriptor> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut ListRenderer<VideoDescriptor> {
        &mut self.renderer
    }

    /// Applies a query: re-derive the source, clear + rewind the list
    /// atomically, then render the first batch of the new source.
    pub fn set_query(
        &mut self,
        raw_query: &str,
        sink: &mut dyn ItemSink<VideoDescriptor>,
    ) -> QueryOutcome {
        let searching = !normalize_query(raw_query).is_empty();
        let filtered = filter_videos(&self.all, raw_query);
        let result_count = filtered.len();

        self.renderer.reset(filtered, sink);
        debug_assert_eq!(self.renderer.phase(), ListPhase::Idle);
        let first_batch = self.renderer.render_next_batch(sink);

        QueryOutcome {
            result_count,
            searching,
            first_batch,
            sentinel_visible: self.renderer.sentinel_active(),
        }
    }
}
