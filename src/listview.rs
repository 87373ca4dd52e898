//! Incremental list rendering: a cursor over an ordered sequence that
//! materializes fixed-size batches into a sink, in order, until exhausted.
//!
//! The same machine runs in two places. Server-side it drives the static
//! (crawler-visible) link lists emitted by the page builders; client-side the
//! shipped `js/lazy-list.js` implements it verbatim for the video grid and
//! the sidebar menu, one independent cursor per container.

use anyhow::{bail, Result};

/// Lifecycle of one cursor against one source sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Nothing rendered yet (position 0, source non-empty).
    Idle,
    /// Some but not all items rendered.
    Paging,
    /// Every item rendered; terminal for this source.
    Exhausted,
}

/// Status surfaced to the user after a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    EndOfList,
}

/// Outcome of one `render_next_batch` call: the half-open index range that
/// was appended, and the status message to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub start: usize,
    pub end: usize,
    pub status: LoadStatus,
}

impl BatchReport {
    pub fn rendered(&self) -> usize {
        self.end - self.start
    }
}

/// Receives materialized items. `clear` must leave the sink as if freshly
/// constructed; a reset relies on that.
pub trait ItemSink<T> {
    fn append(&mut self, item: &T);
    fn clear(&mut self);
}

/// The batched cursor. Owns the source sequence; `position` only moves
/// forward for a given source and is replaced wholesale on reset.
#[derive(Debug)]
pub struct ListRenderer<T> {
    source: Vec<T>,
    position: usize,
    batch_size: usize,
}

impl<T> ListRenderer<T> {
    pub fn new(source: Vec<T>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            bail!("list renderer batch size must be at least 1");
        }
        Ok(Self {
            source,
            position: 0,
            batch_size,
        })
    }

    pub fn phase(&self) -> ListPhase {
        if self.position >= self.source.len() {
            ListPhase::Exhausted
        } else if self.position == 0 {
            ListPhase::Idle
        } else {
            ListPhase::Paging
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether the proximity sentinel should keep triggering. Once the
    /// source is exhausted further signals are pointless and the client
    /// detaches its observer.
    pub fn sentinel_active(&self) -> bool {
        self.phase() != ListPhase::Exhausted
    }

    /// Appends the next `source[position..min(position+batch, len))` slice to
    /// the sink, in order, and advances the cursor. A call in the Exhausted
    /// phase appends nothing and reports `EndOfList`.
    pub fn render_next_batch(&mut self, sink: &mut dyn ItemSink<T>) -> BatchReport {
        let start = self.position;
        let end = (self.position + self.batch_size).min(self.source.len());
        for item in &self.source[start..end] {
            sink.append(item);
        }
        self.position = end;

        let status = if end == self.source.len() {
            LoadStatus::EndOfList
        } else {
            LoadStatus::Loading
        };
        BatchReport { start, end, status }
    }

    /// Swaps in a new source and rewinds to Idle. The sink is cleared in the
    /// same operation, so a stale batch from the old source can never land
    /// after the swap.
    pub fn reset(&mut self, new_source: Vec<T>, sink: &mut dyn ItemSink<T>) {
        sink.clear();
        self.source = new_source;
        self.position = 0;
    }

    /// Drives the cursor to exhaustion. The page builders use this to emit
    /// the full static list through the same batching path the client uses.
    pub fn render_all(&mut self, sink: &mut dyn ItemSink<T>) -> usize {
        let mut batches = 0;
        while self.sentinel_active() {
            self.render_next_batch(sink);
            batches += 1;
        }
        batches
    }
}

/// Collects markup fragments produced by a pure `render(&T) -> String`
/// function, one per appended item.
pub struct HtmlListSink<T> {
    render: fn(&T) -> String,
    fragments: Vec<String>,
}

impl<T> HtmlListSink<T> {
    pub fn new(render: fn(&T) -> String) -> Self {
        Self {
            render,
            fragments: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn into_markup(self) -> String {
        self.fragments.join("\n")
    }
}

impl<T> ItemSink<T> for HtmlListSink<T> {
    fn append(&mut self, item: &T) {
        self.fragments.push((self.render)(item));
    }

    fn clear(&mut self) {
        self.fragments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecSink(Vec<u32>);

    impl ItemSink<u32> for VecSink {
        fn append(&mut self, item: &u32) {
            self.0.push(*item);
        }
        fn clear(&mut self) {
            self.0.clear();
        }
    }

    fn sequence(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    #[test]
    fn rejects_zero_batch_size() {
        assert!(ListRenderer::new(sequence(3), 0).is_err());
    }

    #[test]
    fn empty_source_is_immediately_exhausted() {
        let mut list = ListRenderer::new(Vec::<u32>::new(), 10).expect("renderer");
        assert_eq!(list.phase(), ListPhase::Exhausted);
        assert!(!list.sentinel_active());

        let mut sink = VecSink(Vec::new());
        let report = list.render_next_batch(&mut sink);
        assert_eq!(report.rendered(), 0);
        assert_eq!(report.status, LoadStatus::EndOfList);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn oversized_batch_reaches_exhausted_in_one_call() {
        let mut list = ListRenderer::new(sequence(7), 50).expect("renderer");
        let mut sink = VecSink(Vec::new());
        let report = list.render_next_batch(&mut sink);
        assert_eq!((report.start, report.end), (0, 7));
        assert_eq!(report.status, LoadStatus::EndOfList);
        assert_eq!(list.phase(), ListPhase::Exhausted);
    }

    #[test]
    fn batches_cover_source_in_order_without_gaps() {
        let mut list = ListRenderer::new(sequence(125), 50).expect("renderer");
        let mut sink = VecSink(Vec::new());

        let first = list.render_next_batch(&mut sink);
        assert_eq!((first.start, first.end), (0, 50));
        assert_eq!(first.status, LoadStatus::Loading);
        assert_eq!(list.phase(), ListPhase::Paging);

        let second = list.render_next_batch(&mut sink);
        assert_eq!((second.start, second.end), (50, 100));
        assert_eq!(second.status, LoadStatus::Loading);

        let third = list.render_next_batch(&mut sink);
        assert_eq!((third.start, third.end), (100, 125));
        assert_eq!(third.status, LoadStatus::EndOfList);
        assert_eq!(list.phase(), ListPhase::Exhausted);
        assert!(!list.sentinel_active());

        assert_eq!(sink.0, sequence(125));
    }

    #[test]
    fn exhaustion_takes_exactly_ceil_n_over_b_batches() {
        for (n, b) in [(1usize, 1usize), (10, 3), (9, 3), (100, 7), (5, 100)] {
            let mut list = ListRenderer::new(sequence(n as u32), b).expect("renderer");
            let mut sink = VecSink(Vec::new());
            let batches = list.render_all(&mut sink);
            assert_eq!(batches, n.div_ceil(b), "n={n} b={b}");
            assert_eq!(sink.0.len(), n);

            let last = n % b;
            let expected_last = if last == 0 { b.min(n) } else { last };
            let tail = &sink.0[n - expected_last..];
            assert_eq!(tail.len(), expected_last);
        }
    }

    #[test]
    fn render_next_batch_after_exhaustion_is_a_noop() {
        let mut list = ListRenderer::new(sequence(4), 4).expect("renderer");
        let mut sink = VecSink(Vec::new());
        list.render_next_batch(&mut sink);
        assert_eq!(list.phase(), ListPhase::Exhausted);

        let report = list.render_next_batch(&mut sink);
        assert_eq!(report.rendered(), 0);
        assert_eq!(report.status, LoadStatus::EndOfList);
        assert_eq!(sink.0.len(), 4);
    }

    #[test]
    fn reset_rewinds_to_idle_and_clears_sink_before_new_batches() {
        let mut list = ListRenderer::new(sequence(10), 4).expect("renderer");
        let mut sink = VecSink(Vec::new());
        list.render_next_batch(&mut sink);
        list.render_next_batch(&mut sink);
        assert_eq!(list.phase(), ListPhase::Paging);

        list.reset(vec![100, 101, 102], &mut sink);
        assert_eq!(list.phase(), ListPhase::Idle);
        assert_eq!(list.position(), 0);
        assert!(sink.0.is_empty());

        let report = list.render_next_batch(&mut sink);
        assert_eq!(sink.0, vec![100, 101, 102]);
        assert_eq!(report.status, LoadStatus::EndOfList);
    }

    #[test]
    fn reset_from_exhausted_also_rewinds() {
        let mut list = ListRenderer::new(sequence(2), 5).expect("renderer");
        let mut sink = VecSink(Vec::new());
        list.render_next_batch(&mut sink);
        assert_eq!(list.phase(), ListPhase::Exhausted);

        list.reset(sequence(6), &mut sink);
        assert_eq!(list.phase(), ListPhase::Idle);
        assert!(list.sentinel_active());
    }

    #[test]
    fn html_sink_joins_fragments_in_order() {
        let mut list = ListRenderer::new(vec![1u32, 2, 3], 2).expect("renderer");
        let mut sink = HtmlListSink::new(|n: &u32| format!("<li>{n}</li>"));
        list.render_all(&mut sink);
        assert_eq!(sink.into_markup(), "<li>1</li>\n<li>2</li>\n<li>3</li>");
    }
}
