//! Fixed-window passage chunking with overlap and page tracking

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Document, Passage};

/// Splits document text into overlapping fixed-size windows.
///
/// Windows are a pure function of the text and parameters: rechunking
/// unchanged text yields identical passage boundaries and count. Boundaries
/// snap to word bounds so a window never severs a word. Window, overlap and
/// minimum length are counted in characters; passage offsets are byte
/// offsets into the text.
pub struct Chunker {
    window: usize,
    overlap: usize,
    min_passage: usize,
}

/// A word-bound position as a byte offset and a char offset
#[derive(Clone, Copy)]
struct Bound {
    byte: usize,
    ch: usize,
}

impl Chunker {
    /// Create a chunker with explicit parameters
    pub fn new(window: usize, overlap: usize, min_passage: usize) -> Self {
        Self {
            window,
            overlap,
            min_passage,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.window_size, config.overlap, config.min_passage)
    }

    /// Chunk a document into passages with page ranges attached
    pub fn chunk(&self, doc: &Document) -> Vec<Passage> {
        let text = &doc.text;
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Cumulative word-bound positions; strictly increasing in both
        // units, first (0, 0), last (byte length, char length).
        let mut bounds: Vec<Bound> = Vec::with_capacity(text.len() / 4);
        bounds.push(Bound { byte: 0, ch: 0 });
        let (mut byte, mut ch) = (0, 0);
        for segment in text.split_word_bounds() {
            byte += segment.len();
            ch += segment.chars().count();
            bounds.push(Bound { byte, ch });
        }
        let last = bounds.len() - 1;

        let mut passages = Vec::new();
        let mut seq = 0u32;
        let mut start = 0usize; // index into bounds

        loop {
            let end = self.window_end(&bounds, start);
            let slice = &text[bounds[start].byte..bounds[end].byte];
            let trimmed = slice.trim();

            let keep = !trimmed.is_empty()
                && (trimmed.chars().count() >= self.min_passage
                    || end == last
                    || passages.is_empty());
            if keep {
                let (page_start, page_end) = doc.page_range(bounds[start].byte, bounds[end].byte);
                passages.push(Passage {
                    seq,
                    start: bounds[start].byte,
                    end: bounds[end].byte,
                    page_start,
                    page_end,
                    text: slice.to_string(),
                });
                seq += 1;
            }

            if end >= last {
                break;
            }

            let next = self.next_start(&bounds, end);
            // Overlap must never stall the walk.
            start = if next > start { next } else { end };
        }

        passages
    }

    /// Index of the smallest word bound at or past `window` chars after
    /// `start`, or the final bound
    fn window_end(&self, bounds: &[Bound], start: usize) -> usize {
        let target = bounds[start].ch.saturating_add(self.window);
        let i = bounds.partition_point(|b| b.ch < target);
        i.min(bounds.len() - 1)
    }

    /// Index of the largest word bound at or before `overlap` chars back
    /// from `end`
    fn next_start(&self, bounds: &[Bound], end: usize) -> usize {
        let target = bounds[end].ch.saturating_sub(self.overlap);
        bounds.partition_point(|b| b.ch <= target).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageSpan;

    fn doc(text: &str, pages: Vec<PageSpan>) -> Document {
        Document::new("test.txt".into(), text.len() as u64, text.into(), pages)
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("word{} ", i)).collect()
    }

    #[test]
    fn short_text_is_one_passage() {
        let d = doc("a single short passage", Vec::new());
        let passages = Chunker::new(100, 20, 4).chunk(&d);
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].seq, 0);
        assert_eq!(passages[0].start, 0);
        assert_eq!(passages[0].end, d.text.len());
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let d = doc(&words(200), Vec::new());
        let chunker = Chunker::new(100, 20, 10);
        let passages = chunker.chunk(&d);
        assert!(passages.len() > 1);

        for pair in passages.windows(2) {
            // The next window starts before the previous one ends.
            assert!(pair[1].start < pair[0].end);
            // And strictly after it started, so the walk makes progress.
            assert!(pair[1].start > pair[0].start);
        }
    }

    #[test]
    fn windows_never_sever_words() {
        let d = doc(&words(200), Vec::new());
        for passage in Chunker::new(100, 20, 10).chunk(&d) {
            assert!(!passage.text.starts_with(|c: char| c.is_alphanumeric())
                || passage.start == 0
                || !d.text[..passage.start].ends_with(|c: char| c.is_alphanumeric()));
        }
    }

    #[test]
    fn chunking_is_idempotent() {
        let d = doc(&words(500), Vec::new());
        let chunker = Chunker::new(128, 16, 10);
        let first = chunker.chunk(&d);
        let second = chunker.chunk(&d);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
            assert_eq!(a.seq, b.seq);
        }
    }

    #[test]
    fn whitespace_only_text_yields_no_passages() {
        let d = doc("   \n\t  ", Vec::new());
        assert!(Chunker::new(100, 20, 4).chunk(&d).is_empty());
    }

    #[test]
    fn final_tail_is_kept_even_when_small() {
        let text = format!("{}tail", words(30));
        let d = doc(&text, Vec::new());
        let passages = Chunker::new(100, 20, 50).chunk(&d);
        let last = passages.last().unwrap();
        assert_eq!(last.end, text.len());
        assert!(last.text.contains("tail"));
    }

    #[test]
    fn passages_carry_page_ranges() {
        let text = words(100);
        let mid = text.len() / 2;
        let d = doc(
            &text,
            vec![
                PageSpan { page: 1, start: 0, end: mid },
                PageSpan { page: 2, start: mid, end: text.len() },
            ],
        );
        let passages = Chunker::new(120, 24, 10).chunk(&d);

        assert_eq!(passages.first().unwrap().page_start, 1);
        assert_eq!(passages.last().unwrap().page_end, 2);
        // A passage straddling the midpoint spans both pages.
        let straddler = passages
            .iter()
            .find(|p| p.start < mid && p.end > mid)
            .unwrap();
        assert_eq!((straddler.page_start, straddler.page_end), (1, 2));
    }

    #[test]
    fn window_size_counts_characters_not_bytes() {
        // Same character layout, different byte widths: the Greek text is
        // two bytes per letter. Windows measured in characters must chunk
        // both identically.
        let chunker = Chunker::new(40, 8, 4);
        let wide = doc(&"αβγδεζη θικλ ".repeat(30), Vec::new());
        let narrow = doc(&"abcdefg hijk ".repeat(30), Vec::new());

        let wide_passages = chunker.chunk(&wide);
        let narrow_passages = chunker.chunk(&narrow);

        assert!(wide_passages.len() > 1);
        assert_eq!(wide_passages.len(), narrow_passages.len());
        for (w, n) in wide_passages.iter().zip(&narrow_passages) {
            assert_eq!(w.text.chars().count(), n.text.chars().count());
        }
    }

    #[test]
    fn multibyte_text_chunks_on_char_boundaries() {
        let text = "héllo wörld ".repeat(40);
        let d = doc(&text, Vec::new());
        for passage in Chunker::new(64, 8, 4).chunk(&d) {
            assert!(d.text.is_char_boundary(passage.start));
            assert!(d.text.is_char_boundary(passage.end));
        }
    }
}
