use crate::options::PageEntryConfig;
use crate::types::*;

/// Number of the next page to hand out.
///
/// Threaded through assembly by value so every entry sees exactly the page
/// number its predecessors left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCounter {
    next: u32,
}

impl Default for PageCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCounter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_page(&self) -> u32 {
        self.next
    }

    fn advance(self, pages: u32) -> Self {
        Self {
            next: self.next + pages,
        }
    }
}

/// How the pages of one entry are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMode {
    /// Each page gets its own cover image
    Single,
    /// Two facing pages share one image across the spine
    Spread,
}

/// One physical page produced by an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlot {
    pub entry_index: usize,
    pub slug: String,
    /// 1-based page number in the finished book
    pub page_number: u32,
    pub side: PageSide,
    /// Position within the entry (0 for its first page)
    pub index: usize,
    /// Total pages occupied by the entry
    pub span: u32,
    pub mode: SlotMode,
}

/// Pages occupied by an entry: explicit `span`, else 2 for spreads and 1 otherwise
pub fn effective_span(entry: &PageEntryConfig, slug: &str) -> Result<u32> {
    match entry.span {
        Some(span) if span < 1 => Err(BookError::Config(format!(
            "page '{slug}': span must be at least 1, got {span}"
        ))),
        Some(span) => u32::try_from(span).map_err(|_| {
            BookError::Config(format!("page '{slug}': span {span} is too large"))
        }),
        None => Ok(match entry.kind {
            PageKind::Spread => 2,
            PageKind::Page => 1,
        }),
    }
}

/// Expand one entry into its page slots, starting at `counter`
pub fn assemble_entry(
    counter: PageCounter,
    entry_index: usize,
    entry: &PageEntryConfig,
) -> Result<(PageCounter, Vec<PageSlot>)> {
    let slug = entry.slug_or_default(entry_index);
    let span = effective_span(entry, &slug)?;
    let first = counter.next_page();

    if span > 1 && PageSide::from_page_number(first) != PageSide::Left {
        return Err(BookError::SpreadAlignment {
            slug,
            page_number: first,
        });
    }

    let mode = if span == 2 {
        SlotMode::Spread
    } else {
        SlotMode::Single
    };

    let slots = (0..span)
        .map(|offset| {
            let page_number = first + offset;
            PageSlot {
                entry_index,
                slug: slug.clone(),
                page_number,
                side: PageSide::from_page_number(page_number),
                index: offset as usize,
                span,
                mode,
            }
        })
        .collect();

    Ok((counter.advance(span), slots))
}

/// Expand every entry in order into contiguous page slots numbered from 1
pub fn assemble(entries: &[PageEntryConfig]) -> Result<Vec<PageSlot>> {
    let mut counter = PageCounter::new();
    let mut slots = Vec::new();
    for (entry_index, entry) in entries.iter().enumerate() {
        let (next, entry_slots) = assemble_entry(counter, entry_index, entry)?;
        log::trace!(
            "Entry {} -> pages {}..{}",
            entry_index,
            counter.next_page(),
            next.next_page()
        );
        counter = next;
        slots.extend(entry_slots);
    }
    Ok(slots)
}
