use crate::assemble::{SlotMode, assemble};
use crate::options::PageEntryConfig;
use crate::types::*;

/// Page counts for a book, computed without touching any assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStatistics {
    /// Number of page entries
    pub entries: usize,
    /// Physical pages in the finished book
    pub pages: usize,
    /// Two-page spreads sharing one image
    pub spreads: usize,
    /// Entries spanning more than two pages
    pub multi_page_entries: usize,
    pub left_pages: usize,
    pub right_pages: usize,
    /// Page number of the first spread, if any
    pub first_spread_page: Option<u32>,
}

/// Calculate statistics for a page list
pub fn calculate_statistics(entries: &[PageEntryConfig]) -> Result<BookStatistics> {
    let slots = assemble(entries)?;

    // Count each entry once via its first page
    let firsts = slots.iter().filter(|slot| slot.index == 0);
    let spreads = firsts
        .clone()
        .filter(|slot| slot.mode == SlotMode::Spread)
        .count();
    let multi_page_entries = firsts.clone().filter(|slot| slot.span > 2).count();
    let first_spread_page = firsts
        .clone()
        .find(|slot| slot.mode == SlotMode::Spread)
        .map(|slot| slot.page_number);

    let left_pages = slots
        .iter()
        .filter(|slot| slot.side == PageSide::Left)
        .count();

    Ok(BookStatistics {
        entries: entries.len(),
        pages: slots.len(),
        spreads,
        multi_page_entries,
        left_pages,
        right_pages: slots.len() - left_pages,
        first_spread_page,
    })
}
