//! Student list helpers: search, client-side pagination, initials

use shared::Student;

/// The list view never shows fewer rows than this per page.
pub const MIN_PAGE_SIZE: usize = 4;

/// Students whose name contains `term` (ignoring case) or whose national
/// ID contains it. An empty term matches everyone.
pub fn filter_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return students.iter().collect();
    }
    students
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle) || s.national_id.contains(term.trim()))
        .collect()
}

/// One page of an already-fetched list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first item shown, 0 when empty
    pub first: usize,
    /// 1-based index of the last item shown, 0 when empty
    pub last: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice `items` into pages of `per_page` (at least [`MIN_PAGE_SIZE`]) and
/// return page `page`, clamped into the valid range.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(MIN_PAGE_SIZE);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    if total_items == 0 {
        return Page {
            items: &items[..0],
            number: 1,
            total_pages: 0,
            total_items: 0,
            first: 0,
            last: 0,
        };
    }

    let number = page.clamp(1, total_pages);
    let start = (number - 1) * per_page;
    let end = (start + per_page).min(total_items);

    Page {
        items: &items[start..end],
        number,
        total_pages,
        total_items,
        first: start + 1,
        last: end,
    }
}

/// Two-letter avatar placeholder for a name.
pub fn initials(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "NN".to_string();
    }
    trimmed.chars().take(2).collect::<String>().to_uppercase()
}
