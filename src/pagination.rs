//! Fixed-size page arithmetic for the product listing.
//!
//! A [`Paginator`] only knows the size of the result set; the caller resolves a
//! requested page number with [`Paginator::resolve`] and fetches the rows for
//! the returned [`Paginator::bounds`].

pub const PRODUCTS_PER_PAGE: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// Total number of pages. An empty result set still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            return 1;
        }
        (self.count + self.per_page - 1) / self.per_page
    }

    /// Turns a raw `page` parameter into a valid page number.
    ///
    /// Anything that is not an integer resolves to the first page. Integers
    /// outside `1..=num_pages` are clamped to the nearest end.
    pub fn resolve(&self, raw: Option<&str>) -> i64 {
        let requested = raw
            .map(str::trim)
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(1);

        requested.clamp(1, self.num_pages())
    }

    /// `(offset, limit)` of the rows that make up page `number`.
    pub fn bounds(&self, number: i64) -> (i64, i64) {
        let number = number.clamp(1, self.num_pages());
        ((number - 1) * self.per_page, self.per_page)
    }

    pub fn page<T>(&self, number: i64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: number.clamp(1, self.num_pages()),
            num_pages: self.num_pages(),
            count: self.count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then(|| self.number - 1)
    }
}
