use std::fmt;

/// One page of a paginated slice; displays as its items written back to back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T>(pub &'a [T]);

impl<'a, T> Page<'a, T> {
    pub fn items(&self) -> &'a [T] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    /// Split `items` into consecutive pages of `page_size`; the last page may be
    /// shorter. A page size of zero yields no pages.
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        let pages = if page_size == 0 {
            Vec::new()
        } else {
            items.chunks(page_size).map(Page).collect()
        };
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page<'a, T>> {
        self.pages.iter()
    }
}

impl<'a, T> IntoIterator for Paginator<'a, T> {
    type Item = Page<'a, T>;
    type IntoIter = std::vec::IntoIter<Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}
