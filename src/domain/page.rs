#[derive(Debug, Clone, PartialEq, Eq)]
/// One page of a paginated listing.
///
/// `page` is zero-based and `total_size` is the number of elements the
/// server reported across all pages at the time this page was produced.
pub struct Page<T> {
    page: u32,
    total_size: u64,
    content: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(page: u32, total_size: u64, content: Vec<T>) -> Self {
        Self {
            page,
            total_size,
            content,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of elements in this page.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}
