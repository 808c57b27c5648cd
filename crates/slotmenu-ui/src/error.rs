/// Errors raised when constructing menus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// Sizes must be a positive multiple of the row width (9).
    #[error("menu size {0} is not a positive multiple of 9")]
    InvalidSize(usize),
    #[error("a paged menu needs at least one page")]
    NoPages,
    #[error("a paged menu holds at most {0} pages")]
    TooManyPages(usize),
    #[error("the menu has been disposed")]
    Disposed,
}
