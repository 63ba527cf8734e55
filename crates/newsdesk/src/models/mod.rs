mod news;

pub use news::{FormError, NewsForm, NewsQuery, PageQuery};
