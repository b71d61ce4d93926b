//! Business rules over the catalog repositories.

mod category;
mod product;

pub use category::CategoryService;
pub use product::ProductService;

use crate::dto::total_pages;
use crate::error::{CatalogError, CatalogResult};
use crate::repository::check_page;

/// Validates paging arguments against the row count, before any page is read.
///
/// Pages past the end are rejected only when the set is non-empty.
fn page_total(page: i64, page_size: i64, total: u64) -> CatalogResult<i64> {
    check_page(page, page_size)?;
    let total = i64::try_from(total).unwrap_or(i64::MAX);
    let pages = total_pages(total, page_size);
    if total > 0 && page > pages {
        return Err(CatalogError::PaginationOutOfRange {
            requested_page: page,
            total_pages: pages,
        });
    }
    Ok(total)
}
