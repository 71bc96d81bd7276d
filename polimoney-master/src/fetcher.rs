//! Municipality fetcher
//!
//! Reads the complete active municipality registry page by page.
//! A failed page ends pagination: the rows read so far are returned and the
//! failure is logged. There is no retry; a truncated fetch shows up as a
//! short municipal district count in the reconciliation report.

use crate::db::MasterStore;
use crate::pagination::Page;
use polimoney_common::db::MunicipalityRow;
use serde::Serialize;
use tracing::{debug, error};

/// Result of a paginated municipality read
#[derive(Debug, Clone, Default, Serialize)]
pub struct MunicipalityFetch {
    pub rows: Vec<MunicipalityRow>,
    /// Pages successfully read
    pub pages_read: usize,
    /// Error that truncated pagination, if any
    pub error: Option<String>,
}

impl MunicipalityFetch {
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch every active municipality ordered by code
///
/// On a read error the rows accumulated before the failing page are returned.
pub async fn fetch_all_municipalities<S>(store: &S, page_size: usize) -> Vec<MunicipalityRow>
where
    S: MasterStore + ?Sized,
{
    fetch_municipalities(store, page_size).await.rows
}

/// Fetch every active municipality, reporting whether the read was truncated
pub async fn fetch_municipalities<S>(store: &S, page_size: usize) -> MunicipalityFetch
where
    S: MasterStore + ?Sized,
{
    let mut fetch = MunicipalityFetch::default();
    let mut page = Page::first(page_size);

    loop {
        let rows = match store.fetch_municipality_page(page).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(
                    "Municipality fetch failed at offset {} (page {}): {}",
                    page.offset,
                    page.index + 1,
                    e
                );
                fetch.error = Some(e.to_string());
                break;
            }
        };

        let returned = rows.len();
        if returned == 0 {
            break;
        }

        fetch.rows.extend(rows);
        fetch.pages_read += 1;
        debug!(
            "Fetched municipality page {} ({} rows, {} total)",
            page.index + 1,
            returned,
            fetch.rows.len()
        );

        if !page.has_more(returned) {
            break;
        }
        page = page.next();
    }

    fetch
}
