use crate::error::FetchError;
use crate::models::Character;

use super::fetcher::UpstreamFetcher;

/// 分页驱动
///
/// 第一页决定总页数，失败则整体失败；后续页失败只记录日志并跳过。
#[derive(Clone)]
pub struct Paginator {
    fetcher: UpstreamFetcher,
}

impl Paginator {
    pub fn new(fetcher: UpstreamFetcher) -> Self {
        Self { fetcher }
    }

    /// 按页序、页内顺序返回所有成功抓取的记录
    pub async fn fetch_all(&self) -> Result<Vec<Character>, FetchError> {
        let first = self.fetcher.fetch(1).await?;
        let total_pages = first.info.pages.max(1);
        tracing::info!("Total pages to fetch: {}", total_pages);
        tracing::info!(
            "Processing page 1 from {} ({} records)",
            total_pages,
            first.results.len()
        );

        let mut characters = first.results;
        let mut skipped = Vec::new();

        for page in 2..=total_pages {
            match self.fetcher.fetch(page).await {
                Ok(result) => {
                    tracing::info!(
                        "Processing page {} from {} ({} records)",
                        page,
                        total_pages,
                        result.results.len()
                    );
                    characters.extend(result.results);
                }
                Err(e) => {
                    tracing::error!("Error processing page {}: {}", page, e);
                    skipped.push(page);
                }
            }
        }

        if !skipped.is_empty() {
            tracing::warn!(
                "Aggregate is incomplete, skipped pages: {:?}",
                skipped
            );
        }

        Ok(characters)
    }
}
