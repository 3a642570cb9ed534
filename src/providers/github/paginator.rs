use futures::Stream;
use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::error::{Result, SpicyError};

use super::client::GitHubClient;

/// Items requested per page.
pub const PAGE_SIZE: usize = 100;

/// A page-numbered listing endpoint.
pub trait PageQuery {
    /// Raw response body of one page
    type Page: DeserializeOwned;
    /// Element yielded by the paginator
    type Item;

    /// Endpoint path relative to the API base URL.
    fn path(&self) -> String;

    /// Query parameters other than `per_page` and `page`.
    fn params(&self) -> Vec<(&'static str, String)>;

    /// Name of the operation, used in errors and logs.
    fn context(&self) -> String;

    /// Hard ceiling on the number of pages requested.
    fn max_pages(&self) -> u32;

    fn items(page: Self::Page) -> Vec<Self::Item>;

    /// Statuses meaning "not available for this target" rather than failure.
    fn tolerates(&self, _status: u16) -> bool {
        false
    }
}

enum PageState<T> {
    Requesting { page: u32 },
    Yielding {
        items: std::vec::IntoIter<T>,
        next_page: u32,
        last: bool,
    },
    Exhausted,
    Tolerated,
    Failed,
}

/// Lazily walks the pages of a [`PageQuery`], one request per page.
///
/// Stops on an empty page, a short page, the query's page cap, or a
/// tolerated status. Only the current page is held in memory.
pub struct Paginator<'a, Q: PageQuery> {
    client: &'a GitHubClient,
    query: Q,
    page_size: usize,
    state: PageState<Q::Item>,
    pages_fetched: u32,
}

impl<'a, Q: PageQuery> Paginator<'a, Q> {
    pub fn new(client: &'a GitHubClient, query: Q) -> Self {
        Self::with_page_size(client, query, PAGE_SIZE)
    }

    pub fn with_page_size(client: &'a GitHubClient, query: Q, page_size: usize) -> Self {
        Self {
            client,
            query,
            page_size: page_size.max(1),
            state: PageState::Requesting { page: 1 },
            pages_fetched: 0,
        }
    }

    /// Number of page requests issued so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// True once the endpoint answered with a tolerated status.
    pub fn is_tolerated(&self) -> bool {
        matches!(self.state, PageState::Tolerated)
    }

    /// Pulls the next item, fetching the next page when the current one is
    /// drained. Returns `Ok(None)` once the sequence has ended.
    ///
    /// # Errors
    ///
    /// Returns the request error for any non-tolerated failure. The
    /// paginator yields nothing afterwards.
    pub async fn next_item(&mut self) -> Result<Option<Q::Item>> {
        loop {
            match std::mem::replace(&mut self.state, PageState::Exhausted) {
                PageState::Requesting { page } => {
                    if page > self.query.max_pages() {
                        return Ok(None);
                    }

                    match self.fetch_page(page).await {
                        Ok(items) if items.is_empty() => return Ok(None),
                        Ok(items) => {
                            let last =
                                items.len() < self.page_size || page >= self.query.max_pages();
                            self.state = PageState::Yielding {
                                items: items.into_iter(),
                                next_page: page + 1,
                                last,
                            };
                        }
                        Err(e) if self.is_tolerated_error(&e) => {
                            warn!("{} unavailable, skipping: {e}", self.query.context());
                            self.state = PageState::Tolerated;
                            return Ok(None);
                        }
                        Err(e) => {
                            self.state = PageState::Failed;
                            return Err(e);
                        }
                    }
                }
                PageState::Yielding {
                    mut items,
                    next_page,
                    last,
                } => {
                    if let Some(item) = items.next() {
                        self.state = PageState::Yielding {
                            items,
                            next_page,
                            last,
                        };
                        return Ok(Some(item));
                    }
                    if !last {
                        self.state = PageState::Requesting { page: next_page };
                    }
                }
                terminal => {
                    self.state = terminal;
                    return Ok(None);
                }
            }
        }
    }

    /// Converts the paginator into a [`Stream`] of items.
    pub fn into_stream(self) -> impl Stream<Item = Result<Q::Item>> + 'a
    where
        Q: 'a,
    {
        futures::stream::try_unfold(self, |mut pages| async move {
            let next = pages.next_item().await?;
            Ok::<_, SpicyError>(next.map(|item| (item, pages)))
        })
    }

    fn is_tolerated_error(&self, error: &SpicyError) -> bool {
        error
            .status()
            .is_some_and(|status| self.query.tolerates(status))
    }

    async fn fetch_page(&mut self, page: u32) -> Result<Vec<Q::Item>> {
        let context = self.query.context();
        let mut params = self.query.params();
        params.push(("per_page", self.page_size.to_string()));
        params.push(("page", page.to_string()));

        debug!("Requesting page {page} of {context}");
        self.pages_fetched += 1;

        let body: Q::Page = self
            .client
            .get(&self.query.path(), &params, &context)
            .await?;

        let items = Q::items(body);
        debug!("{context}: page {page} returned {} items", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use mockito::Matcher;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct NumbersPage {
        numbers: Vec<u32>,
    }

    struct NumbersQuery {
        max_pages: u32,
        tolerated: Vec<u16>,
    }

    impl NumbersQuery {
        fn capped(max_pages: u32) -> Self {
            Self {
                max_pages,
                tolerated: Vec::new(),
            }
        }
    }

    impl PageQuery for NumbersQuery {
        type Page = NumbersPage;
        type Item = u32;

        fn path(&self) -> String {
            "numbers".to_string()
        }

        fn params(&self) -> Vec<(&'static str, String)> {
            vec![("kind", "test".to_string())]
        }

        fn context(&self) -> String {
            "Number listing".to_string()
        }

        fn max_pages(&self) -> u32 {
            self.max_pages
        }

        fn items(page: NumbersPage) -> Vec<u32> {
            page.numbers
        }

        fn tolerates(&self, status: u16) -> bool {
            self.tolerated.contains(&status)
        }
    }

    fn page_body(start: u32, count: u32) -> String {
        let numbers: Vec<u32> = (start..start + count).collect();
        serde_json::json!({ "numbers": numbers }).to_string()
    }

    async fn mock_page(
        server: &mut mockito::ServerGuard,
        page: u32,
        status: usize,
        body: String,
        hits: usize,
    ) -> mockito::Mock {
        server
            .mock("GET", "/numbers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("kind".into(), "test".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), page.to_string()),
            ]))
            .with_status(status)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_short_last_page_stops_without_extra_request() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_page(&mut server, 1, 200, page_body(0, 100), 1).await;
        let second = mock_page(&mut server, 2, 200, page_body(100, 100), 1).await;
        let third = mock_page(&mut server, 3, 200, page_body(200, 37), 1).await;
        let fourth = mock_page(&mut server, 4, 200, page_body(0, 0), 0).await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let mut pages = Paginator::new(&client, NumbersQuery::capped(10));

        let mut items = Vec::new();
        while let Some(item) = pages.next_item().await.unwrap() {
            items.push(item);
        }

        assert_eq!(items.len(), 237);
        assert_eq!(items.first(), Some(&0));
        assert_eq!(items.last(), Some(&236));
        assert_eq!(pages.pages_fetched(), 3);

        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
        fourth.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_first_page_issues_one_request() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_page(&mut server, 1, 200, page_body(0, 0), 1).await;
        let second = mock_page(&mut server, 2, 200, page_body(0, 0), 0).await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let mut pages = Paginator::new(&client, NumbersQuery::capped(10));

        assert_eq!(pages.next_item().await.unwrap(), None);
        assert_eq!(pages.next_item().await.unwrap(), None);
        assert_eq!(pages.pages_fetched(), 1);

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_page_cap_is_a_hard_ceiling() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_page(&mut server, 1, 200, page_body(0, 100), 1).await;
        let second = mock_page(&mut server, 2, 200, page_body(100, 100), 1).await;
        let third = mock_page(&mut server, 3, 200, page_body(200, 100), 0).await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let items: Vec<u32> = Paginator::new(&client, NumbersQuery::capped(2))
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items.len(), 200);
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_tolerated_status_ends_sequence_quietly() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_page(&mut server, 1, 404, "{}".to_string(), 1).await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let query = NumbersQuery {
            max_pages: 5,
            tolerated: vec![403, 404],
        };
        let mut pages = Paginator::new(&client, query);

        assert_eq!(pages.next_item().await.unwrap(), None);
        assert!(pages.is_tolerated());
        first.assert_async().await;
    }

    #[tokio::test]
    async fn test_failure_after_partial_pages_is_raised() {
        let mut server = mockito::Server::new_async().await;
        let _first = mock_page(&mut server, 1, 200, page_body(0, 100), 1).await;
        let _second = mock_page(&mut server, 2, 500, "{}".to_string(), 1).await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let query = NumbersQuery {
            max_pages: 5,
            tolerated: vec![403, 404],
        };
        let mut pages = Paginator::new(&client, query);

        for _ in 0..100 {
            assert!(pages.next_item().await.unwrap().is_some());
        }

        let err = pages.next_item().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Number listing failed (500)");
        assert_eq!(pages.next_item().await.unwrap(), None);
    }
}
