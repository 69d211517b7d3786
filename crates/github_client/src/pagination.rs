//! Paginated repository listing.
//!
//! GitHub signals continuation through the `Link` response header: as long as
//! a `rel="next"` relation is present there is another page to fetch. The
//! pager here follows that relation one page at a time, on demand. There is
//! no prefetching and no retry; a non-success status fails the whole
//! sequence.

use http::Uri;
use octocrab::{Octocrab, Page};
use tracing::debug;

use crate::errors::Error;
use crate::models::RepositoryRecord;
use crate::translate_octocrab_error;

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;

/// Where the pager currently stands in the listing sequence.
enum PageState {
    /// The first page has not been requested yet.
    Start,
    /// The previous response carried a `rel="next"` link to this URL.
    Next(Uri),
    /// The previous response carried no `rel="next"` link.
    Done,
}

/// A forward-only pager over the authenticated user's repository listing.
///
/// Each call to [`RepoPages::next_page`] issues exactly one authenticated
/// request and yields the decoded page. The sequence ends when a response
/// carries no `rel="next"` link relation. A pager is not restartable; obtain
/// a fresh one from
/// [`GitHubClient::user_repositories`](crate::GitHubClient::user_repositories)
/// to iterate again.
pub struct RepoPages {
    client: Octocrab,
    route: String,
    state: PageState,
}

impl RepoPages {
    pub(crate) fn new(client: Octocrab, route: String) -> Self {
        Self {
            client,
            route,
            state: PageState::Start,
        }
    }

    /// Fetches the next page of repository records.
    ///
    /// Returns `Ok(Some(records))` while pages remain and `Ok(None)` once the
    /// listing is exhausted. Further calls after exhaustion keep returning
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] when the API answers with a
    /// non-success status, [`Error::InvalidResponse`] when a page does not
    /// match the descriptor schema, and [`Error::Transport`] for connection
    /// level failures. Any error ends the sequence.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RepositoryRecord>>, Error> {
        let page: Page<RepositoryRecord> = match &self.state {
            PageState::Start => {
                debug!(route = %self.route, "fetching first listing page");
                self.client
                    .get(&self.route, None::<&()>)
                    .await
                    .map_err(|e| translate_octocrab_error(&self.route, e))?
            }
            PageState::Next(url) => {
                debug!(url = %url, "following next page link");
                match self
                    .client
                    .get_page(&Some(url.clone()))
                    .await
                    .map_err(|e| translate_octocrab_error(&self.route, e))?
                {
                    Some(page) => page,
                    None => {
                        self.state = PageState::Done;
                        return Ok(None);
                    }
                }
            }
            PageState::Done => return Ok(None),
        };

        self.state = match page.next.clone() {
            Some(url) => PageState::Next(url),
            None => PageState::Done,
        };

        Ok(Some(page.items))
    }
}
