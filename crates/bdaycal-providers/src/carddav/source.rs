//! Remote contact source implementation.

use tracing::{debug, info};

use crate::error::{SourceError, SourceResult};
use crate::source::{BoxFuture, ContactSource};

use super::client::CardDavClient;
use super::config::CardDavConfig;
use super::xml::{addressbook_query_body, parse_multistatus};

/// Remote contact source.
///
/// Fetches contact data from a remote endpoint: a plain GET for a
/// published vCard file, or an `addressbook-query` REPORT for a CardDAV
/// address book collection.
pub struct CardDavSource {
    /// HTTP client for remote operations.
    client: CardDavClient,
    /// Source configuration.
    config: CardDavConfig,
}

impl CardDavSource {
    /// Creates a new remote source with the given configuration.
    pub fn new(config: CardDavConfig) -> SourceResult<Self> {
        let client = CardDavClient::new(config.clone())?;
        Ok(Self { client, config })
    }

    /// Fetches the address book with a REPORT and concatenates every
    /// returned contact fragment.
    async fn fetch_addressbook(&self) -> SourceResult<String> {
        let url = self.config.url_str();
        let body = addressbook_query_body();

        debug!(url = %url, "Querying address book with REPORT");

        let response = self.client.report(url, &body).await?;
        let fragments = parse_multistatus(&response);

        if fragments.is_empty() {
            return Err(SourceError::invalid_response(
                "Address book query returned no contact data",
            )
            .with_source_name("carddav"));
        }

        info!(
            url = %url,
            fragments = fragments.len(),
            "Fetched contact data fragments"
        );

        // Fragment order is preserved; records are joined by a newline.
        Ok(fragments.join("\n"))
    }
}

impl ContactSource for CardDavSource {
    fn name(&self) -> &str {
        "carddav"
    }

    fn descriptor(&self) -> String {
        if self.config.addressbook_query {
            format!("carddav:{}", self.config.url_str())
        } else {
            format!("http:{}", self.config.url_str())
        }
    }

    fn fetch(&self) -> BoxFuture<'_, SourceResult<String>> {
        Box::pin(async move {
            if self.config.addressbook_query {
                self.fetch_addressbook().await
            } else {
                let url = self.config.url_str();
                debug!(url = %url, "Fetching contact payload with GET");
                self.client.get(url).await
            }
        })
    }
}
