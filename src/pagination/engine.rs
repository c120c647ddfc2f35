//! Request helper: list calls with link-header pagination, plus the single
//! write requests that share the same request building.

use super::link::parse_link_header;
use super::types::{
    body_records, header_number, GetOptions, GetResponse, ListOptions, PaginatedResult,
    PaginationMetadata, LINK_HEADER, PAGE_HEADER,
};
use crate::connection::{ConnectionContext, ConnectionOptions};
use crate::error::{Error, Result};
use crate::http::{ByteStream, HttpClient, HttpClientConfig, ResponseEnvelope, Transport};
use crate::request::{build, BuildOptions, RequestDescriptor};
use crate::types::{JsonObject, JsonValue, Method};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Issues requests for one connection
///
/// Cheap to clone; clones share the connection context and the transport.
#[derive(Clone)]
pub struct RequestHelper {
    context: Arc<ConnectionContext>,
    transport: Arc<dyn Transport>,
}

impl RequestHelper {
    /// Create a helper over an explicit transport
    pub fn new(context: ConnectionContext, transport: Arc<dyn Transport>) -> Self {
        Self {
            context: Arc::new(context),
            transport,
        }
    }

    /// Create a helper backed by an [`HttpClient`]
    pub fn connect(options: &ConnectionOptions, config: HttpClientConfig) -> Result<Self> {
        let client = HttpClient::with_config(config)?;
        Ok(Self::new(ConnectionContext::new(options), Arc::new(client)))
    }

    /// The connection this helper issues requests for
    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    fn descriptor(&self, method: Method, endpoint: &str, options: BuildOptions) -> RequestDescriptor {
        let options = options.query_encoding(self.transport.query_encoding());
        build(&self.context, method, endpoint, options)
    }

    /// GET an endpoint, either paginated or as a live stream
    pub async fn get(
        &self,
        endpoint: &str,
        options: &ListOptions,
        get: GetOptions,
    ) -> Result<GetResponse> {
        if get.stream {
            let stream = self.stream(endpoint, options.to_object()).await?;
            return Ok(GetResponse::Stream(stream));
        }
        self.get_paginated(endpoint, options)
            .await
            .map(GetResponse::Data)
    }

    /// GET an endpoint and return its body as it arrives
    pub async fn stream(&self, endpoint: &str, query: JsonObject) -> Result<ByteStream> {
        let descriptor = self.descriptor(
            Method::GET,
            endpoint,
            BuildOptions::new().query(query).streaming(true),
        );
        self.transport.execute_stream(descriptor).await
    }

    /// Fetch a list resource, following `next` links unless a page is pinned
    pub async fn get_paginated(
        &self,
        endpoint: &str,
        options: &ListOptions,
    ) -> Result<PaginatedResult> {
        self.get_paginated_with_cancel(endpoint, options, &CancellationToken::new())
            .await
    }

    /// [`get_paginated`](Self::get_paginated) that stops when `cancel` fires
    ///
    /// Cancellation is observed while waiting on each page; records gathered
    /// so far are dropped and [`Error::Cancelled`] is returned.
    pub async fn get_paginated_with_cancel(
        &self,
        endpoint: &str,
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResult> {
        let mut query = options.query_options();
        let mut endpoint = endpoint.to_string();
        let mut data = Vec::new();

        loop {
            let descriptor = self.descriptor(
                Method::GET,
                &endpoint,
                BuildOptions::new().query(query.clone()).full_response(true),
            );
            debug!("Fetching page: {}", descriptor.url);

            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::cancelled(endpoint)),
                result = self.transport.execute(descriptor) => result?,
            };

            if options.pins_page() && options.show_pagination {
                let pagination = PaginationMetadata::from_response(&response);
                return Ok(PaginatedResult::Page {
                    data: body_records(response.body),
                    pagination,
                });
            }

            let next = self.next_endpoint(&response, options);
            data.extend(body_records(response.body));

            match next {
                Some(next) => {
                    debug!("Following next link to {}", next);
                    // the next link carries its own page
                    query.remove("page");
                    endpoint = next;
                }
                None => return Ok(PaginatedResult::Records(data)),
            }
        }
    }

    /// Endpoint of the page to fetch after `response`, if any
    ///
    /// Only followed when no page is pinned, a `next` relation exists and the
    /// server-reported page number is below `max_pages` (a bound of 0 means
    /// no bound).
    fn next_endpoint(&self, response: &ResponseEnvelope, options: &ListOptions) -> Option<String> {
        if options.pins_page() {
            return None;
        }

        let under_max_page_limit = match options.max_pages {
            None | Some(0) => true,
            Some(max_pages) => header_number::<u32>(response, PAGE_HEADER)
                .is_some_and(|page| page < max_pages),
        };
        if !under_max_page_limit {
            return None;
        }

        let links = parse_link_header(response.header(LINK_HEADER)?);
        let next = links.get("next")?;
        Some(self.context.relative_endpoint(next).to_string())
    }

    /// POST `options` as a JSON body, or form-encoded when `as_form`
    pub async fn post(&self, endpoint: &str, options: JsonObject, as_form: bool) -> Result<JsonValue> {
        let build_options = if as_form {
            BuildOptions::new().form(options)
        } else {
            BuildOptions::new().json(JsonValue::Object(options))
        };
        let descriptor = self.descriptor(Method::POST, endpoint, build_options);
        Ok(self.transport.execute(descriptor).await?.into_body())
    }

    /// PUT `options` as a JSON body
    pub async fn put(&self, endpoint: &str, options: JsonObject) -> Result<JsonValue> {
        let descriptor = self.descriptor(
            Method::PUT,
            endpoint,
            BuildOptions::new().json(JsonValue::Object(options)),
        );
        Ok(self.transport.execute(descriptor).await?.into_body())
    }

    /// DELETE with `options` as query parameters
    pub async fn delete(&self, endpoint: &str, options: JsonObject) -> Result<JsonValue> {
        let descriptor = self.descriptor(
            Method::DELETE,
            endpoint,
            BuildOptions::new().query(options),
        );
        Ok(self.transport.execute(descriptor).await?.into_body())
    }
}

impl std::fmt::Debug for RequestHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHelper")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
