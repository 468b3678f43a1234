//! List item submission.
//!
//! [`TypeProcessService`] creates one list item per call through SharePoint's
//! `AddValidateUpdateItemUsingPath` endpoint and normalizes the outcome into
//! either the server's validated field values or a [`SubmitError`].
//!
//! # Example
//!
//! ```no_run
//! use typeprocess::{FormValue, ReqwestTransport, StringTable, SubmissionData, TypeProcessService};
//! use typeprocess::config::HttpConfig;
//!
//! # async fn run() -> typeprocess::Result<()> {
//! let transport = ReqwestTransport::new(&HttpConfig::default())?;
//! let service = TypeProcessService::new(transport, StringTable::default());
//!
//! let data = SubmissionData::new(vec![FormValue::new("Title", "New hire onboarding")]);
//! let fields = service
//!     .create_type_process(
//!         "https://contoso.sharepoint.com/sites/hr",
//!         "/sites/hr/Lists/Requests",
//!         &data,
//!     )
//!     .await?;
//! println!("created item with {} fields", fields.len());
//! # Ok(())
//! # }
//! ```

use std::sync::OnceLock;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ErrorKind, SubmitError};
use crate::localization::{Localizer, ERROR_WEB_ACCESS_DENIED, ERROR_WEB_NOT_FOUND};
use crate::model::{FormValue, ListItemFormUpdateValue, SubmissionData};
use crate::transport::{
    ClientConfiguration, HttpClientOptions, HttpTransport, TransportFailure, TransportResponse,
};

/// Path of the create-item endpoint below a web URL.
pub const ENDPOINT_PATH: &str = "/_api/web/GetList(@listUrl)/AddValidateUpdateItemUsingPath";

const ODATA_VERBOSE: &str = "application/json;odata=verbose";

/// Characters `encodeURIComponent` leaves alone: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a URI component the way browsers' `encodeURIComponent` does.
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

fn origin_regex() -> &'static Regex {
    static ORIGIN: OnceLock<Regex> = OnceLock::new();
    ORIGIN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/?#]*").expect("Invalid regex pattern")
    })
}

/// Strip the `scheme://host[:port]` prefix from an absolute web URL.
///
/// The root web maps to `/`. Input without a scheme is returned unchanged.
#[must_use]
pub fn server_relative_url(web_url: &str) -> String {
    let path = origin_regex().replace(web_url, "");
    if path.is_empty() {
        "/".to_string()
    } else {
        path.into_owned()
    }
}

/// The full create-item endpoint for a web and list.
#[must_use]
pub fn endpoint_url(web_url: &str, list_url: &str) -> String {
    format!(
        "{web_url}{ENDPOINT_PATH}?@listUrl={}",
        encode_uri_component(&format!("'{list_url}'"))
    )
}

#[derive(Debug, Serialize)]
struct Metadata {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ResourcePath<'a> {
    #[serde(rename = "__metadata")]
    metadata: Metadata,
    #[serde(rename = "DecodedUrl")]
    decoded_url: &'a str,
}

#[derive(Debug, Serialize)]
struct ListItemCreateInfo<'a> {
    #[serde(rename = "__metadata")]
    metadata: Metadata,
    #[serde(rename = "FolderPath")]
    folder_path: ResourcePath<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddValidateUpdateRequest<'a> {
    list_item_create_info: ListItemCreateInfo<'a>,
    form_value: &'a [FormValue],
    b_new_document_update: bool,
    check_in_comment: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct VerboseEnvelope {
    d: AddValidateUpdateData,
}

#[derive(Debug, Deserialize)]
struct AddValidateUpdateData {
    #[serde(rename = "AddValidateUpdateItemUsingPath")]
    add_validate_update: ResultsCollection,
}

#[derive(Debug, Deserialize)]
struct ResultsCollection {
    results: Vec<ListItemFormUpdateValue>,
}

/// Build the JSON body for a create-item request.
///
/// # Errors
///
/// Returns an error if the body cannot be serialized.
pub fn request_body(list_url: &str, data: &SubmissionData) -> serde_json::Result<String> {
    serde_json::to_string(&AddValidateUpdateRequest {
        list_item_create_info: ListItemCreateInfo {
            metadata: Metadata {
                kind: "SP.ListItemCreationInformationUsingPath",
            },
            folder_path: ResourcePath {
                metadata: Metadata {
                    kind: "SP.ResourcePath",
                },
                decoded_url: list_url,
            },
        },
        form_value: &data.form_values,
        b_new_document_update: false,
        check_in_comment: None,
    })
}

/// Build headers and body for a create-item request.
///
/// # Errors
///
/// Returns an error if the body cannot be serialized.
pub fn request_options(
    list_url: &str,
    data: &SubmissionData,
) -> serde_json::Result<HttpClientOptions> {
    let headers = [
        ("Accept", ODATA_VERBOSE.to_string()),
        ("Content-type", ODATA_VERBOSE.to_string()),
        (
            "X-SP-REQUESTRESOURCES",
            format!("listUrl={}", encode_uri_component(list_url)),
        ),
        ("odata-version", String::new()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    Ok(HttpClientOptions {
        headers,
        body: Some(request_body(list_url, data)?),
    })
}

/// Extract `d.AddValidateUpdateItemUsingPath.results` from a success response.
fn parse_results(
    response: &TransportResponse,
) -> Result<Vec<ListItemFormUpdateValue>, SubmitError> {
    response
        .json::<VerboseEnvelope>()
        .map(|envelope| envelope.d.add_validate_update.results)
        .map_err(|e| {
            SubmitError::malformed(
                response.status,
                format!("malformed response: expected d.AddValidateUpdateItemUsingPath.results ({e})"),
            )
        })
}

/// The fields of a failure the error mapping looks at.
#[derive(Debug)]
struct FailureInfo<'a> {
    status: Option<u16>,
    status_text: Option<&'a str>,
    status_message: Option<&'a str>,
    description: String,
}

impl<'a> From<&'a TransportResponse> for FailureInfo<'a> {
    fn from(response: &'a TransportResponse) -> Self {
        Self {
            status: Some(response.status),
            status_text: Some(response.status_text.as_str()),
            status_message: None,
            description: format!("HTTP {}", response.status),
        }
    }
}

impl<'a> From<&'a TransportFailure> for FailureInfo<'a> {
    fn from(failure: &'a TransportFailure) -> Self {
        Self {
            status: failure.status,
            status_text: failure.status_text.as_deref(),
            status_message: failure.status_message.as_deref(),
            description: failure.description.clone(),
        }
    }
}

/// Creates list items through the `AddValidateUpdateItemUsingPath` endpoint.
#[derive(Debug)]
pub struct TypeProcessService<T, L> {
    transport: T,
    localizer: L,
}

impl<T: HttpTransport, L: Localizer> TypeProcessService<T, L> {
    /// Create a service over a transport and a message table.
    #[must_use]
    pub fn new(transport: T, localizer: L) -> Self {
        Self {
            transport,
            localizer,
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Add a new item to the list at `list_url` on the web at `web_url`.
    ///
    /// Exactly one request is sent; repeating a call creates another item.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when the request cannot be sent, when the
    /// server answers with a non-success status, or when a success body does
    /// not contain the expected result collection.
    pub async fn create_type_process(
        &self,
        web_url: &str,
        list_url: &str,
        data: &SubmissionData,
    ) -> Result<Vec<ListItemFormUpdateValue>, SubmitError> {
        let endpoint = endpoint_url(web_url, list_url);
        let options = request_options(list_url, data)
            .map_err(|e| SubmitError::new(ErrorKind::Transport, None, e.to_string()))?;

        debug!(%endpoint, fields = data.form_values.len(), "submitting list item");
        trace!(body = options.body.as_deref().unwrap_or_default(), "request body");

        let response = match self
            .transport
            .post(&endpoint, ClientConfiguration::V1, options)
            .await
        {
            Ok(response) => response,
            Err(failure) => return Err(self.error_for(web_url, &FailureInfo::from(&failure))),
        };

        if !response.ok() {
            return Err(self.error_for(web_url, &FailureInfo::from(&response)));
        }

        let results = parse_results(&response).map_err(|err| {
            warn!(status = response.status, error = %err, "unexpected response shape");
            err
        })?;
        debug!(fields = results.len(), "list item created");
        Ok(results)
    }

    fn error_for(&self, web_url: &str, failure: &FailureInfo<'_>) -> SubmitError {
        let base = failure
            .status_text
            .filter(|s| !s.is_empty())
            .or(failure.status_message.filter(|s| !s.is_empty()))
            .map_or_else(|| failure.description.clone(), str::to_string);

        let web_path = server_relative_url(web_url);
        let (kind, message) = match failure.status {
            Some(403) => (
                ErrorKind::AccessDenied,
                self.localizer
                    .format(ERROR_WEB_ACCESS_DENIED, &[web_path.as_str()]),
            ),
            Some(404) => (
                ErrorKind::NotFound,
                self.localizer.format(ERROR_WEB_NOT_FOUND, &[web_path.as_str()]),
            ),
            _ => (ErrorKind::Transport, base),
        };

        warn!(status = ?failure.status, %kind, error = %message, "list item submission failed");
        SubmitError::new(kind, failure.status, message)
    }
}

/// Anything that can create list items from form values.
#[async_trait]
pub trait ItemSubmitter: Send + Sync {
    /// Create one list item; see [`TypeProcessService::create_type_process`].
    async fn create_type_process(
        &self,
        web_url: &str,
        list_url: &str,
        data: &SubmissionData,
    ) -> Result<Vec<ListItemFormUpdateValue>, SubmitError>;
}

#[async_trait]
impl<T: HttpTransport, L: Localizer> ItemSubmitter for TypeProcessService<T, L> {
    async fn create_type_process(
        &self,
        web_url: &str,
        list_url: &str,
        data: &SubmissionData,
    ) -> Result<Vec<ListItemFormUpdateValue>, SubmitError> {
        TypeProcessService::create_type_process(self, web_url, list_url, data).await
    }
}
