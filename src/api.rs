// API client module: a small blocking HTTP client for the trunk
// provisioning API. Every call is one request and one fully-read response;
// there are no retries and no shared state between calls.
//
// The actual network exchange sits behind the `Transport` trait so the
// URL building, status classification and JSON handling in `ApiClient`
// can be exercised without a server.

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};

/// Parsed body of a successful response.
pub type JsonObject = Map<String, Value>;

/// One outgoing request, fully assembled.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
}

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a single HTTP exchange.
///
/// Implementations must send `Content-Type: application/json` and read the
/// body to the end before returning.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `Transport` backed by reqwest's blocking client. Credentials in the URL's
/// user-info are sent as basic auth by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build().map_err(Error::Client)?;
        Ok(Self::from_client(client))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let res = builder.send().map_err(Error::Send)?;
        let status = res.status().as_u16();
        let bytes = res.bytes().map_err(Error::ReadBody)?;
        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Account-scoped API client. Holds the endpoint configuration for the
/// process and the transport used to reach it.
pub struct ApiClient<T = ReqwestTransport> {
    config: EndpointConfig,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: EndpointConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Base URL with `path` appended verbatim.
    pub fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.config.base_url(), path);
        Url::parse(&raw).map_err(|source| Error::InvalidUrl {
            path: path.to_string(),
            source,
        })
    }

    /// POST `payload` as JSON and return the parsed response object.
    pub fn post<P: Serialize + ?Sized>(&self, path: &str, payload: &P) -> Result<JsonObject> {
        let body = serde_json::to_vec(payload).map_err(Error::Serialize)?;
        let res = self.exchange(Method::POST, path, Some(body))?;
        parse_object(&res.body)
    }

    /// GET and return the parsed response object.
    pub fn get(&self, path: &str) -> Result<JsonObject> {
        let res = self.exchange(Method::GET, path, None)?;
        parse_object(&res.body)
    }

    /// DELETE and return the parsed response object. An empty body on a
    /// successful response yields an empty object.
    pub fn delete(&self, path: &str) -> Result<JsonObject> {
        let res = self.exchange(Method::DELETE, path, None)?;
        if res.body.is_empty() {
            return Ok(JsonObject::new());
        }
        parse_object(&res.body)
    }

    /// Send one request and classify the status. The raw body of a
    /// successful response is echoed to stdout.
    fn exchange(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<HttpResponse> {
        let url = self.url(path)?;
        debug!(%method, path, "sending request");
        let res = self.transport.send(HttpRequest {
            method: method.clone(),
            url,
            body,
        })?;
        debug!(%method, path, status = res.status, bytes = res.body.len(), "response received");

        if res.status >= 400 {
            warn!(%method, path, status = res.status, "request rejected");
            return Err(Error::Http {
                status: res.status,
                body: res.body,
            });
        }
        println!("{}", res.body);
        Ok(res)
    }
}

fn parse_object(body: &str) -> Result<JsonObject> {
    serde_json::from_str(body).map_err(Error::Deserialize)
}

/// Payload for `POST /trunks`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateTrunkRequest {
    pub trunk_name: String,
    pub nso_code: String,
    pub domain_name: String,
}

/// One SIP destination, e.g. `10.0.0.5:5060;transport=tls`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub destination: String,
}

/// Payload for `POST /trunks/{sid}/destination-uris`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DestinationsRequest {
    pub destinations: Vec<Destination>,
}

/// Payload for `POST /trunks/{sid}/phone-numbers`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumberRequest {
    pub phone_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

/// Payload for `POST /trunks/{sid}/settings`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SettingsRequest {
    pub settings: Vec<Setting>,
}

/// Payload for `POST /trunks/{sid}/whitelisted-ips`. The mask goes out as
/// a JSON number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WhitelistIpRequest {
    pub ip: String,
    pub mask: u32,
}
