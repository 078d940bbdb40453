//! HTTP client for the LM Studio model server.

use crate::error::{GatewayError, GatewayResult};
use gateway_config::LmStudioConfig;
use gateway_core::{ChatMessage, ChatRequest, ChatResponse, ModelsResponse};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Model identifier used when neither the request nor the configuration
/// names one. LM Studio accepts it as an alias for whichever model is
/// currently loaded.
pub const FALLBACK_MODEL: &str = "local-model";

/// Client for the model server's OpenAI-compatible API.
///
/// Holds only the immutable settings captured at construction; individual
/// calls share no mutable state and may run concurrently.
#[derive(Debug, Clone)]
pub struct LmStudioClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
    default_model: Option<String>,
    default_temperature: f32,
    default_max_tokens: u32,
}

/// Payload sent to `POST /v1/chat/completions`.
#[derive(Serialize)]
struct OutboundPayload<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

impl LmStudioClient {
    /// Create a client from the resolved configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &LmStudioConfig) -> GatewayResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            default_model: config.default_model.clone(),
            default_temperature: config.temperature,
            default_max_tokens: config.max_tokens,
        })
    }

    /// Send a chat completion request to the model server.
    ///
    /// Applies the defaulting rules for model, temperature, and max tokens,
    /// forwards the messages verbatim, and returns the parsed response body
    /// unchanged. A single best-effort attempt; no retry.
    #[instrument(skip(self, request), fields(model = ?request.model))]
    pub async fn chat(&self, request: &ChatRequest) -> GatewayResult<ChatResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = OutboundPayload {
            model: self.resolve_model(request),
            messages: &request.messages,
            temperature: request.temperature.unwrap_or(self.default_temperature),
            max_tokens: request.max_tokens.unwrap_or(self.default_max_tokens),
        };

        debug!(url = %url, model = %payload.model, "sending chat completion to model server");

        let response = self
            .authorize(self.http.post(&url).json(&payload))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "model server returned an error");
            return Err(GatewayError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(transport_failure)?;
        debug!(
            total_tokens = parsed.usage.total_tokens,
            "received chat completion from model server"
        );
        Ok(parsed)
    }

    /// List the model identifiers the server currently exposes, in upstream
    /// order.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> GatewayResult<Vec<String>> {
        let url = format!("{}/v1/models", self.base_url);

        debug!(url = %url, "listing models from model server");

        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "model server rejected model listing");
            return Err(GatewayError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let listing: ModelsResponse = response.json().await.map_err(transport_failure)?;
        Ok(listing.data.into_iter().map(|m| m.id).collect())
    }

    /// Effective model for a request: request model first, then the
    /// configured default, then [`FALLBACK_MODEL`].
    fn resolve_model<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        request
            .model
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.default_model.as_deref())
            .unwrap_or(FALLBACK_MODEL)
    }

    /// Attach the bearer credential when one is configured.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }
}

fn transport_failure(error: reqwest::Error) -> GatewayError {
    error!(error = %error, "model server request failed");
    GatewayError::Transport(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_core::MessageRole;
    use serde_json::{json, Value};
    use url::Url;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LmStudioConfig {
        LmStudioConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            api_key: None,
            default_model: None,
            temperature: 0.7,
            max_tokens: 2048,
            request_timeout: None,
        }
    }

    fn completion_body(content: &str) -> Value {
        json!({
            "choices": [
                {"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
        })
    }

    async fn mount_chat_ok(server: &MockServer, body: Value) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn sole_outbound_body(server: &MockServer) -> Value {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        serde_json::from_slice(&requests[0].body).unwrap()
    }

    #[tokio::test]
    async fn request_model_wins_over_configured_default() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let mut config = config_for(&server);
        config.default_model = Some("configured-model".to_string());
        let client = LmStudioClient::new(&config).unwrap();

        let request = ChatRequest::new(vec![ChatMessage::user("hi")]).with_model("requested-model");
        client.chat(&request).await.unwrap();

        let body = sole_outbound_body(&server).await;
        assert_eq!(body["model"], "requested-model");
    }

    #[tokio::test]
    async fn configured_default_fills_missing_model() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let mut config = config_for(&server);
        config.default_model = Some("configured-model".to_string());
        let client = LmStudioClient::new(&config).unwrap();

        client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();

        let body = sole_outbound_body(&server).await;
        assert_eq!(body["model"], "configured-model");
    }

    #[tokio::test]
    async fn fallback_model_used_when_nothing_is_configured() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();

        // An empty request model counts as absent.
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]).with_model("");
        client.chat(&request).await.unwrap();

        let body = sole_outbound_body(&server).await;
        assert_eq!(body["model"], FALLBACK_MODEL);
    }

    #[tokio::test]
    async fn configured_defaults_fill_temperature_and_max_tokens() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let mut config = config_for(&server);
        config.temperature = 0.3;
        config.max_tokens = 128;
        let client = LmStudioClient::new(&config).unwrap();

        client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();

        let body = sole_outbound_body(&server).await;
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(body["max_tokens"], 128);
    }

    #[tokio::test]
    async fn message_order_is_preserved() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();

        let request = ChatRequest::new(vec![
            ChatMessage::system("a"),
            ChatMessage::user("b"),
            ChatMessage::assistant("c"),
            ChatMessage::user("b"),
        ]);
        client.chat(&request).await.unwrap();

        let body = sole_outbound_body(&server).await;
        let contents: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, ["a", "b", "c", "b"]);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][2]["role"], "assistant");
    }

    #[tokio::test]
    async fn bearer_credential_is_sent_when_configured() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let mut config = config_for(&server);
        config.api_key = Some(Secret::new("sk-test".to_string()));
        let client = LmStudioClient::new(&config).unwrap();

        client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let auth = requests[0].headers.get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer sk-test");
    }

    #[tokio::test]
    async fn no_authorization_header_without_credential() {
        let server = MockServer::start().await;
        mount_chat_ok(&server, completion_body("ok")).await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        let err = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();

        match err {
            GatewayError::UpstreamHttp { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            GatewayError::Transport(e) => panic!("expected upstream error, got transport: {e}"),
        }
    }

    #[tokio::test]
    async fn successful_response_is_returned_unchanged() {
        let server = MockServer::start().await;
        let upstream = completion_body("verbatim answer");
        mount_chat_ok(&server, upstream.clone()).await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        let response = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();

        assert_eq!(serde_json::to_value(&response).unwrap(), upstream);
    }

    #[tokio::test]
    async fn malformed_body_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        let err = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_failure() {
        let config = LmStudioConfig {
            base_url: Url::parse("http://127.0.0.1:1").unwrap(),
            api_key: None,
            default_model: None,
            temperature: 0.7,
            max_tokens: 2048,
            request_timeout: None,
        };
        let client = LmStudioClient::new(&config).unwrap();

        let err = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn lists_model_identifiers_in_upstream_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"id": "a"}, {"id": "b"}]})),
            )
            .mount(&server)
            .await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        let models = client.list_models().await.unwrap();
        assert_eq!(models, ["a", "b"]);
    }

    #[tokio::test]
    async fn model_listing_failure_maps_like_chat() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
            .mount(&server)
            .await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        let err = client.list_models().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[tokio::test]
    async fn concurrent_chats_resolve_independently() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"model": "model-a"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("from a")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"model": "model-b"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("from b")))
            .mount(&server)
            .await;

        let client = LmStudioClient::new(&config_for(&server)).unwrap();
        let request_a = ChatRequest::new(vec![ChatMessage::user("a")]).with_model("model-a");
        let request_b = ChatRequest::new(vec![ChatMessage::user("b")]).with_model("model-b");

        let (a, b) = tokio::join!(client.chat(&request_a), client.chat(&request_b));
        assert_eq!(a.unwrap().content(), "from a");
        assert_eq!(b.unwrap().content(), "from b");
    }

    #[test]
    fn resolve_model_prefers_request_then_default() {
        let config = LmStudioConfig {
            base_url: Url::parse("http://localhost:1234").unwrap(),
            api_key: None,
            default_model: Some("default-model".to_string()),
            temperature: 0.7,
            max_tokens: 2048,
            request_timeout: None,
        };
        let client = LmStudioClient::new(&config).unwrap();

        let with_model =
            ChatRequest::new(vec![ChatMessage::user("x")]).with_model("explicit");
        assert_eq!(client.resolve_model(&with_model), "explicit");

        let without = ChatRequest::new(vec![ChatMessage::user("x")]);
        assert_eq!(client.resolve_model(&without), "default-model");
    }

    #[test]
    fn messages_keep_their_roles() {
        let request = ChatRequest::new(vec![ChatMessage::system("s"), ChatMessage::user("u")]);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
    }
}
