use json2video_core::{JsonObject, ToolRequest};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorCode},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Json2VideoMcp, helpers};

/// Parameters for starting a render job.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GenerateVideoParams {
    /// json2video API key (optional, can also be set as environment variable `JSON2VIDEO_API_KEY`)
    #[serde(rename = "apiKey", default, skip_serializing)]
    pub api_key: Option<String>,
    /// Scenes of the movie, in playback order. An object keyed by scene is also accepted.
    pub scenes: Value,
    /// Movie-level elements shown across all scenes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Value>>,
    /// Output resolution preset (e.g. `full-hd`, `custom`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Width in pixels when `resolution` is `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in pixels when `resolution` is `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Any other movie field (`fps`, `draft`, `variables`, `cache`, ...), passed through unchanged.
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl GenerateVideoParams {
    fn into_request(self) -> Result<(ToolRequest, Option<String>), ErrorData> {
        let api_key = self.api_key.clone();
        let movie = match serde_json::to_value(&self) {
            Ok(Value::Object(movie)) => movie,
            Ok(_) => JsonObject::new(),
            Err(err) => {
                return Err(helpers::mcp_err(
                    ErrorCode::INTERNAL_ERROR,
                    format!("failed to encode movie: {err}"),
                ));
            }
        };
        Ok((ToolRequest::GenerateVideo { movie }, api_key))
    }
}

/// Parameters for polling a render job.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetVideoStatusParams {
    /// json2video API key (optional, can also be set as environment variable `JSON2VIDEO_API_KEY`)
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    /// Project ID from video generation
    pub project: String,
}

#[tool_router(router = tool_router_video, vis = "pub")]
impl Json2VideoMcp {
    #[tool(description = "Generate a video from a json2video movie definition. Returns the project ID to poll.")]
    async fn generate_video(
        &self,
        Parameters(params): Parameters<GenerateVideoParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let (request, api_key) = params.into_request()?;
        self.run(request, api_key).await
    }

    #[tool(description = "Get the status or result of a generated video")]
    async fn get_video_status(
        &self,
        Parameters(params): Parameters<GetVideoStatusParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ToolRequest::GetVideoStatus {
            project: params.project,
        };
        self.run(request, params.api_key).await
    }
}

#[cfg(test)]
mod tests {
    use json2video_core::{Dispatcher, Json2VideoClient};
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn server_for(mock: &MockServer, default_key: Option<&str>) -> Json2VideoMcp {
        Json2VideoMcp::new(
            Dispatcher::new(Json2VideoClient::new(mock.uri()))
                .with_default_api_key(default_key.map(str::to_string)),
        )
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|content| content.as_text())
            .map(|text| text.text.clone())
            .expect("tool result should carry a text block")
    }

    #[test]
    fn movie_body_omits_api_key_and_unset_fields() {
        let params: GenerateVideoParams = serde_json::from_value(json!({
            "apiKey": "secret",
            "scenes": [{ "elements": [] }],
            "resolution": "full-hd"
        }))
        .expect("params");

        let (request, api_key) = params.into_request().expect("request");
        assert_eq!(api_key.as_deref(), Some("secret"));
        let ToolRequest::GenerateVideo { movie } = request else {
            panic!("expected generate request");
        };
        assert_eq!(
            Value::Object(movie),
            json!({ "scenes": [{ "elements": [] }], "resolution": "full-hd" })
        );
    }

    #[test]
    fn movie_body_keeps_undeclared_fields() {
        let params: GenerateVideoParams = serde_json::from_value(json!({
            "scenes": { "intro": { "elements": [] } },
            "fps": 30,
            "draft": true,
            "variables": { "a": 1 }
        }))
        .expect("params");

        let (request, api_key) = params.into_request().expect("request");
        assert!(api_key.is_none());
        let ToolRequest::GenerateVideo { movie } = request else {
            panic!("expected generate request");
        };
        assert_eq!(
            Value::Object(movie),
            json!({
                "scenes": { "intro": { "elements": [] } },
                "fps": 30,
                "draft": true,
                "variables": { "a": 1 }
            })
        );
    }

    #[tokio::test]
    async fn generate_video_forwards_extra_fields_upstream() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/movies"))
            .and(header("x-api-key", "inline"))
            .and(body_json(json!({
                "scenes": [{}],
                "resolution": "full-hd",
                "fps": 25,
                "cache": false
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "project": "p-2" })),
            )
            .expect(1)
            .mount(&mock)
            .await;

        let server = server_for(&mock, None);
        let params: GenerateVideoParams = serde_json::from_value(json!({
            "apiKey": "inline",
            "scenes": [{}],
            "resolution": "full-hd",
            "fps": 25,
            "cache": false
        }))
        .expect("params");
        let result = server
            .generate_video(Parameters(params))
            .await
            .expect("tool should succeed");

        assert_eq!(text_of(&result), "Video generation started. Project ID: p-2");
    }

    #[tokio::test]
    async fn generate_video_reports_project_id() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/movies"))
            .and(header("x-api-key", "env-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "project": "p-1" })),
            )
            .expect(1)
            .mount(&mock)
            .await;

        let server = server_for(&mock, Some("env-key"));
        let params: GenerateVideoParams =
            serde_json::from_value(json!({ "scenes": [{}] })).expect("params");
        let result = server
            .generate_video(Parameters(params))
            .await
            .expect("tool should succeed");

        assert_eq!(text_of(&result), "Video generation started. Project ID: p-1");
    }

    #[tokio::test]
    async fn empty_scenes_are_rejected_before_upstream() {
        let mock = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock)
            .await;

        let server = server_for(&mock, Some("env-key"));
        let params: GenerateVideoParams =
            serde_json::from_value(json!({ "scenes": [] })).expect("params");
        let err = server
            .generate_video(Parameters(params))
            .await
            .expect_err("empty scenes");

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn video_status_is_pretty_printed() {
        let mock = MockServer::start().await;
        let document = json!({ "success": true, "status": "done", "project": "abc123" });
        Mock::given(method("GET"))
            .and(path("/movies"))
            .and(query_param("project", "abc123"))
            .and(header("x-api-key", "inline"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document.clone()))
            .mount(&mock)
            .await;

        let server = server_for(&mock, None);
        let result = server
            .get_video_status(Parameters(GetVideoStatusParams {
                api_key: Some("inline".into()),
                project: "abc123".into(),
            }))
            .await
            .expect("tool should succeed");

        let text = text_of(&result);
        assert_eq!(
            serde_json::from_str::<Value>(&text).expect("json text"),
            document
        );
        assert!(text.contains('\n'));
    }

    #[tokio::test]
    async fn missing_key_maps_to_invalid_params() {
        let mock = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock)
            .await;

        let server = server_for(&mock, None);
        let err = server
            .get_video_status(Parameters(GetVideoStatusParams {
                api_key: None,
                project: "abc123".into(),
            }))
            .await
            .expect_err("missing key");

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.data, Some(json!({ "kind": "missing_credential" })));
    }
}
