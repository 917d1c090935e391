/*
 * Responsibility
 * - buffer the handler's response so the body can be read more than once
 * - text / typed JSON views over the same bytes
 */
use axum::{
    body::{Bytes, to_bytes},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use serde::de::DeserializeOwned;

use crate::error::{DriverError, DriverResult};

#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub(crate) async fn from_response(response: Response) -> DriverResult<Self> {
        let (parts, body) = response.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .map_err(DriverError::Body)?;

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// A response "has content" when it carries body bytes or declares a
    /// content type (an explicitly empty JSON/text payload still counts).
    pub fn has_content(&self) -> bool {
        !self.body.is_empty() || self.headers.contains_key(header::CONTENT_TYPE)
    }

    pub fn text(&self) -> DriverResult<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    pub fn json<T: DeserializeOwned>(&self) -> DriverResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, response::IntoResponse};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: i32,
        name: String,
    }

    #[tokio::test]
    async fn body_can_be_read_as_text_and_json() {
        let response = Json(json!({"id": 1, "name": "foo"})).into_response();
        let response = TestResponse::from_response(response).await.unwrap();

        assert_eq!(r#"{"id":1,"name":"foo"}"#, response.text().unwrap());
        assert_eq!(
            Widget {
                id: 1,
                name: "foo".into()
            },
            response.json::<Widget>().unwrap()
        );
        // second read sees the same bytes
        assert_eq!(r#"{"id":1,"name":"foo"}"#, response.text().unwrap());
        assert_eq!(Some("application/json"), response.content_type());
    }

    #[tokio::test]
    async fn empty_response_has_no_content() {
        let response = TestResponse::from_response(StatusCode::NO_CONTENT.into_response())
            .await
            .unwrap();

        assert_eq!(StatusCode::NO_CONTENT, response.status());
        assert!(!response.has_content());
    }

    #[tokio::test]
    async fn invalid_json_is_a_deserialize_error() {
        let response = TestResponse::from_response("not json".into_response())
            .await
            .unwrap();

        let err = response.json::<Widget>().unwrap_err();
        assert!(matches!(err, DriverError::Deserialize(_)));
    }
}
