use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::Serialize;
use url::Url;

use super::{AuthError, Authenticator};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
}

/// Logs in by posting the credentials as JSON to an authentication endpoint.
/// Without credentials the request is sent with null fields, which the service treats as an anonymous login.
pub struct HttpLoginClient {
    client: Client,
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpLoginClient {
    pub fn new(
        client: Client,
        endpoint: Url,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        HttpLoginClient {
            client,
            endpoint,
            username,
            password,
        }
    }
}

#[async_trait]
impl Authenticator for HttpLoginClient {
    async fn login(&self) -> Result<(), AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let request = LoginRequest {
            username: self.username.as_deref(),
            password: self.password.as_deref(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::debug!("Login rejected by {}: {} - {}", self.endpoint, status, body);
            let body = body.trim();
            return Err(AuthError::Rejected(if body.is_empty() {
                format!("login rejected: {status}")
            } else {
                format!("login rejected: {status} - {body}")
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_probe::probe::test_server::{ok_with_body, serve_once, serve_once_capturing};

    fn login_client(url: &str, username: Option<&str>) -> HttpLoginClient {
        HttpLoginClient::new(
            Client::builder().no_proxy().build().unwrap(),
            Url::parse(url).unwrap(),
            username.map(str::to_string),
            None,
        )
    }

    #[tokio::test]
    async fn test_login_posts_credentials_as_json() {
        let (url, request) = serve_once_capturing(ok_with_body("{}")).await;
        let client = login_client(&url, Some("probe"));

        client.login().await.expect("Login should be accepted");

        let request = request.await.expect("Request was not captured");
        let (head, body) = request.split_once("\r\n\r\n").expect("Malformed request");
        assert!(head.starts_with("POST / HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
        assert_eq!(body, r#"{"username":"probe","password":null}"#);
    }

    #[tokio::test]
    async fn test_login_accepted() {
        let url = serve_once(ok_with_body("{}")).await;
        let client = login_client(&url, Some("probe"));

        assert!(client.login().await.is_ok());
    }

    #[tokio::test]
    async fn test_login_rejected_carries_status_and_body() {
        let url = serve_once(
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 19\r\nConnection: close\r\n\r\ninvalid credentials"
                .to_string(),
        )
        .await;
        let client = login_client(&url, None);

        let err = client.login().await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_connection_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = login_client(&format!("http://{addr}/login"), None);

        let err = client.login().await.unwrap_err();
        assert!(matches!(err, AuthError::Http(_)));
    }
}
