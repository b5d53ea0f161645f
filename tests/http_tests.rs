#[cfg(feature = "http")]
mod http_tests {
    use r_auth_client::{AuthClient, AuthError, AuthServiceClient, ClientConfig, MfaStatus};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "GOODTOKEN";

    fn root_body() -> serde_json::Value {
        json!({
            "version": "0.7.1",
            "servicename": "Authentication Service",
            "devtoken": false,
            "gitcommithash": "f00"
        })
    }

    fn token_body() -> serde_json::Value {
        json!({
            "type": "Dev",
            "id": "0c4e5d0e-4a4b-4c3f-9b0a-8a7d5c3e2f10",
            "expires": 1_800_000_000_000_i64,
            "created": 1_700_000_000_000_i64,
            "name": null,
            "user": "user_all",
            "mfa": "NotUsed",
            "custom": {},
            "cachefor": 300_000
        })
    }

    async fn auth_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(root_body()))
            .mount(&server)
            .await;
        server
    }

    fn base_url(server: &MockServer) -> String {
        format!("{}/auth", server.uri())
    }

    // ============ Handshake ============

    #[tokio::test]
    async fn create_and_report_version() {
        let server = auth_server().await;
        let client = AuthClient::create(&base_url(&server), ClientConfig::default())
            .await
            .unwrap();
        assert_eq!(client.service_version().await.unwrap(), "0.7.1");
    }

    #[tokio::test]
    async fn create_accepts_trailing_slash() {
        let server = auth_server().await;
        let url = format!("{}/", base_url(&server));
        let service = AuthServiceClient::create(&url).await.unwrap();
        assert_eq!(service.base_url(), url);
    }

    #[tokio::test]
    async fn create_rejects_blank_url() {
        for url in ["", "  \t  "] {
            let result = AuthClient::create(url, ClientConfig::default()).await;
            assert!(matches!(result, Err(AuthError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn create_rejects_bad_config_before_connecting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(root_body()))
            .expect(0)
            .mount(&server)
            .await;

        let config = ClientConfig::default().with_cache_capacity(0);
        let result = AuthClient::create(&base_url(&server), config).await;
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[tokio::test]
    async fn create_fails_for_other_services() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"servicename": "Groups Service", "version": "1.0"})),
            )
            .mount(&server)
            .await;

        let url = format!("{}/groups", server.uri());
        let result = AuthClient::create(&url, ClientConfig::default()).await;
        assert_eq!(
            result.err(),
            Some(AuthError::Service(format!(
                "The service at url {url} is not the auth service"
            )))
        );
    }

    #[tokio::test]
    async fn create_fails_on_non_json_responses() {
        for status in [200, 404] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_string("<html>hi</html>"))
                .mount(&server)
                .await;

            let result = AuthServiceClient::create(&server.uri()).await;
            assert_eq!(
                result.err(),
                Some(AuthError::Service(format!(
                    "Non-JSON response from auth server, status code: {status}"
                )))
            );
        }
    }

    #[tokio::test]
    async fn create_fails_on_error_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(405).set_body_json(json!({
                "error": {"httpcode": 405, "httpstatus": "Method Not Allowed",
                          "message": "HTTP GET not allowed."}
            })))
            .mount(&server)
            .await;

        let result = AuthServiceClient::create(&server.uri()).await;
        assert_eq!(
            result.err(),
            Some(AuthError::Service(
                "Error from auth server: HTTP GET not allowed.".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_a_service_error() {
        let result = AuthServiceClient::create("http://127.0.0.1:1/auth").await;
        match result {
            Err(AuthError::Service(message)) => {
                assert!(message.starts_with("Failed to reach auth server"))
            }
            other => panic!("unexpected result: {:?}", other.map(|c| c.base_url().to_string())),
        }
    }

    // ============ Token lookups ============

    #[tokio::test]
    async fn get_token_fetches_once_then_serves_from_cache() {
        let server = auth_server().await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/token"))
            .and(header("Authorization", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::create(&base_url(&server), ClientConfig::default())
            .await
            .unwrap();

        let token = client.get_token(TOKEN, None).await.unwrap();
        assert_eq!(token.user(), "user_all");
        assert_eq!(token.mfa(), MfaStatus::NotUsed);
        assert_eq!(token.created(), 1_700_000_000_000);
        assert_eq!(token.expires(), 1_800_000_000_000);
        assert_eq!(token.cachefor(), 300_000);

        let again = client.get_token(TOKEN, None).await.unwrap();
        assert_eq!(again, token);
        assert_eq!(client.token_cache().stats().hits, 1);
    }

    #[tokio::test]
    async fn invalid_token_is_reported_and_not_cached() {
        let server = auth_server().await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"httpcode": 401, "appcode": 10020,
                          "message": "10020 Invalid token"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = AuthClient::create(&base_url(&server), ClientConfig::default())
            .await
            .unwrap();

        for _ in 0..2 {
            let err = client.get_token("BADTOKEN", None).await.unwrap_err();
            assert_eq!(
                err,
                AuthError::InvalidToken("Auth server reported token is invalid.".to_string())
            );
        }
        assert!(client.token_cache().is_empty());
    }

    #[tokio::test]
    async fn malformed_token_body_is_a_service_error() {
        let server = auth_server().await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": "x"})))
            .mount(&server)
            .await;

        let client = AuthClient::create(&base_url(&server), ClientConfig::default())
            .await
            .unwrap();
        let err = client.get_token(TOKEN, None).await.unwrap_err();
        assert!(matches!(err, AuthError::Service(_)));
        assert!(!err.to_string().contains(TOKEN));
    }

    // ============ User lookups ============

    #[tokio::test]
    async fn get_user_returns_custom_roles() {
        let server = auth_server().await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/me"))
            .and(header("Authorization", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": "user_all",
                "display": "foo",
                "customroles": ["random1", "random2"],
                "roles": [],
                "idents": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::default().with_user_cache_for(Duration::from_secs(30));
        let client = AuthClient::create(&base_url(&server), config).await.unwrap();

        let user = client.get_user(TOKEN, None).await.unwrap();
        assert_eq!(user.user(), "user_all");
        assert!(user.has_role("random1"));
        assert!(user.has_role("random2"));

        client.get_user(TOKEN, None).await.unwrap();
    }

    #[tokio::test]
    async fn illegal_user_name_is_an_invalid_user_error() {
        let server = auth_server().await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/me"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"httpcode": 400, "appcode": 30010,
                          "message": "30010 Illegal user name: 30010 Illegal user name: Bad"}
            })))
            .mount(&server)
            .await;

        let client = AuthClient::create(&base_url(&server), ClientConfig::default())
            .await
            .unwrap();
        let err = client.get_user(TOKEN, None).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidUser(" Bad".to_string()));
    }

    #[tokio::test]
    async fn token_and_user_lookups_hit_separate_endpoints() {
        let server = auth_server().await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/api/V2/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"user": "user_all", "customroles": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::create(&base_url(&server), ClientConfig::default())
            .await
            .unwrap();
        client.get_token(TOKEN, None).await.unwrap();
        client.get_user(TOKEN, None).await.unwrap();
        client.get_token(TOKEN, None).await.unwrap();
        client.get_user(TOKEN, None).await.unwrap();
    }

    // ============ Blocking client ============

    #[cfg(feature = "blocking")]
    #[test]
    fn blocking_client_shares_the_async_core() {
        use r_auth_client::BlockingAuthClient;

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = auth_server().await;
            Mock::given(method("GET"))
                .and(path("/auth/api/V2/token"))
                .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let client = BlockingAuthClient::create(&base_url(&server), ClientConfig::default())
            .unwrap();
        assert_eq!(client.service_version().unwrap(), "0.7.1");

        let first = client.get_token(TOKEN, None).unwrap();
        let second = client.get_token(TOKEN, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(client.inner().token_cache().len(), 1);

        drop(client);
        runtime.block_on(server.verify());
    }
}
