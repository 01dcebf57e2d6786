//! Integration tests for digest generation against a mock chat-completions API

use futures::{StreamExt, TryStreamExt};
use repo_trends::digest::{Digest, Generator};
use repo_trends::search::RepositoryResult;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn repo(name: &str) -> RepositoryResult {
    serde_json::from_value(json!({
        "full_name": name,
        "html_url": format!("https://github.com/{name}"),
        "description": "A library",
        "language": "Python",
        "stargazers_count": 321,
        "created_at": "2025-09-01T00:00:00Z",
        "pushed_at": "2025-09-04T00:00:00Z"
    }))
    .unwrap()
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

const GOOD_DIGEST: &str = r#"{"summary": "Fast parsing.", "why_care": "Saves time", "use_cases": ["ETL"], "setup": ["pip install it"], "difficulty": 2}"#;

fn generator(server: &MockServer) -> Generator {
    let url = Url::parse(&format!("{}{COMPLETIONS_PATH}", server.uri())).unwrap();
    Generator::new("sk-test", "gpt-4o-mini", url).unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_generate_digest() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD_DIGEST)))
        .expect(1)
        .mount(&server)
        .await;

    let digest = generator(&server).generate(&repo("octo/parser")).await.unwrap();

    assert_eq!(digest.summary(), "Fast parsing.");
    assert_eq!(digest.why_care(), "Saves time");
    assert_eq!(digest.use_cases(), ["ETL"]);
    assert_eq!(digest.difficulty(), 2);
}

#[tokio::test]
async fn test_request_embeds_repository_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD_DIGEST)))
        .mount(&server)
        .await;

    let _ = generator(&server).generate(&repo("octo/parser")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");

    let user = messages[1]["content"].as_str().unwrap();
    assert!(user.contains("octo/parser"));
    assert!(user.contains("https://github.com/octo/parser"));
    assert!(user.contains("A library"));
    assert!(user.contains("Stars: 321"));
}

#[tokio::test]
async fn test_unparseable_output_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("I think this repo is great!")))
        .expect(1)
        .mount(&server)
        .await;

    let result = generator(&server).generate(&repo("octo/parser")).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("octo/parser"), "unexpected error: {err}");
}

#[tokio::test]
async fn test_out_of_range_difficulty_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"summary": "s", "why_care": "w", "use_cases": [], "setup": [], "difficulty": 9}"#,
        )))
        .mount(&server)
        .await;

    assert!(generator(&server).generate(&repo("octo/parser")).await.is_err());
}

#[tokio::test]
async fn test_missing_content_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    assert!(generator(&server).generate(&repo("octo/parser")).await.is_err());
}

#[tokio::test]
async fn test_http_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let result = generator(&server).generate(&repo("octo/parser")).await;

    assert!(result.is_err());
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_digests_are_generated_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD_DIGEST)))
        .expect(3)
        .mount(&server)
        .await;

    let repos = [repo("octo/a"), repo("octo/b"), repo("octo/c")];
    let generator = generator(&server);
    let digests: Vec<Digest> = generator.digests(&repos).try_collect().await.unwrap();

    assert_eq!(digests.len(), 3);

    let requests = server.received_requests().await.unwrap();
    let names: Vec<bool> = requests
        .iter()
        .zip(["octo/a", "octo/b", "octo/c"])
        .map(|(request, name)| String::from_utf8_lossy(&request.body).contains(name))
        .collect();
    assert_eq!(names, vec![true, true, true]);
}

#[tokio::test]
async fn test_digests_stop_at_first_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD_DIGEST)))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("not json")))
        .mount(&server)
        .await;

    let repos = [repo("octo/a"), repo("octo/b"), repo("octo/c"), repo("octo/d")];
    let generator = generator(&server);
    let result: repo_trends::Result<Vec<Digest>> = generator.digests(&repos).try_collect().await;

    assert!(result.is_err());
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_digests_are_lazy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD_DIGEST)))
        .mount(&server)
        .await;

    let repos = [repo("octo/a"), repo("octo/b"), repo("octo/c")];
    let generator = generator(&server);
    let mut stream = Box::pin(generator.digests(&repos));

    assert_eq!(request_count(&server).await, 0);

    let first = stream.next().await.unwrap();
    assert!(first.is_ok());
    assert_eq!(request_count(&server).await, 1);
}
