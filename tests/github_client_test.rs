use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use git_autotag::cli::orchestration::{TagWorkflow, WorkflowArgs};
use git_autotag::error::ErrorKind;
use git_autotag::repository::{list_all_tags, GitHubClient, TagRepository};

fn tag_json(name: &str, sha: &str) -> serde_json::Value {
    json!({
        "name": name,
        "commit": { "sha": sha, "url": format!("https://api.example.test/commits/{}", sha) },
        "zipball_url": "https://example.test/zip",
        "tarball_url": "https://example.test/tar",
        "node_id": "REF_x"
    })
}

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(server.uri(), "acme/widgets", "test-token").unwrap()
}

#[tokio::test]
async fn test_list_tags_sends_page_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/tags"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([tag_json("v1.0.0", "aaa111")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tags = client(&server).list_tags(2).await.unwrap();

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "v1.0.0");
    assert_eq!(tags[0].commit_sha, "aaa111");
    assert_eq!(
        tags[0].commit_url,
        "https://api.example.test/commits/aaa111"
    );
}

#[tokio::test]
async fn test_pagination_over_http() {
    let server = MockServer::start().await;
    let first_page: Vec<_> = (0..100)
        .map(|i| tag_json(&format!("v0.1.{}", i), &format!("sha{}", i)))
        .collect();

    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/tags"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(first_page)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/tags"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([tag_json("v0.2.0", "last")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let listing = list_all_tags(&client(&server), true).await.unwrap();

    assert_eq!(listing.tags.len(), 101);
    assert_eq!(listing.pages, 2);
    assert!(!listing.truncated);
}

#[tokio::test]
async fn test_create_tag_ref_posts_ref() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/git/refs"))
        .and(body_json(json!({ "ref": "refs/tags/v1.0.1", "sha": "abc123" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/tags/v1.0.1",
            "object": { "sha": "abc123", "type": "commit" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create_tag_ref("v1.0.1", "abc123")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_existing_ref_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/git/refs"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Reference already exists" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .create_tag_ref("v1.0.1", "abc123")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
    let message = err.to_string();
    assert!(message.contains("422"), "got: {}", message);
    assert!(message.contains("Reference already exists"), "got: {}", message);
}

#[tokio::test]
async fn test_compare_commits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/base111...head222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ahead",
            "ahead_by": 2,
            "commits": [
                { "sha": "c1", "commit": { "message": "fix: one" } },
                { "sha": "c2", "commit": { "message": "docs(README): two" } }
            ]
        })))
        .mount(&server)
        .await;

    let commits = client(&server)
        .compare_commits("base111", "head222")
        .await
        .unwrap();

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].hash, "c1");
    assert_eq!(commits[1].message, "docs(README): two");
}

fn compare_page(range: std::ops::Range<usize>, total: usize) -> serde_json::Value {
    let commits: Vec<_> = range
        .map(|i| json!({ "sha": format!("c{}", i), "commit": { "message": format!("fix: change {}", i) } }))
        .collect();
    json!({ "status": "ahead", "total_commits": total, "commits": commits })
}

#[tokio::test]
async fn test_compare_commits_reads_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/base111...head222"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(compare_page(0..100, 300)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/base111...head222"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(compare_page(100..200, 300)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/compare/base111...head222"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(compare_page(200..300, 300)))
        .expect(1)
        .mount(&server)
        .await;

    let commits = client(&server)
        .compare_commits("base111", "head222")
        .await
        .unwrap();

    assert_eq!(commits.len(), 300);
    assert_eq!(commits[0].hash, "c0");
    assert_eq!(commits[299].hash, "c299");
}

#[tokio::test]
async fn test_server_error_on_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client(&server).list_tags(1).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_workflow_against_http_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            tag_json("release-1.0.0", "s1"),
            tag_json("other-9.9.9", "s2"),
            tag_json("release-1.1.0", "s3")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/git/refs"))
        .and(body_json(json!({ "ref": "refs/tags/release-1.1.1", "sha": "abc123" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = TagWorkflow::new(client(&server));
    let args = WorkflowArgs {
        git_ref: Some("refs/heads/main".to_string()),
        commit_sha: Some("abc123".to_string()),
        tag_prefix: "release-".to_string(),
        ..WorkflowArgs::default()
    };

    let result = workflow.run(&args).await.unwrap();

    assert_eq!(result.previous_tag.name, "release-1.1.0");
    assert_eq!(result.previous_tag.commit_sha, "s3");
    assert_eq!(result.new_tag, "release-1.1.1");
    assert!(result.created);
}
