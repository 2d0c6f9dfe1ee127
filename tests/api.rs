use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use resrank::api::{create_router, AppState};
use resrank::ResumeRanker;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const RESUMES: &str = "ID,Resume_str,Resume_html,Category
1,\"python developer with sales experience\",<p/>,SALES
2,\"sales manager retail experience\",<p/>,SALES
3,\"chef with culinary arts background\",<p/>,CHEF
";

fn router() -> (axum::Router, NamedTempFile) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(RESUMES.as_bytes()).unwrap();

    let state = Arc::new(AppState {
        ranker: ResumeRanker::default(),
        corpus_path: file.path().to_path_buf(),
    });
    (create_router(state), file)
}

async fn call(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_rank(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/rank")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health() {
    let (router, _file) = router();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = call(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn rank_reports_uploaded_position() {
    let (router, _file) = router();
    let request = post_rank(json!({
        "categories": "sales",
        "job_description": "sales experience, negotiation",
        "resume_text": "Sales manager,\nretail experience",
    }));

    let (status, body) = call(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(data["uploaded_resume_rank"], 2);
    assert_eq!(data["resumes"][1]["id"], "uploaded");
    assert_eq!(data["resumes"][1]["source"], "submitted");
    assert_eq!(data["resumes"][0]["score"], data["uploaded_resume_score"]);
    assert_eq!(data["missing_terms"], json!(["negotiation"]));
}

#[tokio::test]
async fn rank_without_matching_category() {
    let (router, _file) = router();
    let request = post_rank(json!({
        "categories": "AVIATION",
        "job_description": "pilot",
        "resume_text": "airline pilot",
    }));

    let (status, body) = call(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No resumes found for the specified categories.");
}

#[tokio::test]
async fn rank_rejects_empty_resume() {
    let (router, _file) = router();
    let request = post_rank(json!({
        "categories": "all",
        "job_description": "sales",
        "resume_text": "!!!\n,,",
    }));

    let (status, body) = call(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn terms_per_category() {
    let (router, _file) = router();
    let request = Request::builder()
        .uri("/terms?categories=sales&top_n=2")
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(router, request).await;
    assert_eq!(status, StatusCode::OK);

    let sales = body["data"]["SALES"].as_array().unwrap();
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[0]["term"], "sales");
    assert_eq!(sales[0]["count"], 2);
    assert!(body["data"].get("CHEF").is_none());
}
