mod common;

use chrono::{DateTime, Utc};
use common::{TestApp, TINY_PNG};
use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};
use service_core::llm::MockChatModel;
use std::sync::Arc;

async fn post_chat(client: &Client, app: &TestApp, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/chat", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn two_turns_share_a_session_and_keep_full_history() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let first = post_chat(&client, &app, json!({ "message": "임신 초기에 좋은 음식은?" })).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = first.json().await.unwrap();
    let session_id = first["session_id"].as_str().unwrap().to_string();
    assert_eq!(first["response"], "Mock response for: 임신 초기에 좋은 음식은?");
    assert_eq!(first["message_history"].as_array().unwrap().len(), 2);

    let second = post_chat(
        &client,
        &app,
        json!({ "message": "엽산은 얼마나 먹어야 하나요?", "session_id": session_id }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let second: Value = second.json().await.unwrap();
    assert_eq!(second["session_id"], session_id.as_str());

    let history = second["message_history"].as_array().unwrap();
    let turns: Vec<(&str, &str)> = history
        .iter()
        .map(|m| (m["role"].as_str().unwrap(), m["content"].as_str().unwrap()))
        .collect();
    assert_eq!(
        turns,
        vec![
            ("user", "임신 초기에 좋은 음식은?"),
            ("assistant", "Mock response for: 임신 초기에 좋은 음식은?"),
            ("user", "엽산은 얼마나 먹어야 하나요?"),
            ("assistant", "Mock response for: 엽산은 얼마나 먹어야 하나요?"),
        ]
    );

    let timestamps: Vec<DateTime<Utc>> = history
        .iter()
        .map(|m| m["timestamp"].as_str().unwrap().parse().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);

    // The second call sent the first exchange as context
    let sent = app.text_model.last_request().unwrap();
    assert_eq!(sent.messages.len(), 4);
}

#[tokio::test]
async fn system_prompt_override_is_sent_and_kept() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let first: Value = post_chat(
        &client,
        &app,
        json!({ "message": "안녕하세요", "system_prompt": "한 문장으로만 답하세요." }),
    )
    .await
    .json()
    .await
    .unwrap();
    let session_id = first["session_id"].as_str().unwrap();

    let sent = app.text_model.last_request().unwrap();
    assert_eq!(sent.messages[0].text_content(), "한 문장으로만 답하세요.");

    post_chat(&client, &app, json!({ "message": "다시 안녕", "session_id": session_id })).await;
    let sent = app.text_model.last_request().unwrap();
    assert_eq!(sent.messages[0].text_content(), "한 문장으로만 답하세요.");
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = TestApp::spawn().await;

    let response = post_chat(&Client::new(), &app, json!({ "message": "" })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn model_failure_returns_500_and_keeps_user_message() {
    let app = TestApp::spawn_with(
        Arc::new(MockChatModel::failing("mock-text", "upstream down")),
        Arc::new(MockChatModel::echo("mock-vision")),
    )
    .await;

    let response = post_chat(
        &Client::new(),
        &app,
        json!({ "message": "괜찮을까요?", "session_id": "failing-session" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("채팅 처리 중 오류가 발생했습니다:"));

    let history = app.store.history("failing-session").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "괜찮을까요?");

    // The orphaned question is shown in history but not replayed to the model
    assert!(app.store.get("failing-session").unwrap().context.is_empty());
}

#[tokio::test]
async fn multimodal_with_image_uses_vision_model() {
    let app = TestApp::spawn().await;

    let form = multipart::Form::new()
        .text("message", "이 음식 먹어도 되나요?")
        .part(
            "image",
            multipart::Part::bytes(TINY_PNG.to_vec())
                .file_name("meal.png")
                .mime_str("image/png")
                .unwrap(),
        );

    let response = Client::new()
        .post(format!("{}/chat/multimodal", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["image_processed"], true);
    assert_eq!(body["response"], "사진 속 음식은 미역국입니다.");

    let history = body["message_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[0]["content"],
        "이 음식 먹어도 되나요?\n[업로드된 이미지 정보: 크기 (1, 1), 포맷 PNG]\n"
    );

    assert_eq!(app.vision_model.call_count(), 1);
    assert_eq!(app.text_model.call_count(), 0);
}

#[tokio::test]
async fn multimodal_accepts_photo_larger_than_two_megabytes() {
    let app = TestApp::spawn().await;

    // Trailing bytes after IEND leave the header readable.
    let mut photo = TINY_PNG.to_vec();
    photo.resize(TINY_PNG.len() + 3 * 1024 * 1024, 0);

    let form = multipart::Form::new().text("message", "이거 먹어도 돼요?").part(
        "image",
        multipart::Part::bytes(photo)
            .file_name("phone.png")
            .mime_str("image/png")
            .unwrap(),
    );

    let response = Client::new()
        .post(format!("{}/chat/multimodal", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["image_processed"], true);
    assert_eq!(app.vision_model.call_count(), 1);
}

#[tokio::test]
async fn image_turns_are_not_replayed_to_the_text_model() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let form = multipart::Form::new()
        .text("message", "이 음식 먹어도 되나요?")
        .text("session_id", "mixed-session")
        .part(
            "image",
            multipart::Part::bytes(TINY_PNG.to_vec())
                .file_name("meal.png")
                .mime_str("image/png")
                .unwrap(),
        );
    let response = client
        .post(format!("{}/chat/multimodal", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_chat(
        &client,
        &app,
        json!({ "message": "그럼 저녁은요?", "session_id": "mixed-session" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message_history"].as_array().unwrap().len(), 4);

    // System prompt and the new question only
    let sent = app.text_model.last_request().unwrap();
    assert_eq!(sent.messages.len(), 2);
    assert_eq!(sent.messages[1].text_content(), "그럼 저녁은요?");
}

#[tokio::test]
async fn multimodal_with_unreadable_image_falls_back_to_text_model() {
    let app = TestApp::spawn().await;

    let form = multipart::Form::new().text("message", "이건 뭘까요?").part(
        "image",
        multipart::Part::bytes(b"not an image".to_vec()).file_name("broken.png"),
    );

    let body: Value = Client::new()
        .post(format!("{}/chat/multimodal", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["image_processed"], true);
    let stored = body["message_history"][0]["content"].as_str().unwrap();
    assert!(stored.contains("이미지 처리 중 오류가 발생했습니다:"));
    assert_eq!(app.vision_model.call_count(), 0);
    assert_eq!(app.text_model.call_count(), 1);
}

#[tokio::test]
async fn multimodal_without_message_is_bad_request() {
    let app = TestApp::spawn().await;

    let form = multipart::Form::new().text("session_id", "abc");
    let response = Client::new()
        .post(format!("{}/chat/multimodal", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.get("abc").is_none());
}
