use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use topicfinder::app::{App, Mode};
use topicfinder::config::Config;
use topicfinder::form::Field;
use topicfinder::openai::CompletionClient;
use topicfinder::topics::parse_topics;

fn app_against(server_uri: &str) -> App {
    App::new(CompletionClient::new(Config {
        api_key: "test-key".to_string(),
        completions_url: format!("{}/v1/completions", server_uri),
        model: "text-davinci-003".to_string(),
    }))
}

fn fill_form(app: &mut App) {
    app.form.set_value(Field::Faculty, "Science");
    app.form.set_value(Field::Department, "Computer Science");
    app.form.set_value(Field::Institution, "Test University");
    app.form.set_value(Field::TopicsCount, "2");
    app.form.set_value(Field::Keywords, "AI, IOT");
}

/// Drives the drain step the run loop would perform until the request
/// settles.
async fn settle(app: &mut App) {
    for _ in 0..250 {
        app.drain_outcomes();
        if app.mode == Mode::Results {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("request never settled");
}

#[tokio::test]
async fn test_successful_run_walks_all_states() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "\nTopic1: Desc1\n\nTopic2: Desc2\n"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_against(&server.uri());
    assert_eq!(app.mode, Mode::Idle);

    app.open_form();
    assert_eq!(app.mode, Mode::Collecting);

    fill_form(&mut app);
    app.submit_form();
    assert_eq!(app.mode, Mode::Loading);

    settle(&mut app).await;
    assert_eq!(app.mode, Mode::Results);
    assert_eq!(app.result_text, "Topic1: Desc1\n\nTopic2: Desc2");

    let entries = parse_topics(&app.result_text);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "Topic1");
    assert_eq!(entries[0].description, " Desc1");

    app.close_results();
    assert_eq!(app.mode, Mode::Idle);
    // The last result survives closing the view.
    assert!(!app.result_text.is_empty());
    assert!(app.last_query.is_some());
}

#[tokio::test]
async fn test_network_failure_still_reaches_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_against(&server.uri());
    app.open_form();
    fill_form(&mut app);
    app.submit_form();
    assert_eq!(app.mode, Mode::Loading);

    settle(&mut app).await;
    assert_eq!(app.mode, Mode::Results);
    assert!(app.result_text.is_empty());
    assert!(parse_topics(&app.result_text).is_empty());
}

#[tokio::test]
async fn test_invalid_form_never_hits_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "Topic1: Desc1"}]
        })))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = app_against(&server.uri());
    app.open_form();
    app.form.set_value(Field::Faculty, "Science");
    // department and institution left empty
    app.form.set_value(Field::TopicsCount, "2");
    app.submit_form();

    assert_eq!(app.mode, Mode::Collecting);
    assert!(app.form.error.is_some());

    // Out-of-range count is rejected the same way.
    fill_form(&mut app);
    app.form.set_value(Field::TopicsCount, "7");
    app.submit_form();
    assert_eq!(app.mode, Mode::Collecting);
    assert_eq!(
        app.form.error.as_deref(),
        Some("Number of topics should be between 1 and 5")
    );
}

#[tokio::test]
async fn test_second_run_replaces_previous_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "Topic1: Desc1"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut app = app_against(&server.uri());
    app.open_form();
    fill_form(&mut app);
    app.submit_form();
    settle(&mut app).await;
    app.close_results();

    app.open_form();
    fill_form(&mut app);
    app.form.set_value(Field::TopicsCount, "1");
    app.submit_form();
    settle(&mut app).await;

    assert_eq!(app.result_text, "Topic1: Desc1");
    assert_eq!(app.last_query.as_ref().unwrap().topics_count, 1);
}
