mod common;

use common::{envelope, site_envelope, test_config, MODEL_A, MODEL_B, TEST_API_KEY};
use sitegen_service::dtos::ExtractedSite;
use sitegen_service::services::{GenerationError, MockTransport, SiteGenerator};
use std::sync::Arc;

fn generator(transport: Arc<MockTransport>) -> SiteGenerator {
    SiteGenerator::new(transport, test_config().generator_settings())
}

#[tokio::test]
async fn falls_back_to_second_model_when_first_fails() {
    let transport = Arc::new(
        MockTransport::new()
            .respond(MODEL_A, 500, "internal")
            .respond(MODEL_B, 200, site_envelope("<h1>B</h1>", "h1{}", "")),
    );

    let site = generator(transport.clone())
        .generate("bakery", TEST_API_KEY)
        .await
        .unwrap();

    assert_eq!(
        site,
        ExtractedSite {
            html: "<h1>B</h1>".to_string(),
            css: "h1{}".to_string(),
            js: String::new(),
        }
    );
    assert_eq!(transport.called_models(), vec![MODEL_A, MODEL_B]);
}

#[tokio::test]
async fn stops_at_first_success() {
    let transport = Arc::new(
        MockTransport::new()
            .respond(MODEL_A, 200, site_envelope("<p>A</p>", "", ""))
            .respond(MODEL_B, 200, site_envelope("<p>B</p>", "", "")),
    );

    let site = generator(transport.clone())
        .generate("bakery", TEST_API_KEY)
        .await
        .unwrap();

    assert_eq!(site.html, "<p>A</p>");
    assert_eq!(transport.called_models(), vec![MODEL_A]);
}

#[tokio::test]
async fn each_failure_kind_advances_to_next_model() {
    let first_failures = [
        MockTransport::new().respond(MODEL_A, 429, "quota"),
        MockTransport::new().respond(MODEL_A, 503, "busy"),
        MockTransport::new().respond(MODEL_A, 404, "no such model"),
        MockTransport::new().fail(MODEL_A, "connection reset"),
        MockTransport::new().respond(MODEL_A, 200, "{\"unexpected\": true}"),
        MockTransport::new().respond(MODEL_A, 200, envelope("I cannot help with that.")),
        MockTransport::new().respond(MODEL_A, 200, envelope("{ broken json")),
    ];

    for transport in first_failures {
        let transport = Arc::new(transport.respond(MODEL_B, 200, site_envelope("ok", "", "")));

        let site = generator(transport.clone())
            .generate("bakery", TEST_API_KEY)
            .await
            .unwrap();

        assert_eq!(site.html, "ok");
        assert_eq!(transport.called_models().last().unwrap(), MODEL_B);
    }
}

#[tokio::test]
async fn all_models_failing_is_exhaustion() {
    let transport = Arc::new(
        MockTransport::new()
            .respond(MODEL_A, 429, "quota")
            .respond(MODEL_B, 200, envelope("no json at all")),
    );

    let err = generator(transport.clone())
        .generate("bakery", TEST_API_KEY)
        .await
        .unwrap_err();

    match err {
        GenerationError::AllModelsExhausted { failures } => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].model, MODEL_A);
            assert!(failures[0].reason.contains("Quota exceeded"));
            assert_eq!(failures[1].model, MODEL_B);
            assert_eq!(failures[1].reason, "JSON not found");
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(transport.called_models(), vec![MODEL_A, MODEL_B]);
}

#[tokio::test]
async fn overloaded_model_is_retried_before_falling_back() {
    let transport = Arc::new(
        MockTransport::new()
            .respond(MODEL_A, 503, "busy")
            .respond(MODEL_B, 200, site_envelope("ok", "", "")),
    );

    generator(transport.clone())
        .generate("bakery", TEST_API_KEY)
        .await
        .unwrap();

    assert_eq!(
        transport.called_models(),
        vec![MODEL_A, MODEL_A, MODEL_A, MODEL_B]
    );
}

#[tokio::test]
async fn request_carries_topic_key_and_safety_settings() {
    let transport = Arc::new(
        MockTransport::new().respond(MODEL_A, 200, site_envelope("ok", "", "")),
    );

    generator(transport.clone())
        .generate("vintage bicycles", TEST_API_KEY)
        .await
        .unwrap();

    let call = &transport.calls()[0];
    assert_eq!(
        call.url,
        format!("http://mock.local/v1beta/models/{MODEL_A}:generateContent?key={TEST_API_KEY}")
    );
    let prompt = call.body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("vintage bicycles"));
    assert!(call.body["safetySettings"].is_array());
}

#[tokio::test]
async fn safety_settings_can_be_disabled() {
    let mut config = test_config();
    config.models.safety_settings = false;
    let transport = Arc::new(
        MockTransport::new().respond(MODEL_A, 200, site_envelope("ok", "", "")),
    );

    SiteGenerator::new(transport.clone(), config.generator_settings())
        .generate("bakery", TEST_API_KEY)
        .await
        .unwrap();

    assert!(transport.calls()[0].body.get("safetySettings").is_none());
}

#[tokio::test]
async fn empty_model_list_is_exhaustion() {
    let mut config = test_config();
    config.models.fallback_models.clear();
    let transport = Arc::new(MockTransport::new());

    let err = SiteGenerator::new(transport.clone(), config.generator_settings())
        .generate("bakery", TEST_API_KEY)
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::AllModelsExhausted { failures: vec![] });
    assert_eq!(transport.call_count(), 0);
}
