use std::path::Path;

use figment::Jail;

use concierge_core::config::{resolve_with_base, Config};
use concierge_core::types::{Answer, AnswerStatus, ChatResponse, StatusReport};
use concierge_core::Chunker;
use concierge_core::ChunkingConfig;

#[test]
fn defaults_without_any_config_file() {
    Jail::expect_with(|jail| {
        let config = Config::load_from_dir(jail.directory(), "dev").expect("load");
        let settings = config.settings().expect("settings");
        assert_eq!(settings.chunking, ChunkingConfig::new(350, 100));
        assert_eq!(settings.retrieval.top_k, 4);
        assert_eq!(settings.credentials.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(settings.embedding.dimension, 768);
        assert_eq!(settings.generation.model, "models/gemini-2.5-flash");
        assert_eq!(settings.document_path(jail.directory()), jail.directory().join("data/hotels details.pdf"));
        Ok(())
    });
}

#[test]
fn env_overlay_and_app_vars_take_precedence() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[chunking]\nchunk_size = 500\noverlap = 50\n[retrieval]\ntop_k = 3\n")?;
        jail.create_file("config.test.toml", "[retrieval]\ntop_k = 5\n[document]\npath = \"corpus/hotel.txt\"\n")?;
        jail.set_env("APP_EMBEDDING__USE_FAKE", "true");
        jail.set_env("APP_CHUNKING__OVERLAP", "75");

        let config = Config::load_from_dir(jail.directory(), "test").expect("load");
        let settings = config.settings().expect("settings");
        assert_eq!(settings.chunking, ChunkingConfig::new(500, 75));
        assert_eq!(settings.retrieval.top_k, 5);
        assert!(settings.embedding.use_fake);
        assert_eq!(config.get::<usize>("chunking.chunk_size").expect("key"), 500);
        assert_eq!(settings.document_path(Path::new("/srv/concierge")), Path::new("/srv/concierge/corpus/hotel.txt"));
        Ok(())
    });
}

#[test]
fn invalid_window_is_a_configuration_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[chunking]\nchunk_size = 100\noverlap = 100\n")?;
        let err = Config::load_from_dir(jail.directory(), "dev").err().expect("must fail");
        assert!(err.is_configuration());
        Ok(())
    });
}

#[test]
fn api_key_is_read_from_named_variable() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[credentials]\napi_key_env = \"CONCIERGE_TEST_KEY\"\n")?;
        let settings = Config::load_from_dir(jail.directory(), "dev").expect("load").settings().expect("settings");
        assert_eq!(settings.credentials.read_api_key(), None);
        jail.set_env("CONCIERGE_TEST_KEY", "   ");
        assert_eq!(settings.credentials.read_api_key(), None, "blank keys count as missing");
        jail.set_env("CONCIERGE_TEST_KEY", "secret");
        assert_eq!(settings.credentials.read_api_key().as_deref(), Some("secret"));
        Ok(())
    });
}

#[test]
fn absolute_paths_are_kept() {
    let base = Path::new("/tmp/base");
    assert_eq!(resolve_with_base(base, "/data/hotel.pdf"), Path::new("/data/hotel.pdf"));
    assert_eq!(resolve_with_base(base, "hotel.pdf"), Path::new("/tmp/base/hotel.pdf"));
}

#[test]
fn chat_and_status_payload_shapes() {
    let ok = ChatResponse::from(Answer::success("Check-in is at 3pm.", Default::default()));
    let json = serde_json::to_value(&ok).expect("json");
    assert_eq!(json, serde_json::json!({ "response": "Check-in is at 3pm.", "status": "success" }));

    let err = ChatResponse::from(&Answer::error("AI Concierge is not available at the moment."));
    assert_eq!(err.status, AnswerStatus::Error);
    assert_eq!(serde_json::to_value(&err).expect("json")["status"], "error");

    let status = StatusReport { pdf_loaded: false, rag_ready: false, api_key_configured: true };
    assert_eq!(
        serde_json::to_value(status).expect("json"),
        serde_json::json!({ "pdf_loaded": false, "rag_ready": false, "api_key_configured": true })
    );
}

#[test]
fn chunker_over_multi_page_document() {
    let chunker = Chunker::new(ChunkingConfig::new(12, 4)).expect("chunker");
    let pages = vec!["Room service runs all night.".to_string(), "Valet parking.".to_string()];
    let chunks = chunker.split(&pages);
    assert!(chunks.iter().all(|c| c.text.chars().count() <= 12));
    assert_eq!(chunks.first().map(|c| c.page), Some(0));
    assert_eq!(chunks.last().map(|c| c.page), Some(1));
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.index, i);
    }
}
