use cortex_analyst::{
    backend::snowflake::{SnowflakeSql, STATEMENTS_PATH},
    errors::AnalystError,
    models::role::Role,
    orchestrator::Orchestrator,
    providers::{
        configs::{CortexAnalystConfig, SnowflakeAuth, SnowflakeSqlConfig, TokenType},
        cortex::{CortexAnalyst, ANALYST_MESSAGE_PATH},
    },
    render::{Element, RESULTS_TITLE, SQL_TITLE},
    semantic_model::SemanticModelCatalog,
    state::ConversationState,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Orchestrator wired to real HTTP clients pointed at a mock Snowflake account
fn orchestrator(host: String) -> Orchestrator {
    let auth = SnowflakeAuth::new("test_token", TokenType::OAuth);
    let assistant = CortexAnalyst::new(CortexAnalystConfig {
        host: host.clone(),
        auth: auth.clone(),
        timeout_ms: 30_000,
        catalog: SemanticModelCatalog::default(),
    })
    .unwrap();
    let backend = SnowflakeSql::new(SnowflakeSqlConfig {
        host,
        auth,
        timeout_ms: 30_000,
        database: None,
        schema: None,
        warehouse: None,
        role: None,
    })
    .unwrap();

    Orchestrator::new(Box::new(assistant), Box::new(backend))
}

#[tokio::test]
async fn test_request_carries_prompt_and_semantic_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ANALYST_MESSAGE_PATH))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": [{"type": "text", "text": "How many medals did Canada win?"}]
            }],
            "semantic_model_file": "@CORTEX_ANALYST_DEMO.WINTER_GAME.RAW_DATA/winter_game.yaml"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"content": [{"type": "text", "text": "26"}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator(mock_server.uri());
    let mut state = ConversationState::new();
    let exchange = orchestrator
        .process(&mut state, "How many medals did Canada win?", "Winter Game")
        .await
        .unwrap();

    assert_eq!(exchange.view, vec![Element::markdown("26")]);
}

#[tokio::test]
async fn test_text_then_sql_with_single_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ANALYST_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"content": [
                {"type": "text", "text": "Here is the result"},
                {"type": "sql", "statement": "SELECT 1"}
            ]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(STATEMENTS_PATH))
        .and(body_partial_json(json!({"statement": "SELECT 1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statementHandle": "h-1",
            "resultSetMetaData": {
                "partitionInfo": [{"rowCount": 1}],
                "rowType": [{"name": "1", "type": "fixed"}]
            },
            "data": [["1"]]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator(mock_server.uri());
    let mut state = ConversationState::new();
    let exchange = orchestrator
        .process(&mut state, "Give me one", "Winter Game")
        .await
        .unwrap();

    assert_eq!(exchange.view.len(), 3);
    assert_eq!(exchange.view[0], Element::markdown("Here is the result"));
    match &exchange.view[1] {
        Element::Expander {
            title,
            expanded,
            children,
        } => {
            assert_eq!(title, SQL_TITLE);
            assert!(!expanded);
            assert!(matches!(&children[0], Element::Code { source, .. } if source == "SELECT 1"));
        }
        other => panic!("Expected SQL expander, got {:?}", other),
    }
    match &exchange.view[2] {
        Element::Expander { title, children, .. } => {
            assert_eq!(title, RESULTS_TITLE);
            assert_eq!(children.len(), 1);
            assert!(matches!(&children[0], Element::Table { result } if result.row_count() == 1));
        }
        other => panic!("Expected results expander, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_leaves_half_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ANALYST_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"timeout"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator(mock_server.uri());
    let mut state = ConversationState::new();
    let err = orchestrator
        .process(&mut state, "How many medals did Canada win?", "Winter Game")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AnalystError::RemoteService {
            status: 500,
            body: r#"{"error":"timeout"}"#.to_string()
        }
    );
    assert_eq!(state.len(), 1);
    assert_eq!(state.messages()[0].role, Role::User);
}

#[tokio::test]
async fn test_unknown_model_keeps_user_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator(mock_server.uri());
    let mut state = ConversationState::new();
    let err = orchestrator
        .process(&mut state, "question", "Summer Game")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalystError::Configuration(_)));
    assert_eq!(state.len(), 1);
}
