use atlas::config::{BackendConfig, ChatConfig};
use atlas::notes::{InMemoryNoteStore, NoteStore};
use atlas::platform::{DeviceCall, InMemoryContactBook, Platform, SimulatedPhone};
use atlas::services::backend::BackendClient;
use atlas::session::{Author, ChatSession, LocalResponder, Throttle};
use atlas::{ConversationState, DialogueStyle};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session(backend: Option<BackendClient>, streaming: bool) -> (ChatSession, Arc<SimulatedPhone>) {
    let phone = Arc::new(
        SimulatedPhone::new()
            .with_contacts(InMemoryContactBook::new().with("Ahmet Yılmaz", "+90 532 111 22 33")),
    );
    let notes: Arc<Mutex<dyn NoteStore>> = Arc::new(Mutex::new(InMemoryNoteStore::new()));
    let responder = Arc::new(LocalResponder::from_platform(
        DialogueStyle::Chat,
        &Platform::simulated(phone.clone()),
        notes,
    ));
    (
        ChatSession::new(responder, backend, streaming, ChatConfig::default()),
        phone,
    )
}

fn backend_for(server: &MockServer) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: server.uri(),
        ..BackendConfig::default()
    })
}

#[test]
fn test_throttle_interval() {
    let start = Instant::now();
    let mut throttle = Throttle::new(Duration::from_millis(50));
    assert!(throttle.ready(start));
    assert!(!throttle.ready(start + Duration::from_millis(20)));
    assert!(throttle.ready(start + Duration::from_millis(50)));
}

#[tokio::test]
async fn test_local_command_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (mut chat, phone) = session(Some(backend_for(&server)), true);
    let reply = chat.send("feneri aç").await;
    assert_eq!(reply.content, "🔦 Fener açıldı.");
    assert!(phone.torch_on());

    let history = chat.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].author, Author::User);
    assert_eq!(history[1].author, Author::Assistant);
}

#[tokio::test]
async fn test_message_flow_through_chat() {
    let (mut chat, phone) = session(None, false);

    let reply = chat.send("ahmete yaz").await;
    assert_eq!(reply.content, "💬 Ahmet'a ne yazmamı istersin?");
    assert_eq!(chat.state(), &ConversationState::WaitingMessage { contact: "ahmet".into() });

    chat.send("akşam görüşürüz").await;
    let reply = chat.send("evet").await;
    assert_eq!(reply.content, "💬 Ahmet'a gönderiliyor: \"akşam görüşürüz\"");
    assert_eq!(chat.state(), &ConversationState::None);
    assert!(phone
        .calls()
        .iter()
        .any(|c| matches!(c, DeviceCall::Message(r) if r.text == "akşam görüşürüz")));
}

#[tokio::test]
async fn test_pending_question_expires() {
    let (mut chat, phone) = session(None, false);
    let start = Instant::now();

    chat.send_at("ahmete yaz", start).await;
    assert!(chat.state().is_pending());

    // three minutes later "feneri aç" is a fresh command, not the message body
    let reply = chat.send_at("feneri aç", start + Duration::from_secs(180)).await;
    assert_eq!(reply.content, "🔦 Fener açıldı.");
    assert!(phone.torch_on());
}

#[tokio::test]
async fn test_blank_input() {
    let (mut chat, _) = session(None, false);
    let reply = chat.send("   ").await;
    assert_eq!(reply.content, "Bir şey yazmadın.");
    assert!(chat.history().is_empty());
}

#[tokio::test]
async fn test_offline_without_backend() {
    let (mut chat, _) = session(None, true);
    let reply = chat.send("bugün hava nasıl").await;
    assert!(reply.content.starts_with("📡"));
}

#[tokio::test]
async fn test_streamed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"token\": \"Güneşli \"}\n\ndata: {\"token\": \"bir gün.\"}\n\ndata: [DONE]\n\n",
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let (mut chat, _) = session(Some(backend_for(&server)), true);
    let updates = chat.subscribe();
    let reply = chat.send("bugün hava nasıl").await;

    assert_eq!(reply.content, "Güneşli bir gün.");
    assert!(!reply.loading);
    let history = chat.history();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|m| !m.loading));
    assert_eq!(*updates.borrow(), history.to_vec());
}

#[tokio::test]
async fn test_stream_failure_falls_back_to_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Merhaba!" })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut chat, _) = session(Some(backend_for(&server)), true);
    let reply = chat.send("selam").await;
    assert_eq!(reply.content, "Merhaba!");
}

#[tokio::test]
async fn test_backend_error_becomes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (mut chat, _) = session(Some(backend_for(&server)), false);
    let reply = chat.send("selam").await;
    assert!(reply.content.starts_with("🔑"));
    assert_eq!(chat.history().len(), 2);
}

#[tokio::test]
async fn test_tv_app_request_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "📺 Netflix TV'de açılıyor" })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut chat, phone) = session(Some(backend_for(&server)), false);
    let reply = chat.send("tvde netflix aç").await;
    assert_eq!(reply.content, "📺 Netflix TV'de açılıyor");
    assert!(phone.calls().is_empty());

    let reply = chat.send("telefonda spotify aç").await;
    assert_eq!(reply.content, "📱 Spotify açılıyor!");
}

#[tokio::test]
async fn test_clear_resets_history_and_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/clear"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (mut chat, _) = session(Some(backend_for(&server)), false);
    chat.send("ahmete yaz").await;
    chat.clear().await;
    assert!(chat.history().is_empty());
    assert_eq!(chat.state(), &ConversationState::None);
}
