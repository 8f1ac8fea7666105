use atlas::kernel::dialogue::DialogueStyle;
use atlas::notes::{FileNoteStore, InMemoryNoteStore, NoteStore};
use atlas::platform::{InMemoryContactBook, Platform, SimulatedPhone};
use atlas::services::backend::BackendClient;
use atlas::session::{ChatSession, LocalResponder};
use atlas::AtlasConfig;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn open_notes(config: &AtlasConfig) -> Arc<Mutex<dyn NoteStore>> {
    let path = config.notes_path();
    match FileNoteStore::open(path.clone()) {
        Ok(store) => Arc::new(Mutex::new(store)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "notes file unusable; keeping notes in memory");
            Arc::new(Mutex::new(InMemoryNoteStore::new()))
        }
    }
}

fn demo_contacts() -> InMemoryContactBook {
    InMemoryContactBook::new()
        .with("Ahmet Yılmaz", "+90 532 111 22 33")
        .with("Annem", "+90 533 444 55 66")
        .with("Baba", "+90 535 777 88 99")
}

async fn show_status(backend: Option<&BackendClient>) {
    let Some(backend) = backend else {
        println!("📡 Sunucu ayarlı değil.");
        return;
    };
    match backend.status().await {
        Ok(status) => {
            let light = if status.light_on { "açık" } else { "kapalı" };
            println!(
                "💡 Ampul: {light}, %{} {}\n📺 TV: {}\n🤖 AI: {}",
                status.light_brightness,
                status.light_color,
                if status.tv_connected { "bağlı" } else { "bağlı değil" },
                if status.ai_ready { "hazır" } else { "hazır değil" },
            );
        }
        Err(e) => println!("{}", e.friendly_message()),
    }
}

fn show_notes(notes: &Arc<Mutex<dyn NoteStore>>) {
    let notes = match notes.lock() {
        Ok(guard) => guard.all(),
        Err(poisoned) => poisoned.into_inner().all(),
    };
    if notes.is_empty() {
        println!("📝 Henüz not yok.");
    }
    for note in notes {
        println!(
            "{} [{}] {} ({})",
            note.category.emoji(),
            note.category.label(),
            note.text,
            note.created_at.format("%d.%m.%Y %H:%M"),
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AtlasConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable; using defaults");
        AtlasConfig::default()
    });
    tracing::info!(backend = %config.backend.base_url, "ATLAS chat starting");

    let phone = Arc::new(SimulatedPhone::new().with_contacts(demo_contacts()));
    let platform = Platform::simulated(phone);
    let notes = open_notes(&config);
    let responder = Arc::new(LocalResponder::from_platform(
        DialogueStyle::Chat,
        &platform,
        notes.clone(),
    ));

    let backend = (!config.backend.base_url.trim().is_empty())
        .then(|| BackendClient::new(&config.backend));
    let mut session = ChatSession::new(
        responder,
        backend.clone(),
        config.backend.streaming,
        config.chat.clone(),
    );

    println!("ATLAS hazır. Komutlar: /durum, /notlar, /temizle, /cikis");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/cikis" => break,
            "/durum" => show_status(backend.as_ref()).await,
            "/notlar" => show_notes(&notes),
            "/temizle" => {
                session.clear().await;
                println!("🧹 Sohbet temizlendi.");
            }
            text => {
                let reply = session.send(text).await;
                println!("{}", reply.content);
            }
        }
    }

    tracing::info!("ATLAS chat stopped");
    Ok(())
}
