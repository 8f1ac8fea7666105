use atlas::error::ModelError;
use atlas::services::model::{extract_stripped, install_archive, ModelManager};
use std::io::{Cursor, Write};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

fn model_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory("vosk-model-small-tr-0.3/", options).unwrap();
    for (name, body) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_extract_drops_top_level_folder() {
    let archive = model_zip(&[
        ("vosk-model-small-tr-0.3/conf/model.conf", "--beam=10"),
        ("vosk-model-small-tr-0.3/am/final.mdl", "binary"),
    ]);
    let dir = TempDir::new().unwrap();
    extract_stripped(&archive, dir.path()).unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("conf/model.conf")).unwrap(),
        "--beam=10"
    );
    assert!(dir.path().join("am/final.mdl").is_file());
    assert!(!dir.path().join("vosk-model-small-tr-0.3").exists());
}

#[test]
fn test_install_replaces_previous_model() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("vosk-model-tr");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("stale.txt"), "eski").unwrap();

    install_archive(&model_zip(&[("m/vosk.conf", "")]), &dest).unwrap();
    assert!(dest.join("vosk.conf").is_file());
    assert!(!dest.join("stale.txt").exists());
    assert!(!dir.path().join("vosk-model-tr.partial").exists());
}

#[test]
fn test_garbage_archive_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = extract_stripped(b"not a zip", dir.path()).unwrap_err();
    assert!(matches!(err, ModelError::Archive(_)));
}

#[tokio::test]
async fn test_ensure_downloads_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(model_zip(&[("m/vosk.conf", ""), ("m/graph/HCLr.fst", "x")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = ModelManager::new(
        format!("{}/model.zip", server.uri()),
        dir.path().join("vosk-model-tr"),
        "vosk.conf",
    );
    let client = reqwest::Client::new();

    assert!(!manager.is_ready());
    manager.ensure(&client).await.unwrap();
    assert!(manager.is_ready());
    assert!(manager.dir().join("graph/HCLr.fst").is_file());

    // second call is a no-op; the mock expects a single request
    manager.ensure(&client).await.unwrap();

    manager.remove().unwrap();
    assert!(!manager.is_ready());
    manager.remove().unwrap();
}

#[tokio::test]
async fn test_archive_without_marker_is_incomplete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(model_zip(&[("m/README", "")])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = ModelManager::new(
        format!("{}/model.zip", server.uri()),
        dir.path().join("model"),
        "vosk.conf",
    );
    let err = manager.ensure(&reqwest::Client::new()).await.unwrap_err();
    assert!(matches!(err, ModelError::Incomplete(_)));
}

#[tokio::test]
async fn test_download_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = ModelManager::new(server.uri(), dir.path().join("model"), "vosk.conf");
    let err = manager.ensure(&reqwest::Client::new()).await.unwrap_err();
    assert!(matches!(err, ModelError::Download(_)));
}
