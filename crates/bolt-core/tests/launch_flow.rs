use std::io::Write;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::{Matcher, Server, ServerGuard};
use tokio_util::sync::CancellationToken;

use bolt_core::io::download::sha256_hex;
use bolt_core::{
    ClientOptions, Context, ErrorKind, FetchPlan, HashStore, LaunchError, Launcher,
    LauncherConfig, MemoryHashStore, NullReporter, Reporter, Resolution,
};
use bolt_schema::{Game, InstalledId, LaunchSession, Platform, Provider};

const OSRS_WIN: Provider = Provider::Official {
    game: Game::Osrs,
    platform: Platform::Windows,
};

const PACKAGES: &str = "/ubuntu/dists/trusty/non-free/binary-amd64/Packages";

fn config(server: &ServerGuard) -> LauncherConfig {
    let base = server.url();
    LauncherConfig {
        direct6_url: format!("{base}/direct6/"),
        content_url: format!("{base}/ubuntu/"),
        runelite_releases_url: format!("{base}/releases"),
        hdos_getdown_url: format!("{base}/getdown.txt"),
        hdos_jar_url: format!("{base}/hdos/v{{version}}/hdos-launcher.jar"),
        launch_url: base,
        enforce_https: false,
        ..LauncherConfig::default()
    }
}

fn context(server: &ServerGuard, options: ClientOptions, store: &Arc<MemoryHashStore>) -> Context {
    Context::new(config(server), options, store.clone(), Arc::new(NullReporter)).unwrap()
}

fn launcher(server: &ServerGuard, options: ClientOptions, store: &Arc<MemoryHashStore>) -> Launcher {
    Launcher::new(context(server, options, store))
}

/// Store whose writes always fail.
struct FailingStore;

impl HashStore for FailingStore {
    fn get(&self, _: Provider) -> Option<InstalledId> {
        None
    }
    fn set(&self, _: Provider, _: InstalledId) -> Result<(), LaunchError> {
        Err(LaunchError::Io(std::io::Error::other("disk full")))
    }
}

/// Keeps error messages so tests can inspect them.
#[derive(Default)]
struct RecordingReporter {
    errors: Mutex<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }
    fn progress(&self, _: &str, _: u64, _: Option<u64>) {}
    fn launch_status(&self, _: Provider, _: &str) {}
}

fn session() -> LaunchSession {
    LaunchSession::new(Some("s1".into()), None, None)
}

fn rs3_options() -> ClientOptions {
    ClientOptions {
        rs_config_uri: Some("custom".into()),
        ..ClientOptions::default()
    }
}

fn envelope(value: &serde_json::Value) -> String {
    format!("eyJ0eXAiOiJKV1QifQ.{}.c2lnbmF0dXJl", STANDARD.encode(value.to_string()))
}

fn piece(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    let mut framed = b"\x00\x01\x02\x03\x04\x05".to_vec();
    framed.extend(encoder.finish().unwrap());
    framed
}

/// Serve the Direct6 token, catalog and metafile for an `osrs-win` build.
async fn mock_direct6_chain(
    server: &mut ServerGuard,
    id: &str,
    files: serde_json::Value,
) -> Vec<mockito::Mock> {
    let base = server.url();
    let token = envelope(&serde_json::json!({
        "environments": {"production": {"id": id, "version": "231"}}
    }));
    let catalog = envelope(&serde_json::json!({
        "metafile": format!("{base}/meta/{id}"),
        "config": {"remote": {
            "baseUrl": format!("{base}/pieces/"),
            "pieceFormat": "{SubString:0,2,{TargetDigest}}/{TargetDigest}.solidpiece"
        }}
    }));
    // "AAE=" -> 0001, "q80=" -> abcd
    let metafile = envelope(&serde_json::json!({
        "id": id,
        "pieces": {"digests": ["AAE=", "q80="]},
        "files": files
    }));

    vec![
        server
            .mock("GET", "/direct6/osrs-win/osrs-win.json")
            .with_body(token)
            .create_async()
            .await,
        server
            .mock("GET", format!("/direct6/osrs-win/catalog/{id}/catalog.json").as_str())
            .with_body(catalog)
            .create_async()
            .await,
        server
            .mock("GET", format!("/meta/{id}").as_str())
            .with_body(metafile)
            .create_async()
            .await,
    ]
}

#[tokio::test]
async fn test_debian_update_downloads_launches_and_records_hash() {
    let mut server = Server::new_async().await;
    let _index = server
        .mock("GET", PACKAGES)
        .with_body("Package: runescape-launcher\nFilename: pool/rs.deb\nSize: 7\nSHA256: abc123\n")
        .create_async()
        .await;
    let _deb = server
        .mock("GET", "/ubuntu/pool/rs.deb")
        .with_body("DEBDATA")
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-rs3-deb")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("hash".into(), "abc123".into()),
            Matcher::UrlEncoded("jx_session_id".into(), "s1".into()),
            Matcher::UrlEncoded("config_uri".into(), "custom".into()),
        ]))
        .match_header("content-type", "application/octet-stream")
        .match_body("DEBDATA")
        .with_body("  launched \n")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let report = launcher(&server, rs3_options(), &store)
        .launch(Provider::Rs3Deb, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
    assert_eq!(report.status, "launched");
    assert_eq!(report.payload_bytes, Some(7));
    assert_eq!(report.installed, Some(InstalledId::from("abc123")));
    assert_eq!(store.snapshot()[&Provider::Rs3Deb], InstalledId::from("abc123"));
}

#[tokio::test]
async fn test_malformed_debian_index_launches_without_hash() {
    let mut server = Server::new_async().await;
    let _index = server
        .mock("GET", PACKAGES)
        .with_body("Package: runescape-launcher\nSize: 7\n")
        .create_async()
        .await;
    let launch = server
        .mock("GET", "/launch-rs3-deb")
        .match_query(Matcher::Exact("jx_session_id=s1&config_uri=custom".into()))
        .with_body("ok")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let report = launcher(&server, rs3_options(), &store)
        .launch(Provider::Rs3Deb, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
    assert_eq!(report.payload_bytes, None);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_debian_digest_is_verified_when_well_formed() {
    let mut server = Server::new_async().await;
    let good = sha256_hex(b"DEBDATA");
    let index = format!("Filename: pool/rs.deb\nSize: 7\nSHA256: {good}\n");
    let _index = server.mock("GET", PACKAGES).with_body(index).create_async().await;
    let _deb = server
        .mock("GET", "/ubuntu/pool/rs.deb")
        .with_body("TAMPERED")
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-rs3-deb")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let err = launcher(&server, rs3_options(), &store)
        .launch(Provider::Rs3Deb, &session(), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    launch.assert_async().await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_direct6_up_to_date_skips_download() {
    let mut server = Server::new_async().await;
    let token = envelope(&serde_json::json!({
        "environments": {"production": {"id": "build-7", "version": "231"}}
    }));
    let _token = server
        .mock("GET", "/direct6/osrs-win/osrs-win.json")
        .with_body(token)
        .create_async()
        .await;
    let catalog = server
        .mock("GET", Matcher::Regex("^/direct6/osrs-win/catalog/".into()))
        .expect(0)
        .create_async()
        .await;
    let launch = server
        .mock("GET", "/launch-osrs-exe")
        .match_query(Matcher::Exact("jx_session_id=s1".into()))
        .with_body("ok")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::with_entries([(
        OSRS_WIN,
        InstalledId::from("build-7"),
    )]));
    let report = launcher(&server, ClientOptions::default(), &store)
        .launch(OSRS_WIN, &session(), false)
        .await
        .unwrap();

    catalog.assert_async().await;
    launch.assert_async().await;
    assert_eq!(report.payload_bytes, None);
    assert_eq!(report.installed, None);
}

#[tokio::test]
async fn test_direct6_update_reassembles_executable() {
    let mut server = Server::new_async().await;
    let _chain = mock_direct6_chain(
        &mut server,
        "build-8",
        serde_json::json!([
            {"name": "jagex.dll", "size": 3},
            {"name": "osclient.exe", "size": 5},
            {"name": "tail.bin", "size": 2}
        ]),
    )
    .await;
    let _p0 = server
        .mock("GET", "/pieces/00/0001.solidpiece")
        .with_body(piece(b"AAAH"))
        .create_async()
        .await;
    let _p1 = server
        .mock("GET", "/pieces/ab/abcd.solidpiece")
        .with_body(piece(b"ELLOZZ"))
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-osrs-exe")
        .match_query(Matcher::Exact("hash=build-8&jx_session_id=s1".into()))
        .match_body("HELLO")
        .with_body("started")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::with_entries([(
        OSRS_WIN,
        InstalledId::from("build-7"),
    )]));
    let report = launcher(&server, ClientOptions::default(), &store)
        .launch(OSRS_WIN, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
    assert_eq!(report.payload_bytes, Some(5));
    assert_eq!(store.snapshot()[&OSRS_WIN], InstalledId::from("build-8"));
}

#[tokio::test]
async fn test_direct6_with_two_executables_never_launches() {
    let mut server = Server::new_async().await;
    let _chain = mock_direct6_chain(
        &mut server,
        "build-9",
        serde_json::json!([
            {"name": "a.exe", "size": 3},
            {"name": "b.exe", "size": 5}
        ]),
    )
    .await;
    let pieces = server
        .mock("GET", Matcher::Regex("^/pieces/".into()))
        .expect(0)
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-osrs-exe")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let err = launcher(&server, ClientOptions::default(), &store)
        .launch(OSRS_WIN, &session(), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    pieces.assert_async().await;
    launch.assert_async().await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_runelite_update_sends_asset_id() {
    let mut server = Server::new_async().await;
    let releases = serde_json::json!([
        {"tag_name": "2.7.1", "assets": [
            {"id": 17, "name": "RuneLite.exe", "browser_download_url": "unused"},
            {"id": 991, "name": "RuneLite.jar", "browser_download_url": format!("{}/dl/runelite.jar", server.url())}
        ]}
    ]);
    let _releases = server
        .mock("GET", "/releases")
        .with_body(releases.to_string())
        .create_async()
        .await;
    let _jar = server
        .mock("GET", "/dl/runelite.jar")
        .with_body("JAR")
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-runelite-jar")
        .match_query(Matcher::Exact("id=991&jx_session_id=s1".into()))
        .match_body("JAR")
        .with_body("ok")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let report = launcher(&server, ClientOptions::default(), &store)
        .launch(Provider::RuneLite, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
    assert_eq!(report.installed, Some(InstalledId::from("991")));
}

#[tokio::test]
async fn test_runelite_without_jar_asset_is_parse_error() {
    let mut server = Server::new_async().await;
    let _releases = server
        .mock("GET", "/releases")
        .with_body(r#"[{"tag_name": "2.7.1", "assets": [{"id": 1, "name": "notes.txt", "browser_download_url": "x"}]}]"#)
        .create_async()
        .await;
    let launch = server
        .mock("GET", "/launch-runelite-jar")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let err = launcher(&server, ClientOptions::default(), &store)
        .launch(Provider::RuneLite, &session(), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    launch.assert_async().await;
}

#[tokio::test]
async fn test_runelite_custom_jar_bypasses_releases() {
    let mut server = Server::new_async().await;
    let releases = server
        .mock("GET", "/releases")
        .expect(0)
        .create_async()
        .await;
    let launch = server
        .mock("GET", "/launch-runelite-jar-configure")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("jar_path".into(), "/opt/runelite.jar".into()),
            Matcher::UrlEncoded("flatpak_rich_presence".into(), "1".into()),
        ]))
        .with_body("ok")
        .create_async()
        .await;

    let options = ClientOptions {
        runelite_use_custom_jar: true,
        runelite_custom_jar: Some("/opt/runelite.jar".into()),
        flatpak_rich_presence: true,
        ..ClientOptions::default()
    };
    let store = Arc::new(MemoryHashStore::with_entries([(
        Provider::RuneLite,
        InstalledId::from("5"),
    )]));
    launcher(&server, options, &store)
        .launch(Provider::RuneLite, &session(), true)
        .await
        .unwrap();

    releases.assert_async().await;
    launch.assert_async().await;
    assert_eq!(store.snapshot()[&Provider::RuneLite], InstalledId::from("5"));
}

#[tokio::test]
async fn test_hdos_update_uses_version_template() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("appbase = https://cdn\nlauncher.version = 8.1.2\n")
        .create_async()
        .await;
    let _jar = server
        .mock("GET", "/hdos/v8.1.2/hdos-launcher.jar")
        .with_body("HDOS")
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-hdos-jar")
        .match_query(Matcher::Exact("version=8.1.2&jx_session_id=s1".into()))
        .match_body("HDOS")
        .with_body("ok")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    launcher(&server, ClientOptions::default(), &store)
        .launch(Provider::Hdos, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
    assert_eq!(store.snapshot()[&Provider::Hdos], InstalledId::from("8.1.2"));
}

#[tokio::test]
async fn test_hdos_manifest_without_version_launches_bare() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("appbase = https://cdn\n")
        .create_async()
        .await;
    let launch = server
        .mock("GET", "/launch-hdos-jar")
        .match_query(Matcher::Exact("jx_session_id=s1".into()))
        .with_body("ok")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    launcher(&server, ClientOptions::default(), &store)
        .launch(Provider::Hdos, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
}

#[tokio::test]
async fn test_rejected_launch_leaves_store_untouched() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("launcher.version = 9\n")
        .create_async()
        .await;
    let _jar = server
        .mock("GET", "/hdos/v9/hdos-launcher.jar")
        .with_body("HDOS")
        .create_async()
        .await;
    let _launch = server
        .mock("POST", "/launch-hdos-jar")
        .with_status(500)
        .with_body("java not found\n")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::with_entries([(
        Provider::Hdos,
        InstalledId::from("8"),
    )]));
    let err = launcher(&server, ClientOptions::default(), &store)
        .launch(Provider::Hdos, &session(), false)
        .await
        .unwrap_err();

    match err {
        LaunchError::Dispatch { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "java not found");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.snapshot()[&Provider::Hdos], InstalledId::from("8"));
}

#[tokio::test]
async fn test_metadata_failure_aborts_attempt() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_status(503)
        .create_async()
        .await;
    let launch = server
        .mock("GET", "/launch-hdos-jar")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::new());
    let err = launcher(&server, ClientOptions::default(), &store)
        .launch(Provider::Hdos, &session(), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    launch.assert_async().await;
}

#[tokio::test]
async fn test_cancelled_attempt_never_dispatches() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("launcher.version = 9\n")
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-hdos-jar")
        .expect(0)
        .create_async()
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let store = Arc::new(MemoryHashStore::new());
    let ctx = context(&server, ClientOptions::default(), &store).with_cancel(cancel);
    let err = Launcher::new(ctx)
        .launch(Provider::Hdos, &session(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, LaunchError::Cancelled));
    launch.assert_async().await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_check_reports_up_to_date_without_launching() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("launcher.version = 9\n")
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::with_entries([(
        Provider::Hdos,
        InstalledId::from("9"),
    )]));
    let resolution = launcher(&server, ClientOptions::default(), &store)
        .check(Provider::Hdos)
        .await
        .unwrap();
    assert!(matches!(resolution, Resolution::UpToDate(id) if id.as_str() == "9"));
}

#[tokio::test]
async fn test_check_reports_available_update_without_launching() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("launcher.version = 9\n")
        .create_async()
        .await;
    let jar = server
        .mock("GET", "/hdos/v9/hdos-launcher.jar")
        .expect(0)
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-hdos-jar")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryHashStore::with_entries([(
        Provider::Hdos,
        InstalledId::from("8"),
    )]));
    let resolution = launcher(&server, ClientOptions::default(), &store)
        .check(Provider::Hdos)
        .await
        .unwrap();

    match resolution {
        Resolution::Update {
            id: Some(id),
            plan: FetchPlan::Single { url, .. },
            ..
        } => {
            assert_eq!(id.as_str(), "9");
            assert!(url.ends_with("/hdos/v9/hdos-launcher.jar"), "{url}");
        }
        other => panic!("unexpected resolution: {other:?}"),
    }
    jar.assert_async().await;
    launch.assert_async().await;
    assert_eq!(store.snapshot()[&Provider::Hdos], InstalledId::from("8"));
}

#[tokio::test]
async fn test_store_failure_after_launch_is_reported_not_returned() {
    let mut server = Server::new_async().await;
    let _getdown = server
        .mock("GET", "/getdown.txt")
        .with_body("launcher.version = 9\n")
        .create_async()
        .await;
    let _jar = server
        .mock("GET", "/hdos/v9/hdos-launcher.jar")
        .with_body("HDOS")
        .create_async()
        .await;
    let launch = server
        .mock("POST", "/launch-hdos-jar")
        .with_body("ok\n")
        .create_async()
        .await;

    let reporter = Arc::new(RecordingReporter::default());
    let ctx = Context::new(
        config(&server),
        ClientOptions::default(),
        Arc::new(FailingStore),
        reporter.clone(),
    )
    .unwrap();
    let report = Launcher::new(ctx)
        .launch(Provider::Hdos, &session(), false)
        .await
        .unwrap();

    launch.assert_async().await;
    assert_eq!(report.status, "ok");
    assert_eq!(report.installed, None);
    let errors = reporter.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("could not record installed version 9"), "{}", errors[0]);
    assert!(errors[0].contains("disk full"), "{}", errors[0]);
}
