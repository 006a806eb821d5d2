use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const FAILING_SURAH: u16 = 99;
const VERSES_PER_SURAH: u16 = 20;

#[derive(Debug, Deserialize)]
struct ProgressResponse {
    done: Vec<bool>,
    selected: Option<u8>,
}

struct TestServer {
    base_url: String,
    data_path: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static SURAH_HITS: Lazy<StdMutex<HashMap<u16, usize>>> = Lazy::new(|| StdMutex::new(HashMap::new()));

/// Stand-in for the remote verse api, served from its own thread so it
/// outlives any single test runtime.
static FAKE_API: Lazy<String> = Lazy::new(|| {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake api");
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("fake api runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            let app = Router::new().route("/v1/surah/:number/quran-uthmani", get(fake_surah));
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{addr}/v1")
});

async fn fake_surah(Path(number): Path<u16>) -> Result<Json<Value>, StatusCode> {
    *SURAH_HITS.lock().unwrap().entry(number).or_default() += 1;
    if number == FAILING_SURAH {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let ayahs: Vec<Value> = (1..=VERSES_PER_SURAH)
        .map(|n| json!({ "number": n, "numberInSurah": n, "text": format!("text {number}:{n}") }))
        .collect();
    Ok(Json(json!({
        "code": 200,
        "status": "OK",
        "data": {
            "number": number,
            "name": format!("surah-{number}"),
            "englishName": format!("Surah {number}"),
            "ayahs": ayahs
        }
    })))
}

fn surah_hits(number: u16) -> usize {
    SURAH_HITS
        .lock()
        .unwrap()
        .get(&number)
        .copied()
        .unwrap_or_default()
}

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_path(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("{prefix}_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn write_mapping() -> String {
    let path = unique_path("hizb_http_mapping");
    let document = json!({
        "1": { "verse_mapping": { "2": "1-5", "1": "1-7" } },
        "2": { "verse_mapping": { "3": "4-8" } },
        "3": { "verse_mapping": { "4": "1-2", (FAILING_SURAH.to_string()): "1-2", "100": "1-2" } },
        "4": { "verse_mapping": { "2": "ten-twenty" } },
        "5": { "verse_mapping": { "5": "1-3" } }
    });
    std::fs::write(&path, document.to_string()).expect("write mapping");
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/progress")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_path("hizb_http_progress");
    let child = Command::new(env!("CARGO_BIN_EXE_hizb_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("HIZB_MAPPING_PATH", write_mapping())
        .env("QURAN_API_BASE", FAKE_API.as_str())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn select(client: &Client, server: &TestServer, hizb: u32) -> Value {
    client
        .post(format!("{}/api/select", server.base_url))
        .json(&json!({ "hizb": hizb }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_progress(client: &Client, server: &TestServer, action: &str) -> ProgressResponse {
    client
        .post(format!("{}/api/{action}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_select_renders_blocks_in_surah_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let outcome = select(&client, &server, 1).await;
    assert_eq!(outcome["committed"], true);
    assert_eq!(outcome["pane"]["state"], "ready");

    let blocks = outcome["pane"]["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["surah_number"], 1);
    assert_eq!(blocks[0]["surah_name"], "surah-1");
    assert_eq!(blocks[0]["ayahs"].as_array().unwrap().len(), 7);
    assert_eq!(blocks[1]["surah_number"], 2);
    assert_eq!(blocks[1]["ayahs"].as_array().unwrap().len(), 5);

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(page.matches(r#"name="hizb""#).count(), 60);
    assert!(page.contains("text 1:7"));
    assert!(!page.contains("text 1:8"));
}

#[tokio::test]
async fn http_reselecting_uses_cached_surah() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    select(&client, &server, 5).await;
    select(&client, &server, 5).await;

    assert_eq!(surah_hits(5), 1);
}

#[tokio::test]
async fn http_fetch_failure_aborts_division() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let outcome = select(&client, &server, 3).await;
    assert_eq!(outcome["pane"]["state"], "failed");
    assert_eq!(outcome["pane"]["kind"], "fetch_failed");
    assert!(
        outcome["pane"]["message"]
            .as_str()
            .unwrap()
            .contains(&FAILING_SURAH.to_string())
    );
    assert_eq!(surah_hits(100), 0);

    let reader: Value = client
        .get(format!("{}/api/reader", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reader["state"], "failed");
}

#[tokio::test]
async fn http_invalid_range_is_reported_per_hizb() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let outcome = select(&client, &server, 4).await;
    assert_eq!(outcome["pane"]["kind"], "invalid_range");

    let ranges = client
        .get(format!("{}/api/hizb/4", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(ranges.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

    let missing = client
        .get(format!("{}/api/hizb/42", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    let ok: Value = client
        .get(format!("{}/api/hizb/2", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ok, json!([{ "surah": 3, "from": 4, "to": 8 }]));
}

#[tokio::test]
async fn http_rejects_out_of_range_hizb() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/select", server.base_url))
        .json(&json!({ "hizb": 61 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_mark_done_and_undo_persist() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    select(&client, &server, 2).await;

    let done = post_progress(&client, &server, "done").await;
    assert_eq!(done.selected, Some(2));
    assert!(done.done[1]);
    let stored: Value =
        serde_json::from_slice(&std::fs::read(&server.data_path).unwrap()).unwrap();
    assert_eq!(stored["hizb_done_v1"]["done"][1], true);
    assert_eq!(stored["hizb_done_v1"]["done"].as_array().unwrap().len(), 60);

    let undone = post_progress(&client, &server, "undo").await;
    assert!(!undone.done[1]);
    let stored: Value =
        serde_json::from_slice(&std::fs::read(&server.data_path).unwrap()).unwrap();
    assert_eq!(stored["hizb_done_v1"]["done"][1], false);
}
