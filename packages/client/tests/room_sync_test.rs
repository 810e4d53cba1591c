//! End-to-end tests against an in-process fake game server.
//!
//! The fake server exposes the REST endpoints under `/api` and a scripted
//! event channel under `/ws`: after `joinRoom` it acknowledges the join,
//! pushes a lobby snapshot, a player patch and a chat mention, waits for one
//! more command, acknowledges it and dissolves the room.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{
        Path, Query,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::timeout;

use p42_client::{
    domain::{
        ApiError, ChannelError, ChatTarget, CommandStatus, Effect, EventChannel, MessageText,
        Nickname, PlayerId, Redirect, RoomId, SessionEnd, SoundCue,
    },
    infrastructure::{
        api::HttpGameApi, channel::WebSocketEventChannel, storage::InMemoryPasswordMemory,
    },
    usecase::{
        LoadRoomError, LoadRoomUseCase, MountParams, PasswordError, RoomSync, Unlock,
        UnlockRoomUseCase,
    },
};
use p42_shared::time::SystemClock;

const ROOM: &str = "room-1";
const TOKEN: &str = "t0k3n";
const PASSWORD: &str = "secret";
const WAIT: Duration = Duration::from_secs(5);

// ========================================
// Fake server
// ========================================

fn room_json() -> Value {
    json!({
        "id": ROOM,
        "name": "Thiercelieux",
        "status": "waiting",
        "gameType": 0,
        "debateTime": 120,
        "maxPlayers": 2,
        "isPrivate": true,
        "phase": 0,
        "creator": "alice",
        "createdAt": "2024-03-01T20:00:00Z",
        "updatedAt": "2024-03-01T20:00:00Z"
    })
}

fn players_json() -> Value {
    json!([
        {"id": "alice", "nickname": "Alice", "alive": true, "ready": false},
        {"id": "bob", "nickname": "Bob", "alive": true, "ready": false}
    ])
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", TOKEN);
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

async fn get_room(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "invalid token");
    }
    if id != ROOM {
        return error_body(StatusCode::NOT_FOUND, "room not found");
    }
    Json(room_json()).into_response()
}

async fn get_players() -> Json<Value> {
    Json(players_json())
}

async fn get_viewers() -> Json<Value> {
    Json(json!([]))
}

async fn get_messages() -> Json<Value> {
    Json(json!([
        {"senderId": "bob", "nickname": "Bob", "message": "hi all", "sentAt": "2024-03-01T20:00:30Z"}
    ]))
}

async fn check_password(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "valid": body["password"] == PASSWORD }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
struct ConnectQuery {
    token: Option<String>,
}

async fn websocket_handler(ws: WebSocketUpgrade, Query(query): Query<ConnectQuery>) -> Response {
    if query.token.as_deref() != Some(TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    ws.on_upgrade(play_script).into_response()
}

async fn next_frame(socket: &mut WebSocket) -> Option<Value> {
    while let Some(Ok(message)) = socket.recv().await {
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).ok();
        }
    }
    None
}

async fn push(socket: &mut WebSocket, event: &str, data: Value) {
    let text = json!({ "event": event, "data": data }).to_string();
    let _ = socket.send(Message::Text(text.into())).await;
}

async fn play_script(mut socket: WebSocket) {
    let Some(join) = next_frame(&mut socket).await else {
        return;
    };
    if join["event"] != "joinRoom" {
        return;
    }
    let join_id = join["data"]["correlationId"].clone();

    push(&mut socket, "commandAck", json!({"correlationId": join_id, "ok": true})).await;
    push(
        &mut socket,
        "lobbyUpdate",
        json!({"room": room_json(), "players": players_json(), "viewers": []}),
    )
    .await;
    push(&mut socket, "playerUpdate", json!([{"id": "bob", "ready": true}])).await;
    push(
        &mut socket,
        "newMessage",
        json!({
            "senderId": "bob",
            "nickname": "Bob",
            "message": "@Alice wake up",
            "sentAt": "2024-03-01T20:01:00Z"
        }),
    )
    .await;

    let Some(command) = next_frame(&mut socket).await else {
        return;
    };
    let command_id = command["data"]["correlationId"].clone();
    push(&mut socket, "commandAck", json!({"correlationId": command_id, "ok": true})).await;
    push(&mut socket, "gameDissolved", json!({"reason": "host left"})).await;
    let _ = socket.send(Message::Close(None)).await;
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/rooms/{id}", get(get_room))
        .route("/api/rooms/{id}/players", get(get_players))
        .route("/api/rooms/{id}/viewers", get(get_viewers))
        .route("/api/rooms/{id}/messages", get(get_messages))
        .route("/api/rooms/{id}/password", post(check_password))
        .route("/api/rooms/{id}/join", post(no_content))
        .route("/api/rooms/{id}/ready", post(no_content))
        .route("/ws", get(websocket_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn api(addr: SocketAddr, token: Option<&str>) -> Arc<HttpGameApi> {
    Arc::new(HttpGameApi::new(
        format!("http://{}/api", addr),
        token.map(str::to_string),
    ))
}

fn room_id() -> RoomId {
    RoomId::new(ROOM.to_string()).unwrap()
}

// ========================================
// Tests
// ========================================

#[tokio::test]
async fn test_full_room_session() {
    // テスト項目: 取得・解錠・接続・マウントからルーム解散までの一連の流れ
    // given (前提条件):
    let addr = spawn_server().await;
    let api = api(addr, Some(TOKEN));
    let memory = Arc::new(InMemoryPasswordMemory::new());

    // when (操作): 初期状態の取得
    let initial = LoadRoomUseCase::new(api.clone())
        .execute(&room_id())
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(initial.players.len(), 2);
    assert_eq!(initial.messages.len(), 1);
    assert!(!initial.can_start_game);
    let room = initial.room.clone().unwrap();
    assert!(room.is_private);

    // when (操作): パスワード付きルームの解錠
    let unlock = UnlockRoomUseCase::new(api.clone(), memory.clone());
    let wrong = unlock.execute(&room, Some("guess")).await;
    let right = unlock.execute(&room, Some(PASSWORD)).await;

    // then (期待する結果):
    assert_eq!(wrong, Err(PasswordError::WrongPassword));
    assert_eq!(right, Ok(Unlock::Verified));

    // when (操作): イベントチャンネルへの接続とマウント
    let channel = Arc::new(
        WebSocketEventChannel::connect(&format!("ws://{}/ws", addr), Some(TOKEN))
            .await
            .unwrap(),
    );
    let (sync, mut effects) = RoomSync::mount(
        channel.clone(),
        MountParams {
            room_id: room_id(),
            local_player: PlayerId::new("alice".to_string()).unwrap(),
            nickname: Nickname::new("Alice".to_string()).unwrap(),
            password: Some(PASSWORD.to_string()),
        },
        initial,
        Arc::new(SystemClock),
    )
    .await
    .unwrap();

    // then (期待する結果): 言及サウンドより前のイベントはすべて適用済み
    let mention = timeout(WAIT, effects.recv()).await.unwrap();
    assert_eq!(mention, Some(Effect::PlaySound(SoundCue::mention())));
    {
        let view = sync.view();
        let view = view.borrow();
        assert!(view.can_start_game);
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].text, "@Alice wake up");
    }
    assert_eq!(channel.listener_count().await, 16);

    // when (操作): チャット送信
    let chat_id = sync
        .commands()
        .send_chat(
            0,
            MessageText::new("good morning".to_string()).unwrap(),
            ChatTarget::Room,
        )
        .await
        .unwrap();

    // then (期待する結果): 応答のあとにルームが解散される
    let navigate = timeout(WAIT, effects.recv()).await.unwrap();
    assert_eq!(
        navigate,
        Some(Effect::Navigate(Redirect {
            cause: SessionEnd::Dissolved,
            reason: Some("host left".to_string()),
        }))
    );
    assert_eq!(
        sync.commands().status(&chat_id).await,
        Some(CommandStatus::Acknowledged)
    );
    assert_eq!(sync.commands().pending_count().await, 0);

    timeout(WAIT, channel.closed()).await.unwrap();
    sync.unmount().await;
    assert_eq!(channel.listener_count().await, 0);

    // when (操作): 一度解錠したルームはパスワード不要
    let again = unlock.execute(&room, None).await;

    // then (期待する結果):
    assert_eq!(again, Ok(Unlock::Remembered));
}

#[tokio::test]
async fn test_event_channel_rejects_bad_token() {
    // テスト項目: トークンが不正なら接続は Unauthorized になる
    // given (前提条件):
    let addr = spawn_server().await;

    // when (操作):
    let result = WebSocketEventChannel::connect(&format!("ws://{}/ws", addr), Some("nope")).await;

    // then (期待する結果):
    assert!(matches!(result, Err(ChannelError::Unauthorized)));
}

#[tokio::test]
async fn test_rest_api_errors_are_mapped() {
    // テスト項目: 401 と 404 がそれぞれ Unauthorized と NotFound になる
    // given (前提条件):
    let addr = spawn_server().await;
    let anonymous = LoadRoomUseCase::new(api(addr, None));
    let authorized = LoadRoomUseCase::new(api(addr, Some(TOKEN)));

    // when (操作):
    let unauthorized = anonymous.execute(&room_id()).await;
    let missing = authorized
        .execute(&RoomId::new("room-404".to_string()).unwrap())
        .await;

    // then (期待する結果):
    assert_eq!(
        unauthorized,
        Err(LoadRoomError::Room(ApiError::Unauthorized))
    );
    assert!(matches!(
        missing,
        Err(LoadRoomError::Room(ApiError::NotFound(_)))
    ));
}
