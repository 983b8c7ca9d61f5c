//! Command Dispatcher
//!
//! 接続ごとの状態機械: Unregistered → Registered → Closed。
//!
//! - Unregistered: 空でない行はすべてハンドルの登録要求（`exit` だけは終了）
//! - Registered: 1 行が 1 コマンド
//! - Closed: `exit` 後。以降の行は無視する
//!
//! 後始末（グローバルチャットと全チャンネルからの退出）は `exit` か `close` の
//! どちらか一度だけ実行される。

use std::sync::Arc;

use crate::domain::{BoardError, ChannelName, ConnectionId, Handle, Notice};

use super::{command::Command, state::AppState};

/// 1 行を処理した後に接続を続けるかどうか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Unregistered,
    /// ハンドルが決まった状態。`leave` でグローバルチャットから外れてもハンドルは保持し、
    /// `join` で同じハンドルで再登録する。
    Registered { handle: Handle },
    Closed,
}

pub struct Session {
    connection: ConnectionId,
    state: SessionState,
    app: Arc<AppState>,
}

impl Session {
    pub fn new(connection: ConnectionId, app: Arc<AppState>) -> Self {
        Self {
            connection,
            state: SessionState::Unregistered,
            app,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// 受信した 1 行を処理する
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        match &self.state {
            SessionState::Closed => Flow::Close,
            SessionState::Unregistered => {
                if let Ok(Command::Exit) = Command::parse(line) {
                    return self.exit().await;
                }
                self.register(line).await;
                Flow::Continue
            }
            SessionState::Registered { handle } => {
                let handle = handle.clone();
                match Command::parse(line) {
                    Ok(command) => self.dispatch(command, handle).await,
                    Err(e) => {
                        tracing::warn!("Rejected command from '{}': {}", handle, e);
                        self.reply(&format!("Error: {}", e)).await;
                        Flow::Continue
                    }
                }
            }
        }
    }

    async fn register(&mut self, raw: &str) {
        let result = match Handle::new(raw.to_string()) {
            Ok(handle) => {
                self.app
                    .register_client_usecase
                    .execute(self.connection, handle)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(registration) => {
                let groups = available_groups(&registration.channels);
                self.state = SessionState::Registered {
                    handle: registration.handle,
                };
                self.reply(&groups).await;
            }
            Err(e) => {
                tracing::warn!("Registration of '{}' failed: {}", raw, e);
                self.reply(&format!("Error: {}", e)).await;
            }
        }
    }

    async fn dispatch(&mut self, command: Command, handle: Handle) -> Flow {
        let connection = self.connection;
        let app = self.app.clone();

        let result: Result<Vec<String>, BoardError> = match command {
            Command::Exit => return self.exit().await,
            Command::Post(body) => app
                .post_message_usecase
                .post(&connection, body)
                .await
                .map(|_| Vec::new()),
            Command::Join => app
                .register_client_usecase
                .execute(connection, handle.clone())
                .await
                .map(|registration| vec![available_groups(&registration.channels)]),
            Command::Leave => app
                .leave_chat_usecase
                .execute(&connection, &handle)
                .await
                .map(|()| vec!["You have left the chat.".to_string()]),
            Command::Users => {
                let users = app.board_query_usecase.users().await;
                Ok(vec![format!("Current users: {}", join_names(&users))])
            }
            Command::Groups => {
                let groups = app.board_query_usecase.groups().await;
                Ok(vec![available_groups(&groups)])
            }
            Command::GroupJoin(name) => app
                .channel_membership_usecase
                .join(connection, &name)
                .await
                .map(|join| {
                    let mut lines = vec![format!("Joined group '{}'.", join.channel)];
                    lines.extend(join.history.iter().map(|message| {
                        Notice::ChannelPost {
                            channel: &join.channel,
                            message,
                        }
                        .to_string()
                    }));
                    lines
                }),
            Command::GroupLeave(name) => app
                .channel_membership_usecase
                .leave(&connection, &name)
                .await
                .map(|channel| vec![format!("You have left the group '{}'.", channel)]),
            Command::GroupPost { channel, body } => app
                .post_message_usecase
                .post_to_channel(&connection, &channel, body)
                .await
                .map(|_| Vec::new()),
            Command::GroupUsers(name) => app
                .board_query_usecase
                .group_users(&connection, &name)
                .await
                .map(|members| vec![format!("Members of {}: {}", name, join_names(&members))]),
            Command::GroupMessages { channel, id } => app
                .board_query_usecase
                .group_message(&connection, &channel, &id)
                .await
                .map(|message| vec![format!("{} message {}: {}", channel, message.id, message)]),
            Command::RetrieveMessage(id) => app
                .board_query_usecase
                .retrieve_message(&connection, &id)
                .await
                .map(|message| vec![format!("Message {}: {}", message.id, message)]),
        };

        match result {
            Ok(lines) => {
                for line in &lines {
                    self.reply(line).await;
                }
            }
            Err(e) => {
                tracing::warn!("Command from '{}' failed: {}", handle, e);
                self.reply(&format!("Error: {}", e)).await;
            }
        }
        Flow::Continue
    }

    /// `exit` コマンド: 後始末をしてから別れの挨拶を返す
    async fn exit(&mut self) -> Flow {
        self.cleanup().await;
        self.state = SessionState::Closed;
        self.reply("Goodbye.").await;
        Flow::Close
    }

    /// 接続の終了（正常終了・`exit`・読み取りエラーのすべて）
    ///
    /// `exit` で後始末が済んでいれば、送信キューの解除だけを行う。
    pub async fn close(mut self) {
        self.cleanup().await;
        self.state = SessionState::Closed;
        self.app
            .message_pusher
            .unregister_client(&self.connection)
            .await;
        tracing::info!("Connection '{}' closed", self.connection);
    }

    async fn cleanup(&mut self) {
        let SessionState::Registered { handle } = &self.state else {
            return;
        };
        if let Err(e) = self
            .app
            .leave_chat_usecase
            .execute(&self.connection, handle)
            .await
        {
            tracing::debug!("'{}' was not in the chat at cleanup: {}", handle, e);
        }
    }

    async fn reply(&self, text: &str) {
        if let Err(e) = self.app.notifier.reply(&self.connection, text).await {
            tracing::debug!("Reply to '{}' dropped: {}", self.connection, e);
        }
    }
}

fn available_groups(channels: &[ChannelName]) -> String {
    let names: Vec<&str> = channels.iter().map(|c| c.as_str()).collect();
    format!("Available groups: {}", names.join(", "))
}

fn join_names(handles: &[Handle]) -> String {
    let names: Vec<&str> = handles.iter().map(|h| h.as_str()).collect();
    names.join(", ")
}
