//! Board（掲示板の集約）
//!
//! クライアント登録簿・チャンネル・グローバルログをまとめて所有し、
//! 1 つの論理操作を 1 つのメソッドとして提供します。
//!
//! ## 設計ノート
//!
//! Board 自体は同期的な純粋データ構造で、排他制御は Repository 実装が
//! 1 つのロックで行います。各操作は通知先のスナップショット（接続 ID の一覧）を
//! 返すだけで、送信はロックを手放した後に呼び出し側が行います。

use crate::config::BoardConfig;

use super::{
    channel::ChannelRegistry,
    client_registry::ClientRegistry,
    entity::ChatMessage,
    error::BoardError,
    message_log::MessageLog,
    value_object::{ChannelName, ConnectionId, Handle, MessageId, Timestamp},
};

/// 通知先の集合（送信に失敗した接続をどこから外すか）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// グローバルチャットの登録クライアント全体
    Global,
    /// 特定チャンネルのメンバー
    Channel(ChannelName),
}

/// `register` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub handle: Handle,
    /// 参加通知の宛先（登録したクライアント自身を含む）
    pub recipients: Vec<ConnectionId>,
    /// 参加者に案内するチャンネル一覧
    pub channels: Vec<ChannelName>,
}

/// 投稿の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub audience: Audience,
    pub message: ChatMessage,
    pub recipients: Vec<ConnectionId>,
}

/// `join_channel` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelJoin {
    pub channel: ChannelName,
    pub handle: Handle,
    /// 参加通知の宛先（参加したクライアント自身を含む）
    pub recipients: Vec<ConnectionId>,
    /// 参加したクライアントにだけ送る直近の履歴（古い順）
    pub history: Vec<ChatMessage>,
}

/// チャンネルから外れた結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDeparture {
    pub channel: ChannelName,
    pub remaining: Vec<ConnectionId>,
}

/// `leave` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// グローバルチャットに登録されていた場合のハンドル
    pub handle: Option<Handle>,
    /// グローバルチャットに残ったクライアント
    pub remaining_clients: Vec<ConnectionId>,
    /// 外れたチャンネル
    pub channels: Vec<ChannelDeparture>,
}

/// `prune` の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pruned {
    /// 実際に外した接続
    pub removed: Vec<ConnectionId>,
    /// 外した接続のうちハンドルが分かるもの（退出通知に使う）
    pub handles: Vec<Handle>,
    /// 通知先の集合に残った接続
    pub remaining: Vec<ConnectionId>,
}

/// チャンネルの読み取り専用スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub name: ChannelName,
    pub members: Vec<Handle>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
pub struct Board {
    clients: ClientRegistry,
    channels: ChannelRegistry,
    global_log: MessageLog,
    join_history: usize,
    replay_history_on_rejoin: bool,
}

impl Board {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            clients: ClientRegistry::new(),
            channels: ChannelRegistry::new(config.channels.iter().cloned()),
            global_log: MessageLog::with_capacity(config.global_log_capacity),
            join_history: config.join_history,
            replay_history_on_rejoin: config.replay_history_on_rejoin,
        }
    }

    fn require_handle(&self, connection: &ConnectionId) -> Result<Handle, BoardError> {
        self.clients
            .handle_of(connection)
            .cloned()
            .ok_or(BoardError::NotRegistered)
    }

    fn resolve_handles(&self, connections: &[ConnectionId]) -> Vec<Handle> {
        connections
            .iter()
            .filter_map(|c| self.clients.handle_of(c).cloned())
            .collect()
    }

    // ========================================
    // Client Registry
    // ========================================

    pub fn register(
        &mut self,
        connection: ConnectionId,
        handle: Handle,
    ) -> Result<Registration, BoardError> {
        self.clients.register(connection, handle.clone())?;
        Ok(Registration {
            handle,
            recipients: self.clients.connections(),
            channels: self.channels.names(),
        })
    }

    /// グローバルチャットと全チャンネルから外れる
    ///
    /// 登録されていない接続でもチャンネルからは外す。
    pub fn leave(&mut self, connection: &ConnectionId) -> Departure {
        let channels = self
            .channels
            .leave_all(connection)
            .into_iter()
            .map(|(channel, remaining)| ChannelDeparture { channel, remaining })
            .collect();
        let handle = self.clients.unregister(connection).ok().map(|c| c.handle);

        Departure {
            handle,
            remaining_clients: self.clients.connections(),
            channels,
        }
    }

    pub fn is_registered(&self, connection: &ConnectionId) -> bool {
        self.clients.contains(connection)
    }

    pub fn handles(&self) -> Vec<Handle> {
        self.clients.handles()
    }

    // ========================================
    // Global log
    // ========================================

    pub fn post(
        &mut self,
        connection: &ConnectionId,
        body: String,
        timestamp: Timestamp,
    ) -> Result<Delivery, BoardError> {
        let author = self.require_handle(connection)?;
        let message = self.global_log.append(author, body, timestamp);
        Ok(Delivery {
            audience: Audience::Global,
            message,
            recipients: self.clients.connections(),
        })
    }

    pub fn global_message(
        &self,
        requester: &ConnectionId,
        id: MessageId,
    ) -> Result<ChatMessage, BoardError> {
        self.require_handle(requester)?;
        self.global_log.get(id).cloned()
    }

    // ========================================
    // Channel Registry
    // ========================================

    pub fn channel_names(&self) -> Vec<ChannelName> {
        self.channels.names()
    }

    pub fn join_channel(
        &mut self,
        connection: ConnectionId,
        name: &str,
    ) -> Result<ChannelJoin, BoardError> {
        let handle = self.require_handle(&connection)?;
        let join_history = self.join_history;
        let replay_history_on_rejoin = self.replay_history_on_rejoin;

        let channel = self.channels.get_mut(name)?;
        let first_visit = channel.join(connection)?;
        let history = if first_visit || replay_history_on_rejoin {
            channel.log.tail(join_history)
        } else {
            Vec::new()
        };

        Ok(ChannelJoin {
            channel: channel.name.clone(),
            handle,
            recipients: channel.members().to_vec(),
            history,
        })
    }

    pub fn leave_channel(
        &mut self,
        connection: &ConnectionId,
        name: &str,
    ) -> Result<(Handle, ChannelDeparture), BoardError> {
        let handle = self.require_handle(connection)?;
        let channel = self.channels.get_mut(name)?;
        channel.leave(connection)?;

        Ok((
            handle,
            ChannelDeparture {
                channel: channel.name.clone(),
                remaining: channel.members().to_vec(),
            },
        ))
    }

    /// チャンネルに投稿する（投稿者はメンバーでなければならない）
    pub fn post_to_channel(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        body: String,
        timestamp: Timestamp,
    ) -> Result<Delivery, BoardError> {
        let author = self.require_handle(connection)?;
        let channel = self.channels.get_mut(name)?;
        channel.ensure_member(connection)?;

        let message = channel.log.append(author, body, timestamp);
        Ok(Delivery {
            audience: Audience::Channel(channel.name.clone()),
            message,
            recipients: channel.members().to_vec(),
        })
    }

    pub fn channel_members(
        &self,
        requester: &ConnectionId,
        name: &str,
    ) -> Result<Vec<Handle>, BoardError> {
        self.require_handle(requester)?;
        let channel = self.channels.get(name)?;
        Ok(self.resolve_handles(channel.members()))
    }

    /// チャンネルログからメッセージを取得する（要求者はメンバーでなければならない）
    pub fn channel_message(
        &self,
        requester: &ConnectionId,
        name: &str,
        id: MessageId,
    ) -> Result<ChatMessage, BoardError> {
        self.require_handle(requester)?;
        let channel = self.channels.get(name)?;
        channel.ensure_member(requester)?;
        channel.log.get(id).cloned()
    }

    pub fn channel_snapshot(&self, name: &str) -> Result<ChannelSnapshot, BoardError> {
        let channel = self.channels.get(name)?;
        Ok(ChannelSnapshot {
            name: channel.name.clone(),
            members: self.resolve_handles(channel.members()),
            messages: channel.log.iter().cloned().collect(),
        })
    }

    pub fn channel_snapshots(&self) -> Vec<ChannelSnapshot> {
        self.channels
            .iter()
            .map(|channel| ChannelSnapshot {
                name: channel.name.clone(),
                members: self.resolve_handles(channel.members()),
                messages: channel.log.iter().cloned().collect(),
            })
            .collect()
    }

    // ========================================
    // Broadcast pruning
    // ========================================

    /// 到達できなかった接続を通知先の集合から外す
    ///
    /// グローバルチャットから外した接続はハンドルを返す。チャンネルから外した接続は
    /// 登録簿でハンドルを引く。
    pub fn prune(&mut self, audience: &Audience, connections: &[ConnectionId]) -> Pruned {
        match audience {
            Audience::Global => {
                let mut pruned = Pruned::default();
                for connection in connections {
                    if let Ok(client) = self.clients.unregister(connection) {
                        pruned.removed.push(*connection);
                        pruned.handles.push(client.handle);
                    }
                }
                pruned.remaining = self.clients.connections();
                pruned
            }
            Audience::Channel(name) => {
                let Ok(channel) = self.channels.get_mut(name.as_str()) else {
                    return Pruned::default();
                };
                let removed: Vec<ConnectionId> = connections
                    .iter()
                    .filter(|c| channel.remove_member(c))
                    .copied()
                    .collect();
                let remaining = channel.members().to_vec();
                Pruned {
                    handles: self.resolve_handles(&removed),
                    removed,
                    remaining,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(value: &str) -> Handle {
        Handle::new(value.to_string()).unwrap()
    }

    fn id(value: u64) -> MessageId {
        MessageId::new(value).unwrap()
    }

    fn board() -> Board {
        Board::new(&BoardConfig::default())
    }

    fn registered(board: &mut Board, name: &str) -> ConnectionId {
        let connection = ConnectionId::generate();
        board.register(connection, handle(name)).unwrap();
        connection
    }

    #[test]
    fn test_register_notifies_everyone_and_lists_channels() {
        // テスト項目: 登録すると登録済み全員（本人を含む）が通知先になり、チャンネル一覧が返る
        // given (前提条件):
        let mut board = board();
        let alice = registered(&mut board, "alice");

        // when (操作):
        let bob = ConnectionId::generate();
        let registration = board.register(bob, handle("bob")).unwrap();

        // then (期待する結果):
        assert_eq!(registration.recipients, vec![alice, bob]);
        assert_eq!(registration.channels.len(), 5);
        assert_eq!(registration.channels[0].as_str(), "Group1");
    }

    #[test]
    fn test_post_requires_registration() {
        // テスト項目: 未登録の接続は投稿できず、ログも変化しない
        // given (前提条件):
        let mut board = board();

        // when (操作):
        let result = board.post(&ConnectionId::generate(), "hello".to_string(), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(result, Err(BoardError::NotRegistered));
        let alice = registered(&mut board, "alice");
        assert_eq!(
            board.global_message(&alice, MessageId::FIRST),
            Err(BoardError::NotFound(1))
        );
    }

    #[test]
    fn test_post_and_retrieve() {
        // テスト項目: A の最初の投稿は ID 1 になり、B が同じ内容を取得できる
        // given (前提条件):
        let mut board = board();
        let a = registered(&mut board, "A");
        let b = registered(&mut board, "B");

        // when (操作):
        let delivery = board
            .post(&a, "hello".to_string(), Timestamp::new(1672498800000))
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivery.audience, Audience::Global);
        assert_eq!(delivery.recipients, vec![a, b]);
        assert_eq!(delivery.message.id, id(1));
        let fetched = board.global_message(&b, id(1)).unwrap();
        assert_eq!(fetched, delivery.message);
        assert_eq!(fetched.to_string(), "1, A, 2023-01-01 00:00:00, hello");
        assert_eq!(board.global_message(&b, id(2)), Err(BoardError::NotFound(2)));
    }

    #[test]
    fn test_bounded_global_log_from_config() {
        // テスト項目: 設定でグローバルログに上限を付けると古いメッセージは NotFound になる
        // given (前提条件):
        let config = BoardConfig {
            global_log_capacity: Some(2),
            ..BoardConfig::default()
        };
        let mut board = Board::new(&config);
        let alice = registered(&mut board, "alice");

        // when (操作):
        for body in ["one", "two", "three"] {
            board.post(&alice, body.to_string(), Timestamp::new(0)).unwrap();
        }

        // then (期待する結果):
        assert_eq!(board.global_message(&alice, id(1)), Err(BoardError::NotFound(1)));
        assert_eq!(
            board.global_message(&alice, id(3)).map(|m| m.body),
            Ok("three".to_string())
        );
    }

    #[test]
    fn test_join_channel_returns_recent_history() {
        // テスト項目: チャンネル参加時に直近 2 件の履歴が古い順に返る
        // given (前提条件):
        let mut board = board();
        let alice = registered(&mut board, "alice");
        let bob = registered(&mut board, "bob");
        board.join_channel(alice, "Group1").unwrap();
        for body in ["one", "two", "three"] {
            board
                .post_to_channel(&alice, "Group1", body.to_string(), Timestamp::new(0))
                .unwrap();
        }

        // when (操作):
        let join = board.join_channel(bob, "Group1").unwrap();

        // then (期待する結果):
        assert_eq!(join.handle, handle("bob"));
        assert_eq!(join.recipients, vec![alice, bob]);
        let bodies: Vec<&str> = join.history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["two", "three"]);
    }

    #[test]
    fn test_rejoin_without_history_replay() {
        // テスト項目: 再参加時の履歴再送を無効にすると、2 回目以降の参加では履歴が返らない
        // given (前提条件):
        let config = BoardConfig {
            replay_history_on_rejoin: false,
            ..BoardConfig::default()
        };
        let mut board = Board::new(&config);
        let alice = registered(&mut board, "alice");
        board.join_channel(alice, "Group1").unwrap();
        board
            .post_to_channel(&alice, "Group1", "hi".to_string(), Timestamp::new(0))
            .unwrap();
        board.leave_channel(&alice, "Group1").unwrap();

        // when (操作):
        let join = board.join_channel(alice, "Group1").unwrap();

        // then (期待する結果):
        assert!(join.history.is_empty());
    }

    #[test]
    fn test_post_to_channel_from_non_member() {
        // テスト項目: メンバーでない接続のグループ投稿は NotMember で、ログは変化しない
        // given (前提条件):
        let mut board = board();
        let alice = registered(&mut board, "alice");
        let carol = registered(&mut board, "carol");
        board.join_channel(alice, "Group1").unwrap();

        // when (操作):
        let result =
            board.post_to_channel(&carol, "Group1", "intrude".to_string(), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(result, Err(BoardError::NotMember("Group1".to_string())));
        assert!(board.channel_snapshot("Group1").unwrap().messages.is_empty());
    }

    #[test]
    fn test_channel_message_requires_membership() {
        // テスト項目: メンバーでない接続はグループのメッセージを取得できない
        // given (前提条件):
        let mut board = board();
        let a = registered(&mut board, "A");
        let c = registered(&mut board, "C");
        board.join_channel(a, "Group1").unwrap();
        board
            .post_to_channel(&a, "Group1", "hi".to_string(), Timestamp::new(0))
            .unwrap();

        // when (操作):
        let as_member = board.channel_message(&a, "Group1", id(1));
        let as_outsider = board.channel_message(&c, "Group1", id(1));

        // then (期待する結果):
        assert_eq!(as_member.map(|m| m.body), Ok("hi".to_string()));
        assert_eq!(as_outsider, Err(BoardError::NotMember("Group1".to_string())));
    }

    #[test]
    fn test_leave_removes_from_every_channel() {
        // テスト項目: グローバルチャットから抜けると全チャンネルからも外れる
        // given (前提条件):
        let mut board = board();
        let alice = registered(&mut board, "alice");
        let bob = registered(&mut board, "bob");
        board.join_channel(alice, "Group1").unwrap();
        board.join_channel(bob, "Group1").unwrap();
        board.join_channel(alice, "Group4").unwrap();

        // when (操作):
        let departure = board.leave(&alice);

        // then (期待する結果):
        assert_eq!(departure.handle, Some(handle("alice")));
        assert_eq!(departure.remaining_clients, vec![bob]);
        assert_eq!(departure.channels.len(), 2);
        assert_eq!(departure.channels[0].remaining, vec![bob]);
        assert!(!board.is_registered(&alice));
        for snapshot in board.channel_snapshots() {
            assert!(!snapshot.members.contains(&handle("alice")));
        }
        assert_eq!(board.channel_members(&bob, "Group1"), Ok(vec![handle("bob")]));
    }

    #[test]
    fn test_leave_when_not_registered() {
        // テスト項目: 未登録の接続が抜けてもハンドルは返らず、状態は変わらない
        // given (前提条件):
        let mut board = board();
        let bob = registered(&mut board, "bob");

        // when (操作):
        let departure = board.leave(&ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(departure.handle, None);
        assert_eq!(departure.remaining_clients, vec![bob]);
        assert!(departure.channels.is_empty());
    }

    #[test]
    fn test_prune_global_and_channel() {
        // テスト項目: prune は指定された集合からだけ接続を外す
        // given (前提条件):
        let mut board = board();
        let alice = registered(&mut board, "alice");
        let bob = registered(&mut board, "bob");
        board.join_channel(alice, "Group2").unwrap();
        board.join_channel(bob, "Group2").unwrap();
        let group2 = ChannelName::new("Group2".to_string()).unwrap();

        // when (操作):
        let pruned_channel = board.prune(&Audience::Channel(group2), &[bob]);
        let pruned_global = board.prune(&Audience::Global, &[alice, ConnectionId::generate()]);

        // then (期待する結果):
        assert_eq!(pruned_channel.removed, vec![bob]);
        assert_eq!(pruned_channel.handles, vec![handle("bob")]);
        assert_eq!(pruned_channel.remaining, vec![alice]);
        assert_eq!(pruned_global.removed, vec![alice]);
        assert_eq!(pruned_global.handles, vec![handle("alice")]);
        assert_eq!(pruned_global.remaining, vec![bob]);
        assert_eq!(board.handles(), vec![handle("bob")]);
        assert_eq!(board.channel_snapshot("Group2").unwrap().members, Vec::<Handle>::new());
    }
}
