//! Channel Registry
//!
//! 起動時に固定されるサブチャンネル（グループ）の集合。各チャンネルは
//! メンバー集合と独立したメッセージログを持つ。

use std::collections::HashSet;

use super::{
    error::BoardError,
    message_log::MessageLog,
    value_object::{ChannelName, ConnectionId},
};

#[derive(Debug, Clone)]
pub struct Channel {
    pub name: ChannelName,
    /// 参加順のメンバー
    members: Vec<ConnectionId>,
    /// 一度でも参加したことのある接続
    visited: HashSet<ConnectionId>,
    pub log: MessageLog,
}

impl Channel {
    /// チャンネルログは常に無制限
    pub fn new(name: ChannelName) -> Self {
        Self {
            name,
            members: Vec::new(),
            visited: HashSet::new(),
            log: MessageLog::unbounded(),
        }
    }

    /// メンバーに追加する
    ///
    /// # Returns
    ///
    /// 初めての参加なら `true`、以前に参加したことがあれば `false`
    pub fn join(&mut self, connection: ConnectionId) -> Result<bool, BoardError> {
        if self.is_member(&connection) {
            return Err(BoardError::AlreadyMember(self.name.to_string()));
        }
        self.members.push(connection);
        Ok(self.visited.insert(connection))
    }

    pub fn leave(&mut self, connection: &ConnectionId) -> Result<(), BoardError> {
        if self.remove_member(connection) {
            Ok(())
        } else {
            Err(BoardError::NotMember(self.name.to_string()))
        }
    }

    /// メンバーから外す（いなければ何もしない）
    pub fn remove_member(&mut self, connection: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != connection);
        self.members.len() != before
    }

    pub fn is_member(&self, connection: &ConnectionId) -> bool {
        self.members.contains(connection)
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    /// メンバーでなければ `NotMember`
    pub fn ensure_member(&self, connection: &ConnectionId) -> Result<(), BoardError> {
        if self.is_member(connection) {
            Ok(())
        } else {
            Err(BoardError::NotMember(self.name.to_string()))
        }
    }
}

/// 設定順に並んだチャンネル一覧
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

impl ChannelRegistry {
    pub fn new(names: impl IntoIterator<Item = ChannelName>) -> Self {
        let mut channels: Vec<Channel> = Vec::new();
        for name in names {
            if !channels.iter().any(|c| c.name == name) {
                channels.push(Channel::new(name));
            }
        }
        Self { channels }
    }

    pub fn names(&self) -> Vec<ChannelName> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&Channel, BoardError> {
        self.channels
            .iter()
            .find(|c| c.name.as_str() == name)
            .ok_or_else(|| BoardError::NoSuchChannel(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Channel, BoardError> {
        self.channels
            .iter_mut()
            .find(|c| c.name.as_str() == name)
            .ok_or_else(|| BoardError::NoSuchChannel(name.to_string()))
    }

    /// 接続を全チャンネルから外し、参加履歴も消す
    ///
    /// # Returns
    ///
    /// 外したチャンネルと、そのチャンネルに残ったメンバー
    pub fn leave_all(&mut self, connection: &ConnectionId) -> Vec<(ChannelName, Vec<ConnectionId>)> {
        self.channels
            .iter_mut()
            .filter_map(|channel| {
                channel.visited.remove(connection);
                channel
                    .remove_member(connection)
                    .then(|| (channel.name.clone(), channel.members.clone()))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }
}
