//! Server state shared by every connection.

use std::sync::Arc;

use kairan_shared::time::Clock;

use crate::{
    domain::{BoardRepository, MessagePusher},
    usecase::{
        BoardQueryUseCase, ChannelMembershipUseCase, LeaveChatUseCase, Notifier,
        PostMessageUseCase, RegisterClientUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// RegisterClientUseCase（グローバルチャット登録のユースケース）
    pub register_client_usecase: Arc<RegisterClientUseCase>,
    /// LeaveChatUseCase（グローバルチャット退出のユースケース）
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// ChannelMembershipUseCase（チャンネル参加・退出のユースケース）
    pub channel_membership_usecase: Arc<ChannelMembershipUseCase>,
    /// BoardQueryUseCase（参照系のユースケース）
    pub board_query_usecase: Arc<BoardQueryUseCase>,
    /// Notifier（コマンドへの返信に使う）
    pub notifier: Arc<Notifier>,
    /// MessagePusher（接続ごとの送信キューの登録・解除）
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl AppState {
    /// Repository と MessagePusher から全ユースケースを組み立てる
    pub fn new(
        repository: Arc<dyn BoardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let notifier = Arc::new(Notifier::new(repository.clone(), message_pusher.clone()));

        Self {
            register_client_usecase: Arc::new(RegisterClientUseCase::new(
                repository.clone(),
                notifier.clone(),
            )),
            leave_chat_usecase: Arc::new(LeaveChatUseCase::new(
                repository.clone(),
                notifier.clone(),
            )),
            post_message_usecase: Arc::new(PostMessageUseCase::new(
                repository.clone(),
                notifier.clone(),
                clock,
            )),
            channel_membership_usecase: Arc::new(ChannelMembershipUseCase::new(
                repository.clone(),
                notifier.clone(),
            )),
            board_query_usecase: Arc::new(BoardQueryUseCase::new(repository)),
            notifier,
            message_pusher,
        }
    }
}
