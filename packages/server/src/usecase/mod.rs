//! UseCase 層
//!
//! コマンド 1 つに対応する掲示板の操作。状態の変更は Repository に、
//! 通知の送信は Notifier に任せます。

mod board_query;
mod channel_membership;
mod leave_chat;
mod notifier;
mod post_message;
mod register_client;
#[cfg(test)]
pub(crate) mod test_support;

pub use board_query::BoardQueryUseCase;
pub use channel_membership::ChannelMembershipUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use notifier::Notifier;
pub use post_message::PostMessageUseCase;
pub use register_client::RegisterClientUseCase;
