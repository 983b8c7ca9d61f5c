//! WebSocket client session.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use super::{error::ClientError, ui::redisplay_prompt};

/// Final line the server sends before closing after `exit`
const GOODBYE: &str = "Goodbye.";

/// `exit` / `%exit`
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.strip_prefix('%').unwrap_or(line) == "exit"
}

/// Run one connection until the user exits or the connection drops
///
/// # Returns
///
/// * `Ok(())` - the user exited (server goodbye, Ctrl+C or Ctrl+D)
/// * `Err(ClientError)` - the connection could not be opened or was lost
pub async fn run_client_session(
    url: &str,
    handle: Option<&str>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();

    if let Some(handle) = handle
        && write.send(Message::Text(handle.into())).await.is_err()
    {
        return Err(ClientError::ConnectionLost);
    }

    let mut exiting = false;
    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    println!("\r{}", text.as_str());
                    if exiting && text.as_str() == GOODBYE {
                        return Ok(());
                    }
                    redisplay_prompt();
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return if exiting { Ok(()) } else { Err(ClientError::ConnectionLost) };
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return if exiting { Ok(()) } else { Err(ClientError::ConnectionLost) };
                }
                Some(Ok(_)) => {}
            },
            line = input_rx.recv() => match line {
                Some(line) => {
                    exiting = exiting || is_exit_command(&line);
                    if let Err(e) = write.send(Message::Text(line.into())).await {
                        tracing::warn!("Failed to send line: {}", e);
                        return Err(ClientError::ConnectionLost);
                    }
                }
                None => {
                    // Input closed: leave without waiting for the server
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
            },
        }
    }
}
