use std::sync::Arc;

use teloxide::prelude::*;
use tracing::error;

use lpb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types,
};

use crate::router::AppState;

fn to_callback(q: &CallbackQuery) -> types::CallbackQuery {
    types::CallbackQuery {
        user_id: UserId(q.from.id.0 as i64),
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
        message: q.message.as_ref().map(|m| MessageRef {
            chat_id: ChatId(m.chat.id.0),
            message_id: MessageId(m.id.0),
        }),
    }
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let cb = to_callback(&q);

    let Ok(_permit) = state.permits.clone().acquire_owned().await else {
        return Ok(());
    };

    if let Err(e) = state.router.handle_callback(&cb).await {
        error!(data = %cb.data, error = %e, "callback failed");
    }
    Ok(())
}
