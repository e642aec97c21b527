//! Link directory: answers an owner's inline query with their stored
//! quizzes, each rendered as an article with a share-to-group deep link.

use std::sync::Arc;

use teloxide::{
    payloads::AnswerInlineQuerySetters,
    prelude::Requester,
    types::{
        InlineQuery, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
        InputMessageContentText,
    },
    Bot,
};
use tracing::instrument;

use crate::{keyboard, links, registry::Registry, HandlerResult};

#[instrument(level = "info", skip(registry))]
pub async fn list_quizzes(bot: Bot, query: InlineQuery, registry: Arc<Registry>) -> HandlerResult {
    let records = registry.list_for_owner(&query.from.id.to_string()).await;
    let me = bot.get_me().await?;

    let mut results = Vec::with_capacity(records.len());
    for record in &records {
        let link = links::startgroup_link(me.username(), record.token())?;
        let article = InlineQueryResultArticle::new(
            record.token().to_owned(),
            record.question().to_owned(),
            InputMessageContent::Text(InputMessageContentText::new(
                "Press the button below to launch this quiz in the group.",
            )),
        )
        .reply_markup(keyboard::share_keyboard(link));
        results.push(InlineQueryResult::Article(article));
    }

    // Tokens change on every launch, so a cached article could offer a link
    // that activation has already re-keyed away. The button keeps a route
    // into the authoring flow even when the owner has nothing stored yet.
    bot.answer_inline_query(query.id, results)
        .button(keyboard::create_quiz_button())
        .cache_time(0)
        .is_personal(true)
        .await?;

    Ok(())
}
