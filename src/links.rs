//! Deep-link formatting. A quiz is shared as a `t.me` link that carries its
//! current token in the `startgroup` payload; opening the link in a group
//! fires `/start <token>` at the bot.

use url::Url;

/// Link that lets a user launch the quiz behind `token` into a group.
pub fn startgroup_link(bot_username: &str, token: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("https://t.me/{bot_username}"),
        [("startgroup", token)],
    )
}

/// Link that moves a user from a group into the private chat with the bot.
pub fn private_chat_link(bot_username: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(&format!("https://t.me/{bot_username}"), [("start", "new")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startgroup_link_carries_token() {
        let url = startgroup_link("quizsharebot", "5417231").unwrap();
        assert_eq!(url.as_str(), "https://t.me/quizsharebot?startgroup=5417231");
    }

    #[test]
    fn tokens_are_query_escaped() {
        let url = startgroup_link("quizsharebot", "a b&c").unwrap();
        assert_eq!(url.query(), Some("startgroup=a+b%26c"));
    }

    #[test]
    fn private_chat_link_points_at_bot() {
        let url = private_chat_link("quizsharebot").unwrap();
        assert_eq!(url.as_str(), "https://t.me/quizsharebot?start=new");
    }
}
