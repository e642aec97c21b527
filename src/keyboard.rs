use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResultsButton,
    InlineQueryResultsButtonKind, KeyboardButton, KeyboardButtonPollType, KeyboardMarkup,
};
use url::Url;

pub const CREATE_QUIZ_LABEL: &str = "Create a quiz🏗️";
pub const CANCEL_LABEL: &str = "Cancel❌";

/// One-tap entry into Telegram's quiz-creation UI, plus a way out.
pub fn authoring_keyboard() -> KeyboardMarkup {
    let keyboard = vec![
        vec![KeyboardButton::new(CREATE_QUIZ_LABEL)
            .request(ButtonRequest::Poll(KeyboardButtonPollType::Quiz))],
        vec![KeyboardButton::new(CANCEL_LABEL)],
    ];

    KeyboardMarkup::new(keyboard)
}

/// Button shown above inline results that switches the user into the
/// private chat to author a quiz.
pub fn create_quiz_button() -> InlineQueryResultsButton {
    InlineQueryResultsButton {
        text: CREATE_QUIZ_LABEL.to_owned(),
        kind: InlineQueryResultsButtonKind::StartParameter("new".to_owned()),
    }
}

pub fn share_keyboard(link: Url) -> InlineKeyboardMarkup {
    let keyboard = vec![vec![InlineKeyboardButton::url("Send to a group📤", link)]];

    InlineKeyboardMarkup::new(keyboard)
}

pub fn private_chat_keyboard(link: Url) -> InlineKeyboardMarkup {
    let keyboard = vec![vec![InlineKeyboardButton::url("Open private chat💬", link)]];

    InlineKeyboardMarkup::new(keyboard)
}

pub fn quiz_links_keyboard(quizzes: &[(String, Url)]) -> InlineKeyboardMarkup {
    let keyboard = quizzes
        .iter()
        .map(|(question, link)| vec![InlineKeyboardButton::url(question.clone(), link.clone())]);

    InlineKeyboardMarkup::new(keyboard)
}
