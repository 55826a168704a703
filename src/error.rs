use thiserror::Error;

use crate::completion::COMPLETION_FAILURE_TEXT;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Invalid bot mode '{0}', expected 'ai' or 'lookup'")]
    InvalidMode(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error {status}: {message}")]
    CompletionApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Completion response error: {0}")]
    CompletionResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Command '/ask' is not available in {0} mode")]
    ModeMismatch(crate::config::BotMode),
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

impl BotError {
    /// Returns a user-friendly error message suitable for displaying in Discord
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BotError::Serenity(_) => {
                "Sorry, I'm having trouble communicating with Discord right now. Please try again later.".to_string()
            }
            BotError::Config(_)
            | BotError::EnvVar(_)
            | BotError::InvalidMode(_)
            | BotError::Url(_)
            | BotError::ModeMismatch(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
            // Completion failures never leak status codes or bodies to users.
            BotError::CompletionApi { .. }
            | BotError::CompletionResponse(_)
            | BotError::Json(_)
            | BotError::Reqwest(_) => COMPLETION_FAILURE_TEXT.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::config::BotMode;

    #[test]
    fn completion_api_error_names_status_and_body() {
        let err = BotError::CompletionApi {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "rate limited".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("429"));
        assert!(rendered.contains("rate limited"));
    }

    #[test]
    fn completion_errors_hide_details_from_users() {
        let err = BotError::CompletionApi {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "stack trace here".to_string(),
        };
        assert_eq!(err.user_message(), COMPLETION_FAILURE_TEXT);
        assert!(!err.user_message().contains("500"));

        let err = BotError::CompletionResponse("No choices in response".to_string());
        assert_eq!(err.user_message(), COMPLETION_FAILURE_TEXT);
    }

    #[test]
    fn mode_mismatch_is_a_configuration_issue() {
        let err = BotError::ModeMismatch(BotMode::Lookup);
        assert!(err.to_string().contains("lookup"));
        assert!(err.user_message().contains("configuration issue"));
    }
}
