use serde::Deserialize;

#[derive(Deserialize)]
pub struct Token {
    pub token: Option<String>,
}

/* {"token": {"token": "..."}} */
#[derive(Deserialize)]
pub struct Login {
    pub token: Option<Token>,
}

impl Login {
    pub fn into_token(self) -> Option<String> {
        self.token
            .and_then(|t| t.token)
            .filter(|token| !token.is_empty())
    }
}
