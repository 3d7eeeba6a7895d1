use async_trait::async_trait;

use super::{ProcessError, TokenProcessor};
use crate::token::Token;

/// Drops the named top-level keys, e.g. a `draft` token set nothing else references.
///
/// Runs before alias resolution, so aliases into a dropped set no longer resolve.
#[derive(Clone, Debug, Default)]
pub struct SkipKeysProcessor {
    keys: Vec<String>,
}

impl SkipKeysProcessor {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TokenProcessor for SkipKeysProcessor {
    async fn process(&self, token: Token) -> Result<Token, ProcessError> {
        Ok(match token {
            Token::Group(mut group) => {
                group.retain(|key, _| !self.keys.contains(key));
                Token::Group(group)
            }
            other => other,
        })
    }
}
