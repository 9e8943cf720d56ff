//! Adapter for the embedded email/social wallet.

pub mod frame;
pub mod provider;

pub use frame::{EmailConnectAction, FrameRequest, FrameSession, FrameTransport, SocialProvider};
pub use provider::AuthProvider;

use serde::{Deserialize, Serialize};

/// Which login methods the host enables for the embedded wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthOptions {
    pub email: bool,
    pub socials: Vec<SocialProvider>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            email: true,
            socials: vec![
                SocialProvider::Google,
                SocialProvider::X,
                SocialProvider::Discord,
                SocialProvider::Farcaster,
                SocialProvider::Github,
                SocialProvider::Apple,
                SocialProvider::Facebook,
            ],
        }
    }
}
