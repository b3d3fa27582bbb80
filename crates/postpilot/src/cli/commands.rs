//! Argument definitions.

use clap::{Args, Parser, Subcommand};
use postpilot_core::User;
use std::path::PathBuf;
use uuid::Uuid;

/// Generate social posts with a language model and publish them to LinkedIn.
#[derive(Parser, Debug)]
#[command(name = "postpilot")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "POSTPILOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Acting user
    #[command(flatten)]
    pub user: UserArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pipeline operations.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a post suggestion from a topic or article
    Generate {
        /// Topic or article text
        #[arg(short, long)]
        topic: String,
    },

    /// Publish text to LinkedIn
    Publish {
        /// Post text
        #[arg(short, long)]
        text: String,

        /// Generation the text came from; marked published on success
        #[arg(short, long)]
        generation_id: Option<Uuid>,
    },

    /// Delete a published LinkedIn post
    Delete {
        /// Generation whose post should be deleted
        #[arg(short, long, required_unless_present = "post_id")]
        generation_id: Option<Uuid>,

        /// LinkedIn post id, e.g. urn:li:share:123
        #[arg(short, long)]
        post_id: Option<String>,
    },

    /// List recent generations
    List {
        /// Maximum number of records (configured default when omitted)
        #[arg(short, long)]
        limit: Option<usize>,

        /// List distribution attempts instead of generations
        #[arg(long)]
        distributions: bool,
    },

    /// Show one generation record
    Show {
        /// Generation record id
        id: Uuid,
    },
}

/// The authenticated user the command acts for.
#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    /// User id owning the records
    #[arg(long, env = "POSTPILOT_USER_ID", global = true)]
    pub user_id: Option<Uuid>,

    /// Text-generation provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Preferred generation model
    #[arg(long, env = "POSTPILOT_MODEL", global = true)]
    pub model: Option<String>,

    /// LinkedIn OAuth access token
    #[arg(long, env = "LINKEDIN_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub linkedin_token: Option<String>,

    /// LinkedIn author URN, e.g. urn:li:person:42
    #[arg(long, env = "LINKEDIN_PERSON_URN", global = true)]
    pub linkedin_urn: Option<String>,
}

impl UserArgs {
    /// Assemble the user record. A missing user id is an error.
    pub fn to_user(&self) -> anyhow::Result<User> {
        let id = self
            .user_id
            .ok_or_else(|| anyhow::anyhow!("--user-id or POSTPILOT_USER_ID is required"))?;
        Ok(User::builder()
            .id(id)
            .provider_api_key(self.api_key.clone().unwrap_or_default())
            .model(self.model.clone())
            .linkedin_access_token(self.linkedin_token.clone())
            .linkedin_person_urn(self.linkedin_urn.clone())
            .build()?)
    }
}
