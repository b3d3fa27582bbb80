//! Command handlers.

use postpilot_core::User;
use postpilot_pipeline::PipelineFacade;
use uuid::Uuid;

/// Generate a post and print the result as JSON.
///
/// The generation record is written even when the provider fails; its id is
/// reported before the error is returned.
#[tracing::instrument(skip_all)]
pub async fn handle_generate(facade: &PipelineFacade, user: &User, topic: &str) -> anyhow::Result<()> {
    let (result, error) = facade.generate(user, topic).await?.into_parts();
    match error {
        None => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Some(e) => {
            eprintln!("Generation {} failed", result.record_id());
            Err(postpilot_error::PostpilotError::from(e).into())
        }
    }
}

/// Publish text and print the LinkedIn post id.
#[tracing::instrument(skip_all)]
pub async fn handle_publish(
    facade: &PipelineFacade,
    user: &User,
    generation_id: Option<Uuid>,
    text: &str,
) -> anyhow::Result<()> {
    let post_id = facade.publish(user, generation_id, text).await?;
    println!(
        "{}",
        serde_json::json!({"status": "published", "linkedinPostId": post_id})
    );
    Ok(())
}

/// Delete a published post.
#[tracing::instrument(skip_all)]
pub async fn handle_delete(
    facade: &PipelineFacade,
    user: &User,
    generation_id: Option<Uuid>,
    post_id: Option<&str>,
) -> anyhow::Result<()> {
    facade.delete(user, generation_id, post_id).await?;
    println!("{}", serde_json::json!({"status": "deleted"}));
    Ok(())
}

/// Print the user's recent records.
#[tracing::instrument(skip_all)]
pub async fn handle_list(
    facade: &PipelineFacade,
    user: &User,
    limit: Option<usize>,
    distributions: bool,
) -> anyhow::Result<()> {
    let output = if distributions {
        serde_json::to_string_pretty(&facade.list_distributions(user, limit).await?)?
    } else {
        serde_json::to_string_pretty(&facade.list(user, limit).await?)?
    };
    println!("{}", output);
    Ok(())
}

/// Print one generation record.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn handle_show(facade: &PipelineFacade, user: &User, id: Uuid) -> anyhow::Result<()> {
    match facade.get_generation(user, id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => anyhow::bail!("generation {} not found", id),
    }
}
