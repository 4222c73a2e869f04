use anyhow::{Context, Result};
use pp_app::App;

pub async fn run(app: &App) -> Result<()> {
    let user = app
        .get_current_user()
        .execute()
        .await
        .context("Failed to read current user")?;
    app.sign_out().execute().await.context("Sign-out failed")?;

    match user {
        Some(user) => println!("Signed out {}", user.label()),
        None => println!("Signed out"),
    }
    Ok(())
}
