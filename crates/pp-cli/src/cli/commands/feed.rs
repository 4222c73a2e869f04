use anyhow::{Context, Result};
use pp_app::App;
use pp_core::feed::{FeedQuery, PostFeedItem};

fn render(post: &PostFeedItem) -> String {
    let mut line = format!(
        "{}  @{}  {} likes",
        post.created_at.format("%Y-%m-%d %H:%M"),
        post.user_name,
        post.likes_count
    );
    if let Some(caption) = post.caption.as_deref().filter(|c| !c.is_empty()) {
        line.push_str("  ");
        line.push_str(caption);
    }
    line
}

/// Print the first page of the feed.
pub async fn run(app: &App, limit: usize) -> Result<()> {
    let mut stream = app
        .watch_feed()
        .execute(FeedQuery { limit })
        .await
        .context("Failed to subscribe to feed")?;

    match stream.next().await {
        Some(posts) if posts.is_empty() => println!("No posts yet"),
        Some(posts) => posts.iter().for_each(|post| println!("{}", render(post))),
        None => println!("Feed closed"),
    }

    stream.cancel();
    Ok(())
}
