use serde_json::{json, Value};

use domain::{Comment, Post};

const BASE_URL: &str = "http://127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    println!("Starting Tango Korea test client...");

    println!("\n[1/5] Creating a post...");
    let post: Post = client
        .post(format!("{}/api/posts", BASE_URL))
        .json(&json!({ "authorId": "u1", "content": "Who is coming to the Saturday milonga?" }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   -> Post {}", post.id);

    println!("\n[2/5] Commenting...");
    let comments_url = format!("{}/api/posts/{}/comments", BASE_URL, post.id);
    let top: Comment = client
        .post(&comments_url)
        .json(&json!({ "authorId": "u2", "content": "Me! Is there a practica before?" }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   -> Comment {}", top.id);

    println!("\n[3/5] Replying to the comment...");
    let reply: Comment = client
        .post(&comments_url)
        .json(&json!({ "authorId": "u1", "content": "Yes, from 6pm", "replyTo": top.id }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   -> Reply {}", reply.id);

    println!("\n[4/5] Reacting Like, Love, Love...");
    let reactions_url = format!("{}/{}/reactions", comments_url, reply.id);
    for kind in ["Like", "Love", "Love"] {
        let resp: Value = client
            .post(&reactions_url)
            .json(&json!({ "userId": "u2", "type": kind }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        println!("   -> {}: {}", kind, resp);
    }

    println!("\n[5/5] Fetching the thread...");
    let post: Post = client
        .get(format!("{}/api/posts/{}", BASE_URL, post.id))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    print_thread(&post.comments, 0);

    Ok(())
}

fn print_thread(forest: &[std::sync::Arc<Comment>], depth: usize) {
    for c in forest {
        println!(
            "{}- [{}] {}: {} ({} reaction(s))",
            "  ".repeat(depth + 3),
            c.created_at,
            c.author_id,
            c.content,
            c.reactions.len()
        );
        print_thread(&c.replies, depth + 1);
    }
}
