use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "news-cli")]
#[command(about = "Command-line client for the news gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Correlation ID to send as `request_id`.
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a page of the latest news
    Latest {
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Search news by keyword
    Filter {
        keyword: String,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Show one news item with its comments
    Detailed { id: u64 },
    /// Post a comment on a news item
    Comment {
        post: i64,
        content: String,
        #[arg(short, long, default_value = "anonymous")]
        author: String,
        /// ID of the comment being replied to.
        #[arg(long, default_value_t = 0)]
        reply_to: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(id) = &cli.request_id {
        query.push(("request_id", id.clone()));
    }

    match cli.command {
        Commands::Latest { page } => {
            query.push(("page", page.to_string()));
            let res = client
                .get(format!("{}/news/latest", cli.url))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Filter { keyword, page } => {
            query.push(("page", page.to_string()));
            query.push(("keyword", keyword));
            let res = client
                .get(format!("{}/news/filter", cli.url))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Detailed { id } => {
            query.push(("id", id.to_string()));
            let res = client
                .get(format!("{}/news/detailed", cli.url))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Comment {
            post,
            content,
            author,
            reply_to,
        } => {
            let comment = json!({
                "ID": 0,
                "Author": author,
                "Content": content,
                "PubTime": chrono::Utc::now().timestamp(),
                "ParentPost": post,
                "ParentComment": reply_to,
            });
            let res = client
                .post(format!("{}/comments/store", cli.url))
                .query(&query)
                .json(&comment)
                .send()
                .await?;
            let status = res.status();
            if status.is_success() {
                println!("Comment stored ({})", status);
            } else {
                eprintln!("Error: gateway returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text.trim_end());
                }
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text.trim_end());
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
